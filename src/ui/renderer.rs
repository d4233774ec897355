//! Plain-text rendering of a page view model.
//!
//! Used by the replay binary to show what the page looks like after each
//! step. Colours are ANSI escapes keyed by banner severity and can be turned
//! off for piping into files.
//!
//! # Example
//!
//! ```rust
//! use hangar_coordinator::app::PageState;
//! use hangar_coordinator::ui::render_text;
//! use hangar_coordinator::Config;
//!
//! let state = PageState::new(&Config::default());
//! let text = render_text(&state.compute_viewmodel(), false);
//! assert!(text.contains("no notifications"));
//! ```

use super::viewmodel::{BannerView, ControlView, PageViewModel};
use crate::domain::Severity;
use std::fmt::Write as _;

const RESET: &str = "\u{1b}[0m";
const DIM: &str = "\u{1b}[2m";

const fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "\u{1b}[36m",
        Severity::Success => "\u{1b}[32m",
        Severity::Danger => "\u{1b}[31m",
    }
}

/// Renders the view model as a multi-line string.
#[must_use]
pub fn render_text(vm: &PageViewModel, color: bool) -> String {
    let mut out = String::new();

    if vm.banners.is_empty() {
        out.push_str("  (no notifications)\n");
    }
    for banner in &vm.banners {
        render_banner(&mut out, banner, color);
    }

    for control in &vm.controls {
        render_control(&mut out, control);
    }

    if let Some(filter) = &vm.filter {
        let spinner = if vm.spinner_visible { " [searching…]" } else { "" };
        let _ = write!(out, "  search: {:?}{spinner}", filter.search);
        for (name, value) in &filter.selectors {
            let _ = write!(out, "  {name}={value:?}");
        }
        out.push('\n');
    }

    for grid in &vm.grids {
        let _ = writeln!(out, "  grid {}: {}", grid.selector, grid.options.to_json());
    }

    out
}

fn render_banner(out: &mut String, banner: &BannerView, color: bool) {
    let tag = format!("[{}]", banner.severity);
    let fading = if banner.fading { " (fading)" } else { "" };
    if color {
        let dim = if banner.fading { DIM } else { "" };
        let _ = writeln!(
            out,
            "  {dim}{}{tag}{RESET} {} ×{fading}",
            severity_color(banner.severity),
            banner.message
        );
    } else {
        let _ = writeln!(out, "  {tag} {} ×{fading}", banner.message);
    }
}

fn render_control(out: &mut String, control: &ControlView) {
    let icon = control
        .icon
        .as_deref()
        .map(|i| format!("<{i}> "))
        .unwrap_or_default();
    let disabled = if control.disabled { " disabled" } else { "" };
    let _ = writeln!(
        out,
        "  {} {:?}: {icon}{} ({:?}{disabled})",
        control.id, control.kind, control.text, control.state
    );
}
