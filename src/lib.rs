//! Hangar coordinator: client-side behaviour for the corporation inventory pages.
//!
//! The inventory pages render hangar contents and transactions on the server.
//! This crate coordinates what happens on top of them:
//! - Action controls (sync, tracking toggle, delete) that must not fire twice
//! - A filter form whose search box submits after the user stops typing
//! - Transient banners reporting outcomes, removed after a few seconds
//! - Initialisation options for the table widget
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Replay CLI (main.rs, replay.rs)                    │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Runtime (runtime/)                                 │  ← Page driver
//! │  - Transport, Scheduler, CSRF source, Host ports    │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, action emission                  │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI (ui/)      │   │ Notifications │   │ Domain        │
//! │ - View models │   │ (notify.rs)   │   │ (domain/)     │
//! │ - Grid opts   │   │ - Banner sink │   │ - Controls    │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - OpenTelemetry spans exported to OTLP/JSON files  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Event handler and page state
//! - [`domain`]: Controls, filter values, notifications, request outcomes
//! - [`notify`]: Newest-first banner sink
//! - [`runtime`]: Ports and the [`runtime::Page`] driver
//! - [`ui`]: View models, text renderer and grid options
//! - [`replay`]: Scripted scenarios for the `hangar-replay` binary
//! - [`observability`]: Tracing setup
//! - [`infrastructure`]: Data directory resolution
//!
//! # Configuration
//!
//! Everything has a default; a TOML file may override any key:
//!
//! ```toml
//! mount_path = "/corp-inventory"
//! quiescence_ms = 350
//! reload_delay_ms = 2000
//! notification_ttl_ms = 5000
//! fade_ms = 400
//! csrf_cookie = "csrftoken"
//! csrf_header = "X-CSRFToken"
//! trace_level = "debug"
//! ```
//!
//! # Example
//!
//! ```rust
//! use hangar_coordinator::{handle_event, initialize, Action, Config, Event, PageLayout};
//!
//! let layout = PageLayout::from_json(r#"{
//!     "controls": [
//!         { "kind": "sync", "target_url": "/corp-inventory/corporation/98000001/sync/", "correlation_id": "98000001" }
//!     ],
//!     "filter_form": { "selectors": { "location": "" } }
//! }"#)?;
//!
//! let mut state = initialize(&Config::default(), layout);
//! let sync = *state.controls.keys().next().unwrap();
//! let (_, actions) = handle_event(&mut state, &Event::Activate(sync))?;
//! assert!(matches!(actions.as_slice(), [Action::SendRequest(_)]));
//! # Ok::<(), hangar_coordinator::HangarError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod notify;
pub mod observability;
pub mod replay;
pub mod runtime;
pub mod ui;

pub use app::{handle_event, Action, Event, PageLayout, PageState};
pub use domain::{HangarError, Result};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Coordinator settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// URL prefix the inventory app is mounted under. Default: `/corp-inventory`
    pub mount_path: String,

    /// Quiet period in ms before a typed search is submitted. Default: 350
    pub quiescence_ms: u64,

    /// Delay in ms between a sync confirmation and the page reload. Default: 2000
    pub reload_delay_ms: u64,

    /// How long in ms a banner stays before fading. Default: 5000
    pub notification_ttl_ms: u64,

    /// Fade-out length in ms. Default: 400
    pub fade_ms: u64,

    /// Cookie carrying the anti-forgery token.
    pub csrf_cookie: String,

    /// Header the anti-forgery token is sent in.
    pub csrf_header: String,

    /// Tracing filter directive, e.g. `debug` or `hangar_coordinator=trace`.
    ///
    /// When unset, [`initialize`] installs no subscriber and `RUST_LOG` is not
    /// consulted.
    pub trace_level: Option<String>,

    /// Where trace files go. See [`infrastructure::paths::data_dir`].
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mount_path: "/corp-inventory".to_string(),
            quiescence_ms: 350,
            reload_delay_ms: 2000,
            notification_ttl_ms: 5000,
            fade_ms: 400,
            csrf_cookie: "csrftoken".to_string(),
            csrf_header: "X-CSRFToken".to_string(),
            trace_level: None,
            data_dir: None,
        }
    }
}

impl Config {
    /// Builds a config from string pairs, e.g. `data-*` attributes on the page.
    ///
    /// Unknown keys are ignored. Numeric values that do not parse keep their
    /// default.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use hangar_coordinator::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("mount_path".to_string(), "/inv".to_string());
    /// map.insert("quiescence_ms".to_string(), "500".to_string());
    /// map.insert("fade_ms".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.mount_path, "/inv");
    /// assert_eq!(config.quiescence_ms, 500);
    /// assert_eq!(config.fade_ms, 400);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let millis = |key: &str, fallback: u64| {
            map.get(key)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(fallback)
        };
        let text = |key: &str, fallback: String| {
            map.get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map_or(fallback, String::from)
        };

        Self {
            quiescence_ms: millis("quiescence_ms", defaults.quiescence_ms),
            reload_delay_ms: millis("reload_delay_ms", defaults.reload_delay_ms),
            notification_ttl_ms: millis("notification_ttl_ms", defaults.notification_ttl_ms),
            fade_ms: millis("fade_ms", defaults.fade_ms),
            mount_path: text("mount_path", defaults.mount_path),
            csrf_cookie: text("csrf_cookie", defaults.csrf_cookie),
            csrf_header: text("csrf_header", defaults.csrf_header),
            trace_level: map.get("trace_level").cloned(),
            data_dir: map.get("data_dir").map(PathBuf::from),
        }
    }

    /// Loads a TOML config file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`HangarError::Io`] if the file cannot be read and
    /// [`HangarError::Config`] if it is not valid TOML or has unknown keys.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }
}

/// Sets up tracing (when `trace_level` is set) and binds the page layout.
///
/// ```rust
/// use hangar_coordinator::{initialize, Config, PageLayout};
///
/// let state = initialize(&Config::default(), PageLayout::default());
/// assert!(state.controls.is_empty());
/// ```
pub fn initialize(config: &Config, layout: PageLayout) -> PageState {
    if config.trace_level.is_some() {
        observability::init_tracing(config);
    }
    tracing::debug!(
        controls = layout.controls.len(),
        has_filter_form = layout.filter_form.is_some(),
        "initializing hangar coordinator"
    );
    PageState::from_layout(layout, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_map_gives_defaults() {
        assert_eq!(Config::from_map(&BTreeMap::new()), Config::default());
    }

    #[test]
    fn config_file_overrides_some_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hangar.toml");
        std::fs::write(&path, "quiescence_ms = 100\ncsrf_header = \"X-Token\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.quiescence_ms, 100);
        assert_eq!(config.csrf_header, "X-Token");
        assert_eq!(config.reload_delay_ms, 2000);
    }

    #[test]
    fn unknown_key_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hangar.toml");
        std::fs::write(&path, "debounce = 3\n").unwrap();

        assert!(matches!(Config::from_file(&path), Err(HangarError::Config(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::from_file(dir.path().join("absent.toml")),
            Err(HangarError::Io(_))
        ));
    }
}
