//! View model types representing renderable page state.
//!
//! View models are computed by [`PageState::compute_viewmodel`](crate::app::PageState::compute_viewmodel)
//! and consumed by the host or the text renderer. They contain no logic, only
//! display-ready data.

use super::grid::GridOptions;
use crate::domain::{
    ActionControl, BannerPhase, ControlId, ControlKind, ControlState, FilterQuery, Notification,
    NotificationId, Severity,
};

/// Complete snapshot of what the coordinator controls on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageViewModel {
    /// Banners in display order, newest first.
    pub banners: Vec<BannerView>,
    pub controls: Vec<ControlView>,
    pub spinner_visible: bool,
    /// Current filter values, when the page has a filter form.
    pub filter: Option<FilterQuery>,
    pub grids: Vec<GridView>,
}

/// One banner under the `corp-inventory-wrapper` anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerView {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    /// Classes of the alert element, e.g. `alert alert-danger alert-dismissible fade in`.
    pub css_class: String,
    pub fading: bool,
}

impl BannerView {
    #[must_use]
    pub fn from_notification(n: &Notification) -> Self {
        let fading = n.phase == BannerPhase::Fading;
        let visibility = if fading { "fade" } else { "fade in" };
        Self {
            id: n.id,
            message: n.message.clone(),
            severity: n.severity,
            css_class: format!("alert alert-{} alert-dismissible {visibility}", n.severity),
            fading,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlView {
    pub id: ControlId,
    pub kind: ControlKind,
    pub state: ControlState,
    pub text: String,
    pub icon: Option<String>,
    pub disabled: bool,
}

impl ControlView {
    #[must_use]
    pub fn from_control(control: &ActionControl) -> Self {
        Self {
            id: control.id,
            kind: control.kind,
            state: control.state,
            text: control.label.text.clone(),
            icon: control.label.icon.clone(),
            disabled: control.is_disabled(),
        }
    }
}

/// Grid widget initialisation for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridView {
    pub selector: String,
    pub options: GridOptions,
}
