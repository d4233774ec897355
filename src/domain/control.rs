//! Action control model.
//!
//! An [`ActionControl`] is the identity of a clickable control on the page (a
//! sync button, a tracking toggle, a delete link). It is not a network object:
//! it lives as long as the page does and only changes state in response to
//! activations and request outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Page-local identifier of a bound control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlId(pub u32);

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "control-{}", self.0)
    }
}

/// Which action a control triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    /// Starts a server-side sync; guarded against duplicate activation.
    Sync,
    /// Flips tracking for an entity; not guarded.
    Toggle,
    /// Navigates to the deletion URL after an explicit confirmation.
    Delete,
}

/// Request lifecycle state of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlState {
    /// Ready to be activated.
    #[default]
    Idle,
    /// A request is outstanding.
    Pending,
    /// The server accepted the request; a reload is on its way.
    Succeeded,
    /// The last request failed and the control stayed interactable.
    Failed,
}

/// Text and icon shown on a control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlLabel {
    /// Visible caption.
    pub text: String,
    /// Icon classes rendered in front of the caption.
    #[serde(default)]
    pub icon: Option<String>,
}

impl ControlLabel {
    pub fn new(text: impl Into<String>, icon: Option<&str>) -> Self {
        Self {
            text: text.into(),
            icon: icon.map(String::from),
        }
    }

    /// Default caption of a sync button.
    #[must_use]
    pub fn sync_idle() -> Self {
        Self::new("Sync Now", Some("fas fa-sync"))
    }

    /// Busy caption shown while a sync request is outstanding.
    #[must_use]
    pub fn sync_busy() -> Self {
        Self::new("Syncing...", Some("fas fa-sync fa-spin"))
    }
}

/// A bound UI control and its request state.
///
/// `original_label` is captured at bind time so a failed sync can restore the
/// control exactly as it was rendered by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionControl {
    pub id: ControlId,
    pub kind: ControlKind,
    /// URL the action posts to (sync) or navigates to (delete). Toggle
    /// controls derive their URL from `correlation_id` instead.
    pub target_url: String,
    /// Entity the action is scoped to, e.g. a corporation id.
    pub correlation_id: String,
    /// Human-readable entity name used in confirmation prompts.
    pub entity_name: Option<String>,
    pub state: ControlState,
    pub label: ControlLabel,
    pub original_label: ControlLabel,
}

impl ActionControl {
    #[must_use]
    pub fn new(
        id: ControlId,
        kind: ControlKind,
        target_url: impl Into<String>,
        correlation_id: impl Into<String>,
        label: ControlLabel,
    ) -> Self {
        Self {
            id,
            kind,
            target_url: target_url.into(),
            correlation_id: correlation_id.into(),
            entity_name: None,
            state: ControlState::Idle,
            original_label: label.clone(),
            label,
        }
    }

    #[must_use]
    pub fn with_entity_name(mut self, name: impl Into<String>) -> Self {
        self.entity_name = Some(name.into());
        self
    }

    /// Whether the control renders as disabled.
    ///
    /// Only sync controls are ever disabled: while their request is pending
    /// and after it succeeded (the page is about to reload). Toggles and
    /// delete links stay clickable.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.kind == ControlKind::Sync
            && matches!(self.state, ControlState::Pending | ControlState::Succeeded)
    }

    /// Puts the control back to `Idle` with the label it was bound with.
    pub fn restore(&mut self) {
        self.state = ControlState::Idle;
        self.label = self.original_label.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_brings_back_bound_label() {
        let mut control = ActionControl::new(
            ControlId(1),
            ControlKind::Sync,
            "/corp-inventory/corporation/98000001/sync/",
            "98000001",
            ControlLabel::new("Refresh", None),
        );
        control.state = ControlState::Pending;
        control.label = ControlLabel::sync_busy();
        assert!(control.is_disabled());

        control.restore();

        assert_eq!(control.state, ControlState::Idle);
        assert_eq!(control.label, ControlLabel::new("Refresh", None));
        assert!(!control.is_disabled());
    }

    #[test]
    fn pending_toggle_is_not_disabled() {
        let mut control = ActionControl::new(
            ControlId(2),
            ControlKind::Toggle,
            "",
            "98000001",
            ControlLabel::new("Disable", None),
        );
        control.state = ControlState::Pending;
        assert!(!control.is_disabled());
    }
}
