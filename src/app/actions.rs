//! Actions representing side effects to be executed by the page runtime.
//!
//! The event handler never touches the network, timers or the host page. It
//! returns a `Vec<Action>` describing what must happen, in order, and the
//! runtime ([`crate::runtime::Page`]) executes them against its ports.
//!
//! # Example
//!
//! ```rust
//! use hangar_coordinator::app::{Action, TimerHandle};
//! use std::time::Duration;
//!
//! let actions = vec![
//!     Action::CancelTimer(TimerHandle(1)),
//!     Action::ScheduleTimer { handle: TimerHandle(2), delay: Duration::from_millis(350) },
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::domain::{ControlId, FilterQuery, NotificationId};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Cancellable handle of a scheduled timer.
///
/// Handles are allocated by [`PageState`](crate::app::PageState) and never
/// reused within a page lifetime, so a fire for an old handle can always be
/// told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TimerHandle(pub u64);

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Work attached to a timer handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Trailing edge of the search debounce window.
    SubmitFilter,
    /// Reload after a successful sync, once the user had time to read it.
    Reload,
    /// Display duration of a banner elapsed.
    FadeNotification(NotificationId),
    /// Fade transition of a banner finished.
    DetachNotification(NotificationId),
}

/// Correlates a mutate request with its eventual outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request-{}", self.0)
    }
}

/// A mutate call issued on behalf of a control. Always a `POST`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub id: RequestId,
    pub control: ControlId,
    pub url: String,
}

/// Why the filter form is being submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitOrigin {
    /// The search field went quiet for the full quiescence window.
    Debounced,
    /// A dropdown changed value.
    Dropdown,
    /// The clear-filters control reset the form.
    Cleared,
    /// The user pressed Enter; the browser's own submission proceeds and the
    /// host must not issue a second one.
    Native,
}

/// Commands executed by the page runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Posts to a mutate endpoint; the runtime attaches the anti-forgery token.
    SendRequest(OutboundRequest),

    /// Asks the user a yes/no question and navigates to `url` only on yes.
    ConfirmNavigation {
        prompt: String,
        url: String,
    },

    /// Arms a timer. When it expires the runtime feeds back
    /// [`Event::TimerFired`](crate::app::Event::TimerFired) with the same handle.
    ScheduleTimer {
        handle: TimerHandle,
        delay: Duration,
    },

    /// Disarms a timer. Cancelling an expired or already cancelled handle is a no-op.
    CancelTimer(TimerHandle),

    /// Submits the filter form with a snapshot of its values.
    SubmitFilter {
        query: FilterQuery,
        origin: SubmitOrigin,
    },

    /// Shows or hides the search pending indicator.
    SetSpinner(bool),

    /// Reloads the whole page.
    ReloadPage,
}
