//! Domain layer for the hangar coordinator.
//!
//! Plain data types shared by the coordinator, the runtime and the UI layer.
//! Nothing here performs I/O or knows about timers.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`control`]: Action controls and their request state
//! - [`filter`]: Filter form values
//! - [`notification`]: Banner model and severities
//! - [`response`]: Mutate-request outcomes and their resolution
//!
//! # Examples
//!
//! ```
//! use hangar_coordinator::domain::{ActionResponse, RequestOutcome, Resolution};
//!
//! let outcome = RequestOutcome::Success(ActionResponse::success());
//! assert_eq!(outcome.resolve(), Resolution::Accepted);
//! ```

pub mod control;
pub mod error;
pub mod filter;
pub mod notification;
pub mod response;

pub use control::{ActionControl, ControlId, ControlKind, ControlLabel, ControlState};
pub use error::{HangarError, Result};
pub use filter::FilterQuery;
pub use notification::{BannerPhase, Notification, NotificationId, Severity};
pub use response::{ActionResponse, FailureReason, RequestOutcome, Resolution};
