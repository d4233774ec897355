//! Application layer coordinating page state, events and actions.
//!
//! This is the coordinator proper: the Action Trigger Controller and the
//! Debounced Filter Submitter both live in [`handler`], on top of the state
//! kept in [`state`] and [`form`].
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └──── Responses / Timer fires ─────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing and state transitions
//! - [`form`]: Filter form values and pending submission
//! - [`layout`]: What the server rendered on the page
//! - [`state`]: Central page state and view model computation
//!
//! # Example
//!
//! ```rust
//! use hangar_coordinator::app::{handle_event, Action, Event, PageState};
//! use hangar_coordinator::Config;
//!
//! let mut state = PageState::new(&Config::default());
//! let sync = state.bind_sync("/corp-inventory/corporation/1/sync/", "1", None);
//! let (_, actions) = handle_event(&mut state, &Event::Activate(sync))?;
//! assert!(matches!(actions[0], Action::SendRequest(_)));
//! # Ok::<(), hangar_coordinator::HangarError>(())
//! ```

pub mod actions;
pub mod form;
pub mod handler;
pub mod layout;
pub mod state;

pub use actions::{Action, OutboundRequest, RequestId, SubmitOrigin, TimerHandle, TimerTask};
pub use form::{FilterForm, FilterFormSpec};
pub use handler::{handle_event, Event, Key};
pub use layout::{ControlSpec, PageLayout};
pub use state::{PageState, Timings};
