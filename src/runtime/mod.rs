//! Runtime ports and the page driver.
//!
//! The handler in [`crate::app`] is pure; this layer gives its actions
//! somewhere to go.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Page (event queue, run-to-completion)        │
//! │   handle_event → actions ─┬─▶ Transport      │  mutate requests
//! │                           ├─▶ Scheduler      │  cancellable timers
//! │                           ├─▶ CsrfTokenSource│  anti-forgery header
//! │                           └─▶ Host           │  reload / navigate / submit
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use hangar_coordinator::app::{Event, PageState};
//! use hangar_coordinator::runtime::{
//!     Completion, Page, PreparedRequest, RecordingHost, SimulatedScheduler, StaticToken, Transport,
//! };
//! use hangar_coordinator::Config;
//!
//! #[derive(Default)]
//! struct Outbox(Vec<PreparedRequest>);
//!
//! impl Transport for Outbox {
//!     fn send(&mut self, request: PreparedRequest) {
//!         self.0.push(request);
//!     }
//!     fn poll_completed(&mut self) -> Vec<Completion> {
//!         Vec::new()
//!     }
//! }
//!
//! let config = Config::default();
//! let mut state = PageState::new(&config);
//! let sync = state.bind_sync("/corp-inventory/corporation/1/sync/", "1", None);
//! let mut page = Page::new(
//!     state,
//!     Outbox::default(),
//!     SimulatedScheduler::new(),
//!     StaticToken(Some("token".into())),
//!     RecordingHost::new(),
//!     &config,
//! );
//!
//! page.dispatch(Event::Activate(sync));
//! page.dispatch(Event::Activate(sync));
//! assert_eq!(page.transport().0.len(), 1);
//! assert_eq!(page.transport().0[0].header("X-CSRFToken"), Some("token"));
//! ```

pub mod csrf;
pub mod host;
pub mod page;
pub mod scheduler;
pub mod transport;

pub use csrf::{CookieJar, CsrfTokenSource, StaticToken};
pub use host::{Host, HostEffect, RecordingHost};
pub use page::Page;
pub use scheduler::{Scheduler, SimulatedScheduler};
pub use transport::{Completion, HttpTransport, PreparedRequest, ScriptedTransport, Transport};
