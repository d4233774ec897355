//! The page driver.
//!
//! [`Page`] owns the page state and the ports, queues incoming events and runs
//! each one to completion: the handler computes actions, the driver executes
//! them, and anything they produce (an immediate completion, an expired timer)
//! is queued behind the current event rather than handled re-entrantly.

use super::csrf::CsrfTokenSource;
use super::host::Host;
use super::scheduler::{Scheduler, SimulatedScheduler};
use super::transport::{PreparedRequest, Transport};
use crate::app::{handle_event, Action, Event, PageState};
use crate::Config;
use std::collections::VecDeque;
use std::time::Duration;

/// Header jQuery-style clients send so the server can tell XHR from navigation.
const REQUESTED_WITH: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

#[derive(Debug)]
pub struct Page<T, S, C, H> {
    state: PageState,
    transport: T,
    scheduler: S,
    csrf: C,
    host: H,
    csrf_header: String,
    queue: VecDeque<Event>,
}

impl<T, S, C, H> Page<T, S, C, H>
where
    T: Transport,
    S: Scheduler,
    C: CsrfTokenSource,
    H: Host,
{
    pub fn new(
        state: PageState,
        transport: T,
        scheduler: S,
        csrf: C,
        host: H,
        config: &Config,
    ) -> Self {
        Self {
            state,
            transport,
            scheduler,
            csrf,
            host,
            csrf_header: config.csrf_header.clone(),
            queue: VecDeque::new(),
        }
    }

    /// Handles one input event and everything it triggers synchronously.
    pub fn dispatch(&mut self, event: Event) {
        self.queue.push_back(event);
        self.drain();
    }

    /// Picks up finished requests and expired timers.
    pub fn pump(&mut self) {
        for completion in self.transport.poll_completed() {
            self.queue.push_back(Event::ResponseReceived {
                request: completion.request,
                outcome: completion.outcome,
            });
        }
        for handle in self.scheduler.take_due() {
            self.queue.push_back(Event::TimerFired(handle));
        }
        self.drain();
    }

    #[must_use]
    pub const fn state(&self) -> &PageState {
        &self.state
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    #[must_use]
    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn csrf_mut(&mut self) -> &mut C {
        &mut self.csrf
    }

    fn drain(&mut self) {
        while let Some(event) = self.queue.pop_front() {
            self.state.set_clock(self.scheduler.now());
            match handle_event(&mut self.state, &event) {
                Ok((should_render, actions)) => {
                    tracing::debug!(
                        action_count = actions.len(),
                        should_render = should_render,
                        "event handled"
                    );
                    for action in actions {
                        self.execute(action);
                    }
                    if should_render {
                        let view = self.state.compute_viewmodel();
                        self.host.render(&view);
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, event = ?event, "event dropped");
                }
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn execute(&mut self, action: Action) {
        match action {
            Action::SendRequest(request) => {
                let mut headers =
                    vec![(REQUESTED_WITH.0.to_string(), REQUESTED_WITH.1.to_string())];
                match self.csrf.token() {
                    Some(token) => headers.push((self.csrf_header.clone(), token)),
                    None => tracing::warn!(
                        request_id = %request.id,
                        "no csrf token available, sending without"
                    ),
                }
                self.transport.send(PreparedRequest { request, headers });
            }
            Action::ConfirmNavigation { prompt, url } => {
                if self.host.confirm(&prompt) {
                    tracing::debug!(url = %url, "confirmed, navigating");
                    self.host.navigate(&url);
                } else {
                    tracing::debug!(url = %url, "confirmation declined");
                }
            }
            Action::ScheduleTimer { handle, delay } => self.scheduler.schedule(handle, delay),
            Action::CancelTimer(handle) => self.scheduler.cancel(handle),
            Action::SubmitFilter { query, origin } => self.host.submit_filter(&query, origin),
            Action::SetSpinner(visible) => self.host.set_spinner(visible),
            Action::ReloadPage => self.host.reload(),
        }
    }
}

impl<T, C, H> Page<T, SimulatedScheduler, C, H>
where
    T: Transport,
    C: CsrfTokenSource,
    H: Host,
{
    /// Moves the virtual clock forward by `by`, firing timers at their exact
    /// deadlines along the way.
    pub fn advance(&mut self, by: Duration) {
        let target = self.scheduler.now() + by;
        self.advance_to(target);
    }

    /// Moves the virtual clock to `target` (no-op for times in the past).
    pub fn advance_to(&mut self, target: Duration) {
        self.pump();
        while let Some(deadline) = self.scheduler.next_deadline() {
            if deadline > target {
                break;
            }
            self.scheduler.advance_to(deadline);
            self.pump();
        }
        self.scheduler.advance_to(target);
        self.pump();
    }
}
