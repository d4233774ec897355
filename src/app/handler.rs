//! Event handling and state transition logic.
//!
//! [`handle_event`] is the whole coordinator: it turns user input, request
//! outcomes and timer fires into state changes plus an ordered list of
//! [`Action`]s. It performs no I/O, so every transition below can be tested
//! without a network, a browser or a clock.
//!
//! # Sync control
//!
//! ```text
//! Idle ──activate──▶ Pending ──accepted──▶ Succeeded (notify, reload after delay)
//!                      │  ▲
//!                      │  └──activate (ignored)
//!                      └──rejected / unreachable──▶ Idle (label restored, notify)
//! ```
//!
//! Toggles post on every activation and reload right away on success. Delete
//! links only ever produce a confirmation-gated navigation.
//!
//! # Search debounce
//!
//! Every input event disarms the pending submission and arms a new one, so
//! only the trailing edge of a burst submits. Enter disarms it and leaves the
//! submission to the browser.

use super::actions::{Action, RequestId, SubmitOrigin, TimerHandle, TimerTask};
use super::state::PageState;
use crate::domain::error::{HangarError, Result};
use crate::domain::{ControlId, ControlKind, ControlState, ControlLabel, NotificationId};
use crate::domain::{RequestOutcome, Resolution, Severity};

pub const SYNC_STARTED: &str = "Sync started successfully!";
pub const SYNC_FAILED: &str = "Sync failed";
pub const SYNC_UNREACHABLE: &str = "Error starting sync";
pub const ACTION_FAILED: &str = "Action failed";
pub const ACTION_UNREACHABLE: &str = "Error performing action";

/// Keys the search field reacts to on keydown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
    Other,
}

impl Key {
    /// Parses a DOM `key` value such as `"Enter"` or `"a"`.
    #[must_use]
    pub fn parse(key: &str) -> Self {
        let mut chars = key.chars();
        match (key, chars.next(), chars.next()) {
            ("Enter", _, _) => Self::Enter,
            (_, Some(c), None) => Self::Char(c),
            _ => Self::Other,
        }
    }
}

/// Things that happen to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A bound control was clicked.
    Activate(ControlId),

    /// A mutate request completed one way or another.
    ResponseReceived {
        request: RequestId,
        outcome: RequestOutcome,
    },

    /// The search field's value changed; carries the new value.
    SearchInput { value: String },

    /// A key went down while the search field had focus.
    SearchKeyDown { key: Key },

    /// A dropdown of the filter form changed value.
    DropdownChanged { field: String, value: String },

    /// The clear-filters control was clicked.
    ClearFilters,

    /// The user closed a banner.
    DismissNotification(NotificationId),

    /// An armed timer expired.
    TimerFired(TimerHandle),

    /// Another part of the page wants to show a banner.
    Notify { message: String, severity: Severity },
}

/// Processes an event, mutates page state and returns the actions to execute.
///
/// The boolean is `true` when the page must be re-rendered.
///
/// # Errors
///
/// Returns [`HangarError::UnknownControl`] when an activation names a control
/// that was never bound. Every other condition, including failed requests and
/// events for absent page elements, resolves without an error.
pub fn handle_event(state: &mut PageState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::Activate(id) => activate(state, *id),
        Event::ResponseReceived { request, outcome } => Ok(resolve(state, *request, outcome)),
        Event::SearchInput { value } => Ok(search_input(state, value)),
        Event::SearchKeyDown { key } => Ok(search_keydown(state, *key)),
        Event::DropdownChanged { field, value } => Ok(dropdown_changed(state, field, value)),
        Event::ClearFilters => Ok(clear_filters(state)),
        Event::DismissNotification(id) => Ok((state.notifications.dismiss(*id), vec![])),
        Event::TimerFired(handle) => Ok(timer_fired(state, *handle)),
        Event::Notify { message, severity } => {
            let arm = state.show_notification(message, *severity);
            Ok((true, vec![arm]))
        }
    }
}

fn activate(state: &mut PageState, id: ControlId) -> Result<(bool, Vec<Action>)> {
    let control = state.controls.get_mut(&id).ok_or(HangarError::UnknownControl(id.0))?;

    match control.kind {
        ControlKind::Sync => {
            if control.is_disabled() {
                tracing::debug!(
                    control_id = %id,
                    state = ?control.state,
                    "sync already running, activation ignored"
                );
                return Ok((false, vec![]));
            }
            control.state = ControlState::Pending;
            control.label = ControlLabel::sync_busy();
            let url = control.target_url.clone();
            let request = state.start_request(id, &url);
            tracing::debug!(
                control_id = %id,
                request_id = %request.id,
                url = %url,
                "sync requested"
            );
            Ok((true, vec![Action::SendRequest(request)]))
        }
        ControlKind::Toggle => {
            // no duplicate guard: the control stays interactable
            control.state = ControlState::Pending;
            let url = control.target_url.clone();
            let request = state.start_request(id, &url);
            tracing::debug!(
                control_id = %id,
                request_id = %request.id,
                url = %url,
                "toggle requested"
            );
            Ok((false, vec![Action::SendRequest(request)]))
        }
        ControlKind::Delete => {
            let name = control.entity_name.as_deref().unwrap_or(&control.correlation_id);
            let prompt = format!(
                "Are you sure you want to remove tracking for {name}? This will delete all stored data."
            );
            Ok((
                false,
                vec![Action::ConfirmNavigation {
                    prompt,
                    url: control.target_url.clone(),
                }],
            ))
        }
    }
}

fn resolve(
    state: &mut PageState,
    request: RequestId,
    outcome: &RequestOutcome,
) -> (bool, Vec<Action>) {
    let Some(control_id) = state.finish_request(request) else {
        tracing::debug!(request_id = %request, "response for unknown request ignored");
        return (false, vec![]);
    };
    let Some(control) = state.controls.get_mut(&control_id) else {
        return (false, vec![]);
    };

    let resolution = outcome.resolve();
    tracing::debug!(
        control_id = %control_id,
        request_id = %request,
        resolution = ?resolution,
        "request resolved"
    );

    match (control.kind, resolution) {
        (ControlKind::Sync, Resolution::Accepted) => {
            control.state = ControlState::Succeeded;
            let banner = state.show_notification(SYNC_STARTED, Severity::Success);
            let reload = state.arm_timer(TimerTask::Reload, state.timings.reload_delay);
            (true, vec![banner, reload])
        }
        (ControlKind::Sync, Resolution::Rejected { message }) => {
            control.restore();
            let message = message.unwrap_or_else(|| SYNC_FAILED.to_string());
            (true, vec![state.show_notification(&message, Severity::Danger)])
        }
        (ControlKind::Sync, Resolution::Unreachable) => {
            control.restore();
            (true, vec![state.show_notification(SYNC_UNREACHABLE, Severity::Danger)])
        }
        (ControlKind::Toggle, Resolution::Accepted) => {
            control.state = ControlState::Succeeded;
            (false, vec![Action::ReloadPage])
        }
        (ControlKind::Toggle, Resolution::Rejected { message }) => {
            control.state = ControlState::Failed;
            let message = message.unwrap_or_else(|| ACTION_FAILED.to_string());
            (true, vec![state.show_notification(&message, Severity::Danger)])
        }
        (ControlKind::Toggle, Resolution::Unreachable) => {
            control.state = ControlState::Failed;
            (true, vec![state.show_notification(ACTION_UNREACHABLE, Severity::Danger)])
        }
        (ControlKind::Delete, _) => {
            tracing::warn!(control_id = %control_id, "delete controls never issue requests");
            (false, vec![])
        }
    }
}

fn search_input(state: &mut PageState, value: &str) -> (bool, Vec<Action>) {
    let quiescence = state.timings.quiescence;
    let Some(form) = state.filter.as_mut() else {
        return (false, vec![]);
    };

    let mut actions = Vec::with_capacity(3);
    let previous = form.pending.take();
    let show = form.indicator_for(value);
    form.query.search = value.to_string();
    let spinner_changed = form.spinner_visible != show;
    form.spinner_visible = show;

    if let Some(handle) = previous {
        tracing::trace!(handle = %handle, "debounce window reset");
        actions.push(state.disarm_timer(handle));
    }
    if spinner_changed {
        actions.push(Action::SetSpinner(show));
    }

    let arm = state.arm_timer(TimerTask::SubmitFilter, quiescence);
    if let (Action::ScheduleTimer { handle, .. }, Some(form)) = (&arm, state.filter.as_mut()) {
        form.pending = Some(*handle);
    }
    actions.push(arm);

    (spinner_changed, actions)
}

fn search_keydown(state: &mut PageState, key: Key) -> (bool, Vec<Action>) {
    if key != Key::Enter {
        return (false, vec![]);
    }
    let Some(form) = state.filter.as_mut() else {
        return (false, vec![]);
    };

    tracing::debug!(search = %form.query.search, "explicit submit, native submission takes over");
    let mut actions = supersede_pending(state);
    if let Some(form) = state.filter.as_ref() {
        actions.push(Action::SubmitFilter {
            query: form.query.clone(),
            origin: SubmitOrigin::Native,
        });
    }
    (true, actions)
}

fn dropdown_changed(state: &mut PageState, field: &str, value: &str) -> (bool, Vec<Action>) {
    let Some(form) = state.filter.as_mut() else {
        return (false, vec![]);
    };
    let Some(slot) = form.query.selectors.get_mut(field) else {
        tracing::debug!(field = %field, "change on unbound dropdown ignored");
        return (false, vec![]);
    };
    *slot = value.to_string();

    let mut actions = supersede_pending(state);
    if let Some(form) = state.filter.as_ref() {
        actions.push(Action::SubmitFilter {
            query: form.query.clone(),
            origin: SubmitOrigin::Dropdown,
        });
    }
    (true, actions)
}

fn clear_filters(state: &mut PageState) -> (bool, Vec<Action>) {
    let Some(form) = state.filter.as_mut() else {
        return (false, vec![]);
    };
    form.query.clear();

    let mut actions = supersede_pending(state);
    if let Some(form) = state.filter.as_ref() {
        actions.push(Action::SubmitFilter {
            query: form.query.clone(),
            origin: SubmitOrigin::Cleared,
        });
    }
    (true, actions)
}

/// Disarms the pending submission and hides the indicator immediately.
fn supersede_pending(state: &mut PageState) -> Vec<Action> {
    let mut actions = Vec::new();
    let Some(form) = state.filter.as_mut() else {
        return actions;
    };
    let pending = form.pending.take();
    let was_visible = std::mem::replace(&mut form.spinner_visible, false);

    if let Some(handle) = pending {
        actions.push(state.disarm_timer(handle));
    }
    if was_visible {
        actions.push(Action::SetSpinner(false));
    }
    actions
}

fn timer_fired(state: &mut PageState, handle: TimerHandle) -> (bool, Vec<Action>) {
    let Some(task) = state.take_timer(handle) else {
        tracing::trace!(handle = %handle, "stale timer fire ignored");
        return (false, vec![]);
    };

    match task {
        TimerTask::SubmitFilter => {
            let Some(form) = state.filter.as_mut() else {
                return (false, vec![]);
            };
            if form.pending != Some(handle) {
                return (false, vec![]);
            }
            form.pending = None;
            tracing::debug!(search = %form.query.search, "search quiesced, submitting");
            (
                false,
                vec![Action::SubmitFilter {
                    query: form.query.clone(),
                    origin: SubmitOrigin::Debounced,
                }],
            )
        }
        TimerTask::Reload => (false, vec![Action::ReloadPage]),
        TimerTask::FadeNotification(id) => {
            if state.notifications.begin_fade(id) {
                let detach = state.arm_timer(TimerTask::DetachNotification(id), state.timings.fade);
                (true, vec![detach])
            } else {
                (false, vec![])
            }
        }
        TimerTask::DetachNotification(id) => (state.notifications.detach(id), vec![]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::form::FilterFormSpec;
    use crate::domain::{ActionResponse, FailureReason};
    use crate::Config;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn sync_page() -> (PageState, ControlId) {
        let mut state = PageState::new(&Config::default());
        let id = state.bind_sync("/corp-inventory/corporation/98000001/sync/", "98000001", None);
        (state, id)
    }

    fn search_page() -> PageState {
        let mut state = PageState::new(&Config::default());
        state.bind_filter_form(FilterFormSpec {
            selectors: BTreeMap::from([("division".to_string(), String::new())]),
            ..FilterFormSpec::default()
        });
        state
    }

    fn sent_request(actions: &[Action]) -> RequestId {
        actions
            .iter()
            .find_map(|a| match a {
                Action::SendRequest(r) => Some(r.id),
                _ => None,
            })
            .expect("a request was sent")
    }

    fn scheduled(actions: &[Action]) -> Vec<(TimerHandle, Duration)> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::ScheduleTimer { handle, delay } => Some((*handle, *delay)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn second_sync_activation_while_pending_is_ignored() {
        let (mut state, id) = sync_page();

        let (_, first) = handle_event(&mut state, &Event::Activate(id)).unwrap();
        let (render, second) = handle_event(&mut state, &Event::Activate(id)).unwrap();

        assert_eq!(first.len(), 1);
        assert!(!render);
        assert!(second.is_empty());
        assert_eq!(state.in_flight_count(), 1);
        let control = state.control(id).unwrap();
        assert_eq!(control.state, ControlState::Pending);
        assert_eq!(control.label, ControlLabel::sync_busy());
    }

    #[test]
    fn accepted_sync_notifies_then_reloads_after_delay() {
        let (mut state, id) = sync_page();
        let (_, actions) = handle_event(&mut state, &Event::Activate(id)).unwrap();
        let request = sent_request(&actions);

        let (_, actions) = handle_event(
            &mut state,
            &Event::ResponseReceived {
                request,
                outcome: RequestOutcome::Success(ActionResponse::success()),
            },
        )
        .unwrap();

        assert_eq!(state.control(id).unwrap().state, ControlState::Succeeded);
        assert_eq!(state.notifications.banners().len(), 1);
        assert_eq!(state.notifications.banners()[0].message, SYNC_STARTED);
        assert_eq!(state.notifications.banners()[0].severity, Severity::Success);

        let timers = scheduled(&actions);
        let (reload, delay) = timers[1];
        assert_eq!(delay, Duration::from_millis(2000));
        let (_, fired) = handle_event(&mut state, &Event::TimerFired(reload)).unwrap();
        assert_eq!(fired, vec![Action::ReloadPage]);

        // a succeeded sync stays disabled
        let (_, again) = handle_event(&mut state, &Event::Activate(id)).unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn rejected_sync_restores_label_and_uses_server_message() {
        let (mut state, id) = sync_page();
        let (_, actions) = handle_event(&mut state, &Event::Activate(id)).unwrap();

        handle_event(
            &mut state,
            &Event::ResponseReceived {
                request: sent_request(&actions),
                outcome: RequestOutcome::Success(ActionResponse::error("Token expired")),
            },
        )
        .unwrap();

        let control = state.control(id).unwrap();
        assert_eq!(control.state, ControlState::Idle);
        assert_eq!(control.label, ControlLabel::sync_idle());
        assert_eq!(state.notifications.banners()[0].message, "Token expired");
        assert_eq!(state.notifications.banners()[0].severity, Severity::Danger);

        // retryable
        let (_, retry) = handle_event(&mut state, &Event::Activate(id)).unwrap();
        assert_eq!(retry.len(), 1);
    }

    #[test]
    fn unreachable_sync_shows_generic_message() {
        let (mut state, id) = sync_page();
        let (_, actions) = handle_event(&mut state, &Event::Activate(id)).unwrap();

        handle_event(
            &mut state,
            &Event::ResponseReceived {
                request: sent_request(&actions),
                outcome: RequestOutcome::Failure(FailureReason::Network("connection refused".into())),
            },
        )
        .unwrap();

        assert_eq!(state.control(id).unwrap().state, ControlState::Idle);
        assert_eq!(state.notifications.banners().len(), 1);
        assert_eq!(state.notifications.banners()[0].message, SYNC_UNREACHABLE);
    }

    #[test]
    fn toggle_posts_on_every_click_and_reloads_on_success() {
        let mut state = PageState::new(&Config::default());
        let id = state.bind_toggle("98000001", None);

        let (_, first) = handle_event(&mut state, &Event::Activate(id)).unwrap();
        let (_, second) = handle_event(&mut state, &Event::Activate(id)).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        let Action::SendRequest(request) = &first[0] else {
            panic!("expected a request");
        };
        assert_eq!(request.url, "/corp-inventory/manage/toggle/98000001/");

        let (_, actions) = handle_event(
            &mut state,
            &Event::ResponseReceived {
                request: request.id,
                outcome: RequestOutcome::Success(ActionResponse::success()),
            },
        )
        .unwrap();
        assert_eq!(actions, vec![Action::ReloadPage]);
    }

    #[test]
    fn failed_toggle_stays_clickable() {
        let mut state = PageState::new(&Config::default());
        let id = state.bind_toggle("98000001", None);
        let (_, actions) = handle_event(&mut state, &Event::Activate(id)).unwrap();

        handle_event(
            &mut state,
            &Event::ResponseReceived {
                request: sent_request(&actions),
                outcome: RequestOutcome::Failure(FailureReason::HttpStatus(400)),
            },
        )
        .unwrap();

        let control = state.control(id).unwrap();
        assert_eq!(control.state, ControlState::Failed);
        assert!(!control.is_disabled());
        assert_eq!(state.notifications.banners()[0].message, ACTION_UNREACHABLE);
    }

    #[test]
    fn delete_names_entity_in_prompt() {
        let mut state = PageState::new(&Config::default());
        let id = state.bind_delete(
            "/corp-inventory/manage/delete/98000001/",
            "98000001",
            Some("Hangar Rats Inc".to_string()),
        );

        let (_, actions) = handle_event(&mut state, &Event::Activate(id)).unwrap();

        assert_eq!(
            actions,
            vec![Action::ConfirmNavigation {
                prompt: "Are you sure you want to remove tracking for Hangar Rats Inc? This will delete all stored data.".to_string(),
                url: "/corp-inventory/manage/delete/98000001/".to_string(),
            }]
        );
        assert_eq!(state.in_flight_count(), 0);
    }

    #[test]
    fn unknown_control_is_an_error() {
        let mut state = PageState::new(&Config::default());
        assert!(matches!(
            handle_event(&mut state, &Event::Activate(ControlId(42))),
            Err(HangarError::UnknownControl(42))
        ));
    }

    #[test]
    fn input_resets_the_window() {
        let mut state = search_page();

        let (_, first) = handle_event(&mut state, &Event::SearchInput { value: "tri".into() }).unwrap();
        let (first_handle, delay) = scheduled(&first)[0];
        assert_eq!(delay, Duration::from_millis(350));
        assert!(first.contains(&Action::SetSpinner(true)));

        let (_, second) =
            handle_event(&mut state, &Event::SearchInput { value: "tritanium".into() }).unwrap();
        assert_eq!(second[0], Action::CancelTimer(first_handle));
        let (second_handle, _) = scheduled(&second)[0];

        // the superseded timer firing late does nothing
        let (_, stale) = handle_event(&mut state, &Event::TimerFired(first_handle)).unwrap();
        assert!(stale.is_empty());

        let (_, fired) = handle_event(&mut state, &Event::TimerFired(second_handle)).unwrap();
        assert_eq!(fired.len(), 1);
        let Action::SubmitFilter { query, origin } = &fired[0] else {
            panic!("expected a submission");
        };
        assert_eq!(query.search, "tritanium");
        assert_eq!(*origin, SubmitOrigin::Debounced);
    }

    #[test]
    fn clearing_the_field_shows_the_indicator() {
        let mut state = search_page();
        handle_event(&mut state, &Event::SearchInput { value: "t".into() }).unwrap();

        handle_event(&mut state, &Event::SearchInput { value: String::new() }).unwrap();
        assert!(state.filter_form().unwrap().spinner_visible);
    }

    #[test]
    fn enter_cancels_pending_and_hides_indicator() {
        let mut state = search_page();
        let (_, input) = handle_event(&mut state, &Event::SearchInput { value: "tri".into() }).unwrap();
        let (handle, _) = scheduled(&input)[0];

        let (_, actions) =
            handle_event(&mut state, &Event::SearchKeyDown { key: Key::Enter }).unwrap();

        assert_eq!(actions[0], Action::CancelTimer(handle));
        assert_eq!(actions[1], Action::SetSpinner(false));
        assert!(matches!(
            actions[2],
            Action::SubmitFilter { origin: SubmitOrigin::Native, .. }
        ));
        assert_eq!(state.armed_timer_count(), 0);
    }

    #[test]
    fn other_keys_do_nothing() {
        let mut state = search_page();
        let (render, actions) =
            handle_event(&mut state, &Event::SearchKeyDown { key: Key::parse("a") }).unwrap();
        assert!(!render);
        assert!(actions.is_empty());
    }

    #[test]
    fn dropdown_submits_immediately_with_whole_form() {
        let mut state = search_page();
        handle_event(&mut state, &Event::SearchInput { value: "tri".into() }).unwrap();

        let (_, actions) = handle_event(
            &mut state,
            &Event::DropdownChanged {
                field: "division".into(),
                value: "2".into(),
            },
        )
        .unwrap();

        let submits: Vec<_> = actions
            .iter()
            .filter_map(|a| match a {
                Action::SubmitFilter { query, origin } => Some((query, origin)),
                _ => None,
            })
            .collect();
        assert_eq!(submits.len(), 1);
        assert_eq!(submits[0].0.search, "tri");
        assert_eq!(submits[0].0.selectors["division"], "2");
        assert_eq!(*submits[0].1, SubmitOrigin::Dropdown);
        assert_eq!(state.armed_timer_count(), 0);
    }

    #[test]
    fn filter_events_without_form_are_inert() {
        let mut state = PageState::new(&Config::default());
        for event in [
            Event::SearchInput { value: "tri".into() },
            Event::SearchKeyDown { key: Key::Enter },
            Event::DropdownChanged { field: "division".into(), value: "1".into() },
            Event::ClearFilters,
        ] {
            let (render, actions) = handle_event(&mut state, &event).unwrap();
            assert!(!render);
            assert!(actions.is_empty());
        }
    }

    #[test]
    fn clear_filters_resets_and_submits() {
        let mut state = search_page();
        handle_event(&mut state, &Event::SearchInput { value: "tri".into() }).unwrap();
        handle_event(
            &mut state,
            &Event::DropdownChanged { field: "division".into(), value: "4".into() },
        )
        .unwrap();

        let (_, actions) = handle_event(&mut state, &Event::ClearFilters).unwrap();

        let Some(Action::SubmitFilter { query, origin }) = actions.last() else {
            panic!("expected a submission");
        };
        assert!(query.is_empty());
        assert_eq!(*origin, SubmitOrigin::Cleared);
    }

    #[test]
    fn banner_fades_then_detaches() {
        let mut state = PageState::new(&Config::default());
        let (_, actions) = handle_event(
            &mut state,
            &Event::Notify { message: "hello".into(), severity: Severity::Info },
        )
        .unwrap();
        let (fade, ttl) = scheduled(&actions)[0];
        assert_eq!(ttl, Duration::from_millis(5000));

        let (_, actions) = handle_event(&mut state, &Event::TimerFired(fade)).unwrap();
        let (detach, fade_len) = scheduled(&actions)[0];
        assert_eq!(fade_len, Duration::from_millis(400));
        assert_eq!(state.notifications.banners().len(), 1);

        let (render, _) = handle_event(&mut state, &Event::TimerFired(detach)).unwrap();
        assert!(render);
        assert!(state.notifications.is_empty());
    }

    #[test]
    fn key_parsing() {
        assert_eq!(Key::parse("Enter"), Key::Enter);
        assert_eq!(Key::parse("Escape"), Key::Other);
        assert_eq!(Key::parse("x"), Key::Char('x'));
        assert_eq!(Key::parse("ArrowDown"), Key::Other);
    }
}
