//! Page state and view model computation.
//!
//! [`PageState`] is the single source of truth for everything transient on the
//! page: bound controls, the filter form, the notification sink, outstanding
//! requests and armed timers. It is mutated only by the event handler.
//!
//! # Example
//!
//! ```rust
//! use hangar_coordinator::app::PageState;
//! use hangar_coordinator::Config;
//!
//! let mut state = PageState::new(&Config::default());
//! let sync = state.bind_sync("/corp-inventory/corporation/98000001/sync/", "98000001", None);
//! assert!(state.control(sync).is_some());
//! assert!(state.filter_form().is_none());
//! ```

use super::actions::{Action, OutboundRequest, RequestId, TimerHandle, TimerTask};
use super::form::{FilterForm, FilterFormSpec};
use super::layout::{ControlSpec, PageLayout};
use crate::domain::{ActionControl, ControlId, ControlKind, ControlLabel, Severity};
use crate::notify::NotificationSink;
use crate::ui::grid::{GridOptions, TableKind};
use crate::ui::viewmodel::{BannerView, ControlView, GridView, PageViewModel};
use crate::Config;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Fixed delays the coordinator works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Quiet period before a search submission fires.
    pub quiescence: Duration,
    /// Delay between a sync confirmation and the page reload.
    pub reload_delay: Duration,
    /// How long a banner stays before it starts fading.
    pub notification_ttl: Duration,
    /// Length of the banner fade-out transition.
    pub fade: Duration,
}

impl Timings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            quiescence: Duration::from_millis(config.quiescence_ms),
            reload_delay: Duration::from_millis(config.reload_delay_ms),
            notification_ttl: Duration::from_millis(config.notification_ttl_ms),
            fade: Duration::from_millis(config.fade_ms),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PageState {
    /// Bound controls in binding order.
    pub controls: BTreeMap<ControlId, ActionControl>,

    /// The filter form, when the page has one.
    pub filter: Option<FilterForm>,

    /// Banners currently attached to the page.
    pub notifications: NotificationSink,

    /// Tables the grid widget is initialised on.
    pub tables: Vec<TableKind>,

    pub timings: Timings,

    mount_path: String,
    in_flight: HashMap<RequestId, ControlId>,
    timers: HashMap<TimerHandle, TimerTask>,
    next_control: u32,
    next_request: u64,
    next_timer: u64,
    now: Duration,
}

impl PageState {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            controls: BTreeMap::new(),
            filter: None,
            notifications: NotificationSink::default(),
            tables: Vec::new(),
            timings: Timings::from_config(config),
            mount_path: config.mount_path.trim_end_matches('/').to_string(),
            in_flight: HashMap::new(),
            timers: HashMap::new(),
            next_control: 0,
            next_request: 0,
            next_timer: 0,
            now: Duration::ZERO,
        }
    }

    /// Builds the state for a page and binds everything the layout lists.
    ///
    /// Control ids are assigned in layout order starting at 1.
    #[must_use]
    pub fn from_layout(layout: PageLayout, config: &Config) -> Self {
        let mut state = Self::new(config);
        for spec in layout.controls {
            state.bind_control(spec);
        }
        if let Some(form) = layout.filter_form {
            state.bind_filter_form(form);
        } else {
            tracing::debug!("no filter form on page, filter submitter stays inert");
        }
        state.tables = layout.tables;
        state
    }

    pub fn bind_control(&mut self, spec: ControlSpec) -> ControlId {
        match spec.kind {
            ControlKind::Sync => self.bind_sync(spec.target_url, spec.correlation_id, spec.label),
            ControlKind::Toggle => self.bind_toggle(spec.correlation_id, spec.label),
            ControlKind::Delete => {
                let id = self.bind_delete(spec.target_url, spec.correlation_id, spec.entity_name);
                if let (Some(label), Some(control)) = (spec.label, self.controls.get_mut(&id)) {
                    control.original_label = label.clone();
                    control.label = label;
                }
                id
            }
        }
    }

    /// Binds a sync button posting to `target_url`.
    pub fn bind_sync(
        &mut self,
        target_url: impl Into<String>,
        correlation_id: impl Into<String>,
        label: Option<ControlLabel>,
    ) -> ControlId {
        let id = self.allocate_control();
        let control = ActionControl::new(
            id,
            ControlKind::Sync,
            target_url,
            correlation_id,
            label.unwrap_or_else(ControlLabel::sync_idle),
        );
        self.insert_control(control)
    }

    /// Binds a tracking toggle for the entity `correlation_id`.
    pub fn bind_toggle(
        &mut self,
        correlation_id: impl Into<String>,
        label: Option<ControlLabel>,
    ) -> ControlId {
        let id = self.allocate_control();
        let correlation_id = correlation_id.into();
        let url = self.toggle_url(&correlation_id);
        let control = ActionControl::new(
            id,
            ControlKind::Toggle,
            url,
            correlation_id,
            label.unwrap_or_else(|| ControlLabel::new("Toggle tracking", None)),
        );
        self.insert_control(control)
    }

    /// Binds a delete link navigating to `target_url` after confirmation.
    pub fn bind_delete(
        &mut self,
        target_url: impl Into<String>,
        correlation_id: impl Into<String>,
        entity_name: Option<String>,
    ) -> ControlId {
        let id = self.allocate_control();
        let control = ActionControl::new(
            id,
            ControlKind::Delete,
            target_url,
            correlation_id,
            ControlLabel::new("Remove", Some("fas fa-trash")),
        );
        let control = match entity_name {
            Some(name) => control.with_entity_name(name),
            None => control,
        };
        self.insert_control(control)
    }

    /// Binds the search field, its Enter key and every dropdown of the form.
    pub fn bind_filter_form(&mut self, spec: FilterFormSpec) {
        tracing::debug!(
            form_id = %spec.form_id,
            selectors = ?spec.selectors.keys().collect::<Vec<_>>(),
            "filter form bound"
        );
        self.filter = Some(FilterForm::from_spec(spec));
    }

    #[must_use]
    pub fn control(&self, id: ControlId) -> Option<&ActionControl> {
        self.controls.get(&id)
    }

    #[must_use]
    pub fn filter_form(&self) -> Option<&FilterForm> {
        self.filter.as_ref()
    }

    /// URL of the tracking toggle endpoint for an entity.
    #[must_use]
    pub fn toggle_url(&self, correlation_id: &str) -> String {
        format!("{}/manage/toggle/{correlation_id}/", self.mount_path)
    }

    /// Sets the page clock. The runtime calls this before every event so new
    /// banners get a meaningful `created_at`.
    pub fn set_clock(&mut self, now: Duration) {
        self.now = now;
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Number of mutate requests that have not resolved yet.
    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Number of armed timers.
    #[must_use]
    pub fn armed_timer_count(&self) -> usize {
        self.timers.len()
    }

    fn allocate_control(&mut self) -> ControlId {
        self.next_control += 1;
        ControlId(self.next_control)
    }

    fn insert_control(&mut self, control: ActionControl) -> ControlId {
        let id = control.id;
        tracing::debug!(
            control_id = %id,
            kind = ?control.kind,
            target_url = %control.target_url,
            correlation_id = %control.correlation_id,
            "control bound"
        );
        self.controls.insert(id, control);
        id
    }

    /// Allocates a handle for `task` and returns the action arming it.
    pub(crate) fn arm_timer(&mut self, task: TimerTask, delay: Duration) -> Action {
        self.next_timer += 1;
        let handle = TimerHandle(self.next_timer);
        self.timers.insert(handle, task);
        tracing::trace!(
            handle = %handle,
            task = ?task,
            delay_ms = delay.as_millis(),
            "timer armed"
        );
        Action::ScheduleTimer { handle, delay }
    }

    /// Forgets `handle` and returns the action disarming it.
    pub(crate) fn disarm_timer(&mut self, handle: TimerHandle) -> Action {
        self.timers.remove(&handle);
        Action::CancelTimer(handle)
    }

    /// Claims the task of a fired timer. `None` for cancelled or unknown handles.
    pub(crate) fn take_timer(&mut self, handle: TimerHandle) -> Option<TimerTask> {
        self.timers.remove(&handle)
    }

    pub(crate) fn start_request(&mut self, control: ControlId, url: &str) -> OutboundRequest {
        self.next_request += 1;
        let id = RequestId(self.next_request);
        self.in_flight.insert(id, control);
        OutboundRequest {
            id,
            control,
            url: url.to_string(),
        }
    }

    pub(crate) fn finish_request(&mut self, id: RequestId) -> Option<ControlId> {
        self.in_flight.remove(&id)
    }

    /// Shows a banner and returns the action arming its expiry timer.
    pub(crate) fn show_notification(&mut self, message: &str, severity: Severity) -> Action {
        let id = self.notifications.notify(message, severity, self.now);
        self.arm_timer(TimerTask::FadeNotification(id), self.timings.notification_ttl)
    }

    /// Computes a renderable snapshot of the page.
    #[must_use]
    pub fn compute_viewmodel(&self) -> PageViewModel {
        let banners = self
            .notifications
            .banners()
            .iter()
            .map(BannerView::from_notification)
            .collect();

        let controls = self.controls.values().map(ControlView::from_control).collect();

        let grids = self
            .tables
            .iter()
            .map(|&kind| GridView {
                selector: kind.selector().to_string(),
                options: GridOptions::for_table(kind),
            })
            .collect();

        PageViewModel {
            banners,
            controls,
            spinner_visible: self.filter.as_ref().is_some_and(|f| f.spinner_visible),
            filter: self.filter.as_ref().map(|f| f.query.clone()),
            grids,
        }
    }
}
