//! Scripted page sessions.
//!
//! A scenario describes a page (its [`PageLayout`]) and a timeline of user
//! input. Replaying it drives a [`Page`] on a virtual clock and records what
//! the coordinator asked the host to do.
//!
//! ```toml
//! [layout]
//! tables = ["hangar"]
//!
//! [[layout.controls]]
//! kind = "sync"
//! target_url = "/corp-inventory/corporation/98000001/sync/"
//! correlation_id = "98000001"
//!
//! [layout.filter_form]
//! selectors = { location = "" }
//!
//! [[steps]]
//! at_ms = 0
//! action = "input"
//! value = "tri"
//!
//! [[steps]]
//! at_ms = 80
//! action = "input"
//! value = "tritanium"
//!
//! [[steps]]
//! at_ms = 1000
//! action = "click"
//! control = 1
//!
//! [[steps]]
//! at_ms = 1200
//! action = "respond"
//! status = 200
//! body = '{"status": "success"}'
//! ```
//!
//! `respond` steps answer the oldest outstanding request and only work with
//! the offline [`ScriptedTransport`]. With [`HttpTransport`] real answers are
//! awaited before the clock moves to the next step.

use crate::app::{Event, Key, PageLayout};
use crate::domain::error::{HangarError, Result};
use crate::domain::{ControlId, NotificationId, RequestOutcome, Severity};
use crate::runtime::{
    CsrfTokenSource, HostEffect, HttpTransport, Page, RecordingHost, ScriptedTransport,
    SimulatedScheduler, Transport,
};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// How long real requests may take before a step gives up waiting.
const NETWORK_SETTLE: Duration = Duration::from_secs(10);

fn default_tail_ms() -> u64 {
    6000
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub layout: PageLayout,
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Virtual time kept running after the last step so pending timers fire.
    #[serde(default = "default_tail_ms")]
    pub tail_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: StepAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StepAction {
    /// Activates the control with this id (layout order, from 1).
    Click { control: u32 },
    Input { value: String },
    Keydown { key: String },
    Select { field: String, value: String },
    Clear,
    Dismiss { notification: u64 },
    /// Answer for the next confirmation prompt.
    Confirm { answer: bool },
    Respond {
        status: u16,
        #[serde(default)]
        body: String,
    },
    Notify {
        message: String,
        #[serde(default)]
        severity: Severity,
    },
}

impl fmt::Display for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Click { control } => write!(f, "click control-{control}"),
            Self::Input { value } => write!(f, "input {value:?}"),
            Self::Keydown { key } => write!(f, "keydown {key}"),
            Self::Select { field, value } => write!(f, "select {field}={value:?}"),
            Self::Clear => write!(f, "clear filters"),
            Self::Dismiss { notification } => write!(f, "dismiss banner {notification}"),
            Self::Confirm { answer } => write!(f, "answer next prompt with {answer}"),
            Self::Respond { status, .. } => write!(f, "respond {status}"),
            Self::Notify { message, severity } => write!(f, "notify {severity}: {message}"),
        }
    }
}

impl Scenario {
    /// Parses and validates a TOML scenario.
    ///
    /// # Errors
    ///
    /// Returns [`HangarError::Scenario`] for malformed TOML, steps out of time
    /// order or clicks on controls the layout does not have.
    pub fn parse(raw: &str) -> Result<Self> {
        let scenario: Self = toml::from_str(raw).map_err(|e| HangarError::Scenario(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// # Errors
    ///
    /// Returns [`HangarError::Io`] if the file cannot be read, otherwise as
    /// [`Scenario::parse`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    fn validate(&self) -> Result<()> {
        let controls = self.layout.controls.len();
        let mut last = 0;
        for (index, step) in self.steps.iter().enumerate() {
            if step.at_ms < last {
                return Err(HangarError::Scenario(format!(
                    "step {} at {} ms comes before the previous step at {last} ms",
                    index + 1,
                    step.at_ms
                )));
            }
            last = step.at_ms;

            if let StepAction::Click { control } = step.action {
                if control == 0 || control as usize > controls {
                    return Err(HangarError::Scenario(format!(
                        "step {} clicks control {control}, the layout has {controls}",
                        index + 1
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Transports a scenario can run against.
pub trait ReplayTransport: Transport {
    /// Answers the oldest outstanding request.
    ///
    /// # Errors
    ///
    /// Returns [`HangarError::Scenario`] when the transport cannot be answered
    /// by hand or nothing is outstanding.
    fn respond(&mut self, outcome: RequestOutcome) -> Result<()>;

    /// Waits for real requests before virtual time moves on.
    fn wait_idle(&mut self) {}
}

impl ReplayTransport for ScriptedTransport {
    fn respond(&mut self, outcome: RequestOutcome) -> Result<()> {
        self.complete_next(outcome).map(|_| ()).ok_or_else(|| {
            HangarError::Scenario("respond step with no outstanding request".to_string())
        })
    }
}

impl ReplayTransport for HttpTransport {
    fn respond(&mut self, _outcome: RequestOutcome) -> Result<()> {
        Err(HangarError::Scenario(
            "respond steps need the offline transport, drop --base-url".to_string(),
        ))
    }

    fn wait_idle(&mut self) {
        self.settle(NETWORK_SETTLE);
    }
}

/// What happened up to and including one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub at_ms: u64,
    /// `None` for the tail run after the last step.
    pub action: Option<StepAction>,
    pub effects: Vec<HostEffect>,
    pub requests_in_flight: usize,
}

pub type ReplayPage<T, C> = Page<T, SimulatedScheduler, C, RecordingHost>;

/// Replays every step and the tail, returning one report per step plus one
/// for the tail.
///
/// # Errors
///
/// Stops at the first step the transport rejects.
pub fn run<T, C>(page: &mut ReplayPage<T, C>, scenario: &Scenario) -> Result<Vec<StepReport>>
where
    T: ReplayTransport,
    C: CsrfTokenSource,
{
    let mut reports = Vec::with_capacity(scenario.steps.len() + 1);

    for step in &scenario.steps {
        page.advance_to(Duration::from_millis(step.at_ms));
        apply(page, &step.action)?;
        page.transport_mut().wait_idle();
        page.pump();

        reports.push(StepReport {
            at_ms: step.at_ms,
            action: Some(step.action.clone()),
            effects: page.host_mut().take_effects(),
            requests_in_flight: page.state().in_flight_count(),
        });
    }

    let end = scenario
        .steps
        .last()
        .map_or(0, |s| s.at_ms)
        .saturating_add(scenario.tail_ms);
    page.advance_to(Duration::from_millis(end));
    reports.push(StepReport {
        at_ms: end,
        action: None,
        effects: page.host_mut().take_effects(),
        requests_in_flight: page.state().in_flight_count(),
    });

    Ok(reports)
}

fn apply<T, C>(page: &mut ReplayPage<T, C>, action: &StepAction) -> Result<()>
where
    T: ReplayTransport,
    C: CsrfTokenSource,
{
    tracing::debug!(step = %action, at = ?page.state().now(), "replay step");

    let event = match action {
        StepAction::Click { control } => Event::Activate(ControlId(*control)),
        StepAction::Input { value } => Event::SearchInput { value: value.clone() },
        StepAction::Keydown { key } => Event::SearchKeyDown { key: Key::parse(key) },
        StepAction::Select { field, value } => Event::DropdownChanged {
            field: field.clone(),
            value: value.clone(),
        },
        StepAction::Clear => Event::ClearFilters,
        StepAction::Dismiss { notification } => {
            Event::DismissNotification(NotificationId(*notification))
        }
        StepAction::Notify { message, severity } => Event::Notify {
            message: message.clone(),
            severity: *severity,
        },
        StepAction::Confirm { answer } => {
            page.host_mut().queue_answer(*answer);
            return Ok(());
        }
        StepAction::Respond { status, body } => {
            page.transport_mut().respond(RequestOutcome::from_http(*status, body))?;
            page.pump();
            return Ok(());
        }
    };

    page.dispatch(event);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_steps() {
        let scenario = Scenario::parse(
            r#"
            [[layout.controls]]
            kind = "toggle"
            correlation_id = "98000001"

            [[steps]]
            at_ms = 0
            action = "click"
            control = 1

            [[steps]]
            at_ms = 20
            action = "respond"
            status = 400
            "#,
        )
        .unwrap();

        assert_eq!(scenario.steps.len(), 2);
        assert_eq!(scenario.steps[0].action, StepAction::Click { control: 1 });
        assert_eq!(
            scenario.steps[1].action,
            StepAction::Respond {
                status: 400,
                body: String::new()
            }
        );
        assert_eq!(scenario.tail_ms, 6000);
    }

    #[test]
    fn rejects_steps_out_of_order() {
        let err = Scenario::parse(
            r#"
            [[steps]]
            at_ms = 100
            action = "clear"

            [[steps]]
            at_ms = 50
            action = "clear"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, HangarError::Scenario(_)));
    }

    #[test]
    fn rejects_clicks_on_missing_controls() {
        let err = Scenario::parse(
            r#"
            [[steps]]
            action = "click"
            control = 1
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("layout has 0"));
    }

    #[test]
    fn tail_end_saturates_instead_of_overflowing() {
        let scenario = Scenario {
            layout: PageLayout::default(),
            steps: vec![Step {
                at_ms: u64::MAX - 10,
                action: StepAction::Confirm { answer: true },
            }],
            tail_ms: u64::MAX,
        };
        let config = crate::Config::default();
        let mut page = Page::new(
            crate::initialize(&config, scenario.layout.clone()),
            ScriptedTransport::new(),
            SimulatedScheduler::new(),
            crate::runtime::StaticToken(None),
            RecordingHost::new(),
            &config,
        );

        let reports = run(&mut page, &scenario).unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].at_ms, u64::MAX);
        assert_eq!(reports[1].action, None);
    }
}
