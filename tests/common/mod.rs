#![allow(dead_code)]

use hangar_coordinator::app::{FilterFormSpec, PageState};
use hangar_coordinator::runtime::{
    Page, RecordingHost, ScriptedTransport, SimulatedScheduler, StaticToken,
};
use hangar_coordinator::Config;
use std::collections::BTreeMap;
use std::time::Duration;

pub type TestPage = Page<ScriptedTransport, SimulatedScheduler, StaticToken, RecordingHost>;

pub const SYNC_URL: &str = "/corp-inventory/corporation/98000001/sync/";
pub const DELETE_URL: &str = "/corp-inventory/manage/delete/98000001/";

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

pub fn page_with(state: PageState) -> TestPage {
    Page::new(
        state,
        ScriptedTransport::new(),
        SimulatedScheduler::new(),
        StaticToken(Some("s3cret".to_string())),
        RecordingHost::new(),
        &Config::default(),
    )
}

pub fn filter_state() -> PageState {
    let mut state = PageState::new(&Config::default());
    state.bind_filter_form(FilterFormSpec {
        selectors: BTreeMap::from([
            ("division".to_string(), String::new()),
            ("location".to_string(), String::new()),
        ]),
        ..FilterFormSpec::default()
    });
    state
}
