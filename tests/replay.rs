use hangar_coordinator::replay::{self, Scenario};
use hangar_coordinator::runtime::{
    CookieJar, HostEffect, Page, RecordingHost, ScriptedTransport, SimulatedScheduler,
};
use hangar_coordinator::{initialize, Config};
use std::io::Write;

const SCENARIO: &str = r#"
tail_ms = 6000

[layout]
tables = ["hangar"]

[[layout.controls]]
kind = "sync"
target_url = "/corp-inventory/corporation/98000001/sync/"
correlation_id = "98000001"

[[layout.controls]]
kind = "delete"
target_url = "/corp-inventory/manage/delete/98000001/"
correlation_id = "98000001"
entity_name = "Hangar Rats Inc"

[layout.filter_form]
selectors = { location = "" }

[[steps]]
at_ms = 0
action = "input"
value = "tri"

[[steps]]
at_ms = 80
action = "input"
value = "tritanium"

[[steps]]
at_ms = 1000
action = "click"
control = 1

[[steps]]
at_ms = 1030
action = "click"
control = 1

[[steps]]
at_ms = 1200
action = "respond"
status = 200
body = '{"status": "success"}'

[[steps]]
at_ms = 1300
action = "confirm"
answer = false

[[steps]]
at_ms = 1300
action = "click"
control = 2
"#;

fn replay_page(
    scenario: &Scenario,
    config: &Config,
) -> replay::ReplayPage<ScriptedTransport, CookieJar> {
    Page::new(
        initialize(config, scenario.layout.clone()),
        ScriptedTransport::new(),
        SimulatedScheduler::new(),
        CookieJar::new("sessionid=x; csrftoken=abc123", "csrftoken"),
        RecordingHost::new(),
        config,
    )
}

#[test]
fn full_session_replays_deterministically() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SCENARIO.as_bytes()).unwrap();
    let scenario = Scenario::from_file(file.path()).unwrap();
    let config = Config::default();
    let mut page = replay_page(&scenario, &config);

    let reports = replay::run(&mut page, &scenario).unwrap();
    assert_eq!(reports.len(), scenario.steps.len() + 1);

    let all: Vec<&HostEffect> = reports.iter().flat_map(|r| r.effects.iter()).collect();
    let submits: Vec<_> = all
        .iter()
        .filter_map(|e| match e {
            HostEffect::Submit { query, .. } => Some(query.search.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(submits, vec!["tritanium"]);

    assert_eq!(page.transport().sent().len(), 1);
    assert_eq!(page.transport().sent()[0].header("X-CSRFToken"), Some("abc123"));

    assert!(all.iter().any(|e| matches!(e, HostEffect::Confirm { answer: false, .. })));
    assert!(!all.iter().any(|e| matches!(e, HostEffect::Navigate(_))));

    // the reload lands 2000 ms after the 1200 ms answer, inside the tail
    assert_eq!(reports.last().unwrap().effects, vec![HostEffect::Reload]);
    assert!(page.state().notifications.is_empty());
    assert_eq!(page.state().in_flight_count(), 0);
}

#[test]
fn respond_without_outstanding_request_fails() {
    let scenario = Scenario::parse(
        r#"
        [[steps]]
        action = "respond"
        status = 200
        "#,
    )
    .unwrap();
    let config = Config::default();
    let mut page = replay_page(&scenario, &config);

    assert!(replay::run(&mut page, &scenario).is_err());
}
