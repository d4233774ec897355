mod common;

use common::{filter_state, ms, page_with};
use hangar_coordinator::app::{Event, Key, SubmitOrigin};
use hangar_coordinator::runtime::HostEffect;

#[test]
fn typing_burst_submits_once_with_final_value() {
    let mut page = page_with(filter_state());

    page.dispatch(Event::SearchInput { value: "tri".to_string() });
    page.advance(ms(100));
    page.dispatch(Event::SearchInput {
        value: "tritanium".to_string(),
    });
    page.advance(ms(349));
    assert!(page.host().submissions().is_empty());

    page.advance(ms(51));
    let submissions = page.host().submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].0.search, "tritanium");
    assert_eq!(submissions[0].1, SubmitOrigin::Debounced);
}

#[test]
fn enter_submits_natively_exactly_once() {
    let mut page = page_with(filter_state());

    page.dispatch(Event::SearchInput { value: "pyerite".to_string() });
    assert_eq!(page.host().effects.first(), Some(&HostEffect::Spinner(true)));

    page.advance(ms(100));
    page.dispatch(Event::SearchKeyDown { key: Key::Enter });
    assert!(!page.host().last_view().unwrap().spinner_visible);
    assert!(page.host().effects.contains(&HostEffect::Spinner(false)));

    page.advance(ms(2000));
    let submissions = page.host().submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].1, SubmitOrigin::Native);
    assert_eq!(page.scheduler().armed_count(), 0);
}

#[test]
fn each_dropdown_change_submits_once() {
    let mut page = page_with(filter_state());

    page.dispatch(Event::DropdownChanged {
        field: "division".to_string(),
        value: "3".to_string(),
    });
    page.dispatch(Event::DropdownChanged {
        field: "location".to_string(),
        value: "60003760".to_string(),
    });
    page.advance(ms(1000));

    let submissions = page.host().submissions();
    assert_eq!(submissions.len(), 2);
    assert!(submissions.iter().all(|(_, origin)| *origin == SubmitOrigin::Dropdown));
    assert_eq!(submissions[1].0.selectors["division"], "3");
    assert_eq!(submissions[1].0.selectors["location"], "60003760");
}

#[test]
fn dropdown_supersedes_pending_search() {
    let mut page = page_with(filter_state());

    page.dispatch(Event::SearchInput { value: "zyd".to_string() });
    page.advance(ms(100));
    page.dispatch(Event::DropdownChanged {
        field: "division".to_string(),
        value: "1".to_string(),
    });
    page.advance(ms(1000));

    let submissions = page.host().submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].1, SubmitOrigin::Dropdown);
    assert_eq!(submissions[0].0.search, "zyd");
}

#[test]
fn clear_filters_submits_empty_form() {
    let mut page = page_with(filter_state());

    page.dispatch(Event::DropdownChanged {
        field: "division".to_string(),
        value: "2".to_string(),
    });
    page.dispatch(Event::ClearFilters);

    let submissions = page.host().submissions();
    assert_eq!(submissions.len(), 2);
    assert_eq!(submissions[1].1, SubmitOrigin::Cleared);
    assert!(submissions[1].0.is_empty());
}

#[test]
fn page_without_form_ignores_filter_events() {
    let mut page = page_with(hangar_coordinator::app::PageState::new(
        &hangar_coordinator::Config::default(),
    ));

    page.dispatch(Event::SearchInput { value: "x".to_string() });
    page.dispatch(Event::SearchKeyDown { key: Key::Enter });
    page.advance(ms(1000));

    assert!(page.host().effects.is_empty());
    assert_eq!(page.host().render_count(), 0);
}
