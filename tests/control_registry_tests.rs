use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use dash_filter::api::{FilterEngine, FilterEngineConfig};
use dash_filter::core::control::{
    ATTR_FILTER_TYPE, ATTR_FILTER_VAR, ATTR_LABELS, ATTR_MAX, ATTR_MIN, ATTR_MULTIPLE,
    ATTR_TOGGLE_SERIES,
};
use dash_filter::core::{ControlElement, ControlKind, ControlType, ControlValue, SkipReason};
use dash_filter::extensions::{FilterContext, FilterEvent, FilterPlugin};
use dash_filter::interaction::{ControlSource, InMemoryControls};
use dash_filter::render::{InMemorySurface, LiveChart, LiveSeries};

fn control(id: &str, filter_var: &str, control_type: &str, value: ControlValue) -> ControlElement {
    ControlElement::new(id, value)
        .with_attribute(ATTR_FILTER_VAR, filter_var)
        .with_attribute(ATTR_FILTER_TYPE, control_type)
}

fn every_kind() -> InMemoryControls {
    InMemoryControls::new()
        .with(
            control("sel", "region", "select", ControlValue::selection(["North", "South"]))
                .with_attribute(ATTR_MULTIPLE, "")
                .with_options(["North", "South", "East"]),
        )
        .with(
            control("chk", "year", "checkbox", ControlValue::selection(["2020"]))
                .with_options(["2019", "2020", "2021"]),
        )
        .with(control("rad", "sex", "radio", ControlValue::selection(["F"])))
        .with(
            control("sw", "series", "switch", ControlValue::Toggle(true))
                .with_attribute(ATTR_TOGGLE_SERIES, "Total"),
        )
        .with(
            control("sld", "year", "slider", ControlValue::Number(2.0))
                .with_attribute(ATTR_MIN, "0")
                .with_attribute(ATTR_MAX, "3")
                .with_attribute(ATTR_LABELS, r#"["2018","2019","2020","2021"]"#),
        )
        .with(control("txt", "series", "text", ControlValue::Text("ab".to_owned())))
        .with(control("num", "age", "number", ControlValue::Number(42.0)))
        .with(control("btn", "view", "button_group", ControlValue::selection(["table"])))
}

fn surface() -> InMemorySurface {
    InMemorySurface::new().with_chart(
        LiveChart::new("c1")
            .with_categories(["2019", "2020"])
            .with_series(LiveSeries::new("A", Vec::new())),
    )
}

#[derive(Clone)]
struct RecordingPlugin {
    events: Rc<RefCell<Vec<FilterEvent>>>,
}

impl FilterPlugin for RecordingPlugin {
    fn id(&self) -> &str {
        "recorder"
    }

    fn on_event(&mut self, event: &FilterEvent, _context: FilterContext) {
        self.events.borrow_mut().push(event.clone());
    }
}

#[test]
fn initialized_state_mirrors_dom_values_for_every_kind() {
    let controls = every_kind();
    let mut engine =
        FilterEngine::new(surface(), controls, FilterEngineConfig::default()).expect("engine");
    assert_eq!(engine.initialize(Duration::ZERO), 8);

    for (id, state) in engine.state() {
        let element = engine.controls().element(id).expect("element");
        assert_eq!(&state.value(), &element.value, "control {id}");
        assert!(element.initialized, "control {id} marked");
    }

    let types: Vec<ControlType> = engine.state().values().map(|s| s.control_type()).collect();
    assert_eq!(types, ControlType::ALL);
    assert_eq!(engine.control("sld").and_then(|s| s.slider_label()), Some("2020"));
    assert!(matches!(
        engine.control("sw").map(|s| &s.kind),
        Some(ControlKind::Switch {
            on: true,
            toggle_series: Some(_),
            override_filters: false
        })
    ));
}

#[test]
fn initialize_is_idempotent_and_picks_up_new_controls() {
    let mut engine =
        FilterEngine::new(surface(), every_kind(), FilterEngineConfig::default()).expect("engine");
    assert_eq!(engine.initialize(Duration::ZERO), 8);
    assert_eq!(engine.initialize(Duration::ZERO), 0);
    assert_eq!(engine.state().len(), 8);

    engine
        .controls_mut()
        .insert(control("late", "region", "radio", ControlValue::selection(["East"])));
    assert_eq!(engine.initialize(Duration::ZERO), 1);
    assert_eq!(engine.state().len(), 9);
    assert_eq!(engine.defaults().len(), 9);
}

#[test]
fn controls_without_bindings_are_skipped_with_diagnostics() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let controls = InMemoryControls::new()
        .with(
            ControlElement::new("orphan", ControlValue::Toggle(true))
                .with_attribute(ATTR_FILTER_TYPE, "switch"),
        )
        .with(control("odd", "region", "colour-wheel", ControlValue::Text(String::new())))
        .with(control("ok", "region", "select", ControlValue::selection(["North"])));
    let mut engine =
        FilterEngine::new(surface(), controls, FilterEngineConfig::default()).expect("engine");
    engine
        .register_plugin(Box::new(RecordingPlugin {
            events: Rc::clone(&events),
        }))
        .expect("register plugin");

    assert_eq!(engine.initialize(Duration::ZERO), 1);
    assert!(engine.control("orphan").is_none());

    let events = events.borrow();
    assert!(events.contains(&FilterEvent::ControlSkipped {
        id: "orphan".to_owned(),
        reason: SkipReason::MissingFilterVar,
    }));
    assert!(events.contains(&FilterEvent::ControlSkipped {
        id: "odd".to_owned(),
        reason: SkipReason::UnknownType("colour-wheel".to_owned()),
    }));
    assert!(events.contains(&FilterEvent::ControlRegistered { id: "ok".to_owned() }));
}

#[test]
fn change_events_update_state_from_the_dom() {
    let mut engine =
        FilterEngine::new(surface(), every_kind(), FilterEngineConfig::default()).expect("engine");
    engine.initialize(Duration::ZERO);
    let passes = engine.passes();

    engine
        .controls_mut()
        .set_value("rad", ControlValue::selection(["M"]))
        .expect("dom update");
    engine.on_control_changed("rad", Duration::from_millis(20));

    assert_eq!(
        engine.control("rad").map(|s| s.selected_values().into_vec()),
        Some(vec!["M".to_owned()])
    );
    assert_eq!(engine.passes(), passes + 1);
    assert_eq!(engine.defaults()["rad"].value(), ControlValue::selection(["F"]));
}

#[test]
fn select_all_and_clear_all_sync_dom_and_state() {
    let mut engine =
        FilterEngine::new(surface(), every_kind(), FilterEngineConfig::default()).expect("engine");
    engine.initialize(Duration::ZERO);

    engine.select_all("chk");
    let expected = ControlValue::selection(["2019", "2020", "2021"]);
    assert_eq!(engine.controls().value("chk"), Some(&expected));
    assert_eq!(engine.control("chk").map(|s| s.value()), Some(expected));

    engine.clear_all("sel");
    assert_eq!(
        engine.controls().value("sel"),
        Some(&ControlValue::Selection(Vec::new()))
    );
    assert!(engine.control("sel").is_some_and(|s| s.selected_values().is_empty()));

    let passes = engine.passes();
    engine.select_all("rad");
    engine.clear_all("sld");
    assert_eq!(engine.passes(), passes, "no-ops do not re-filter");
}

#[test]
fn single_value_controls_write_their_normalized_value_back() {
    let controls = InMemoryControls::new()
        .with(control("one", "region", "select", ControlValue::selection(["North", "South"])))
        .with(control("pick", "sex", "radio", ControlValue::selection(["F", "M"])));
    let mut engine =
        FilterEngine::new(surface(), controls, FilterEngineConfig::default()).expect("engine");
    engine.initialize(Duration::ZERO);

    for id in ["one", "pick"] {
        let state = engine.control(id).expect("registered");
        assert_eq!(state.selected_values().len(), 1, "control {id}");
        assert_eq!(engine.controls().value(id), Some(&state.value()), "control {id}");
    }

    engine
        .controls_mut()
        .set_value("one", ControlValue::selection(["South", "East"]))
        .expect("dom update");
    engine.on_control_changed("one", Duration::from_millis(10));
    assert_eq!(
        engine.controls().value("one"),
        Some(&ControlValue::selection(["South"]))
    );
}
