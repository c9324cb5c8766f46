use std::time::Duration;

use approx::assert_relative_eq;
use dash_filter::api::{FilterEngine, FilterEngineConfig};
use dash_filter::core::control::{ATTR_FILTER_TYPE, ATTR_FILTER_VAR};
use dash_filter::core::{ControlElement, ControlValue, DataTables};
use dash_filter::interaction::InMemoryControls;
use dash_filter::render::{ChartSurface, InMemorySurface, LiveChart, LiveSeries};

const TABLES: &str = r#"{
    "crossTabs": {
        "ct": {
            "rows": [
                {"year": 2020, "sex": "F", "region": "North", "n": 30},
                {"year": 2020, "sex": "M", "region": "North", "n": 10},
                {"year": 2020, "sex": "F", "region": "South", "n": 20},
                {"year": 2021, "sex": "M", "region": "South", "n": 40},
                {"year": 2021, "sex": "F", "region": "North", "n": 0}
            ],
            "config": {
                "xVariable": "year",
                "stackVariable": "sex",
                "filterVariables": ["region"],
                "stackedType": "percent"
            }
        }
    }
}"#;

fn control(id: &str, filter_var: &str, control_type: &str, value: ControlValue) -> ControlElement {
    ControlElement::new(id, value)
        .with_attribute(ATTR_FILTER_VAR, filter_var)
        .with_attribute(ATTR_FILTER_TYPE, control_type)
}

fn cross_tab_chart(series: &[&str]) -> LiveChart {
    series.iter().fold(LiveChart::new("ct"), |chart, name| {
        chart.with_series(LiveSeries::new(*name, Vec::new()))
    })
}

fn engine(
    chart: LiveChart,
    controls: InMemoryControls,
) -> FilterEngine<InMemorySurface, InMemoryControls> {
    let tables = DataTables::from_json_str(TABLES).expect("tables");
    let mut engine = FilterEngine::new(
        InMemorySurface::new().with_chart(chart),
        controls,
        FilterEngineConfig::default(),
    )
    .expect("engine")
    .with_data_tables(tables);
    engine.initialize(Duration::ZERO);
    engine
}

fn series_values(engine: &FilterEngine<InMemorySurface, InMemoryControls>, index: usize) -> Vec<f64> {
    engine.surface().chart("ct").expect("chart").series[index]
        .data
        .iter()
        .map(|point| point.y().expect("numeric point"))
        .collect()
}

#[test]
fn unfiltered_aggregate_is_rendered_on_first_pass() {
    let engine = engine(cross_tab_chart(&["F", "M"]), InMemoryControls::new());
    let chart = engine.surface().chart("ct").expect("chart");

    assert_eq!(engine.surface().redraw_count("ct"), 1);
    assert_eq!(chart.categories.as_deref(), Some(&["2020".to_owned(), "2021".to_owned()][..]));
    let women = series_values(&engine, 0);
    let men = series_values(&engine, 1);
    assert_relative_eq!(women[0], 83.333_333, epsilon = 1e-4);
    assert_relative_eq!(men[0], 16.666_666, epsilon = 1e-4);
    assert_relative_eq!(women[1], 0.0);
    assert_relative_eq!(men[1], 100.0);
}

#[test]
fn percent_buckets_sum_to_one_hundred() {
    let controls = InMemoryControls::new().with(control(
        "region",
        "region",
        "select",
        ControlValue::selection(["North"]),
    ));
    let engine = engine(cross_tab_chart(&["F", "M"]), controls);

    let women = series_values(&engine, 0);
    let men = series_values(&engine, 1);
    assert_relative_eq!(women[0] + men[0], 100.0, epsilon = 1e-9);
    assert_relative_eq!(women[0], 75.0, epsilon = 1e-9);
    // 2021 North has a zero total: no share is reported.
    assert_relative_eq!(women[1] + men[1], 0.0);
}

#[test]
fn all_token_disables_filtering_on_that_dimension() {
    let unfiltered = engine(cross_tab_chart(&["F", "M"]), InMemoryControls::new());

    for token in ["All", "alle", "TOUS", "Todas las regiones"] {
        let controls = InMemoryControls::new().with(control(
            "region",
            "region",
            "checkbox",
            ControlValue::selection([token, "North"]),
        ));
        let filtered = engine(cross_tab_chart(&["F", "M"]), controls);
        assert_eq!(
            filtered.surface().chart("ct").map(|c| &c.series),
            unfiltered.surface().chart("ct").map(|c| &c.series),
            "token {token}"
        );
    }
}

#[test]
fn series_match_by_name_then_position() {
    let engine = engine(cross_tab_chart(&["M", "Other"]), InMemoryControls::new());
    let chart = engine.surface().chart("ct").expect("chart");

    // "M" keeps its slot by name; "F" would fall back to position 0, which
    // "M" already owns, so it is dropped and "Other" stays untouched.
    let men = series_values(&engine, 0);
    assert_relative_eq!(men[0], 16.666_666, epsilon = 1e-4);
    assert_relative_eq!(men[1], 100.0);
    assert!(chart.series[1].data.is_empty());
}

#[test]
fn unnamed_series_are_filled_by_position() {
    let engine = engine(cross_tab_chart(&["Series 1", "Series 2"]), InMemoryControls::new());
    let chart = engine.surface().chart("ct").expect("chart");
    assert_eq!(chart.series[0].name, "Series 1");
    assert_relative_eq!(series_values(&engine, 0)[1], 0.0);
    assert_relative_eq!(series_values(&engine, 1)[1], 100.0);
}

#[test]
fn cross_tab_redraws_on_every_pass_even_without_filters() {
    let mut engine = engine(cross_tab_chart(&["F", "M"]), InMemoryControls::new());
    engine.apply_filters();
    engine.apply_filters();
    assert_eq!(engine.surface().redraw_count("ct"), 3);
}

#[test]
fn unrelated_selection_does_not_blank_undeclared_cross_tab() {
    let tables = DataTables::from_json_str(
        r#"{
            "crossTabs": {
                "ct": {
                    "rows": [
                        {"year": 2020, "sex": "F", "n": 30},
                        {"year": 2020, "sex": "M", "n": 10}
                    ],
                    "config": {"xVariable": "year", "stackVariable": "sex", "stackedType": "percent"}
                }
            }
        }"#,
    )
    .expect("tables");
    let controls = InMemoryControls::new().with(control(
        "country",
        "country",
        "select",
        ControlValue::selection(["France"]),
    ));
    let mut engine = FilterEngine::new(
        InMemorySurface::new().with_chart(cross_tab_chart(&["F", "M"])),
        controls,
        FilterEngineConfig::default(),
    )
    .expect("engine")
    .with_data_tables(tables);
    engine.initialize(Duration::ZERO);

    let women = series_values(&engine, 0);
    let men = series_values(&engine, 1);
    assert_relative_eq!(women[0] + men[0], 100.0, epsilon = 1e-9);
    assert_relative_eq!(women[0], 75.0, epsilon = 1e-9);
}
