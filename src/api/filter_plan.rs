use indexmap::IndexMap;

use crate::core::types::parse_numeric;
use crate::core::{ControlKind, ControlState};

use super::FilterEngineConfig;

/// Selection of a select/checkbox/radio/button-group control.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct DiscreteFilter {
    pub filter_var: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct SliderFilter {
    pub label: Option<String>,
    pub value: f64,
}

impl SliderFilter {
    /// Lower bound used on numeric x axes.
    pub fn threshold(&self) -> f64 {
        self.label
            .as_deref()
            .and_then(parse_numeric)
            .unwrap_or(self.value)
    }
}

/// Active controls partitioned by how they act on a chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct FilterPlan {
    pub discrete: Vec<DiscreteFilter>,
    pub sliders: Vec<SliderFilter>,
    pub numbers: Vec<f64>,
    pub force_hidden: Vec<String>,
    pub force_shown: Vec<String>,
    /// Lowercased text queries.
    pub text_queries: Vec<String>,
    pub period: Option<String>,
    pub metric: Option<String>,
}

impl FilterPlan {
    pub fn from_registry(
        registry: &IndexMap<String, ControlState>,
        config: &FilterEngineConfig,
    ) -> Self {
        let mut plan = Self::default();
        for state in registry.values() {
            match &state.kind {
                ControlKind::Select { .. }
                | ControlKind::Checkbox { .. }
                | ControlKind::Radio { .. }
                | ControlKind::ButtonGroup { .. } => {
                    let values = state.selected_values().into_vec();
                    if values.is_empty() {
                        continue;
                    }
                    if state.filter_var == config.period_variable {
                        plan.period = values.into_iter().next();
                    } else if state.filter_var == config.metric_variable {
                        plan.metric = values.into_iter().next();
                    } else {
                        plan.discrete.push(DiscreteFilter {
                            filter_var: state.filter_var.clone(),
                            values,
                        });
                    }
                }
                ControlKind::Slider { value, .. } => plan.sliders.push(SliderFilter {
                    label: state.slider_label().map(str::to_owned),
                    value: *value,
                }),
                ControlKind::Number { value, .. } => plan.numbers.extend(*value),
                ControlKind::Switch {
                    on,
                    toggle_series: Some(series),
                    override_filters,
                } => {
                    if !*on {
                        plan.force_hidden.push(series.clone());
                    } else if *override_filters {
                        plan.force_shown.push(series.clone());
                    }
                }
                ControlKind::Switch {
                    toggle_series: None,
                    ..
                } => {}
                ControlKind::Text { query } => {
                    let query = query.trim();
                    if !query.is_empty() {
                        plan.text_queries.push(query.to_lowercase());
                    }
                }
            }
        }
        plan
    }

    /// Lower bound applied to numeric x axes, if any slider or number is set.
    pub fn numeric_threshold(&self) -> Option<f64> {
        self.sliders
            .iter()
            .map(SliderFilter::threshold)
            .chain(self.numbers.iter().copied())
            .reduce(f64::max)
    }

    /// Selections keyed by filter variable, as consumed by cross-tab rebuilds.
    pub fn selections(&self) -> IndexMap<String, Vec<String>> {
        let mut selections: IndexMap<String, Vec<String>> = IndexMap::new();
        for filter in &self.discrete {
            selections
                .entry(filter.filter_var.clone())
                .or_default()
                .extend(filter.values.iter().cloned());
        }
        selections
    }
}
