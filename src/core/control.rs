use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::warn;

use crate::core::types::{format_numeric, parse_numeric};

/// Attribute binding a control to the data field it restricts.
pub const ATTR_FILTER_VAR: &str = "data-filter-var";
/// Control-type discriminator attribute.
pub const ATTR_FILTER_TYPE: &str = "data-filter-type";
pub const ATTR_MIN: &str = "data-min";
pub const ATTR_MAX: &str = "data-max";
pub const ATTR_STEP: &str = "data-step";
/// JSON-encoded label list for sliders.
pub const ATTR_LABELS: &str = "data-labels";
pub const ATTR_TOGGLE_SERIES: &str = "data-toggle-series";
pub const ATTR_OVERRIDE: &str = "data-override";
pub const ATTR_MULTIPLE: &str = "multiple";

/// Ordered selection as carried by discrete controls.
pub type SelectedValues = SmallVec<[String; 4]>;

/// Control-type discriminator read from the DOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlType {
    Select,
    Checkbox,
    Radio,
    Switch,
    Slider,
    Text,
    Number,
    ButtonGroup,
}

impl ControlType {
    pub const ALL: [Self; 8] = [
        Self::Select,
        Self::Checkbox,
        Self::Radio,
        Self::Switch,
        Self::Slider,
        Self::Text,
        Self::Number,
        Self::ButtonGroup,
    ];

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "select" | "dropdown" => Some(Self::Select),
            "checkbox" => Some(Self::Checkbox),
            "radio" => Some(Self::Radio),
            "switch" | "toggle" => Some(Self::Switch),
            "slider" | "range" => Some(Self::Slider),
            "text" | "search" => Some(Self::Text),
            "number" => Some(Self::Number),
            "button_group" | "button-group" | "buttongroup" => Some(Self::ButtonGroup),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Switch => "switch",
            Self::Slider => "slider",
            Self::Text => "text",
            Self::Number => "number",
            Self::ButtonGroup => "button_group",
        }
    }
}

/// Live value of a DOM control as the host reads or writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ControlValue {
    Selection(Vec<String>),
    Toggle(bool),
    Number(f64),
    Text(String),
}

impl ControlValue {
    #[must_use]
    pub fn selection<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Selection(values.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn as_selection(&self) -> Vec<String> {
        match self {
            Self::Selection(values) => values.clone(),
            Self::Toggle(on) => vec![on.to_string()],
            Self::Number(value) => vec![format_numeric(*value)],
            Self::Text(text) if text.is_empty() => Vec::new(),
            Self::Text(text) => vec![text.clone()],
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Toggle(on) => *on,
            Self::Number(value) => *value != 0.0,
            Self::Text(text) => is_truthy(text),
            Self::Selection(values) => values.first().is_some_and(|value| is_truthy(value)),
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) if value.is_finite() => Some(*value),
            Self::Number(_) => None,
            Self::Toggle(on) => Some(if *on { 1.0 } else { 0.0 }),
            Self::Text(text) => parse_numeric(text),
            Self::Selection(values) => values.first().and_then(|value| parse_numeric(value)),
        }
    }

    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Selection(values) => values.first().cloned().unwrap_or_default(),
            Self::Toggle(on) => on.to_string(),
            Self::Number(value) => format_numeric(*value),
        }
    }
}

fn is_truthy(text: &str) -> bool {
    matches!(
        text.trim().to_ascii_lowercase().as_str(),
        "true" | "on" | "1" | "yes" | "checked"
    )
}

/// Host-side description of a discoverable control element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlElement {
    pub id: String,
    #[serde(default)]
    pub attributes: IndexMap<String, String>,
    /// Option values for selects, checkbox groups, radios and button groups.
    #[serde(default)]
    pub options: Vec<String>,
    pub value: ControlValue,
    #[serde(default)]
    pub initialized: bool,
}

impl ControlElement {
    #[must_use]
    pub fn new(id: impl Into<String>, value: ControlValue) -> Self {
        Self {
            id: id.into(),
            attributes: IndexMap::new(),
            options: Vec::new(),
            value,
            initialized: false,
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    fn numeric_attribute(&self, name: &str) -> Option<f64> {
        let raw = self.attribute(name)?;
        let parsed = parse_numeric(raw);
        if parsed.is_none() {
            warn!(control = %self.id, attribute = name, raw, "ignoring non-numeric attribute");
        }
        parsed
    }

    fn flag_attribute(&self, name: &str) -> bool {
        self.attributes
            .get(name)
            .is_some_and(|value| value.trim().is_empty() || is_truthy(value))
    }
}

/// Reason a discovered element was not registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    MissingFilterVar,
    MissingType,
    UnknownType(String),
}

/// Per-kind control state, each variant carrying only its relevant fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlKind {
    Select {
        values: SelectedValues,
        multiple: bool,
    },
    Checkbox {
        values: SelectedValues,
    },
    Radio {
        value: Option<String>,
    },
    Switch {
        on: bool,
        toggle_series: Option<String>,
        override_filters: bool,
    },
    Slider {
        value: f64,
        min: f64,
        max: f64,
        step: f64,
        labels: Option<Vec<String>>,
    },
    Text {
        query: String,
    },
    Number {
        value: Option<f64>,
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
    },
    ButtonGroup {
        value: Option<String>,
    },
}

impl ControlKind {
    #[must_use]
    pub const fn control_type(&self) -> ControlType {
        match self {
            Self::Select { .. } => ControlType::Select,
            Self::Checkbox { .. } => ControlType::Checkbox,
            Self::Radio { .. } => ControlType::Radio,
            Self::Switch { .. } => ControlType::Switch,
            Self::Slider { .. } => ControlType::Slider,
            Self::Text { .. } => ControlType::Text,
            Self::Number { .. } => ControlType::Number,
            Self::ButtonGroup { .. } => ControlType::ButtonGroup,
        }
    }
}

/// Registered state for one control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlState {
    pub id: String,
    pub filter_var: String,
    pub kind: ControlKind,
}

impl ControlState {
    /// Builds state from an element's attributes and current value.
    pub fn from_element(element: &ControlElement) -> Result<Self, SkipReason> {
        let filter_var = element
            .attribute(ATTR_FILTER_VAR)
            .ok_or(SkipReason::MissingFilterVar)?
            .trim()
            .to_owned();
        let raw_type = element
            .attribute(ATTR_FILTER_TYPE)
            .ok_or(SkipReason::MissingType)?;
        let control_type =
            ControlType::parse(raw_type).ok_or_else(|| SkipReason::UnknownType(raw_type.to_owned()))?;

        let kind = match control_type {
            ControlType::Select => ControlKind::Select {
                values: SelectedValues::new(),
                multiple: element.flag_attribute(ATTR_MULTIPLE),
            },
            ControlType::Checkbox => ControlKind::Checkbox {
                values: SelectedValues::new(),
            },
            ControlType::Radio => ControlKind::Radio { value: None },
            ControlType::Switch => ControlKind::Switch {
                on: false,
                toggle_series: element.attribute(ATTR_TOGGLE_SERIES).map(str::to_owned),
                override_filters: element.flag_attribute(ATTR_OVERRIDE),
            },
            ControlType::Slider => {
                let min = element.numeric_attribute(ATTR_MIN).unwrap_or(0.0);
                let max = element.numeric_attribute(ATTR_MAX).unwrap_or(100.0);
                let step = element
                    .numeric_attribute(ATTR_STEP)
                    .filter(|step| *step > 0.0)
                    .unwrap_or(1.0);
                ControlKind::Slider {
                    value: min,
                    min,
                    max,
                    step,
                    labels: element
                        .attribute(ATTR_LABELS)
                        .and_then(|raw| parse_label_list(&element.id, raw)),
                }
            }
            ControlType::Text => ControlKind::Text {
                query: String::new(),
            },
            ControlType::Number => ControlKind::Number {
                value: None,
                min: element.numeric_attribute(ATTR_MIN),
                max: element.numeric_attribute(ATTR_MAX),
                step: element.numeric_attribute(ATTR_STEP),
            },
            ControlType::ButtonGroup => ControlKind::ButtonGroup { value: None },
        };

        let mut state = Self {
            id: element.id.clone(),
            filter_var,
            kind,
        };
        state.set_value(&element.value);
        Ok(state)
    }

    #[must_use]
    pub const fn control_type(&self) -> ControlType {
        self.kind.control_type()
    }

    /// Updates state from a live DOM value, coercing between value shapes.
    pub fn set_value(&mut self, value: &ControlValue) {
        match &mut self.kind {
            ControlKind::Select { values, multiple } => {
                let mut selection = value.as_selection();
                if !*multiple {
                    selection.truncate(1);
                }
                *values = selection.into_iter().collect();
            }
            ControlKind::Checkbox { values } => {
                *values = value.as_selection().into_iter().collect();
            }
            ControlKind::Radio { value: selected }
            | ControlKind::ButtonGroup { value: selected } => {
                *selected = value.as_selection().into_iter().next();
            }
            ControlKind::Switch { on, .. } => *on = value.as_bool(),
            ControlKind::Slider {
                value: current,
                min,
                max,
                ..
            } => {
                if let Some(number) = value.as_number() {
                    *current = number.clamp(*min, max.max(*min));
                }
            }
            ControlKind::Text { query } => *query = value.as_text(),
            ControlKind::Number { value: current, .. } => *current = value.as_number(),
        }
    }

    /// Current value in the shape the DOM control accepts.
    #[must_use]
    pub fn value(&self) -> ControlValue {
        match &self.kind {
            ControlKind::Select { values, .. } | ControlKind::Checkbox { values } => {
                ControlValue::Selection(values.to_vec())
            }
            ControlKind::Radio { value } | ControlKind::ButtonGroup { value } => {
                ControlValue::Selection(value.iter().cloned().collect())
            }
            ControlKind::Switch { on, .. } => ControlValue::Toggle(*on),
            ControlKind::Slider { value, .. } => ControlValue::Number(*value),
            ControlKind::Number { value, .. } => match value {
                Some(number) => ControlValue::Number(*number),
                None => ControlValue::Text(String::new()),
            },
            ControlKind::Text { query } => ControlValue::Text(query.clone()),
        }
    }

    /// Ordered selected values; empty means the control does not narrow anything.
    #[must_use]
    pub fn selected_values(&self) -> SelectedValues {
        match &self.kind {
            ControlKind::Select { values, .. } | ControlKind::Checkbox { values } => values.clone(),
            ControlKind::Radio { value } | ControlKind::ButtonGroup { value } => {
                value.iter().cloned().collect()
            }
            ControlKind::Switch { on, .. } => SelectedValues::from_iter([on.to_string()]),
            ControlKind::Slider { value, .. } => {
                SelectedValues::from_iter([format_numeric(*value)])
            }
            ControlKind::Number { value, .. } => value.map(format_numeric).into_iter().collect(),
            ControlKind::Text { query } if query.trim().is_empty() => SelectedValues::new(),
            ControlKind::Text { query } => SelectedValues::from_iter([query.clone()]),
        }
    }

    /// Label the slider currently points at, when it carries a label list.
    #[must_use]
    pub fn slider_label(&self) -> Option<&str> {
        let ControlKind::Slider {
            value,
            min,
            step,
            labels: Some(labels),
            ..
        } = &self.kind
        else {
            return None;
        };
        if labels.is_empty() {
            return None;
        }
        let position = ((value - min) / step).round().max(0.0) as usize;
        labels
            .get(position.min(labels.len() - 1))
            .map(String::as_str)
    }
}

/// Parses a JSON label list; anything malformed degrades to "no labels".
#[must_use]
pub fn parse_label_list(control_id: &str, raw: &str) -> Option<Vec<String>> {
    match serde_json::from_str::<Vec<serde_json::Value>>(raw) {
        Ok(values) if values.is_empty() => None,
        Ok(values) => Some(
            values
                .into_iter()
                .map(|value| match value {
                    serde_json::Value::String(text) => text,
                    other => other.to_string(),
                })
                .collect(),
        ),
        Err(err) => {
            warn!(control = control_id, error = %err, "ignoring malformed slider label list");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slider(labels: &str, value: f64) -> ControlState {
        let element = ControlElement::new("year", ControlValue::Number(value))
            .with_attribute(ATTR_FILTER_VAR, "year")
            .with_attribute(ATTR_FILTER_TYPE, "slider")
            .with_attribute(ATTR_MIN, "0")
            .with_attribute(ATTR_MAX, "2")
            .with_attribute(ATTR_LABELS, labels);
        ControlState::from_element(&element).expect("slider registers")
    }

    #[test]
    fn slider_label_follows_position() {
        let state = slider(r#"["2015","2018","2021"]"#, 1.0);
        assert_eq!(state.slider_label(), Some("2018"));
    }

    #[test]
    fn numeric_labels_are_stringified() {
        let state = slider("[2015, 2018]", 0.0);
        assert_eq!(state.slider_label(), Some("2015"));
    }

    #[test]
    fn malformed_labels_degrade_to_none() {
        let state = slider("[2015, oops", 1.0);
        assert_eq!(state.slider_label(), None);
        assert!(matches!(state.kind, ControlKind::Slider { labels: None, .. }));
    }

    #[test]
    fn missing_filter_var_is_a_skip_reason() {
        let element = ControlElement::new("x", ControlValue::Toggle(true))
            .with_attribute(ATTR_FILTER_TYPE, "switch");
        assert_eq!(
            ControlState::from_element(&element),
            Err(SkipReason::MissingFilterVar)
        );
    }

    #[test]
    fn single_select_keeps_first_value() {
        let element = ControlElement::new("region", ControlValue::selection(["North", "South"]))
            .with_attribute(ATTR_FILTER_VAR, "region")
            .with_attribute(ATTR_FILTER_TYPE, "select");
        let state = ControlState::from_element(&element).expect("select registers");
        assert_eq!(state.selected_values().as_slice(), ["North".to_owned()]);
    }
}
