use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::types::format_numeric;
use crate::error::{FilterError, FilterResult};

/// Scalar cell of an embedded data table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Key used to compare the cell against selections and category labels.
    #[must_use]
    pub fn as_key(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(value) => Some(value.to_string()),
            Self::Number(value) => Some(format_numeric(*value)),
            Self::Text(text) => Some(text.clone()),
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
            Self::Null | Self::Bool(_) => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// One flat record of a cross-tab table.
pub type CrossTabRow = IndexMap<String, CellValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackedType {
    #[default]
    Normal,
    Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossTabConfig {
    pub x_variable: String,
    pub stack_variable: String,
    #[serde(default)]
    pub filter_variables: Vec<String>,
    #[serde(default)]
    pub stacked_type: StackedType,
    #[serde(default)]
    pub stack_order: Option<Vec<String>>,
    #[serde(default)]
    pub x_order: Option<Vec<String>>,
    #[serde(default = "default_count_variable")]
    pub count_variable: String,
}

impl CrossTabConfig {
    #[must_use]
    pub fn new(x_variable: impl Into<String>, stack_variable: impl Into<String>) -> Self {
        Self {
            x_variable: x_variable.into(),
            stack_variable: stack_variable.into(),
            filter_variables: Vec::new(),
            stacked_type: StackedType::Normal,
            stack_order: None,
            x_order: None,
            count_variable: default_count_variable(),
        }
    }

    #[must_use]
    pub fn with_filter_variables<I, S>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter_variables = variables.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_stacked_type(mut self, stacked_type: StackedType) -> Self {
        self.stacked_type = stacked_type;
        self
    }

    #[must_use]
    pub fn with_orders(mut self, x_order: Option<Vec<String>>, stack_order: Option<Vec<String>>) -> Self {
        self.x_order = x_order;
        self.stack_order = stack_order;
        self
    }
}

fn default_count_variable() -> String {
    "n".to_owned()
}

/// Precomputed raw rows backing exact re-aggregation for one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossTabInfo {
    pub rows: Vec<CrossTabRow>,
    pub config: CrossTabConfig,
}

/// One observation of the flat time-series table used by metric switching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRow {
    pub series: String,
    pub metric: String,
    pub time: CellValue,
    pub value: Option<f64>,
}

/// Global data tables a dashboard page embeds next to its charts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTables {
    #[serde(default)]
    pub time_series: Vec<TimeSeriesRow>,
    #[serde(default)]
    pub cross_tabs: IndexMap<String, CrossTabInfo>,
}

impl DataTables {
    pub fn from_json_str(input: &str) -> FilterResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| FilterError::InvalidData(format!("failed to parse data tables: {e}")))
    }

    pub fn to_json_pretty(&self) -> FilterResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FilterError::InvalidData(format!("failed to serialize data tables: {e}")))
    }
}

/// Lookup index over the time-series table keyed by (series, metric, time).
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesIndex {
    values: HashMap<(String, String, String), Option<f64>>,
    metrics: Vec<String>,
}

impl TimeSeriesIndex {
    #[must_use]
    pub fn build(rows: &[TimeSeriesRow]) -> Self {
        let mut index = Self::default();
        for row in rows {
            let Some(time) = row.time.as_key() else {
                continue;
            };
            if !index.metrics.contains(&row.metric) {
                index.metrics.push(row.metric.clone());
            }
            index
                .values
                .insert((row.series.clone(), row.metric.clone(), time), row.value);
        }
        index
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn has_metric(&self, metric: &str) -> bool {
        self.metrics.iter().any(|known| known == metric)
    }

    #[must_use]
    pub fn lookup(&self, series: &str, metric: &str, time: &str) -> Option<f64> {
        self.values
            .get(&(series.to_owned(), metric.to_owned(), time.to_owned()))
            .copied()
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_embedded_tables_with_camel_case_keys() {
        let tables = DataTables::from_json_str(
            r#"{
                "timeSeries": [{"series": "A", "metric": "rate", "time": 2020, "value": 1.5}],
                "crossTabs": {
                    "chart-1": {
                        "rows": [{"year": 2020, "sex": "F", "n": 4}],
                        "config": {"xVariable": "year", "stackVariable": "sex", "stackedType": "percent"}
                    }
                }
            }"#,
        )
        .expect("tables parse");

        let info = &tables.cross_tabs["chart-1"];
        assert_eq!(info.config.stacked_type, StackedType::Percent);
        assert_eq!(info.config.count_variable, "n");
        assert_eq!(info.rows[0]["year"].as_key().as_deref(), Some("2020"));

        let index = TimeSeriesIndex::build(&tables.time_series);
        assert_eq!(index.lookup("A", "rate", "2020"), Some(1.5));
        assert_eq!(index.lookup("A", "rate", "2021"), None);
    }

    #[test]
    fn malformed_tables_report_invalid_data() {
        let err = DataTables::from_json_str("{\"timeSeries\": 3}").expect_err("must fail");
        assert!(matches!(err, FilterError::InvalidData(_)));
    }
}
