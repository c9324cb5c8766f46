use serde::{Deserialize, Serialize};

/// Object-form chart point carrying an explicit x value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XyPoint {
    pub x: f64,
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A single series data point as the chart surface stores it.
///
/// Matches the three shapes charting surfaces accept: a missing value, a bare
/// y value positioned by category index, or an object with an explicit x.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Point {
    Null,
    Value(f64),
    Xy(XyPoint),
}

impl Point {
    #[must_use]
    pub fn xy(x: f64, y: f64) -> Self {
        Self::Xy(XyPoint {
            x,
            y: Some(y),
            name: None,
        })
    }

    #[must_use]
    pub fn x(&self) -> Option<f64> {
        match self {
            Self::Xy(point) => Some(point.x),
            Self::Null | Self::Value(_) => None,
        }
    }

    #[must_use]
    pub fn y(&self) -> Option<f64> {
        match self {
            Self::Null => None,
            Self::Value(y) => Some(*y),
            Self::Xy(point) => point.y,
        }
    }

    #[must_use]
    pub fn from_option(value: Option<f64>) -> Self {
        value.map_or(Self::Null, Self::Value)
    }
}

/// Parses a category or attribute value as a number, tolerating whitespace.
#[must_use]
pub fn parse_numeric(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Formats a number the way it appears in category labels (`2020`, not `2020.0`).
#[must_use]
pub fn format_numeric(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
