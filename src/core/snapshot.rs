use serde::{Deserialize, Serialize};

use crate::core::types::Point;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSnapshot {
    pub name: String,
    pub data: Vec<Point>,
}

/// Original chart content captured before the first filter pass.
///
/// Filter passes read from it and write only to the live chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub categories: Option<Vec<String>>,
    pub series: Vec<SeriesSnapshot>,
    pub title: Option<String>,
    pub y_axis_title: Option<String>,
}

impl ChartSnapshot {
    #[must_use]
    pub fn has_categories(&self) -> bool {
        self.categories.as_ref().is_some_and(|categories| !categories.is_empty())
    }

    pub fn series_names(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|series| series.name.as_str())
    }
}
