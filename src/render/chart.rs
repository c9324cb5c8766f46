use serde::{Deserialize, Serialize};

use crate::core::{ChartSnapshot, Point, SeriesSnapshot};
use crate::error::{FilterError, FilterResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveSeries {
    pub name: String,
    pub data: Vec<Point>,
    pub visible: bool,
    pub show_in_legend: bool,
}

impl LiveSeries {
    #[must_use]
    pub fn new(name: impl Into<String>, data: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            data,
            visible: true,
            show_in_legend: true,
        }
    }
}

/// Chart object as the render surface currently displays it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveChart {
    pub id: String,
    pub title: Option<String>,
    pub y_axis_title: Option<String>,
    /// `None` for charts on a numeric x axis.
    pub categories: Option<Vec<String>>,
    pub series: Vec<LiveSeries>,
}

impl LiveChart {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            y_axis_title: None,
            categories: None,
            series: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_series(mut self, series: LiveSeries) -> Self {
        self.series.push(series);
        self
    }

    #[must_use]
    pub fn with_titles(mut self, title: Option<String>, y_axis_title: Option<String>) -> Self {
        self.title = title;
        self.y_axis_title = y_axis_title;
        self
    }

    /// Captures the chart's current content as its immutable original.
    #[must_use]
    pub fn snapshot(&self) -> ChartSnapshot {
        ChartSnapshot {
            categories: self.categories.clone(),
            series: self
                .series
                .iter()
                .map(|series| SeriesSnapshot {
                    name: series.name.clone(),
                    data: series.data.clone(),
                })
                .collect(),
            title: self.title.clone(),
            y_axis_title: self.y_axis_title.clone(),
        }
    }

    #[must_use]
    pub fn series_index(&self, name: &str) -> Option<usize> {
        self.series.iter().position(|series| series.name == name)
    }

    /// Applies a batched update. Fails without touching the chart when any
    /// series index is out of range.
    pub fn apply(&mut self, update: ChartUpdate) -> FilterResult<()> {
        if let Some(bad) = update
            .series
            .iter()
            .find(|series| series.index >= self.series.len())
        {
            return Err(FilterError::InvalidData(format!(
                "chart {} has no series at index {}",
                self.id, bad.index
            )));
        }

        if let Some(categories) = update.categories {
            self.categories = Some(categories);
        }
        if let Some(title) = update.title {
            self.title = Some(title);
        }
        if let Some(y_axis_title) = update.y_axis_title {
            self.y_axis_title = Some(y_axis_title);
        }
        for series_update in update.series {
            let series = &mut self.series[series_update.index];
            if let Some(data) = series_update.data {
                series.data = data;
            }
            if let Some(visible) = series_update.visible {
                series.visible = visible;
            }
            if let Some(show_in_legend) = series_update.show_in_legend {
                series.show_in_legend = show_in_legend;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesUpdate {
    pub index: usize,
    pub data: Option<Vec<Point>>,
    pub visible: Option<bool>,
    pub show_in_legend: Option<bool>,
}

/// All changes for one chart, applied together before a single redraw.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartUpdate {
    pub categories: Option<Vec<String>>,
    pub title: Option<String>,
    pub y_axis_title: Option<String>,
    pub series: Vec<SeriesUpdate>,
}
