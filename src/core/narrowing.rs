//! Pure narrowing steps over a chart's original category axis.
//!
//! Every step takes the surviving index set and returns a subset of it, so a
//! filter pass is a fold over the active filters starting from all indices.
//! Categories that cannot be read as numbers are never dropped by numeric
//! comparisons.

use crate::core::period::PeriodPreset;
use crate::core::types::{Point, parse_numeric};

/// True when any selected value occurs in `universe`.
#[must_use]
pub fn overlaps<'a, I>(selected: &[String], universe: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    universe
        .into_iter()
        .any(|candidate| selected.iter().any(|value| value == candidate))
}

#[must_use]
pub fn narrow_by_period(categories: &[String], indices: Vec<usize>, preset: PeriodPreset) -> Vec<usize> {
    indices
        .into_iter()
        .filter(|&index| parse_numeric(&categories[index]).is_none_or(|year| preset.contains(year)))
        .collect()
}

#[must_use]
pub fn narrow_by_selection(categories: &[String], indices: Vec<usize>, selected: &[String]) -> Vec<usize> {
    indices
        .into_iter()
        .filter(|&index| selected.iter().any(|value| *value == categories[index]))
        .collect()
}

/// Keeps categories at or after the position of `label` on the original axis.
///
/// Falls back to a numeric `>=` comparison when the label is not a category.
#[must_use]
pub fn narrow_from_label(categories: &[String], indices: Vec<usize>, label: &str) -> Vec<usize> {
    match categories.iter().position(|category| category == label) {
        Some(start) => indices.into_iter().filter(|&index| index >= start).collect(),
        None => match parse_numeric(label) {
            Some(threshold) => narrow_by_threshold(categories, indices, threshold),
            None => indices,
        },
    }
}

#[must_use]
pub fn narrow_by_threshold(categories: &[String], indices: Vec<usize>, threshold: f64) -> Vec<usize> {
    indices
        .into_iter()
        .filter(|&index| parse_numeric(&categories[index]).is_none_or(|value| value >= threshold))
        .collect()
}

/// Deep-copies snapshot points at the surviving indices.
#[must_use]
pub fn reindex(data: &[Point], indices: &[usize]) -> Vec<Point> {
    indices
        .iter()
        .map(|&index| data.get(index).cloned().unwrap_or(Point::Null))
        .collect()
}

/// Keeps points whose x value is at least `threshold`.
///
/// Points without an explicit x are positioned by their index.
#[must_use]
pub fn points_at_or_after(data: &[Point], threshold: f64) -> Vec<Point> {
    data.iter()
        .enumerate()
        .filter(|(index, point)| point.x().unwrap_or(*index as f64) >= threshold)
        .map(|(_, point)| point.clone())
        .collect()
}
