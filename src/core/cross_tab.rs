use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::core::data_tables::{CrossTabInfo, CrossTabRow, StackedType};
use crate::core::tokens::contains_all_token;

/// One re-aggregated stack series aligned with `CrossTabAggregate::categories`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSeries {
    pub name: String,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossTabAggregate {
    pub categories: Vec<String>,
    pub series: Vec<AggregatedSeries>,
}

/// Re-aggregates cross-tab rows under the active selections.
///
/// `selections` maps filter variable to its selected values. A dimension is
/// left unfiltered when its selection is empty or contains an all-token.
/// When the config declares filter variables only those are honored;
/// otherwise only variables present as a column in the rows are.
#[must_use]
pub fn aggregate_cross_tab(
    info: &CrossTabInfo,
    selections: &IndexMap<String, Vec<String>>,
) -> CrossTabAggregate {
    let config = &info.config;
    let active: Vec<(&str, &[String])> = selections
        .iter()
        .filter(|(variable, _)| {
            if config.filter_variables.is_empty() {
                info.rows.iter().any(|row| row.contains_key(variable.as_str()))
            } else {
                config.filter_variables.contains(*variable)
            }
        })
        .filter(|(_, values)| !values.is_empty() && !contains_all_token(values))
        .map(|(variable, values)| (variable.as_str(), values.as_slice()))
        .collect();

    let categories = config
        .x_order
        .clone()
        .unwrap_or_else(|| first_seen(&info.rows, &config.x_variable));
    let stacks = config
        .stack_order
        .clone()
        .unwrap_or_else(|| first_seen(&info.rows, &config.stack_variable));

    let mut sums: IndexMap<(String, String), f64> = IndexMap::new();
    for row in info.rows.iter().filter(|row| row_matches(row, &active)) {
        let (Some(x), Some(stack)) = (key(row, &config.x_variable), key(row, &config.stack_variable))
        else {
            continue;
        };
        let count = match row.get(&config.count_variable) {
            Some(cell) => cell.as_f64().unwrap_or(0.0),
            // Micro-data without a count column counts each row once.
            None => 1.0,
        };
        *sums.entry((x, stack)).or_insert(0.0) += count;
    }

    let bucket_totals: Vec<f64> = categories
        .iter()
        .map(|x| {
            stacks
                .iter()
                .map(|stack| sums.get(&(x.clone(), stack.clone())).copied().unwrap_or(0.0))
                .sum()
        })
        .collect();

    let series = stacks
        .iter()
        .map(|stack| {
            let data = categories
                .iter()
                .zip(&bucket_totals)
                .map(|(x, total)| {
                    let sum = sums.get(&(x.clone(), stack.clone())).copied().unwrap_or(0.0);
                    match config.stacked_type {
                        StackedType::Normal => sum,
                        StackedType::Percent if *total > 0.0 => sum / total * 100.0,
                        StackedType::Percent => 0.0,
                    }
                })
                .collect();
            AggregatedSeries {
                name: stack.clone(),
                data,
            }
        })
        .collect();

    CrossTabAggregate { categories, series }
}

fn key(row: &CrossTabRow, variable: &str) -> Option<String> {
    row.get(variable).and_then(|cell| cell.as_key())
}

fn row_matches(row: &CrossTabRow, active: &[(&str, &[String])]) -> bool {
    active.iter().all(|(variable, values)| {
        key(row, variable).is_some_and(|cell| values.iter().any(|value| *value == cell))
    })
}

fn first_seen(rows: &[CrossTabRow], variable: &str) -> Vec<String> {
    rows.iter()
        .filter_map(|row| key(row, variable))
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}
