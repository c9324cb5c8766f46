pub mod control;
pub mod cross_tab;
pub mod data_tables;
pub mod narrowing;
pub mod period;
pub mod snapshot;
pub mod tokens;
pub mod types;

pub use control::{
    ControlElement, ControlKind, ControlState, ControlType, ControlValue, SelectedValues,
    SkipReason,
};
pub use cross_tab::{AggregatedSeries, CrossTabAggregate, aggregate_cross_tab};
pub use data_tables::{
    CellValue, CrossTabConfig, CrossTabInfo, CrossTabRow, DataTables, StackedType,
    TimeSeriesIndex, TimeSeriesRow,
};
pub use period::PeriodPreset;
pub use snapshot::{ChartSnapshot, SeriesSnapshot};
pub use tokens::{contains_all_token, is_all_token};
pub use types::{Point, XyPoint};
