//! Pure, stateless transforms over a [`Slice`](crate::table::Slice).
//!
//! Every operation accepts an empty slice. Those that cannot produce a value
//! from no data fail with `InsufficientData`; grouping over an absent
//! optional column fails with `MissingColumn`.

pub mod derived;
pub mod group;
pub mod stats;

use serde::{Deserialize, Serialize};

use crate::table::Period;

pub use derived::{
    average_per_startup, comparative_insight, outliers, startup_summary, ComparativeInsight,
    StartupSummary,
};
pub use group::{group_count, group_sum, mode_of, pivot_sum, top_n, unique_count, Pivot};
pub use stats::{
    amount_quantile, date_range, mean_amount, peak_and_trough, quantile, round_to, sum_amounts,
    time_series, total_amount, PeakTrough,
};

/// `(group, value)` pairs, largest value first.
pub type Ranking = Vec<(String, f64)>;

/// `(period, value)` pairs, oldest period first.
pub type TimeSeries = Vec<(Period, f64)>;

/// What a time-series bucket holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    /// Summed amount.
    #[default]
    Sum,
    /// Number of rounds with a known amount.
    Count,
    /// Number of rows, amount or not.
    Rows,
}
