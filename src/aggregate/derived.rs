//! Metrics composed from the primitives in `group` and `stats`.

use chrono::NaiveDate;
use serde::Serialize;

use super::{
    group::{mode_of, unique_count},
    stats::{amount_quantile, date_range, mean_amount, sum_amounts},
};
use crate::{
    error::{FundingError, Result},
    table::{Dimension, FundingRecord, Slice},
};

/// Total funding divided by the number of distinct startups.
/// `None` when the slice has no startups.
pub fn average_per_startup(slice: &Slice<'_>) -> Result<Option<f64>> {
    let startups = unique_count(slice, Dimension::Startup)?;
    Ok((startups > 0).then(|| sum_amounts(slice) / startups as f64))
}

/// How an entity's raised capital compares with its usual vertical and city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparativeInsight {
    pub total_raised: f64,
    pub vertical: Option<String>,
    /// Mean round amount across the whole table for `vertical`.
    pub vertical_average: Option<f64>,
    pub city: Option<String>,
    /// Mean round amount across the whole table for `city`.
    pub city_average: Option<f64>,
}

/// Compare `slice` with the whole table it came from, using its modal
/// vertical and city. Fails with `InsufficientData` on an empty slice.
pub fn comparative_insight(slice: &Slice<'_>) -> Result<ComparativeInsight> {
    if slice.is_empty() {
        return Err(FundingError::insufficient("no records for this selection"));
    }
    let whole = slice.whole();

    let vertical = mode_of(slice, Dimension::Vertical)?;
    let vertical_average = vertical.as_deref().and_then(|v| {
        mean_amount(&whole.filter(|r| r.vertical.as_deref() == Some(v)))
    });
    let city = mode_of(slice, Dimension::City)?;
    let city_average = city
        .as_deref()
        .and_then(|c| mean_amount(&whole.filter(|r| r.city.as_deref() == Some(c))));

    Ok(ComparativeInsight {
        total_raised: sum_amounts(slice),
        vertical,
        vertical_average,
        city,
        city_average,
    })
}

/// Records at or above the `q` quantile of amount. Every record tied at the
/// threshold is included.
pub fn outliers<'a>(slice: &Slice<'a>, q: f64) -> Result<(f64, Vec<&'a FundingRecord>)> {
    let threshold = amount_quantile(slice, q)?;
    let rows = slice
        .iter()
        .filter(|r| r.amount.map_or(false, |a| a >= threshold))
        .collect();
    Ok((threshold, rows))
}

/// Headline numbers for one startup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartupSummary {
    pub total_funding: f64,
    pub rounds: usize,
    pub first_funding: Option<NaiveDate>,
    pub latest_funding: Option<NaiveDate>,
    /// Distinct raw investor fields, not individual names.
    pub unique_investors: usize,
}

pub fn startup_summary(slice: &Slice<'_>) -> Result<StartupSummary> {
    let range = date_range(slice);
    Ok(StartupSummary {
        total_funding: sum_amounts(slice),
        rounds: slice.len(),
        first_funding: range.map(|(lo, _)| lo),
        latest_funding: range.map(|(_, hi)| hi),
        unique_investors: unique_count(slice, Dimension::Investors)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::fixtures;

    #[test]
    fn average_per_startup_guards_division() {
        let t = fixtures::abc();
        assert_eq!(average_per_startup(&t.all()).unwrap(), Some(17.5));
        assert_eq!(average_per_startup(&t.select(|_| false)).unwrap(), None);
    }

    #[test]
    fn comparative_insight_uses_whole_table() {
        let t = fixtures::abc();
        let a = t.select(|r| r.startup == "A");
        let insight = comparative_insight(&a).unwrap();
        assert_eq!(insight.total_raised, 15.0);
        assert_eq!(insight.vertical.as_deref(), Some("FinTech"));
        assert_eq!(insight.vertical_average, Some(7.5));
        // Bengaluru and Mumbai tie; Bengaluru came first.
        assert_eq!(insight.city.as_deref(), Some("Bengaluru"));
        assert_eq!(insight.city_average, Some(15.0));
    }

    #[test]
    fn comparative_insight_on_empty_slice() {
        let t = fixtures::abc();
        assert!(matches!(
            comparative_insight(&t.select(|_| false)),
            Err(FundingError::InsufficientData(_))
        ));
    }

    #[test]
    fn comparative_insight_without_vertical() {
        let t = fixtures::table(&[("X", "i", None, None, None, None, Some(2.0))]);
        let insight = comparative_insight(&t.all()).unwrap();
        assert_eq!(insight.vertical, None);
        assert_eq!(insight.vertical_average, None);
    }

    #[test]
    fn outliers_include_every_tie() {
        let mut rows = vec![("S", "i", None, None, None, None, Some(1.0)); 5];
        rows.extend(vec![("T", "i", None, None, None, None, Some(100.0)); 4]);
        let t = fixtures::table(&rows);
        let (threshold, hits) = outliers(&t.all(), 0.99).unwrap();
        assert_eq!(threshold, 100.0);
        assert_eq!(hits.len(), 4);
        assert!(hits.iter().all(|r| r.startup == "T"));
    }

    #[test]
    fn outliers_single_row_and_empty() {
        let t = fixtures::abc();
        let one = t.select(|r| r.startup == "B");
        let (_, hits) = outliers(&one, 0.99).unwrap();
        assert_eq!(hits.len(), 1);
        assert!(outliers(&t.select(|_| false), 0.99).is_err());
    }

    #[test]
    fn startup_summary_metrics() {
        let t = fixtures::abc();
        let s = startup_summary(&t.select(|r| r.startup == "A")).unwrap();
        assert_eq!(s.total_funding, 15.0);
        assert_eq!(s.rounds, 2);
        assert_eq!(s.first_funding, NaiveDate::from_ymd_opt(2020, 1, 10));
        assert_eq!(s.latest_funding, NaiveDate::from_ymd_opt(2020, 2, 3));
        assert_eq!(s.unique_investors, 2);
    }
}
