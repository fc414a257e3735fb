use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use super::{Measure, TimeSeries};
use crate::{
    error::{FundingError, Result},
    table::{Granularity, Slice},
};

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    (value * scale).round() / scale
}

/// Sum of non-null amounts, unrounded.
pub fn sum_amounts(slice: &Slice<'_>) -> f64 {
    slice.amounts().sum()
}

/// Sum of non-null amounts rounded to `places` decimals. 0 for an empty slice.
pub fn total_amount(slice: &Slice<'_>, places: u32) -> f64 {
    round_to(sum_amounts(slice), places)
}

/// Mean of non-null amounts, `None` if there are none.
pub fn mean_amount(slice: &Slice<'_>) -> Option<f64> {
    let (sum, n) = slice
        .amounts()
        .fold((0.0, 0usize), |(s, n), a| (s + a, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Earliest and latest known date.
pub fn date_range(slice: &Slice<'_>) -> Option<(NaiveDate, NaiveDate)> {
    slice.iter().filter_map(|r| r.date).fold(None, |acc, d| match acc {
        None => Some((d, d)),
        Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
    })
}

/// Per-period sum or count, ascending by period. Rows without a date are
/// left out.
pub fn time_series(slice: &Slice<'_>, granularity: Granularity, measure: Measure) -> TimeSeries {
    let mut buckets = BTreeMap::new();
    for record in slice.iter() {
        let Some(period) = record.period(granularity) else {
            continue;
        };
        let bucket = buckets.entry(period).or_insert(0.0);
        *bucket += match measure {
            Measure::Sum => record.amount.unwrap_or(0.0),
            Measure::Count if record.amount.is_some() => 1.0,
            Measure::Count => 0.0,
            Measure::Rows => 1.0,
        };
    }
    buckets.into_iter().collect()
}

/// Linear-interpolation quantile of `values` (non-finite entries ignored).
///
/// With the sorted values `v` and `h = q * (n - 1)`, the result is
/// `v[floor(h)] + (h - floor(h)) * (v[ceil(h)] - v[floor(h)])`.
pub fn quantile(values: &[f64], q: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&q) {
        return Err(FundingError::InvalidQuantile(q));
    }
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return Err(FundingError::insufficient("quantile of an empty set"));
    }
    sorted.sort_by(f64::total_cmp);

    let h = q * (sorted.len() - 1) as f64;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    Ok(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

/// [`quantile`] over the slice's amounts.
pub fn amount_quantile(slice: &Slice<'_>, q: f64) -> Result<f64> {
    let amounts: Vec<f64> = slice.amounts().collect();
    quantile(&amounts, q)
}

/// Highest and lowest point of a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakTrough<K> {
    pub peak: (K, f64),
    pub trough: (K, f64),
}

/// Max and min of a series; the first occurrence wins on ties.
pub fn peak_and_trough<K: Clone>(series: &[(K, f64)]) -> Result<PeakTrough<K>> {
    let (first, rest) = series
        .split_first()
        .ok_or_else(|| FundingError::insufficient("empty time series"))?;
    let mut peak = first;
    let mut trough = first;
    for point in rest {
        if point.1 > peak.1 {
            peak = point;
        }
        if point.1 < trough.1 {
            trough = point;
        }
    }
    Ok(PeakTrough {
        peak: peak.clone(),
        trough: trough.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{fixtures, Period};

    fn month(year: i32, month: u32) -> Period {
        Period::Month { year, month }
    }

    #[test]
    fn scenario_totals_and_monthly_series() {
        let t = fixtures::abc();
        let s = t.all();
        assert_eq!(total_amount(&s, 3), 35.0);
        assert_eq!(
            time_series(&s, Granularity::Month, Measure::Sum),
            vec![(month(2020, 1), 30.0), (month(2020, 2), 5.0)]
        );
        assert_eq!(
            time_series(&s, Granularity::Month, Measure::Count),
            vec![(month(2020, 1), 2.0), (month(2020, 2), 1.0)]
        );
        assert_eq!(
            time_series(&s, Granularity::Year, Measure::Sum),
            vec![(Period::Year(2020), 35.0)]
        );
    }

    #[test]
    fn count_skips_unknown_amounts_rows_does_not() {
        let t = fixtures::table(&[
            ("X", "i", None, None, None, Some("2020-01-05"), Some(1.0)),
            ("Y", "i", None, None, None, Some("2020-01-20"), None),
        ]);
        let s = t.all();
        assert_eq!(
            time_series(&s, Granularity::Month, Measure::Count),
            vec![(month(2020, 1), 1.0)]
        );
        assert_eq!(
            time_series(&s, Granularity::Month, Measure::Rows),
            vec![(month(2020, 1), 2.0)]
        );
    }

    #[test]
    fn scenario_peak_and_trough() {
        let t = fixtures::abc();
        let series = time_series(&t.all(), Granularity::Month, Measure::Sum);
        let pt = peak_and_trough(&series).unwrap();
        assert_eq!(pt.peak, (month(2020, 1), 30.0));
        assert_eq!(pt.trough, (month(2020, 2), 5.0));
    }

    #[test]
    fn peak_and_trough_ties_take_first() {
        let series = vec![("a", 1.0), ("b", 3.0), ("c", 3.0), ("d", 1.0)];
        let pt = peak_and_trough(&series).unwrap();
        assert_eq!(pt.peak.0, "b");
        assert_eq!(pt.trough.0, "a");
        let empty: Vec<(&str, f64)> = Vec::new();
        assert!(matches!(
            peak_and_trough(&empty),
            Err(FundingError::InsufficientData(_))
        ));
    }

    #[test]
    fn empty_slice_totals_zero() {
        let t = fixtures::abc();
        let empty = t.select(|_| false);
        assert_eq!(total_amount(&empty, 3), 0.0);
        assert_eq!(mean_amount(&empty), None);
        assert_eq!(date_range(&empty), None);
        assert!(time_series(&empty, Granularity::Year, Measure::Sum).is_empty());
    }

    #[test]
    fn undated_rows_are_left_out_of_series() {
        let t = fixtures::table(&[
            ("X", "i", None, None, None, None, Some(4.0)),
            ("Y", "i", None, None, None, Some("2017-06-01"), Some(1.0)),
        ]);
        assert_eq!(
            time_series(&t.all(), Granularity::Year, Measure::Sum),
            vec![(Period::Year(2017), 1.0)]
        );
    }

    #[test]
    fn total_is_rounded() {
        let t = fixtures::table(&[
            ("X", "i", None, None, None, None, Some(0.1234)),
            ("Y", "i", None, None, None, None, Some(0.0002)),
        ]);
        assert_eq!(total_amount(&t.all(), 3), 0.124);
        assert_eq!(round_to(2.0, 0), 2.0);
    }

    #[test]
    fn quantile_interpolates() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&v, 0.0).unwrap(), 1.0);
        assert_eq!(quantile(&v, 1.0).unwrap(), 4.0);
        assert!((quantile(&v, 0.5).unwrap() - 2.5).abs() < 1e-12);
        assert!((quantile(&v, 0.99).unwrap() - 3.97).abs() < 1e-9);
    }

    #[test]
    fn quantile_edges() {
        assert!(matches!(
            quantile(&[], 0.99),
            Err(FundingError::InsufficientData(_))
        ));
        assert_eq!(quantile(&[42.0], 0.99).unwrap(), 42.0);
        assert!(matches!(
            quantile(&[1.0], 1.5),
            Err(FundingError::InvalidQuantile(_))
        ));
    }

    #[test]
    fn amount_quantile_on_slices() {
        let t = fixtures::abc();
        let empty = t.select(|_| false);
        assert!(matches!(
            amount_quantile(&empty, 0.99),
            Err(FundingError::InsufficientData(_))
        ));
        let one = t.select(|r| r.startup == "B");
        assert_eq!(amount_quantile(&one, 0.99).unwrap(), 20.0);
    }

    #[test]
    fn date_range_and_mean() {
        let t = fixtures::abc();
        let (lo, hi) = date_range(&t.all()).unwrap();
        assert_eq!(lo, NaiveDate::from_ymd_opt(2020, 1, 10).unwrap());
        assert_eq!(hi, NaiveDate::from_ymd_opt(2020, 2, 3).unwrap());
        assert!((mean_amount(&t.all()).unwrap() - 35.0 / 3.0).abs() < 1e-12);
    }
}
