// src/aggregate/group.rs

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::Ranking;
use crate::{
    error::Result,
    table::{Dimension, FundingRecord, Granularity, Period, Slice},
};

/// Fold every row of `slice` into its group, keeping groups in first-seen
/// order. Rows whose key is null are skipped.
fn fold_groups<T>(
    slice: &Slice<'_>,
    dim: Dimension,
    mut init: impl FnMut() -> T,
    mut step: impl FnMut(&mut T, &FundingRecord),
) -> Result<Vec<(String, T)>> {
    slice.require(dim.field())?;

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, T)> = Vec::new();
    for record in slice.iter() {
        let Some(key) = dim.value(record) else {
            continue;
        };
        let i = match index.get(key.as_ref()) {
            Some(&i) => i,
            None => {
                let key = key.into_owned();
                index.insert(key.clone(), groups.len());
                groups.push((key, init()));
                groups.len() - 1
            }
        };
        step(&mut groups[i].1, record);
    }
    Ok(groups)
}

/// Stable descending sort: equal values keep first-seen order.
fn sort_desc<T: Copy + Into<f64>>(groups: &mut [(String, T)]) {
    groups.sort_by(|a, b| {
        let (x, y): (f64, f64) = (a.1.into(), b.1.into());
        y.total_cmp(&x)
    });
}

/// Summed amount per group, largest first.
pub fn group_sum(slice: &Slice<'_>, dim: Dimension) -> Result<Ranking> {
    let mut groups = fold_groups(slice, dim, || 0.0, |acc, r| *acc += r.amount.unwrap_or(0.0))?;
    sort_desc(&mut groups);
    Ok(groups)
}

/// Number of rows per group, largest first.
pub fn group_count(slice: &Slice<'_>, dim: Dimension) -> Result<Vec<(String, u32)>> {
    let mut groups = fold_groups(slice, dim, || 0u32, |acc, _| *acc += 1)?;
    sort_desc(&mut groups);
    Ok(groups)
}

/// First `n` entries of an already ranked result; all of them if fewer.
pub fn top_n<T>(mut ranked: Vec<(String, T)>, n: usize) -> Vec<(String, T)> {
    ranked.truncate(n);
    ranked
}

/// Distinct non-null values of `dim`.
pub fn unique_count(slice: &Slice<'_>, dim: Dimension) -> Result<usize> {
    Ok(fold_groups(slice, dim, || (), |_, _| ())?.len())
}

/// Most frequent non-null value; ties go to the value seen first.
/// `None` for an empty or all-null slice.
pub fn mode_of(slice: &Slice<'_>, dim: Dimension) -> Result<Option<String>> {
    let groups = fold_groups(slice, dim, || 0usize, |acc, _| *acc += 1)?;
    let mut best: Option<(String, usize)> = None;
    for (key, count) in groups {
        if best.as_ref().map_or(true, |(_, c)| count > *c) {
            best = Some((key, count));
        }
    }
    Ok(best.map(|(key, _)| key))
}

/// Period × category table of summed amounts, gaps filled with zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot {
    /// Ascending.
    pub rows: Vec<Period>,
    /// Alphabetical.
    pub columns: Vec<String>,
    /// `cells[row][column]`
    pub cells: Vec<Vec<f64>>,
}

/// Sum amounts by (`period`, `column`). Rows missing either key are dropped.
pub fn pivot_sum(slice: &Slice<'_>, period: Granularity, column: Dimension) -> Result<Pivot> {
    slice.require(column.field())?;

    let mut sums: BTreeMap<Period, HashMap<String, f64>> = BTreeMap::new();
    let mut columns: BTreeSet<String> = BTreeSet::new();
    for record in slice.iter() {
        let (Some(p), Some(key)) = (record.period(period), column.value(record)) else {
            continue;
        };
        let key = key.into_owned();
        *sums
            .entry(p)
            .or_default()
            .entry(key.clone())
            .or_insert(0.0) += record.amount.unwrap_or(0.0);
        columns.insert(key);
    }

    let columns: Vec<String> = columns.into_iter().collect();
    let mut rows = Vec::with_capacity(sums.len());
    let mut cells = Vec::with_capacity(sums.len());
    for (p, by_col) in sums {
        rows.push(p);
        cells.push(
            columns
                .iter()
                .map(|c| by_col.get(c).copied().unwrap_or(0.0))
                .collect(),
        );
    }
    Ok(Pivot {
        rows,
        columns,
        cells,
    })
}
