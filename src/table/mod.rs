pub mod period;
pub mod types;

pub use period::{Granularity, Period};
pub use types::{Dimension, Field, FundingRecord, LoadSummary, UNDISCLOSED};

use std::{collections::BTreeSet, ptr};

use crate::error::{FundingError, Result};

/// The full record set. Built once by the loader and never mutated.
#[derive(Debug, Clone)]
pub struct Table {
    records: Vec<FundingRecord>,
    present: BTreeSet<Field>,
    summary: LoadSummary,
}

impl Table {
    pub fn new(
        records: Vec<FundingRecord>,
        present: impl IntoIterator<Item = Field>,
        summary: LoadSummary,
    ) -> Self {
        Self {
            records,
            present: present.into_iter().collect(),
            summary,
        }
    }

    /// A table where every column is considered present.
    pub fn from_records(records: Vec<FundingRecord>) -> Self {
        let summary = LoadSummary {
            rows: records.len(),
            ..LoadSummary::default()
        };
        Self::new(records, Field::ALL, summary)
    }

    pub fn records(&self) -> &[FundingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has(&self, field: Field) -> bool {
        self.present.contains(&field)
    }

    pub fn summary(&self) -> &LoadSummary {
        &self.summary
    }

    /// Every row, in file order.
    pub fn all(&self) -> Slice<'_> {
        Slice {
            table: self,
            rows: (0..self.records.len()).collect(),
        }
    }

    /// Rows matching `keep`, in file order.
    pub fn select(&self, keep: impl Fn(&FundingRecord) -> bool) -> Slice<'_> {
        self.all().filter(keep)
    }
}

/// A read-only view over some rows of a [`Table`], in file order.
#[derive(Debug, Clone)]
pub struct Slice<'a> {
    table: &'a Table,
    rows: Vec<usize>,
}

impl<'a> Slice<'a> {
    pub fn table(&self) -> &'a Table {
        self.table
    }

    /// The whole table this slice was cut from.
    pub fn whole(&self) -> Slice<'a> {
        self.table.all()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a FundingRecord> + '_ {
        let table: &'a Table = self.table;
        self.rows.iter().map(move |&i| &table.records[i])
    }

    pub fn filter(&self, keep: impl Fn(&FundingRecord) -> bool) -> Slice<'a> {
        let table: &'a Table = self.table;
        Slice {
            table,
            rows: self
                .rows
                .iter()
                .copied()
                .filter(|&i| keep(&table.records[i]))
                .collect(),
        }
    }

    /// Non-null amounts, in row order.
    pub fn amounts(&self) -> impl Iterator<Item = f64> + '_ {
        self.iter().filter_map(|r| r.amount)
    }

    /// Fails with [`FundingError::MissingColumn`] if the file had no such column.
    pub fn require(&self, field: Field) -> Result<()> {
        if self.table.has(field) {
            Ok(())
        } else {
            Err(FundingError::MissingColumn(field))
        }
    }
}

impl PartialEq for Slice<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.table, other.table) && self.rows == other.rows
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::NaiveDate;

    /// `(startup, investors, vertical, city, round, "YYYY-MM-DD", amount)`
    pub type Row<'a> = (
        &'a str,
        &'a str,
        Option<&'a str>,
        Option<&'a str>,
        Option<&'a str>,
        Option<&'a str>,
        Option<f64>,
    );

    pub fn record(row: Row<'_>) -> FundingRecord {
        let (startup, investors, vertical, city, round, date, amount) = row;
        FundingRecord::new(
            Some(startup.to_string()),
            Some(investors.to_string()),
            vertical.map(str::to_string),
            city.map(str::to_string),
            round.map(str::to_string),
            date.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").expect("fixture date")),
            amount,
        )
    }

    pub fn table(rows: &[Row<'_>]) -> Table {
        Table::from_records(rows.iter().copied().map(record).collect())
    }

    /// Three-row table used across the aggregation tests.
    pub fn abc() -> Table {
        table(&[
            ("A", "Accel, Sequoia", Some("FinTech"), Some("Bengaluru"), Some("Seed"), Some("2020-01-10"), Some(10.0)),
            ("A", "Sequoia", Some("FinTech"), Some("Mumbai"), Some("Series A"), Some("2020-02-03"), Some(5.0)),
            ("B", "Accel Partners", Some("EdTech"), Some("Bengaluru"), Some("Seed"), Some("2020-01-21"), Some(20.0)),
        ])
    }
}
