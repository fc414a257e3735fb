// src/table/types.rs

use chrono::NaiveDate;
use serde::Serialize;
use std::{borrow::Cow, fmt};

use super::period::{Granularity, Period};

/// Placeholder stored when a startup or investor name is missing.
pub const UNDISCLOSED: &str = "undisclosed";

/// Canonical column identity, independent of the header spelling in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Startup,
    Investors,
    Vertical,
    City,
    Round,
    Date,
    Amount,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Startup,
        Field::Investors,
        Field::Vertical,
        Field::City,
        Field::Round,
        Field::Date,
        Field::Amount,
    ];

    /// Columns without which the file is rejected.
    pub fn is_required(self) -> bool {
        matches!(
            self,
            Field::Startup | Field::Investors | Field::Date | Field::Amount
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Startup => "startup",
            Field::Investors => "investors",
            Field::Vertical => "vertical",
            Field::City => "city",
            Field::Round => "round",
            Field::Date => "date",
            Field::Amount => "amount",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a group key is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Startup,
    /// The raw comma-joined investor field, not the individual names.
    Investors,
    Vertical,
    City,
    Round,
    Year,
    Month,
}

impl Dimension {
    /// The source column this dimension reads.
    pub fn field(self) -> Field {
        match self {
            Dimension::Startup => Field::Startup,
            Dimension::Investors => Field::Investors,
            Dimension::Vertical => Field::Vertical,
            Dimension::City => Field::City,
            Dimension::Round => Field::Round,
            Dimension::Year | Dimension::Month => Field::Date,
        }
    }

    /// Group key of `record`, or `None` when the underlying value is null.
    pub fn value<'r>(self, record: &'r FundingRecord) -> Option<Cow<'r, str>> {
        match self {
            Dimension::Startup => Some(Cow::Borrowed(record.startup.as_str())),
            Dimension::Investors => Some(Cow::Borrowed(record.investors_raw.as_str())),
            Dimension::Vertical => record.vertical.as_deref().map(Cow::Borrowed),
            Dimension::City => record.city.as_deref().map(Cow::Borrowed),
            Dimension::Round => record.round.as_deref().map(Cow::Borrowed),
            Dimension::Year => record.year.map(|y| Cow::Owned(y.to_string())),
            Dimension::Month => record.month_period.map(|p| Cow::Owned(p.to_string())),
        }
    }
}

/// One funding event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundingRecord {
    pub startup: String,
    /// Investor field exactly as it appears in the file (or the placeholder).
    pub investors_raw: String,
    /// `investors_raw` split on `,`, trimmed, empties dropped. Never empty.
    pub investors: Vec<String>,
    pub vertical: Option<String>,
    pub city: Option<String>,
    pub round: Option<String>,
    pub date: Option<NaiveDate>,
    /// Crores. `None` stands for a value that was missing or not a number.
    pub amount: Option<f64>,
    pub month_period: Option<Period>,
    pub year: Option<i32>,
}

impl FundingRecord {
    /// Builds a record, substituting placeholders for missing names and
    /// deriving the period keys from `date`.
    pub fn new(
        startup: Option<String>,
        investors: Option<String>,
        vertical: Option<String>,
        city: Option<String>,
        round: Option<String>,
        date: Option<NaiveDate>,
        amount: Option<f64>,
    ) -> Self {
        let startup = startup.unwrap_or_else(|| UNDISCLOSED.to_string());
        let investors_raw = investors.unwrap_or_else(|| UNDISCLOSED.to_string());
        let investors = split_investors(&investors_raw);
        let (month_period, year) = derive_periods(date);
        Self {
            startup,
            investors_raw,
            investors,
            vertical,
            city,
            round,
            date,
            amount: amount.filter(|a| a.is_finite()),
            month_period,
            year,
        }
    }

    pub fn period(&self, granularity: Granularity) -> Option<Period> {
        match granularity {
            Granularity::Month => self.month_period,
            Granularity::Year => self.year.map(Period::Year),
        }
    }
}

/// Month and year keys for a date; both `None` when the date is unknown.
pub fn derive_periods(date: Option<NaiveDate>) -> (Option<Period>, Option<i32>) {
    match date {
        Some(d) => (
            Some(Period::of(d, Granularity::Month)),
            Some(Period::of(d, Granularity::Year).year()),
        ),
        None => (None, None),
    }
}

/// Per-element investor names of a raw investor field.
pub fn split_investors(raw: &str) -> Vec<String> {
    let names: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if names.is_empty() {
        vec![UNDISCLOSED.to_string()]
    } else {
        names
    }
}

/// Data-quality counters collected while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub rows: usize,
    pub unparsed_dates: usize,
    pub invalid_amounts: usize,
    pub defaulted_startups: usize,
    pub defaulted_investors: usize,
}
