//! Header aliasing. Every spelling seen in the wild maps to one [`Field`], so
//! nothing past the loader deals with raw header names.

use csv::StringRecord;
use std::collections::BTreeMap;

use crate::table::Field;

const ALIASES: &[(Field, &[&str])] = &[
    (
        Field::Startup,
        &["startup", "startupname", "startups", "company", "companyname"],
    ),
    (
        Field::Investors,
        &["investorsname", "investors", "investorname", "investor"],
    ),
    (
        Field::Vertical,
        &["vertical", "industryvertical", "sector", "industry"],
    ),
    (Field::City, &["city", "citylocation", "location"]),
    (
        Field::Round,
        &[
            "round",
            "investmenttype",
            "investmentntype",
            "fundinground",
            "roundtype",
            "stage",
        ],
    ),
    (Field::Date, &["date", "fundingdate", "dateddmmyyyy"]),
    (
        Field::Amount,
        &["amount", "amountinusd", "amountincr", "amountcr", "fundingamount"],
    ),
];

/// Lowercase and keep only ASCII alphanumerics: `"Investors_Name"` → `"investorsname"`.
fn normalise(header: &str) -> String {
    header
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Canonical field for a header, if it is one we know.
pub fn resolve(header: &str) -> Option<Field> {
    let key = normalise(header);
    ALIASES
        .iter()
        .find(|(_, names)| names.contains(&key.as_str()))
        .map(|(field, _)| *field)
}

/// Position of each recognised field in a header row. First occurrence wins.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ColumnMap(BTreeMap<Field, usize>);

impl ColumnMap {
    pub fn from_headers(headers: &StringRecord) -> Self {
        let mut map = BTreeMap::new();
        for (idx, header) in headers.iter().enumerate() {
            if let Some(field) = resolve(header) {
                map.entry(field).or_insert(idx);
            }
        }
        ColumnMap(map)
    }

    pub fn index(&self, field: Field) -> Option<usize> {
        self.0.get(&field).copied()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    /// Required fields with no matching header.
    pub fn missing_required(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| f.is_required() && !self.0.contains_key(f))
            .collect()
    }
}
