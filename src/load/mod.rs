// src/load/mod.rs
pub mod columns;
pub mod date_parser;
pub mod utils;

use csv::{ReaderBuilder, StringRecord, Trim};
use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::Path,
};
use tracing::{debug, info, warn};

use crate::{
    error::{FundingError, Result},
    table::{Field, FundingRecord, LoadSummary, Table},
};
use columns::ColumnMap;
use date_parser::parse_date;
use utils::{non_empty, parse_amount};

/// Read the funding CSV at `path` into an immutable [`Table`].
///
/// - Missing file → [`FundingError::NotFound`].
/// - Unreadable or non-tabular content, or a required column missing →
///   [`FundingError::Parse`].
/// - Bad dates and amounts never fail the load; they become nulls and are
///   counted in the table's [`LoadSummary`].
#[tracing::instrument(level = "info", skip(path, date_formats), fields(path = %path.as_ref().display()))]
pub fn load_table<P: AsRef<Path>, S: AsRef<str>>(path: P, date_formats: &[S]) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => FundingError::NotFound {
            path: path.to_path_buf(),
        },
        _ => FundingError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })?;
    read_table(BufReader::new(file), path, date_formats)
}

/// Same as [`load_table`] over any reader; `origin` only labels errors.
pub fn read_table<R: Read, S: AsRef<str>>(
    reader: R,
    origin: &Path,
    date_formats: &[S],
) -> Result<Table> {
    let parse_err = |reason: String| FundingError::Parse {
        path: origin.to_path_buf(),
        reason,
    };

    // Short rows are padded with nulls; only overlong rows are rejected below.
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| parse_err(format!("reading header row: {}", e)))?
        .clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(parse_err("file has no header row".into()));
    }

    let columns = ColumnMap::from_headers(&headers);
    let missing = columns.missing_required();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|f| f.name()).collect();
        return Err(parse_err(format!(
            "missing required column(s): {}",
            names.join(", ")
        )));
    }
    for field in [Field::Vertical, Field::City, Field::Round] {
        if columns.index(field).is_none() {
            warn!(column = %field, "optional column absent; its panels will be unavailable");
        }
    }
    debug!(?headers, "resolved columns");

    let mut summary = LoadSummary::default();
    let mut records = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let row = result.map_err(|e| parse_err(format!("record {}: {}", idx + 1, e)))?;
        if row.len() > headers.len() {
            return Err(parse_err(format!(
                "record {}: found {} fields, but the header has {}",
                idx + 1,
                row.len(),
                headers.len()
            )));
        }
        let record = build_record(&row, &columns, date_formats);

        if row_cell(&row, &columns, Field::Startup).is_none() {
            summary.defaulted_startups += 1;
        }
        if row_cell(&row, &columns, Field::Investors).is_none() {
            summary.defaulted_investors += 1;
        }
        if record.date.is_none() {
            summary.unparsed_dates += 1;
        }
        if record.amount.is_none() {
            summary.invalid_amounts += 1;
        }
        records.push(record);
    }
    summary.rows = records.len();

    info!(
        rows = summary.rows,
        unparsed_dates = summary.unparsed_dates,
        invalid_amounts = summary.invalid_amounts,
        defaulted_startups = summary.defaulted_startups,
        defaulted_investors = summary.defaulted_investors,
        "loaded funding table"
    );
    Ok(Table::new(records, columns.fields(), summary))
}

fn row_cell(row: &StringRecord, columns: &ColumnMap, field: Field) -> Option<String> {
    columns
        .index(field)
        .and_then(|i| row.get(i))
        .and_then(non_empty)
}

fn build_record<S: AsRef<str>>(
    row: &StringRecord,
    columns: &ColumnMap,
    date_formats: &[S],
) -> FundingRecord {
    let cell = |field| row_cell(row, columns, field);
    FundingRecord::new(
        cell(Field::Startup),
        cell(Field::Investors),
        cell(Field::Vertical),
        cell(Field::City),
        cell(Field::Round),
        cell(Field::Date).and_then(|d| parse_date(&d, date_formats)),
        cell(Field::Amount).and_then(|a| parse_amount(&a)),
    )
}
