use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use fundscope::{
    config::AppConfig,
    load, logging,
    table::{Field, FundingRecord, Table},
};

use prettytable::{format, Cell, Row, Table as PrettyTable};

#[derive(Parser, Debug)]
#[command(about = "Load summary and per-field coverage of a funding CSV")]
struct Args {
    /// Funding CSV, overriding `data_path` from the config
    data: Option<PathBuf>,

    /// YAML config file (defaults to ./fundscope.yaml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug)]
struct FieldCoverage {
    field: Field,
    present: bool,
    non_null: usize,
    distinct: usize,
}

fn is_set(field: Field, r: &FundingRecord) -> bool {
    match field {
        Field::Startup | Field::Investors => true,
        Field::Vertical => r.vertical.is_some(),
        Field::City => r.city.is_some(),
        Field::Round => r.round.is_some(),
        Field::Date => r.date.is_some(),
        Field::Amount => r.amount.is_some(),
    }
}

fn distinct_values(field: Field, table: &Table) -> usize {
    use std::collections::HashSet;
    let mut seen: HashSet<String> = HashSet::new();
    for r in table.records() {
        let v = match field {
            Field::Startup => Some(r.startup.clone()),
            Field::Investors => Some(r.investors_raw.clone()),
            Field::Vertical => r.vertical.clone(),
            Field::City => r.city.clone(),
            Field::Round => r.round.clone(),
            Field::Date => r.date.map(|d| d.to_string()),
            Field::Amount => r.amount.map(|a| a.to_bits().to_string()),
        };
        if let Some(v) = v {
            seen.insert(v);
        }
    }
    seen.len()
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut cfg = AppConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(path) = args.data {
        cfg.data_path = path;
    }
    tracing::info!(path = %cfg.data_path.display(), "Starting dataset statistics.");

    let table = load::load_table(&cfg.data_path, &cfg.date_formats)
        .with_context(|| format!("loading dataset {}", cfg.data_path.display()))?;

    if table.is_empty() {
        println!("The dataset has a header but no rows.");
        return Ok(());
    }

    let coverage: Vec<FieldCoverage> = Field::ALL
        .into_iter()
        .map(|field| FieldCoverage {
            field,
            present: table.has(field),
            non_null: table.records().iter().filter(|r| is_set(field, r)).count(),
            distinct: distinct_values(field, &table),
        })
        .collect();

    let s = table.summary();
    let mut summary = PrettyTable::new();
    summary.set_format(*format::consts::FORMAT_BOX_CHARS);
    for (label, value) in [
        ("Rows", s.rows),
        ("Unparsed dates", s.unparsed_dates),
        ("Invalid amounts", s.invalid_amounts),
        ("Defaulted startups", s.defaulted_startups),
        ("Defaulted investors", s.defaulted_investors),
    ] {
        summary.add_row(Row::new(vec![
            Cell::new(label).style_spec("bFg"),
            Cell::new(&value.to_string()).style_spec("r"),
        ]));
    }
    println!("\n--- Load Summary ---");
    summary.printstd();

    let mut table_out = PrettyTable::new();
    table_out.set_format(*format::consts::FORMAT_BOX_CHARS);
    table_out.add_row(Row::new(vec![
        Cell::new("Field").style_spec("bFg"),
        Cell::new("In File").style_spec("bFg"),
        Cell::new("Non-null").style_spec("bFg"),
        Cell::new("Coverage %").style_spec("bFg"),
        Cell::new("Distinct").style_spec("bFg"),
    ]));
    for c in coverage {
        let pct = c.non_null as f64 / table.len() as f64 * 100.0;
        table_out.add_row(Row::new(vec![
            Cell::new(c.field.name()),
            Cell::new(if c.present { "yes" } else { "no" }),
            Cell::new(&c.non_null.to_string()).style_spec("r"),
            Cell::new(&format!("{:.1}", pct)).style_spec("r"),
            Cell::new(&c.distinct.to_string()).style_spec("r"),
        ]));
    }
    println!("\n--- Field Coverage ---");
    table_out.printstd();

    tracing::info!("Dataset statistics finished.");
    Ok(())
}
