use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fundscope::{
    aggregate::Measure,
    config::AppConfig,
    filter, load, logging,
    render::{self, json::write_json, TerminalPresenter},
    report::{self, Report, View},
};
use std::{
    io::{self, Write},
    path::PathBuf,
};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "fundscope", version, about = "Startup funding analysis")]
struct Cli {
    /// YAML config file (defaults to ./fundscope.yaml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Funding CSV, overriding `data_path` from the config
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Terminal, global = true)]
    format: Format,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Terminal,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MeasureArg {
    Total,
    Count,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Entity {
    Startups,
    Investors,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Market-wide analysis
    Overall {
        #[arg(long, value_enum, default_value_t = MeasureArg::Total)]
        measure: MeasureArg,
    },
    /// Analysis of one startup
    Startup { name: String },
    /// Analysis of one investor
    Investor { name: String },
    /// Names that can be passed to `startup` / `investor`
    List {
        #[arg(value_enum)]
        what: Entity,
    },
    /// Funding rounds in the top percentile by amount
    Outliers,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ─── 1) init logging ─────────────────────────────────────────────
    logging::init(cli.verbose);
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let mut cfg = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(path) = cli.data {
        cfg.data_path = path;
    }

    // ─── 3) load the dataset once; missing or malformed input halts ──
    let table = load::load_table(&cfg.data_path, &cfg.date_formats)
        .with_context(|| format!("loading dataset {}", cfg.data_path.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    // ─── 4) resolve the view ─────────────────────────────────────────
    let view = match cli.command {
        Command::Overall { measure } => View::Overall {
            measure: match measure {
                MeasureArg::Total => Measure::Sum,
                MeasureArg::Count => Measure::Count,
            },
        },
        Command::Startup { name } => {
            if !table.records().iter().any(|r| r.startup == name) {
                warn!(startup = %name, "no records for this startup");
            }
            View::Startup(name)
        }
        Command::Investor { name } => View::Investor(name),
        Command::List { what } => {
            let names = match what {
                Entity::Startups => filter::startup_names(&table),
                Entity::Investors => filter::investor_names(&table),
            };
            match cli.format {
                Format::Terminal => {
                    for name in &names {
                        writeln!(out, "{}", name)?;
                    }
                }
                Format::Json => {
                    serde_json::to_writer_pretty(&mut out, &names)?;
                    writeln!(out)?;
                }
            }
            return Ok(());
        }
        Command::Outliers => {
            let report = Report {
                title: "Outlier Detection".into(),
                panels: vec![report::outliers_panel(&table, &cfg.report)],
            };
            return emit(&report, cli.format, &cfg, &mut out);
        }
    };

    // ─── 5) aggregate + render ───────────────────────────────────────
    let report = report::build(&table, &view, &cfg.report);
    emit(&report, cli.format, &cfg, &mut out)?;
    info!(panels = report.panels.len(), "done");
    Ok(())
}

fn emit<W: Write>(report: &Report, format: Format, cfg: &AppConfig, out: &mut W) -> Result<()> {
    match format {
        Format::Terminal => {
            let mut presenter = TerminalPresenter::new(&mut *out, cfg.layout);
            render::present(report, &mut presenter).context("writing report")?;
        }
        Format::Json => {
            write_json(report, &mut *out).context("writing report")?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}
