//! The three views. Each one is a list of panels; a panel that fails carries
//! its own message and never stops its siblings from being built.

pub mod investor;
pub mod overall;
pub mod startup;

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

use crate::{
    aggregate::Measure,
    config::ReportConfig,
    error::{FundingError, Result},
    table::Table,
};

pub use investor::investor_report;
pub use overall::{outliers_panel, overall_report};
pub use startup::startup_report;

/// Which view to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Overall { measure: Measure },
    Startup(String),
    Investor(String),
}

pub fn build(table: &Table, view: &View, cfg: &ReportConfig) -> Report {
    match view {
        View::Overall { measure } => overall_report(table, cfg, *measure),
        View::Startup(name) => startup_report(table, name, cfg),
        View::Investor(name) => investor_report(table, name, cfg),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub title: String,
    pub panels: Vec<Panel>,
}

impl Report {
    pub fn panel(&self, title: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.title == title)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: String,
    pub content: PanelContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "body", rename_all = "snake_case")]
pub enum PanelContent {
    Ready(Body),
    /// Nothing to show for this selection.
    NoData,
    /// The panel could not be computed; the message is shown in its place.
    Failed(String),
}

impl Panel {
    /// Run `compute`, turning `InsufficientData` into [`PanelContent::NoData`]
    /// and any other error into [`PanelContent::Failed`].
    pub fn build(title: impl Into<String>, compute: impl FnOnce() -> Result<Body>) -> Self {
        let title = title.into();
        let content = match compute() {
            Ok(body) => PanelContent::Ready(body),
            Err(FundingError::InsufficientData(what)) => {
                debug!(panel = %title, %what, "no data");
                PanelContent::NoData
            }
            Err(e) => {
                warn!(panel = %title, error = %e, "panel failed");
                PanelContent::Failed(e.to_string())
            }
        };
        Self { title, content }
    }

    pub fn body(&self) -> Option<&Body> {
        match &self.content {
            PanelContent::Ready(body) => Some(body),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Body {
    Metrics {
        metrics: Vec<Metric>,
    },
    Chart {
        chart: ChartKind,
        x_label: String,
        y_label: String,
        entries: Vec<(String, f64)>,
    },
    Series {
        x_label: String,
        y_label: String,
        points: Vec<(String, f64)>,
        markers: Vec<Marker>,
    },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Text {
        lines: Vec<String>,
    },
}

impl Body {
    /// A chart; `InsufficientData` if there is nothing to plot.
    pub fn chart(
        chart: ChartKind,
        x_label: &str,
        y_label: &str,
        entries: Vec<(String, f64)>,
    ) -> Result<Self> {
        if entries.is_empty() {
            return Err(FundingError::insufficient(format!("{} chart", y_label)));
        }
        Ok(Body::Chart {
            chart,
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            entries,
        })
    }

    /// A line series; `InsufficientData` if it has no points.
    pub fn series<K: fmt::Display>(
        x_label: &str,
        y_label: &str,
        points: &[(K, f64)],
        markers: Vec<Marker>,
    ) -> Result<Self> {
        if points.is_empty() {
            return Err(FundingError::insufficient(format!("{} series", y_label)));
        }
        Ok(Body::Series {
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            points: points.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            markers,
        })
    }

    /// A table; `InsufficientData` if it has no rows.
    pub fn table(headers: &[&str], rows: Vec<Vec<String>>) -> Result<Self> {
        if rows.is_empty() {
            return Err(FundingError::insufficient("empty table"));
        }
        Ok(Body::Table {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        })
    }
}

/// A labelled scalar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: MetricValue,
}

impl Metric {
    pub fn new(label: &str, value: MetricValue) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Amount(f64),
    Count(usize),
    Date(NaiveDate),
    Missing,
}

impl From<Option<f64>> for MetricValue {
    fn from(v: Option<f64>) -> Self {
        v.map_or(MetricValue::Missing, MetricValue::Amount)
    }
}

impl From<Option<NaiveDate>> for MetricValue {
    fn from(v: Option<NaiveDate>) -> Self {
        v.map_or(MetricValue::Missing, MetricValue::Date)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Amount(v) => f.write_str(&format_amount(*v)),
            MetricValue::Count(n) => write!(f, "{}", n),
            MetricValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            MetricValue::Missing => f.write_str("N/A"),
        }
    }
}

/// An annotated point on a series, e.g. the peak year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub label: String,
    pub at: String,
    pub value: f64,
}

/// Amounts with at most three decimals and no trailing zeros.
pub fn format_amount(v: f64) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

pub(crate) fn opt_cell(v: Option<&str>) -> String {
    v.unwrap_or("").to_string()
}

pub(crate) fn opt_amount(v: Option<f64>) -> String {
    v.map(format_amount).unwrap_or_else(|| "NaN".to_string())
}
