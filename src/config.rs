//! Runtime configuration: an optional YAML file, with every key defaulted.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::error::{FundingError, Result};

/// File picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "fundscope.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Location of the funding CSV.
    pub data_path: PathBuf,
    /// chrono format strings, tried in order for each date cell.
    pub date_formats: Vec<String>,
    pub report: ReportConfig,
    pub layout: Layout,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("app/ST1.csv"),
            date_formats: [
                "%Y-%m-%d",
                "%d/%m/%Y",
                "%d-%m-%Y",
                "%Y/%m/%d",
                "%d.%m.%Y",
                "%Y-%m-%d %H:%M:%S",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            report: ReportConfig::default(),
            layout: Layout::default(),
        }
    }
}

/// Sizes of the ranked panels and thresholds used by the views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub top_startups: usize,
    pub top_sectors: usize,
    pub top_investor_startups: usize,
    pub top_breakdown: usize,
    pub top_startup_investors: usize,
    pub recent_investments: usize,
    pub outlier_quantile: f64,
    /// Decimal places kept by the headline total.
    pub amount_precision: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_startups: 10,
            top_sectors: 10,
            top_investor_startups: 5,
            top_breakdown: 10,
            top_startup_investors: 10,
            recent_investments: 5,
            outlier_quantile: 0.99,
            amount_precision: 3,
        }
    }
}

/// Per-render layout handed to a presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Metrics shown side by side in one row.
    pub metric_columns: usize,
    /// Width of the longest bar in a text chart.
    pub bar_width: usize,
    /// Labels longer than this are truncated.
    pub label_width: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            metric_columns: 4,
            bar_width: 40,
            label_width: 28,
        }
    }
}

impl AppConfig {
    /// Parse a YAML document. Missing keys take their defaults.
    pub fn from_yaml(text: &str, origin: &Path) -> Result<Self> {
        let cfg: AppConfig = serde_yaml::from_str(text).map_err(|e| FundingError::Config {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })?;
        cfg.validate(origin)?;
        Ok(cfg)
    }

    /// Load `explicit` if given (it must exist), else [`DEFAULT_CONFIG_FILE`]
    /// if present, else the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let p = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !p.is_file() {
                    debug!("no {} found; using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default());
                }
                p
            }
        };
        let text = fs::read_to_string(&path).map_err(|e| FundingError::Config {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), "loaded config");
        Self::from_yaml(&text, &path)
    }

    fn validate(&self, origin: &Path) -> Result<()> {
        let invalid = |reason: &str| FundingError::Config {
            path: origin.to_path_buf(),
            reason: reason.to_string(),
        };
        if self.date_formats.is_empty() {
            return Err(invalid("date_formats must not be empty"));
        }
        if !(0.0..=1.0).contains(&self.report.outlier_quantile) {
            return Err(invalid("report.outlier_quantile must be within [0, 1]"));
        }
        if self.layout.metric_columns == 0 {
            return Err(invalid("layout.metric_columns must be at least 1"));
        }
        Ok(())
    }
}
