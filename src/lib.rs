//! Descriptive analytics over a CSV of startup funding rounds: a loader, a
//! filter resolver, an aggregation engine, and three report views (market,
//! startup, investor) rendered to the terminal or JSON.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod filter;
pub mod load;
pub mod logging;
pub mod render;
pub mod report;
pub mod table;

pub use error::{FundingError, Result};
