//! Presentation contract. The core hands plain data to a [`Presenter`] and
//! never depends on how it is drawn.

pub mod json;
pub mod terminal;

use std::io;

use crate::report::{Body, ChartKind, Marker, Metric, PanelContent, Report};

pub use terminal::TerminalPresenter;

/// Message shown in place of a panel with nothing to draw.
pub const NO_DATA: &str = "no data available";

pub trait Presenter {
    fn heading(&mut self, title: &str) -> io::Result<()>;
    fn section(&mut self, title: &str) -> io::Result<()>;
    /// Labelled scalars.
    fn metrics(&mut self, metrics: &[Metric]) -> io::Result<()>;
    /// Ranked bar or pie chart from group → value.
    fn chart(
        &mut self,
        kind: ChartKind,
        x_label: &str,
        y_label: &str,
        entries: &[(String, f64)],
    ) -> io::Result<()>;
    /// Line chart over ordered points.
    fn series(
        &mut self,
        x_label: &str,
        y_label: &str,
        points: &[(String, f64)],
        markers: &[Marker],
    ) -> io::Result<()>;
    fn table(&mut self, headers: &[String], rows: &[Vec<String>]) -> io::Result<()>;
    fn text(&mut self, lines: &[String]) -> io::Result<()>;
    /// Inline notice standing in for a panel.
    fn notice(&mut self, message: &str) -> io::Result<()>;
}

/// Drive `presenter` through every panel of `report`.
pub fn present<P: Presenter + ?Sized>(report: &Report, presenter: &mut P) -> io::Result<()> {
    presenter.heading(&report.title)?;
    for panel in &report.panels {
        presenter.section(&panel.title)?;
        match &panel.content {
            PanelContent::NoData => presenter.notice(NO_DATA)?,
            PanelContent::Failed(msg) => presenter.notice(&format!("An error occurred: {}", msg))?,
            PanelContent::Ready(body) => match body {
                Body::Metrics { metrics } => presenter.metrics(metrics)?,
                Body::Chart {
                    chart,
                    x_label,
                    y_label,
                    entries,
                } => presenter.chart(*chart, x_label, y_label, entries)?,
                Body::Series {
                    x_label,
                    y_label,
                    points,
                    markers,
                } => presenter.series(x_label, y_label, points, markers)?,
                Body::Table { headers, rows } => presenter.table(headers, rows)?,
                Body::Text { lines } => presenter.text(lines)?,
            },
        }
    }
    Ok(())
}
