use prettytable::{format, Cell, Row, Table};
use std::io::{self, Write};

use super::Presenter;
use crate::{
    config::Layout,
    report::{format_amount, ChartKind, Marker, Metric},
};

/// Plain-text renderer: box tables for metrics and tabular data, bar rows for
/// charts. All sizing comes from the [`Layout`] it was built with.
pub struct TerminalPresenter<W: Write> {
    out: W,
    layout: Layout,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, layout: Layout) -> Self {
        Self { out, layout }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn label(&self, s: &str) -> String {
        let width = self.layout.label_width.max(2);
        if s.chars().count() <= width {
            format!("{:<width$}", s, width = width)
        } else {
            let cut: String = s.chars().take(width - 1).collect();
            format!("{}…", cut)
        }
    }

    fn bar(&self, value: f64, max: f64) -> String {
        if max <= 0.0 || !value.is_finite() || value <= 0.0 {
            return String::new();
        }
        let len = ((value / max) * self.layout.bar_width as f64).round() as usize;
        "█".repeat(len.max(1))
    }

    fn print_table(&mut self, table: &Table) -> io::Result<()> {
        table.print(&mut self.out)?;
        Ok(())
    }
}

fn boxed() -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table
}

fn max_value<'a>(values: impl Iterator<Item = &'a f64>) -> f64 {
    values.copied().fold(0.0, f64::max)
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn heading(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out, "\n=== {} ===", title)
    }

    fn section(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out, "\n--- {} ---", title)
    }

    fn metrics(&mut self, metrics: &[Metric]) -> io::Result<()> {
        let mut table = boxed();
        for chunk in metrics.chunks(self.layout.metric_columns.max(1)) {
            table.add_row(Row::new(
                chunk.iter().map(|m| Cell::new(&m.label).style_spec("b")).collect(),
            ));
            table.add_row(Row::new(
                chunk
                    .iter()
                    .map(|m| Cell::new(&m.value.to_string()).style_spec("r"))
                    .collect(),
            ));
        }
        self.print_table(&table)
    }

    fn chart(
        &mut self,
        kind: ChartKind,
        x_label: &str,
        y_label: &str,
        entries: &[(String, f64)],
    ) -> io::Result<()> {
        writeln!(self.out, "{} / {}", x_label, y_label)?;
        let max = max_value(entries.iter().map(|(_, v)| v));
        let total: f64 = entries.iter().map(|(_, v)| v.max(0.0)).sum();
        for (label, value) in entries {
            let figure = match kind {
                ChartKind::Bar => format_amount(*value),
                ChartKind::Pie if total > 0.0 => format!("{:5.1}%", value.max(0.0) / total * 100.0),
                ChartKind::Pie => "  0.0%".to_string(),
            };
            let (name, bar) = (self.label(label), self.bar(*value, max));
            writeln!(self.out, "{} {:>10} {}", name, figure, bar)?;
        }
        Ok(())
    }

    fn series(
        &mut self,
        x_label: &str,
        y_label: &str,
        points: &[(String, f64)],
        markers: &[Marker],
    ) -> io::Result<()> {
        let max = max_value(points.iter().map(|(_, v)| v));
        let mut table = boxed();
        table.set_titles(Row::new(vec![
            Cell::new(x_label).style_spec("b"),
            Cell::new(y_label).style_spec("b"),
            Cell::new(""),
            Cell::new(""),
        ]));
        for (at, value) in points {
            let notes: Vec<&str> = markers
                .iter()
                .filter(|m| &m.at == at)
                .map(|m| m.label.as_str())
                .collect();
            table.add_row(Row::new(vec![
                Cell::new(at),
                Cell::new(&format_amount(*value)).style_spec("r"),
                Cell::new(&self.bar(*value, max)),
                Cell::new(&notes.join(", ")),
            ]));
        }
        self.print_table(&table)
    }

    fn table(&mut self, headers: &[String], rows: &[Vec<String>]) -> io::Result<()> {
        let mut table = boxed();
        table.set_titles(Row::new(
            headers.iter().map(|h| Cell::new(h).style_spec("b")).collect(),
        ));
        for row in rows {
            table.add_row(Row::new(row.iter().map(|c| Cell::new(c)).collect()));
        }
        self.print_table(&table)
    }

    fn text(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    fn notice(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "  ({})", message)
    }
}
