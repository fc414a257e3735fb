use super::{format_amount, Body, ChartKind, Metric, MetricValue, Panel, Report};
use crate::{
    aggregate::{
        comparative_insight, group_count, group_sum, startup_summary, time_series, top_n, Measure,
    },
    config::ReportConfig,
    filter::{resolve, Selection},
    table::{Dimension, Granularity, Table},
};

/// Single-startup view.
pub fn startup_report(table: &Table, name: &str, cfg: &ReportConfig) -> Report {
    let slice = resolve(table, &Selection::ByStartup(name.to_string()));

    let panels = vec![
        Panel::build("Startup Summary", || {
            let s = startup_summary(&slice)?;
            Ok(Body::Metrics {
                metrics: vec![
                    Metric::new("Total Funding Amount", MetricValue::Amount(s.total_funding)),
                    Metric::new("Number of Funding Rounds", MetricValue::Count(s.rounds)),
                    Metric::new("First Funding Date", s.first_funding.into()),
                    Metric::new("Latest Funding Date", s.latest_funding.into()),
                    Metric::new("Unique Investors", MetricValue::Count(s.unique_investors)),
                ],
            })
        }),
        Panel::build("Funding Rounds Breakdown", || {
            let counts: Vec<(String, f64)> = group_count(&slice, Dimension::Round)?
                .into_iter()
                .map(|(round, n)| (round, f64::from(n)))
                .collect();
            Body::chart(ChartKind::Pie, "Round", "Funding Rounds", counts)
        }),
        Panel::build("Top Investors in Startup", || {
            let top = top_n(
                group_sum(&slice, Dimension::Investors)?,
                cfg.top_startup_investors,
            );
            Body::chart(ChartKind::Bar, "Investor", "Total Investment Amount", top)
        }),
        Panel::build("Investment Frequency Over Time", || {
            let freq = time_series(&slice, Granularity::Month, Measure::Rows);
            Body::series("Month-Year", "Number of Funding Rounds", &freq, Vec::new())
        }),
        Panel::build("Comparative Insights", || {
            let c = comparative_insight(&slice)?;
            let label = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".into());
            let avg = |v: Option<f64>| v.map(format_amount).unwrap_or_else(|| "N/A".into());
            Ok(Body::Text {
                lines: vec![
                    format!("Comparative Insights for {}:", name),
                    format!("- Total Raised Capital: {}", format_amount(c.total_raised)),
                    format!(
                        "- Average Funding in Vertical ({}): {}",
                        label(&c.vertical),
                        avg(c.vertical_average)
                    ),
                    format!(
                        "- Average Funding in City ({}): {}",
                        label(&c.city),
                        avg(c.city_average)
                    ),
                ],
            })
        }),
    ];

    Report {
        title: format!("Startup Analysis: {}", name),
        panels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{report::PanelContent, table::fixtures};

    #[test]
    fn startup_panels() {
        let t = fixtures::abc();
        let report = startup_report(&t, "A", &ReportConfig::default());
        assert_eq!(report.title, "Startup Analysis: A");

        match report.panel("Startup Summary").and_then(Panel::body) {
            Some(Body::Metrics { metrics }) => {
                assert_eq!(metrics[0].value, MetricValue::Amount(15.0));
                assert_eq!(metrics[1].value, MetricValue::Count(2));
                assert_eq!(metrics[2].value.to_string(), "2020-01-10");
                assert_eq!(metrics[4].value, MetricValue::Count(2));
            }
            other => panic!("unexpected {:?}", other),
        }

        match report.panel("Funding Rounds Breakdown").and_then(Panel::body) {
            Some(Body::Chart { entries, chart, .. }) => {
                assert_eq!(*chart, ChartKind::Pie);
                assert_eq!(entries.len(), 2);
            }
            other => panic!("unexpected {:?}", other),
        }

        match report.panel("Comparative Insights").and_then(Panel::body) {
            Some(Body::Text { lines }) => {
                assert_eq!(lines[1], "- Total Raised Capital: 15");
                assert_eq!(lines[2], "- Average Funding in Vertical (FinTech): 7.5");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn frequency_counts_rounds_without_amount() {
        let t = fixtures::table(&[
            ("Zeta", "i", None, None, Some("Seed"), Some("2021-03-02"), Some(2.0)),
            ("Zeta", "j", None, None, Some("Seed"), Some("2021-03-15"), None),
        ]);
        let report = startup_report(&t, "Zeta", &ReportConfig::default());
        match report
            .panel("Investment Frequency Over Time")
            .and_then(Panel::body)
        {
            Some(Body::Series { points, .. }) => {
                assert_eq!(points, &vec![("2021-03".to_string(), 2.0)])
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unknown_startup_renders_without_failing() {
        let t = fixtures::abc();
        let report = startup_report(&t, "Nope", &ReportConfig::default());
        assert!(report
            .panels
            .iter()
            .all(|p| !matches!(p.content, PanelContent::Failed(_))));
        assert_eq!(
            report.panel("Comparative Insights").unwrap().content,
            PanelContent::NoData
        );
        match report.panel("Startup Summary").and_then(Panel::body) {
            Some(Body::Metrics { metrics }) => {
                assert_eq!(metrics[2].value, MetricValue::Missing)
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
