use super::{opt_amount, opt_cell, Body, ChartKind, Marker, Metric, MetricValue, Panel, Report};
use crate::{
    aggregate::{
        average_per_startup, group_sum, outliers, peak_and_trough, pivot_sum, round_to,
        time_series, top_n, total_amount, unique_count, Measure,
    },
    config::ReportConfig,
    filter::{resolve, Selection},
    report::format_amount,
    table::{Dimension, Granularity, Table},
};

/// Market-wide view over every record.
pub fn overall_report(table: &Table, cfg: &ReportConfig, measure: Measure) -> Report {
    let all = resolve(table, &Selection::All);

    let mut panels = vec![Panel::build("Overall Analysis", || {
        let per_startup = group_sum(&all, Dimension::Startup)?;
        let max_funding = per_startup.iter().map(|(_, v)| *v).reduce(f64::max);
        Ok(Body::Metrics {
            metrics: vec![
                Metric::new(
                    "Total in CR",
                    MetricValue::Amount(total_amount(&all, cfg.amount_precision)),
                ),
                Metric::new("Maximum funding", max_funding.into()),
                Metric::new("Average Funding", average_per_startup(&all)?.into()),
                Metric::new(
                    "Total funded startup",
                    MetricValue::Count(unique_count(&all, Dimension::Startup)?),
                ),
            ],
        })
    })];

    let (title, y_label) = match measure {
        Measure::Sum => ("Month-on-Month Investment Trend", "Total Investment Amount"),
        Measure::Count | Measure::Rows => (
            "Month-on-Month Investment Count Trend",
            "Number of Investments",
        ),
    };
    panels.push(Panel::build(title, || {
        let monthly = time_series(&all, Granularity::Month, measure);
        Body::series("Month-Year", y_label, &monthly, Vec::new())
    }));

    panels.push(Panel::build(
        format!("Top {} Startups by Total Funding", cfg.top_startups),
        || {
            let top = top_n(group_sum(&all, Dimension::Startup)?, cfg.top_startups);
            Body::chart(ChartKind::Bar, "Startup", "Total Funding Amount", top)
        },
    ));

    panels.push(Panel::build("Top Sectors by Total Investment", || {
        let top = top_n(group_sum(&all, Dimension::Vertical)?, cfg.top_sectors);
        Body::chart(ChartKind::Pie, "Vertical", "Total Investment", top)
    }));

    panels.push(Panel::build("Funding Round Trends Over Time", || {
        let pivot = pivot_sum(&all, Granularity::Year, Dimension::Round)?;
        let headers: Vec<&str> = std::iter::once("Year")
            .chain(pivot.columns.iter().map(String::as_str))
            .collect();
        let rows: Vec<Vec<String>> = pivot
            .rows
            .iter()
            .zip(&pivot.cells)
            .map(|(year, cells)| {
                std::iter::once(year.to_string())
                    .chain(cells.iter().map(|v| format_amount(*v)))
                    .collect::<Vec<String>>()
            })
            .collect();
        Body::table(&headers, rows)
    }));

    panels.push(Panel::build(
        "Yearly Funding Amount with Peaks and Drops",
        || {
            let yearly = time_series(&all, Granularity::Year, Measure::Sum);
            let pt = peak_and_trough(&yearly)?;
            let markers = vec![
                Marker {
                    label: "Peak".into(),
                    at: pt.peak.0.to_string(),
                    value: pt.peak.1,
                },
                Marker {
                    label: "Drop".into(),
                    at: pt.trough.0.to_string(),
                    value: pt.trough.1,
                },
            ];
            Body::series("Year", "Total Funding Amount", &yearly, markers)
        },
    ));

    panels.push(outliers_panel(table, cfg));

    Report {
        title: "Overall Analysis".into(),
        panels,
    }
}

/// Rounds at or above the configured amount quantile, over the whole table.
pub fn outliers_panel(table: &Table, cfg: &ReportConfig) -> Panel {
    let share = round_to((1.0 - cfg.outlier_quantile) * 100.0, 2);
    Panel::build(
        format!("Outlier Detection: Top {}% Funding Rounds", share),
        || {
            let (_, rows) = outliers(&table.all(), cfg.outlier_quantile)?;
            let rows: Vec<Vec<String>> = rows
                .into_iter()
                .map(|r| {
                    vec![
                        r.startup.clone(),
                        opt_amount(r.amount),
                        opt_cell(r.round.as_deref()),
                        r.investors_raw.clone(),
                    ]
                })
                .collect();
            Body::table(&["startup", "amount", "round", "Investors Name"], rows)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        report::PanelContent,
        table::{fixtures, Field, FundingRecord, LoadSummary},
    };

    #[test]
    fn overall_scenario() {
        let t = fixtures::abc();
        let report = overall_report(&t, &ReportConfig::default(), Measure::Sum);
        assert_eq!(report.panels.len(), 7);

        match report.panel("Overall Analysis").and_then(Panel::body) {
            Some(Body::Metrics { metrics }) => {
                assert_eq!(metrics[0].value, MetricValue::Amount(35.0));
                assert_eq!(metrics[1].value, MetricValue::Amount(20.0));
                assert_eq!(metrics[2].value, MetricValue::Amount(17.5));
                assert_eq!(metrics[3].value, MetricValue::Count(2));
            }
            other => panic!("unexpected {:?}", other),
        }

        match report
            .panel("Month-on-Month Investment Trend")
            .and_then(Panel::body)
        {
            Some(Body::Series { points, .. }) => assert_eq!(
                points,
                &vec![("2020-01".to_string(), 30.0), ("2020-02".to_string(), 5.0)]
            ),
            other => panic!("unexpected {:?}", other),
        }

        match report
            .panel("Top 10 Startups by Total Funding")
            .and_then(Panel::body)
        {
            Some(Body::Chart { entries, .. }) => {
                assert_eq!(entries[0], ("B".to_string(), 20.0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn count_measure_changes_monthly_panel() {
        let t = fixtures::abc();
        let report = overall_report(&t, &ReportConfig::default(), Measure::Count);
        match report
            .panel("Month-on-Month Investment Count Trend")
            .and_then(Panel::body)
        {
            Some(Body::Series { points, .. }) => assert_eq!(points[0].1, 2.0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn outliers_title_and_rows() {
        let t = fixtures::abc();
        let panel = outliers_panel(&t, &ReportConfig::default());
        assert_eq!(panel.title, "Outlier Detection: Top 1% Funding Rounds");
        match panel.body() {
            Some(Body::Table { rows, .. }) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0][0], "B");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn empty_table_degrades_to_no_data() {
        let t = Table::from_records(Vec::new());
        let report = overall_report(&t, &ReportConfig::default(), Measure::Sum);
        assert!(report.panel("Overall Analysis").unwrap().body().is_some());
        for title in [
            "Month-on-Month Investment Trend",
            "Yearly Funding Amount with Peaks and Drops",
            "Funding Round Trends Over Time",
        ] {
            assert_eq!(report.panel(title).unwrap().content, PanelContent::NoData);
        }
    }

    #[test]
    fn missing_vertical_fails_only_its_panel() {
        let records = vec![FundingRecord::new(
            Some("A".into()),
            Some("X".into()),
            None,
            None,
            Some("Seed".into()),
            chrono::NaiveDate::from_ymd_opt(2020, 1, 1),
            Some(3.0),
        )];
        let present = [Field::Startup, Field::Investors, Field::Round, Field::Date, Field::Amount];
        let t = Table::new(records, present, LoadSummary::default());
        let report = overall_report(&t, &ReportConfig::default(), Measure::Sum);
        assert!(matches!(
            report.panel("Top Sectors by Total Investment").unwrap().content,
            PanelContent::Failed(_)
        ));
        assert!(report
            .panel("Top 10 Startups by Total Funding")
            .unwrap()
            .body()
            .is_some());
    }
}
