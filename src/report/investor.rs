use super::{opt_amount, opt_cell, Body, ChartKind, Panel, Report};
use crate::{
    aggregate::{group_sum, time_series, top_n, Measure},
    config::ReportConfig,
    filter::{resolve, Selection},
    table::{Dimension, Granularity, Table},
};

/// Single-investor view. Records are picked by substring match on the raw
/// investor field, see [`Selection::ByInvestorSubstring`].
pub fn investor_report(table: &Table, name: &str, cfg: &ReportConfig) -> Report {
    let slice = resolve(table, &Selection::ByInvestorSubstring(name.to_string()));
    let n = cfg.top_breakdown;

    let mut panels = vec![
        Panel::build(format!("{} all investment", name), || {
            let rows: Vec<Vec<String>> = slice
                .iter()
                .take(cfg.recent_investments)
                .map(|r| {
                    vec![
                        r.startup.clone(),
                        opt_cell(r.vertical.as_deref()),
                        opt_cell(r.city.as_deref()),
                        opt_cell(r.round.as_deref()),
                        opt_amount(r.amount),
                    ]
                })
                .collect();
            Body::table(&["startup", "vertical", "city", "round", "amount"], rows)
        }),
        Panel::build(format!("{} highest investment", name), || {
            let top = top_n(
                group_sum(&slice, Dimension::Startup)?,
                cfg.top_investor_startups,
            );
            Body::chart(ChartKind::Bar, "Startup", "Total Amount", top)
        }),
    ];

    for (dim, what) in [
        (Dimension::Vertical, "Verticals"),
        (Dimension::City, "Cities"),
        (Dimension::Round, "Rounds"),
    ] {
        panels.push(Panel::build(
            format!("Top {} {} by Investment Amount", n, what),
            || {
                let top = top_n(group_sum(&slice, dim)?, n);
                Body::chart(ChartKind::Pie, what, "Investment Amount", top)
            },
        ));
    }

    panels.push(Panel::build(
        format!("Year-wise Investment Trend for {}", name),
        || {
            let yearly = time_series(&slice, Granularity::Year, Measure::Sum);
            Body::series("Year", "Total Investment Amount", &yearly, Vec::new())
        },
    ));

    Report {
        title: format!("Investor Analysis: {}", name),
        panels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{report::PanelContent, table::fixtures};

    #[test]
    fn investor_panels_use_substring_match() {
        let t = fixtures::abc();
        let report = investor_report(&t, "Accel", &ReportConfig::default());
        assert_eq!(report.panels.len(), 6);

        match report.panel("Accel all investment").and_then(Panel::body) {
            Some(Body::Table { headers, rows }) => {
                assert_eq!(headers[0], "startup");
                let names: Vec<_> = rows.iter().map(|r| r[0].as_str()).collect();
                assert_eq!(names, vec!["A", "B"]);
            }
            other => panic!("unexpected {:?}", other),
        }

        match report.panel("Accel highest investment").and_then(Panel::body) {
            Some(Body::Chart { entries, .. }) => {
                assert_eq!(
                    entries,
                    &vec![("B".to_string(), 20.0), ("A".to_string(), 10.0)]
                );
            }
            other => panic!("unexpected {:?}", other),
        }

        match report
            .panel("Year-wise Investment Trend for Accel")
            .and_then(Panel::body)
        {
            Some(Body::Series { points, .. }) => {
                assert_eq!(points, &vec![("2020".to_string(), 30.0)])
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn recent_investments_are_capped() {
        let t = fixtures::abc();
        let cfg = ReportConfig {
            recent_investments: 1,
            ..ReportConfig::default()
        };
        let report = investor_report(&t, "Sequoia", &cfg);
        match report.panel("Sequoia all investment").and_then(Panel::body) {
            Some(Body::Table { rows, .. }) => assert_eq!(rows.len(), 1),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unknown_investor_is_all_no_data() {
        let t = fixtures::abc();
        let report = investor_report(&t, "Nobody", &ReportConfig::default());
        assert!(report
            .panels
            .iter()
            .all(|p| p.content == PanelContent::NoData));
    }
}
