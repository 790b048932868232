//! Plain-text rendering of a [`DashboardReport`] for `--view report`.
//!
//! Every dashboard section becomes an aligned table. Column widths are
//! measured in display columns so names with wide characters line up.

use unicode_width::UnicodeWidthStr;

use dashboard_core::formatting::{format_count, format_number, format_share};
use dashboard_data::analysis::DashboardReport;

use crate::components::header::{selection_summary, TITLE};

#[derive(Clone, Copy, PartialEq)]
enum Align {
    Left,
    Right,
}

/// Render `headers` and `rows` as a plain-text table with a dashed rule
/// under the header.
fn table(headers: &[&str], aligns: &[Align], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.width());
            }
        }
    }

    let format_row = |cells: &[String]| -> String {
        let parts: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let width = widths.get(i).copied().unwrap_or(0);
                let pad = " ".repeat(width.saturating_sub(cell.width()));
                match aligns.get(i).copied().unwrap_or(Align::Left) {
                    Align::Left => format!("{}{}", cell, pad),
                    Align::Right => format!("{}{}", pad, cell),
                }
            })
            .collect();
        parts.join("  ").trim_end().to_string()
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut out = String::new();
    out.push_str(&format_row(&header_cells));
    out.push('\n');
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in rows {
        out.push_str(&format_row(row));
        out.push('\n');
    }
    out
}

fn section(out: &mut String, title: &str, body: &str) {
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(&"=".repeat(title.width()));
    out.push('\n');
    if body.is_empty() {
        out.push_str("(no data)\n");
    } else {
        out.push_str(body);
    }
}

/// Render the whole report as plain text.
///
/// `total_branches` and `total_months` are the number of options each slicer
/// offers, used for the filter summary line.
pub fn render_report(report: &DashboardReport, total_branches: usize, total_months: usize) -> String {
    use Align::{Left, Right};

    let mut out = String::new();
    out.push_str(TITLE);
    out.push('\n');
    out.push_str(&format!(
        "Branches: {} | Months: {} | Records: {} of {}\n",
        selection_summary(report.filter.branches.len(), total_branches),
        selection_summary(report.filter.months.len(), total_months),
        format_count(report.metadata.records_selected),
        format_count(report.metadata.records_loaded),
    ));

    // KPIs
    let kpis = &report.kpis;
    section(
        &mut out,
        "Key Metrics",
        &table(
            &["Metric", "Value"],
            &[Left, Right],
            &[
                vec!["Total Revenue".into(), format_number(kpis.total_revenue, 0)],
                vec!["Total Customers".into(), format_count(kpis.total_customers)],
                vec!["Unique Products".into(), format_count(kpis.unique_products)],
                vec!["Sales Volume".into(), format_number(kpis.sales_volume, 0)],
            ],
        ),
    );

    let trend: Vec<Vec<String>> = report
        .sales_trend
        .iter()
        .map(|r| vec![r.month_label.clone(), format_number(r.total_revenue, 0)])
        .collect();
    section(
        &mut out,
        "Sales Trend",
        &body_or_empty(&trend, || table(&["Month", "Revenue"], &[Left, Right], &trend)),
    );

    let share: Vec<Vec<String>> = report
        .channel_share
        .iter()
        .map(|r| {
            vec![
                r.month_label.clone(),
                r.source.label().to_string(),
                format_number(r.total_revenue, 0),
                format_share(r.revenue_share),
            ]
        })
        .collect();
    section(
        &mut out,
        "Monthly Revenue Share by Sales Channel",
        &body_or_empty(&share, || {
            table(
                &["Month", "Source", "Revenue", "Share"],
                &[Left, Left, Right, Right],
                &share,
            )
        }),
    );

    let products: Vec<Vec<String>> = report
        .top_products
        .iter()
        .enumerate()
        .map(|(i, r)| vec![(i + 1).to_string(), r.name.clone(), format_number(r.value, 0)])
        .collect();
    section(
        &mut out,
        &format!("Top {} Best Seller Products", report.metadata.top_n),
        &body_or_empty(&products, || {
            table(&["#", "Product", "Quantity"], &[Right, Left, Right], &products)
        }),
    );

    let spenders: Vec<Vec<String>> = report
        .top_spenders
        .iter()
        .enumerate()
        .map(|(i, r)| vec![(i + 1).to_string(), r.name.clone(), format_number(r.value, 0)])
        .collect();
    section(
        &mut out,
        "Highest Spenders",
        &body_or_empty(&spenders, || {
            table(&["#", "Customer", "Revenue"], &[Right, Left, Right], &spenders)
        }),
    );

    let performance: Vec<Vec<String>> = report
        .branch_performance
        .iter()
        .map(|r| {
            vec![
                r.branch.clone(),
                format_number(r.total_revenue, 0),
                format_share(r.share),
            ]
        })
        .collect();
    section(
        &mut out,
        "Branch Performance",
        &body_or_empty(&performance, || {
            table(&["Branch", "Revenue", "Share"], &[Left, Right, Right], &performance)
        }),
    );

    let summary: Vec<Vec<String>> = report
        .branch_summary
        .iter()
        .map(|r| {
            vec![
                r.no.to_string(),
                r.branch.clone(),
                format_number(r.total_revenue, 0),
                format_count(r.total_transactions),
                format_count(r.total_customers),
                format_number(r.average_transaction_value, 0),
            ]
        })
        .collect();
    section(
        &mut out,
        "Branch Summary",
        &body_or_empty(&summary, || {
            table(
                &[
                    "No",
                    "Branch",
                    "Total Revenue",
                    "Transactions",
                    "Customers",
                    "Avg Transaction",
                ],
                &[Right, Left, Right, Right, Right, Right],
                &summary,
            )
        }),
    );

    let segments: Vec<Vec<String>> = report
        .customer_segments
        .iter()
        .map(|r| vec![r.segment.clone(), format_count(r.total_customers)])
        .collect();
    section(
        &mut out,
        "Customer Segmentation",
        &body_or_empty(&segments, || {
            table(&["Segment", "Customers"], &[Left, Right], &segments)
        }),
    );

    out
}

fn body_or_empty(rows: &[Vec<String>], render: impl FnOnce() -> String) -> String {
    if rows.is_empty() {
        String::new()
    } else {
        render()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::filter::FilterSelection;
    use dashboard_core::models::{RfmRecord, SalesRecord};
    use dashboard_data::analysis::{build_report, filter_options};

    fn rec(branch: &str, month: &str, source: &str, customer: &str, item: &str, qty: f64, total: f64) -> SalesRecord {
        SalesRecord {
            branch: branch.to_string(),
            month: Some(month.to_string()),
            source: Some(source.to_string()),
            customer: Some(customer.to_string()),
            item_name: Some(item.to_string()),
            quantity: qty,
            grand_total: total,
            id: Some(format!("{branch}-{month}-{item}")),
            ..Default::default()
        }
    }

    fn data() -> (Vec<SalesRecord>, Vec<RfmRecord>) {
        (
            vec![
                rec("Jakarta", "Jan", "Apps", "Alice", "Shampoo", 3.0, 1500.0),
                rec("Jakarta", "Jan", "ERP", "Bob", "Serum", 1.0, 500.0),
                rec("Bandung", "Feb", "apps", "Alice", "Shampoo", 2.0, 1000.0),
            ],
            vec![RfmRecord {
                customer: Some("Alice".to_string()),
                segment: Some("Champions".to_string()),
            }],
        )
    }

    #[test]
    fn test_table_alignment() {
        let out = table(
            &["Name", "Value"],
            &[Align::Left, Align::Right],
            &[
                vec!["a".to_string(), "1".to_string()],
                vec!["longer".to_string(), "1,000".to_string()],
            ],
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Name    Value");
        assert_eq!(lines[1], "------  -----");
        assert_eq!(lines[2], "a           1");
        assert_eq!(lines[3], "longer  1,000");
    }

    #[test]
    fn test_table_wide_characters() {
        let out = table(
            &["Name", "Qty"],
            &[Align::Left, Align::Right],
            &[vec!["日本".to_string(), "2".to_string()]],
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[2].width(), lines[0].width());
    }

    #[test]
    fn test_render_report_sections() {
        let (sales, rfm) = data();
        let opts = filter_options(&sales);
        let report = build_report(&sales, &rfm, &opts.select_all(), 5);
        let text = render_report(&report, opts.branches.len(), opts.months.len());

        assert!(text.starts_with(TITLE));
        assert!(text.contains("Branches: All | Months: All | Records: 3 of 3"));
        for title in [
            "Key Metrics",
            "Sales Trend",
            "Monthly Revenue Share by Sales Channel",
            "Top 5 Best Seller Products",
            "Highest Spenders",
            "Branch Performance",
            "Branch Summary",
            "Customer Segmentation",
        ] {
            assert!(text.contains(title), "missing section {title}");
        }
        assert!(text.contains("3,000"));
        assert!(text.contains("75%"));
    }

    #[test]
    fn test_render_report_empty_selection() {
        let (sales, rfm) = data();
        let opts = filter_options(&sales);
        let report = build_report(&sales, &rfm, &FilterSelection::default(), 5);
        let text = render_report(&report, opts.branches.len(), opts.months.len());

        assert!(text.contains("Branches: None | Months: None"));
        assert!(text.contains("(no data)"));
        // Segmentation ignores the selection.
        assert!(text.contains("Champions"));
    }
}
