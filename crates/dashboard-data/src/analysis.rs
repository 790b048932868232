//! Report pipeline for the sales dashboard.
//!
//! Normalizes the loaded records, applies the branch/month selection and runs
//! every aggregate, returning a [`DashboardReport`] ready for the UI layer.

use std::collections::{BTreeSet, HashSet};

use chrono::Utc;
use dashboard_core::filter::FilterSelection;
use dashboard_core::models::{RfmRecord, SalesRecord};
use serde::Serialize;
use tracing::debug;

use crate::aggregator::{
    BranchPerformanceRow, BranchSummaryRow, ChannelShareRow, KpiSummary, MonthTrendRow,
    NormalizedSale, RankingRow, SalesAggregator, SegmentRow,
};

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// ISO-8601 timestamp when this report was generated.
    pub generated_at: String,
    /// Sales records available before filtering.
    pub records_loaded: usize,
    /// Sales records that passed the selection.
    pub records_selected: usize,
    /// Length of the top-N rankings.
    pub top_n: usize,
    /// Wall-clock milliseconds spent computing the report.
    pub compute_time_ms: f64,
}

/// Everything the dashboard shows for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub metadata: ReportMetadata,
    pub filter: FilterSelection,
    pub kpis: KpiSummary,
    pub sales_trend: Vec<MonthTrendRow>,
    pub channel_share: Vec<ChannelShareRow>,
    pub top_products: Vec<RankingRow>,
    pub top_spenders: Vec<RankingRow>,
    pub branch_performance: Vec<BranchPerformanceRow>,
    pub branch_summary: Vec<BranchSummaryRow>,
    /// Computed over the whole RFM dataset; the selection does not apply.
    pub customer_segments: Vec<SegmentRow>,
}

impl DashboardReport {
    /// `true` when no sales record passed the selection.
    pub fn is_empty(&self) -> bool {
        self.metadata.records_selected == 0
    }
}

/// Values offered by the branch and month slicers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Distinct non-empty branch names, sorted.
    pub branches: Vec<String>,
    /// Distinct normalized month labels, in month order.
    pub months: Vec<String>,
}

impl FilterOptions {
    /// A selection with every option ticked.
    pub fn select_all(&self) -> FilterSelection {
        FilterSelection::new(self.branches.iter().cloned(), self.months.iter().cloned())
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full report pipeline.
///
/// 1. Normalize month and channel for every sales record.
/// 2. Keep the records whose branch and month label are selected.
/// 3. Compute KPIs, month trend, channel share, rankings and branch tables.
/// 4. Count customers per RFM segment.
pub fn build_report(
    sales: &[SalesRecord],
    rfm: &[RfmRecord],
    filter: &FilterSelection,
    top_n: usize,
) -> DashboardReport {
    let start = std::time::Instant::now();

    let selected: Vec<NormalizedSale<'_>> = SalesAggregator::normalize(sales)
        .into_iter()
        .filter(|s| filter.matches(&s.record.branch, &s.month.label))
        .collect();
    let records: Vec<&SalesRecord> = selected.iter().map(|s| s.record).collect();

    let report = DashboardReport {
        kpis: SalesAggregator::kpis(&records),
        sales_trend: SalesAggregator::sales_trend(&selected),
        channel_share: SalesAggregator::channel_share(&selected),
        top_products: SalesAggregator::top_products(&records, top_n),
        top_spenders: SalesAggregator::top_spenders(&records, top_n),
        branch_performance: SalesAggregator::branch_performance(&records),
        branch_summary: SalesAggregator::branch_summary(&records),
        customer_segments: SalesAggregator::customer_segments(rfm),
        filter: filter.clone(),
        metadata: ReportMetadata {
            generated_at: Utc::now().to_rfc3339(),
            records_loaded: sales.len(),
            records_selected: records.len(),
            top_n,
            compute_time_ms: start.elapsed().as_secs_f64() * 1000.0,
        },
    };

    debug!(
        "Report built: {}/{} records selected in {:.2} ms",
        report.metadata.records_selected, report.metadata.records_loaded, report.metadata.compute_time_ms
    );

    report
}

/// Collect the slicer options from the loaded sales records.
///
/// Months are listed by their normalized label so that `"Jan"` and
/// `"January"` show up once.
pub fn filter_options(sales: &[SalesRecord]) -> FilterOptions {
    let branches: BTreeSet<&str> = sales
        .iter()
        .map(|r| r.branch.as_str())
        .filter(|b| !b.is_empty())
        .collect();

    // A label can appear under two orders when `MonthNumber` disagrees with
    // the name; the slicer lists it once, at its earliest position.
    let mut seen = HashSet::new();
    let months = SalesAggregator::sales_trend(&SalesAggregator::normalize(sales))
        .into_iter()
        .map(|row| row.month_label)
        .filter(|label| seen.insert(label.clone()))
        .collect();

    FilterOptions {
        branches: branches.into_iter().map(str::to_string).collect(),
        months,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(branch: &str, month: &str, source: &str, customer: &str, item: &str, qty: f64, total: f64) -> SalesRecord {
        SalesRecord {
            branch: branch.to_string(),
            month: Some(month.to_string()).filter(|m| !m.is_empty()),
            month_number: None,
            source: Some(source.to_string()).filter(|s| !s.is_empty()),
            customer: Some(customer.to_string()),
            item_name: Some(item.to_string()),
            quantity: qty,
            grand_total: total,
            id: Some(format!("{branch}-{month}-{item}")),
        }
    }

    fn dataset() -> Vec<SalesRecord> {
        vec![
            rec("Jakarta", "Jan", "Apps", "Alice", "Shampoo", 2.0, 100.0),
            rec("Jakarta", "January", "ERP", "Bob", "Serum", 1.0, 50.0),
            rec("Bandung", "Feb", "app", "Carol", "Shampoo", 4.0, 200.0),
            rec("Bandung", "", "", "Alice", "Mask", 1.0, 10.0),
            rec("Surabaya", "Sept", "erp", "Dewi", "Serum", 3.0, 90.0),
        ]
    }

    fn segments() -> Vec<RfmRecord> {
        vec![
            RfmRecord {
                customer: Some("Alice".to_string()),
                segment: Some("Champions".to_string()),
            },
            RfmRecord {
                customer: Some("Bob".to_string()),
                segment: Some("Hibernating".to_string()),
            },
        ]
    }

    // ── filter_options ────────────────────────────────────────────────────────

    #[test]
    fn test_filter_options() {
        let opts = filter_options(&dataset());
        assert_eq!(opts.branches, vec!["Bandung", "Jakarta", "Surabaya"]);
        assert_eq!(opts.months, vec!["January", "February", "September", "(blank)"]);
    }

    #[test]
    fn test_select_all_selects_every_option() {
        let opts = filter_options(&dataset());
        let all = opts.select_all();
        assert_eq!(all.branches.len(), 3);
        assert_eq!(all.months.len(), 4);
    }

    #[test]
    fn test_filter_options_lists_each_month_once() {
        let mut feb_numbered = rec("Jakarta", "January", "Apps", "Alice", "Shampoo", 1.0, 10.0);
        feb_numbered.month_number = Some(2.0);
        let data = vec![
            rec("Jakarta", "January", "Apps", "Bob", "Serum", 1.0, 20.0),
            feb_numbered,
            rec("Jakarta", "Mar", "Apps", "Bob", "Serum", 1.0, 5.0),
        ];

        let opts = filter_options(&data);
        assert_eq!(opts.months, vec!["January", "March"]);

        // Selecting the label still picks up both orders.
        let report = build_report(&data, &[], &opts.select_all(), 5);
        assert_eq!(report.kpis.total_revenue, 35.0);
    }

    // ── build_report ──────────────────────────────────────────────────────────

    #[test]
    fn test_full_selection_report() {
        let data = dataset();
        let filter = filter_options(&data).select_all();
        let report = build_report(&data, &segments(), &filter, 5);

        assert_eq!(report.metadata.records_loaded, 5);
        assert_eq!(report.metadata.records_selected, 5);
        assert_eq!(report.kpis.total_revenue, 450.0);
        assert_eq!(report.kpis.total_customers, 4);
        assert_eq!(report.kpis.unique_products, 3);
        assert_eq!(report.kpis.sales_volume, 11.0);

        assert_eq!(report.sales_trend[0].month_label, "January");
        assert_eq!(report.sales_trend[0].total_revenue, 150.0);
        assert_eq!(report.sales_trend.last().unwrap().month_label, "(blank)");

        assert_eq!(report.top_products[0].name, "Shampoo");
        assert_eq!(report.top_products[0].value, 6.0);
        assert_eq!(report.branch_summary[0].branch, "Bandung");
        assert_eq!(report.customer_segments.len(), 2);
    }

    #[test]
    fn test_month_filter_uses_normalized_label() {
        let data = dataset();
        let filter = FilterSelection::new(["Jakarta", "Bandung", "Surabaya"], ["January"]);
        let report = build_report(&data, &[], &filter, 5);

        assert_eq!(report.metadata.records_selected, 2);
        assert_eq!(report.kpis.total_revenue, 150.0);
    }

    #[test]
    fn test_branch_filter() {
        let data = dataset();
        let opts = filter_options(&data);
        let filter = FilterSelection::new(["Surabaya"], opts.months.clone());
        let report = build_report(&data, &[], &filter, 5);

        assert_eq!(report.kpis.total_revenue, 90.0);
        assert_eq!(report.branch_summary.len(), 1);
        assert_eq!(report.sales_trend[0].month_label, "September");
    }

    #[test]
    fn test_empty_selection_yields_zero_kpis_and_empty_tables() {
        let data = dataset();
        let report = build_report(&data, &segments(), &FilterSelection::default(), 5);

        assert!(report.is_empty());
        assert_eq!(report.kpis, KpiSummary::default());
        assert!(report.sales_trend.is_empty());
        assert!(report.channel_share.is_empty());
        assert!(report.top_products.is_empty());
        assert!(report.top_spenders.is_empty());
        assert!(report.branch_performance.is_empty());
        assert!(report.branch_summary.is_empty());
        // Segmentation is not filtered.
        assert_eq!(report.customer_segments.len(), 2);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let data = dataset();
        let filter = filter_options(&data).select_all();
        let report = build_report(&data, &segments(), &filter, 3);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["metadata"]["top_n"], 3);
        assert_eq!(json["channel_share"][0]["source"], "Apps");
        assert!(json["kpis"]["total_revenue"].as_f64().unwrap() > 0.0);
    }
}
