//! Grouped aggregates behind every chart and table of the dashboard.
//!
//! All groupings keep first-encounter order for their keys and every sort is
//! stable, so ties come out in the order the records were read.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use dashboard_core::models::{RfmRecord, SalesRecord};
use dashboard_core::month::{normalize_month, NormalizedMonth};
use dashboard_core::source::{normalize_source, SourceChannel};
use serde::Serialize;

// ── Row types ─────────────────────────────────────────────────────────────────

/// A sales record together with its normalized month and channel.
#[derive(Debug, Clone)]
pub struct NormalizedSale<'a> {
    pub record: &'a SalesRecord,
    pub month: NormalizedMonth,
    pub source: SourceChannel,
}

/// Revenue of one month (sales trend line).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTrendRow {
    pub month_label: String,
    pub month_order: u8,
    pub total_revenue: f64,
}

/// Revenue of one month × channel cell with its share of the month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelShareRow {
    pub month_label: String,
    pub month_order: u8,
    pub source: SourceChannel,
    pub total_revenue: f64,
    /// Fraction of the month's revenue; `0.0` when the month sums to zero.
    pub revenue_share: f64,
}

/// One entry of a top-N ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingRow {
    pub name: String,
    pub value: f64,
}

/// Branch revenue and its share of the selection (donut chart).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchPerformanceRow {
    pub branch: String,
    pub total_revenue: f64,
    pub share: f64,
}

/// One line of the branch summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchSummaryRow {
    /// 1-based rank by revenue.
    pub no: usize,
    pub branch: String,
    pub total_revenue: f64,
    /// Invoice lines carrying an `ID`.
    pub total_transactions: usize,
    /// Distinct customers.
    pub total_customers: usize,
    /// Mean revenue per invoice line.
    pub average_transaction_value: f64,
}

/// Customers per RFM segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentRow {
    pub segment: String,
    pub total_customers: usize,
}

/// Headline numbers of the KPI cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total_revenue: f64,
    pub total_customers: usize,
    pub unique_products: usize,
    pub sales_volume: f64,
}

// ── OrderedGroups ─────────────────────────────────────────────────────────────

/// Accumulator keyed by `K` that remembers the order keys were first seen.
struct OrderedGroups<K, V> {
    index: HashMap<K, usize>,
    groups: Vec<(K, V)>,
}

impl<K: Eq + Hash + Clone, V: Default> OrderedGroups<K, V> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    fn entry(&mut self, key: K) -> &mut V {
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                let idx = self.groups.len();
                self.index.insert(key.clone(), idx);
                self.groups.push((key, V::default()));
                idx
            }
        };
        &mut self.groups[idx].1
    }

    fn into_vec(self) -> Vec<(K, V)> {
        self.groups
    }
}

#[derive(Default)]
struct BranchAccumulator<'a> {
    revenue: f64,
    lines: usize,
    transactions: usize,
    customers: HashSet<&'a str>,
}

// ── SalesAggregator ───────────────────────────────────────────────────────────

/// Stateless helper producing the dashboard aggregates.
pub struct SalesAggregator;

impl SalesAggregator {
    /// Attach normalized month and channel to every record. Nothing is dropped.
    pub fn normalize(records: &[SalesRecord]) -> Vec<NormalizedSale<'_>> {
        records
            .iter()
            .map(|record| NormalizedSale {
                record,
                month: normalize_month(record.month.as_deref(), record.month_number),
                source: normalize_source(record.source.as_deref()),
            })
            .collect()
    }

    /// Revenue per month, in month order.
    pub fn sales_trend(sales: &[NormalizedSale<'_>]) -> Vec<MonthTrendRow> {
        let mut groups: OrderedGroups<(u8, &str), f64> = OrderedGroups::new();
        for sale in sales {
            *groups.entry((sale.month.order, sale.month.label.as_str())) += sale.record.grand_total;
        }

        let mut rows: Vec<MonthTrendRow> = groups
            .into_vec()
            .into_iter()
            .map(|((order, label), total)| MonthTrendRow {
                month_label: label.to_string(),
                month_order: order,
                total_revenue: total,
            })
            .collect();
        rows.sort_by_key(|r| r.month_order);
        rows
    }

    /// Revenue per month × channel with each cell's share of its month.
    ///
    /// Shares are normalized over all channels with the same month label. A
    /// month whose revenue sums to zero gets a share of `0.0` everywhere.
    /// Refund lines can push a raw ratio outside `0..=1`; shares are clamped
    /// to that range, so such a month no longer sums to exactly one.
    pub fn channel_share(sales: &[NormalizedSale<'_>]) -> Vec<ChannelShareRow> {
        let mut groups: OrderedGroups<(u8, &str, &SourceChannel), f64> = OrderedGroups::new();
        for sale in sales {
            *groups.entry((sale.month.order, sale.month.label.as_str(), &sale.source)) +=
                sale.record.grand_total;
        }
        let cells = groups.into_vec();

        let mut month_totals: HashMap<&str, f64> = HashMap::new();
        for ((_, label, _), total) in &cells {
            *month_totals.entry(*label).or_default() += total;
        }

        let mut rows: Vec<ChannelShareRow> = cells
            .into_iter()
            .map(|((order, label, source), total)| {
                let month_total = month_totals.get(label).copied().unwrap_or(0.0);
                let revenue_share = if month_total == 0.0 {
                    0.0
                } else {
                    (total / month_total).clamp(0.0, 1.0)
                };
                ChannelShareRow {
                    month_label: label.to_string(),
                    month_order: order,
                    source: source.clone(),
                    total_revenue: total,
                    revenue_share,
                }
            })
            .collect();
        rows.sort_by_key(|r| r.month_order);
        rows
    }

    /// Best sellers: summed quantity per item name, highest first.
    pub fn top_products(records: &[&SalesRecord], n: usize) -> Vec<RankingRow> {
        Self::rank(
            records
                .iter()
                .filter_map(|r| r.item_name.as_deref().map(|name| (name, r.quantity))),
            n,
        )
    }

    /// Highest spenders: summed revenue per customer, highest first.
    pub fn top_spenders(records: &[&SalesRecord], n: usize) -> Vec<RankingRow> {
        Self::rank(
            records
                .iter()
                .filter_map(|r| r.customer.as_deref().map(|name| (name, r.grand_total))),
            n,
        )
    }

    /// Revenue per branch with its share of the selection, highest first.
    pub fn branch_performance(records: &[&SalesRecord]) -> Vec<BranchPerformanceRow> {
        let mut groups: OrderedGroups<&str, f64> = OrderedGroups::new();
        for r in records.iter().filter(|r| !r.branch.is_empty()) {
            *groups.entry(r.branch.as_str()) += r.grand_total;
        }
        let cells = groups.into_vec();
        let total: f64 = cells.iter().map(|(_, v)| v).sum();

        let mut rows: Vec<BranchPerformanceRow> = cells
            .into_iter()
            .map(|(branch, revenue)| BranchPerformanceRow {
                branch: branch.to_string(),
                total_revenue: revenue,
                share: if total == 0.0 { 0.0 } else { revenue / total },
            })
            .collect();
        rows.sort_by(|a, b| b.total_revenue.total_cmp(&a.total_revenue));
        rows
    }

    /// Per-branch revenue, transaction count, distinct customers and mean
    /// line value, ranked by revenue and numbered from 1.
    pub fn branch_summary(records: &[&SalesRecord]) -> Vec<BranchSummaryRow> {
        let mut groups: OrderedGroups<&str, BranchAccumulator<'_>> = OrderedGroups::new();
        for r in records.iter().filter(|r| !r.branch.is_empty()) {
            let acc = groups.entry(r.branch.as_str());
            acc.revenue += r.grand_total;
            acc.lines += 1;
            if r.id.is_some() {
                acc.transactions += 1;
            }
            if let Some(customer) = r.customer.as_deref() {
                acc.customers.insert(customer);
            }
        }

        let mut rows: Vec<BranchSummaryRow> = groups
            .into_vec()
            .into_iter()
            .map(|(branch, acc)| BranchSummaryRow {
                no: 0,
                branch: branch.to_string(),
                total_revenue: acc.revenue,
                total_transactions: acc.transactions,
                total_customers: acc.customers.len(),
                average_transaction_value: acc.revenue / acc.lines as f64,
            })
            .collect();
        rows.sort_by(|a, b| b.total_revenue.total_cmp(&a.total_revenue));
        for (i, row) in rows.iter_mut().enumerate() {
            row.no = i + 1;
        }
        rows
    }

    /// Customers per RFM segment, largest segment first.
    pub fn customer_segments(rfm: &[RfmRecord]) -> Vec<SegmentRow> {
        let mut groups: OrderedGroups<&str, usize> = OrderedGroups::new();
        for r in rfm {
            if let Some(segment) = r.segment.as_deref() {
                let count = groups.entry(segment);
                if r.customer.is_some() {
                    *count += 1;
                }
            }
        }

        let mut rows: Vec<SegmentRow> = groups
            .into_vec()
            .into_iter()
            .map(|(segment, total_customers)| SegmentRow {
                segment: segment.to_string(),
                total_customers,
            })
            .collect();
        rows.sort_by(|a, b| b.total_customers.cmp(&a.total_customers));
        rows
    }

    /// KPI scalars over the selected records.
    ///
    /// Products are counted on trimmed, lowercased item names so that
    /// `"Shampoo"` and `"shampoo "` are the same product.
    pub fn kpis(records: &[&SalesRecord]) -> KpiSummary {
        let customers: HashSet<&str> = records.iter().filter_map(|r| r.customer.as_deref()).collect();
        let products: HashSet<String> = records
            .iter()
            .filter_map(|r| r.item_name.as_deref())
            .map(|name| name.trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect();

        KpiSummary {
            total_revenue: records.iter().map(|r| r.grand_total).sum(),
            total_customers: customers.len(),
            unique_products: products.len(),
            sales_volume: records.iter().map(|r| r.quantity).sum(),
        }
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Sum values per name, sort descending (stable) and keep the first `n`.
    fn rank<'a>(items: impl Iterator<Item = (&'a str, f64)>, n: usize) -> Vec<RankingRow> {
        let mut groups: OrderedGroups<&str, f64> = OrderedGroups::new();
        for (name, value) in items {
            *groups.entry(name) += value;
        }

        let mut rows: Vec<RankingRow> = groups
            .into_vec()
            .into_iter()
            .map(|(name, value)| RankingRow {
                name: name.to_string(),
                value,
            })
            .collect();
        rows.sort_by(|a, b| b.value.total_cmp(&a.value));
        rows.truncate(n);
        rows
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(branch: &str, month: &str, source: &str, total: f64) -> SalesRecord {
        SalesRecord {
            branch: branch.to_string(),
            month: (!month.is_empty()).then(|| month.to_string()),
            source: (!source.is_empty()).then(|| source.to_string()),
            grand_total: total,
            ..Default::default()
        }
    }

    fn item(name: &str, customer: &str, qty: f64, total: f64) -> SalesRecord {
        SalesRecord {
            branch: "Jakarta".to_string(),
            month: Some("January".to_string()),
            customer: Some(customer.to_string()),
            item_name: Some(name.to_string()),
            quantity: qty,
            grand_total: total,
            id: Some(format!("{name}-{customer}")),
            ..Default::default()
        }
    }

    // ── normalize ─────────────────────────────────────────────────────────────

    #[test]
    fn test_normalize_keeps_every_record() {
        let records = vec![
            sale("A", "Jan", "Apps", 1.0),
            sale("A", "", "", 1.0),
            sale("A", "whenever", "fax", 1.0),
        ];
        let sales = SalesAggregator::normalize(&records);
        assert_eq!(sales.len(), 3);
        assert_eq!(sales[0].month.label, "January");
        assert_eq!(sales[1].month.label, "(blank)");
        assert_eq!(sales[1].source, SourceChannel::Blank);
        assert_eq!(sales[2].month.order, 99);
        assert_eq!(sales[2].source, SourceChannel::Other("fax".to_string()));
    }

    // ── sales_trend ───────────────────────────────────────────────────────────

    #[test]
    fn test_trend_merges_aliases_into_one_month() {
        let records = vec![sale("A", "Jan", "", 100.0), sale("A", "January", "", 50.0)];
        let sales = SalesAggregator::normalize(&records);
        let trend = SalesAggregator::sales_trend(&sales);

        assert_eq!(
            trend,
            vec![MonthTrendRow {
                month_label: "January".to_string(),
                month_order: 1,
                total_revenue: 150.0,
            }]
        );
    }

    #[test]
    fn test_trend_calendar_order_with_blank_and_unknown_last() {
        let records = vec![
            sale("A", "zz", "", 1.0),
            sale("A", "", "", 2.0),
            sale("A", "Des", "", 3.0),
            sale("A", "Feb", "", 4.0),
            sale("A", "jan", "", 5.0),
        ];
        let sales = SalesAggregator::normalize(&records);
        let labels: Vec<String> = SalesAggregator::sales_trend(&sales)
            .into_iter()
            .map(|r| r.month_label)
            .collect();
        assert_eq!(labels, vec!["January", "February", "December", "(blank)", "Zz"]);
    }

    #[test]
    fn test_trend_ties_keep_encounter_order() {
        let records = vec![
            sale("A", "beta", "", 1.0),
            sale("A", "alpha", "", 1.0),
            sale("A", "beta", "", 1.0),
        ];
        let sales = SalesAggregator::normalize(&records);
        let trend = SalesAggregator::sales_trend(&sales);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].month_label, "Beta");
        assert_eq!(trend[0].total_revenue, 2.0);
        assert_eq!(trend[1].month_label, "Alpha");
    }

    #[test]
    fn test_trend_empty() {
        assert!(SalesAggregator::sales_trend(&[]).is_empty());
    }

    // ── channel_share ─────────────────────────────────────────────────────────

    #[test]
    fn test_channel_share_sums_to_one_per_month() {
        let records = vec![
            sale("A", "Jan", "Apps", 30.0),
            sale("A", "Jan", "ERP", 60.0),
            sale("A", "Jan", "", 10.0),
            sale("A", "Feb", "app", 1.0),
            sale("A", "Feb", "erp", 2.0),
            sale("A", "Feb", "APPS", 0.3),
        ];
        let sales = SalesAggregator::normalize(&records);
        let rows = SalesAggregator::channel_share(&sales);

        for month in ["January", "February"] {
            let sum: f64 = rows
                .iter()
                .filter(|r| r.month_label == month)
                .map(|r| r.revenue_share)
                .sum();
            assert!((sum - 1.0).abs() < 1e-9, "{month} shares sum to {sum}");
        }

        let jan_apps = rows
            .iter()
            .find(|r| r.month_label == "January" && r.source == SourceChannel::Apps)
            .unwrap();
        assert!((jan_apps.revenue_share - 0.3).abs() < 1e-9);

        let feb_apps = rows
            .iter()
            .find(|r| r.month_label == "February" && r.source == SourceChannel::Apps)
            .unwrap();
        assert!((feb_apps.total_revenue - 1.3).abs() < 1e-9);
    }

    #[test]
    fn test_channel_share_zero_revenue_month_is_zero() {
        let records = vec![sale("A", "Mar", "Apps", 0.0), sale("A", "Mar", "ERP", 0.0)];
        let sales = SalesAggregator::normalize(&records);
        let rows = SalesAggregator::channel_share(&sales);

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.revenue_share == 0.0));
    }

    #[test]
    fn test_channel_share_with_refunds_stays_in_unit_range() {
        let records = vec![
            sale("A", "Apr", "Apps", 100.0),
            sale("A", "Apr", "ERP", -40.0),
        ];
        let sales = SalesAggregator::normalize(&records);
        let rows = SalesAggregator::channel_share(&sales);

        assert!(rows.iter().all(|r| (0.0..=1.0).contains(&r.revenue_share)));
        let erp = rows.iter().find(|r| r.source == SourceChannel::Erp).unwrap();
        assert_eq!(erp.revenue_share, 0.0);
        assert_eq!(erp.total_revenue, -40.0);
    }

    #[test]
    fn test_channel_share_sorted_by_month() {
        let records = vec![sale("A", "Mar", "Apps", 1.0), sale("A", "Jan", "ERP", 1.0)];
        let sales = SalesAggregator::normalize(&records);
        let rows = SalesAggregator::channel_share(&sales);
        assert_eq!(rows[0].month_label, "January");
        assert_eq!(rows[1].month_label, "March");
    }

    // ── rankings ──────────────────────────────────────────────────────────────

    #[test]
    fn test_top_products_fewer_than_n() {
        let records = vec![
            item("Shampoo", "Alice", 5.0, 10.0),
            item("Serum", "Bob", 9.0, 10.0),
            item("Shampoo", "Carol", 6.0, 10.0),
            item("Mask", "Alice", 1.0, 10.0),
        ];
        let refs: Vec<&SalesRecord> = records.iter().collect();
        let top = SalesAggregator::top_products(&refs, 5);

        assert_eq!(top.len(), 3);
        let names: Vec<&str> = top.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Shampoo", "Serum", "Mask"]);
        assert_eq!(top[0].value, 11.0);
    }

    #[test]
    fn test_top_products_truncates_to_n() {
        let records: Vec<SalesRecord> = (0..8)
            .map(|i| item(&format!("P{i}"), "Alice", i as f64, 1.0))
            .collect();
        let refs: Vec<&SalesRecord> = records.iter().collect();
        let top = SalesAggregator::top_products(&refs, 5);

        assert_eq!(top.len(), 5);
        assert_eq!(top[0].name, "P7");
        assert_eq!(top[4].name, "P3");
    }

    #[test]
    fn test_top_spenders_by_revenue() {
        let records = vec![
            item("Shampoo", "Alice", 1.0, 100.0),
            item("Serum", "Bob", 1.0, 300.0),
            item("Mask", "Alice", 1.0, 250.0),
        ];
        let refs: Vec<&SalesRecord> = records.iter().collect();
        let top = SalesAggregator::top_spenders(&refs, 5);

        assert_eq!(top[0].name, "Alice");
        assert_eq!(top[0].value, 350.0);
        assert_eq!(top[1].name, "Bob");
    }

    #[test]
    fn test_rankings_skip_missing_names() {
        let mut anonymous = item("Shampoo", "Alice", 3.0, 10.0);
        anonymous.customer = None;
        anonymous.item_name = None;
        let refs = vec![&anonymous];
        assert!(SalesAggregator::top_products(&refs, 5).is_empty());
        assert!(SalesAggregator::top_spenders(&refs, 5).is_empty());
    }

    // ── branches ──────────────────────────────────────────────────────────────

    #[test]
    fn test_branch_performance_shares() {
        let records = vec![
            sale("Jakarta", "Jan", "", 300.0),
            sale("Bandung", "Jan", "", 100.0),
            sale("Jakarta", "Feb", "", 100.0),
        ];
        let refs: Vec<&SalesRecord> = records.iter().collect();
        let rows = SalesAggregator::branch_performance(&refs);

        assert_eq!(rows[0].branch, "Jakarta");
        assert!((rows[0].share - 0.8).abs() < 1e-9);
        assert!((rows[1].share - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_branch_summary() {
        let mut no_id = item("Mask", "Bob", 1.0, 60.0);
        no_id.id = None;
        let mut other_branch = item("Serum", "Carol", 1.0, 500.0);
        other_branch.branch = "Surabaya".to_string();
        let records = vec![
            item("Shampoo", "Alice", 1.0, 100.0),
            item("Serum", "Alice", 1.0, 200.0),
            no_id,
            other_branch,
        ];
        let refs: Vec<&SalesRecord> = records.iter().collect();
        let rows = SalesAggregator::branch_summary(&refs);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].no, 1);
        assert_eq!(rows[0].branch, "Surabaya");
        assert_eq!(rows[1].no, 2);
        assert_eq!(rows[1].branch, "Jakarta");
        assert_eq!(rows[1].total_revenue, 360.0);
        assert_eq!(rows[1].total_transactions, 2);
        assert_eq!(rows[1].total_customers, 2);
        assert!((rows[1].average_transaction_value - 120.0).abs() < 1e-9);
    }

    // ── segments ──────────────────────────────────────────────────────────────

    #[test]
    fn test_customer_segments_sorted_desc() {
        let rfm = |c: Option<&str>, s: Option<&str>| RfmRecord {
            customer: c.map(str::to_string),
            segment: s.map(str::to_string),
        };
        let records = vec![
            rfm(Some("A"), Some("At Risk")),
            rfm(Some("B"), Some("Champions")),
            rfm(Some("C"), Some("Champions")),
            rfm(None, Some("At Risk")),
            rfm(Some("D"), None),
        ];
        let rows = SalesAggregator::customer_segments(&records);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].segment, "Champions");
        assert_eq!(rows[0].total_customers, 2);
        assert_eq!(rows[1].segment, "At Risk");
        assert_eq!(rows[1].total_customers, 1);
    }

    // ── kpis ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_kpis() {
        let records = vec![
            item("Shampoo", "Alice", 2.0, 100.0),
            item("shampoo ", "Bob", 3.0, 50.0),
            item("Serum", "Alice", 1.0, 25.0),
        ];
        let refs: Vec<&SalesRecord> = records.iter().collect();
        let kpis = SalesAggregator::kpis(&refs);

        assert_eq!(kpis.total_revenue, 175.0);
        assert_eq!(kpis.total_customers, 2);
        assert_eq!(kpis.unique_products, 2);
        assert_eq!(kpis.sales_volume, 6.0);
    }

    #[test]
    fn test_kpis_empty() {
        assert_eq!(SalesAggregator::kpis(&[]), KpiSummary::default());
    }
}
