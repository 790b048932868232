//! Interactive dashboard session.
//!
//! [`DashboardSession`] holds the current slicer selection over a shared
//! [`DataStore`] and recomputes the [`DashboardReport`] from scratch after
//! every change, the same way the page is re-run on each interaction.

use dashboard_core::filter::FilterSelection;
use dashboard_core::month::normalize_month;
use dashboard_data::analysis::DashboardReport;

use crate::data_manager::DataStore;

/// Which slicer a selection change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDimension {
    Branch,
    Month,
}

/// Current selection plus the report computed for it.
pub struct DashboardSession<'a> {
    store: &'a DataStore,
    filter: FilterSelection,
    top_n: usize,
    report: DashboardReport,
}

impl<'a> DashboardSession<'a> {
    /// Start a session with an explicit selection.
    pub fn new(store: &'a DataStore, filter: FilterSelection, top_n: usize) -> Self {
        let report = store.report(&filter, top_n);
        Self {
            store,
            filter,
            top_n,
            report,
        }
    }

    /// Start a session from CLI-style lists. An empty list selects every
    /// option of that slicer; names that are not offered are dropped with a
    /// warning. Months may be given in any spelling the exports use
    /// (`Jan`, `sept`, `Oktober`).
    pub fn from_requested(
        store: &'a DataStore,
        branches: &[String],
        months: &[String],
        top_n: usize,
    ) -> Self {
        let options = store.options();
        let months: Vec<String> = months
            .iter()
            .map(|m| normalize_month(Some(m.as_str()), None).label)
            .collect();
        let filter = FilterSelection::new(
            pick(&options.branches, branches, "branch"),
            pick(&options.months, &months, "month"),
        );
        Self::new(store, filter, top_n)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn report(&self) -> &DashboardReport {
        &self.report
    }

    pub fn filter(&self) -> &FilterSelection {
        &self.filter
    }

    pub fn store(&self) -> &'a DataStore {
        self.store
    }

    /// Options of one slicer, in display order.
    pub fn options(&self, dimension: FilterDimension) -> &'a [String] {
        let options = self.store.options();
        match dimension {
            FilterDimension::Branch => &options.branches,
            FilterDimension::Month => &options.months,
        }
    }

    /// `true` when `value` is ticked in the given slicer.
    pub fn is_selected(&self, dimension: FilterDimension, value: &str) -> bool {
        match dimension {
            FilterDimension::Branch => self.filter.branches.contains(value),
            FilterDimension::Month => self.filter.months.contains(value),
        }
    }

    // ── Selection changes ─────────────────────────────────────────────────

    /// Tick or untick one option and recompute.
    pub fn toggle(&mut self, dimension: FilterDimension, value: &str) {
        let now_selected = match dimension {
            FilterDimension::Branch => self.filter.toggle_branch(value),
            FilterDimension::Month => self.filter.toggle_month(value),
        };
        tracing::debug!(?dimension, value, now_selected, "filter toggled");
        self.refresh();
    }

    /// Tick every option of one slicer and recompute.
    pub fn select_all(&mut self, dimension: FilterDimension) {
        let all = self.options(dimension).iter().cloned().collect();
        match dimension {
            FilterDimension::Branch => self.filter.branches = all,
            FilterDimension::Month => self.filter.months = all,
        }
        self.refresh();
    }

    /// Untick every option of one slicer and recompute.
    pub fn clear(&mut self, dimension: FilterDimension) {
        match dimension {
            FilterDimension::Branch => self.filter.branches.clear(),
            FilterDimension::Month => self.filter.months.clear(),
        }
        self.refresh();
    }

    fn refresh(&mut self) {
        self.report = self.store.report(&self.filter, self.top_n);
        tracing::debug!(
            selected = self.report.metadata.records_selected,
            "report recomputed"
        );
    }
}

/// Requested values that exist among `available`, or all of `available` when
/// nothing was requested.
fn pick(available: &[String], requested: &[String], what: &str) -> Vec<String> {
    if requested.is_empty() {
        return available.to_vec();
    }
    requested
        .iter()
        .filter(|r| {
            let known = available.contains(*r);
            if !known {
                tracing::warn!("Unknown {} '{}' ignored", what, r);
            }
            known
        })
        .cloned()
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
