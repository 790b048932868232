//! Load-once dataset service.
//!
//! [`DataStore`] reads the sales invoice and RFM exports a single time at
//! start-up and then hands out shared, read-only views of them. The slicer
//! options are derived once as well since the data never changes for the
//! lifetime of the process.

use std::path::{Path, PathBuf};
use std::time::Instant;

use dashboard_core::error::{DashboardError, Result};
use dashboard_core::filter::FilterSelection;
use dashboard_core::models::{RfmRecord, SalesRecord};
use dashboard_data::analysis::{build_report, filter_options, DashboardReport, FilterOptions};
use dashboard_data::reader::{load_rfm, load_sales};

// ── DataStore ─────────────────────────────────────────────────────────────────

/// Immutable in-memory copy of both datasets.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use dashboard_runtime::data_manager::DataStore;
///
/// let store = DataStore::load(
///     Path::new("data/SalesInvoice.csv"),
///     Path::new("data/RFMCurrent.csv"),
/// ).expect("datasets");
/// println!("{} sales records", store.sales().len());
/// ```
#[derive(Debug)]
pub struct DataStore {
    sales: Vec<SalesRecord>,
    rfm: Vec<RfmRecord>,
    options: FilterOptions,
    sales_path: PathBuf,
}

impl DataStore {
    /// Read both exports. Any missing file or required column is fatal.
    pub fn load(sales_path: &Path, rfm_path: &Path) -> Result<Self> {
        let start = Instant::now();
        let sales = load_sales(sales_path)?;
        let rfm = load_rfm(rfm_path)?;

        let store = Self::from_records(sales, rfm, sales_path.to_path_buf());
        tracing::info!(
            sales = store.sales.len(),
            rfm = store.rfm.len(),
            branches = store.options.branches.len(),
            months = store.options.months.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "datasets loaded"
        );
        Ok(store)
    }

    /// Resolve both file names inside `data_dir` and load them.
    pub fn load_from_dir(data_dir: &Path, sales_file: &str, rfm_file: &str) -> Result<Self> {
        if !data_dir.is_dir() {
            return Err(DashboardError::DataPathNotFound(data_dir.to_path_buf()));
        }
        Self::load(&data_dir.join(sales_file), &data_dir.join(rfm_file))
    }

    /// Build a store from records already in memory.
    pub fn from_records(sales: Vec<SalesRecord>, rfm: Vec<RfmRecord>, sales_path: PathBuf) -> Self {
        let options = filter_options(&sales);
        Self {
            sales,
            rfm,
            options,
            sales_path,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn sales(&self) -> &[SalesRecord] {
        &self.sales
    }

    pub fn rfm(&self) -> &[RfmRecord] {
        &self.rfm
    }

    /// Branches and month labels offered by the slicers.
    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    /// Where the sales export was read from.
    pub fn sales_path(&self) -> &Path {
        &self.sales_path
    }

    /// Run the report pipeline over the stored datasets.
    pub fn report(&self, filter: &FilterSelection, top_n: usize) -> DashboardReport {
        build_report(&self.sales, &self.rfm, filter, top_n)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
