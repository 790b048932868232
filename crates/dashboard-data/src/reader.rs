//! CSV loading for the sales invoice and RFM exports.
//!
//! Columns are looked up by header name. A missing required column is fatal;
//! missing optional columns (`MonthNumber`, `Source`) simply leave the field
//! empty. Numeric cells that do not parse are coerced to zero and counted.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{rfm_columns, sales_columns, CellConverter, RfmRecord, SalesRecord};
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the sales invoice export from `path`.
pub fn load_sales(path: &Path) -> Result<Vec<SalesRecord>> {
    let file = open(path)?;
    read_sales(file, path)
}

/// Load the RFM segmentation export from `path`.
pub fn load_rfm(path: &Path) -> Result<Vec<RfmRecord>> {
    let file = open(path)?;
    read_rfm(file, path)
}

/// Parse sales records from any reader. `origin` is only used in errors and
/// log lines.
pub fn read_sales<R: Read>(reader: R, origin: &Path) -> Result<Vec<SalesRecord>> {
    let mut csv_reader = build_reader(reader);
    let columns = ColumnIndex::from_headers(csv_reader.headers()?, origin);

    let branch = columns.required(sales_columns::BRANCH)?;
    let month = columns.required(sales_columns::MONTH)?;
    let customer = columns.required(sales_columns::CUSTOMER)?;
    let item_name = columns.required(sales_columns::ITEM_NAME)?;
    let quantity = columns.required(sales_columns::QUANTITY)?;
    let grand_total = columns.required(sales_columns::GRAND_TOTAL)?;
    let id = columns.required(sales_columns::ID)?;
    let month_number = columns.optional(sales_columns::MONTH_NUMBER);
    let source = columns.optional(sales_columns::SOURCE);

    let mut records = Vec::new();
    let mut coerced = 0usize;

    for result in csv_reader.records() {
        let row = result?;
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        let quantity_value = CellConverter::number(cell(quantity));
        let total_value = CellConverter::number(cell(grand_total));
        coerced += usize::from(quantity_value.is_none()) + usize::from(total_value.is_none());

        records.push(SalesRecord {
            branch: CellConverter::text(cell(branch)).unwrap_or_default(),
            month: CellConverter::text(cell(month)),
            month_number: month_number.and_then(|idx| CellConverter::number(cell(idx))),
            source: source.and_then(|idx| CellConverter::text(cell(idx))),
            customer: CellConverter::text(cell(customer)),
            item_name: CellConverter::text(cell(item_name)),
            quantity: quantity_value.unwrap_or(0.0),
            grand_total: total_value.unwrap_or(0.0),
            id: CellConverter::text(cell(id)),
        });
    }

    if coerced > 0 {
        warn!(
            "{}: {} non-numeric quantity/total cells counted as 0",
            origin.display(),
            coerced
        );
    }
    if month_number.is_none() {
        debug!("{}: no MonthNumber column, ordering by month name", origin.display());
    }
    debug!("Loaded {} sales records from {}", records.len(), origin.display());

    Ok(records)
}

/// Parse RFM records from any reader.
pub fn read_rfm<R: Read>(reader: R, origin: &Path) -> Result<Vec<RfmRecord>> {
    let mut csv_reader = build_reader(reader);
    let columns = ColumnIndex::from_headers(csv_reader.headers()?, origin);

    let customer = columns.required(rfm_columns::CUSTOMER)?;
    let segment = columns.required(rfm_columns::SEGMENT)?;

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let row = result?;
        records.push(RfmRecord {
            customer: CellConverter::text(row.get(customer).unwrap_or("")),
            segment: CellConverter::text(row.get(segment).unwrap_or("")),
        });
    }

    debug!("Loaded {} RFM records from {}", records.len(), origin.display());
    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn open(path: &Path) -> Result<std::fs::File> {
    std::fs::File::open(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Short rows are padded with empty cells rather than rejected.
fn build_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Header name → column position.
struct ColumnIndex<'a> {
    positions: HashMap<String, usize>,
    origin: &'a Path,
}

impl<'a> ColumnIndex<'a> {
    fn from_headers(headers: &csv::StringRecord, origin: &'a Path) -> Self {
        let positions = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim_start_matches('\u{feff}').trim().to_string(), i))
            .collect();
        Self { positions, origin }
    }

    fn required(&self, name: &str) -> Result<usize> {
        self.optional(name)
            .ok_or_else(|| DashboardError::MissingColumn {
                file: self.origin.to_path_buf(),
                column: name.to_string(),
            })
    }

    fn optional(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::SalesAggregator;
    use dashboard_core::month::BLANK_LABEL;
    use dashboard_core::source::SourceChannel;
    use std::io::Write;
    use tempfile::TempDir;

    const SALES_HEADER: &str = "ID,Branch,Month,MonthNumber,Source,Customer,Item Name (Sales Invoice Item),Quantity,Grand Total (Company Currency)";

    fn sales_csv(rows: &[&str]) -> String {
        let mut s = String::from(SALES_HEADER);
        for row in rows {
            s.push('\n');
            s.push_str(row);
        }
        s.push('\n');
        s
    }

    // ── read_sales ────────────────────────────────────────────────────────────

    #[test]
    fn test_read_sales_basic_row() {
        let data = sales_csv(&["INV-1,Jakarta,Jan,1,Apps,Alice,Shampoo 250ml,3,150000"]);
        let records = read_sales(data.as_bytes(), Path::new("sales.csv")).unwrap();

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.id.as_deref(), Some("INV-1"));
        assert_eq!(r.branch, "Jakarta");
        assert_eq!(r.month.as_deref(), Some("Jan"));
        assert_eq!(r.month_number, Some(1.0));
        assert_eq!(r.source.as_deref(), Some("Apps"));
        assert_eq!(r.customer.as_deref(), Some("Alice"));
        assert_eq!(r.item_name.as_deref(), Some("Shampoo 250ml"));
        assert_eq!(r.quantity, 3.0);
        assert_eq!(r.grand_total, 150_000.0);
    }

    #[test]
    fn test_read_sales_coerces_bad_numbers_to_zero() {
        let data = sales_csv(&["INV-2,Bandung,Feb,,ERP,Bob,Conditioner,abc,"]);
        let records = read_sales(data.as_bytes(), Path::new("sales.csv")).unwrap();

        assert_eq!(records[0].quantity, 0.0);
        assert_eq!(records[0].grand_total, 0.0);
        assert!(records[0].month_number.is_none());
    }

    #[test]
    fn test_read_sales_blank_cells_become_none() {
        let data = sales_csv(&[",Jakarta,  ,,  ,,,1,10"]);
        let records = read_sales(data.as_bytes(), Path::new("sales.csv")).unwrap();

        let r = &records[0];
        assert!(r.id.is_none());
        assert!(r.month.is_none());
        assert!(r.source.is_none());
        assert!(r.customer.is_none());
        assert!(r.item_name.is_none());
    }

    #[test]
    fn test_read_sales_placeholder_cells_are_missing() {
        let data = sales_csv(&["1,Jakarta,NA,,N/A,NULL,Shampoo,1,10", "2,n/a,#N/A,,null,None,Serum,1,5"]);
        let records = read_sales(data.as_bytes(), Path::new("sales.csv")).unwrap();

        assert!(records[0].month.is_none());
        assert!(records[0].source.is_none());
        assert!(records[0].customer.is_none());
        assert_eq!(records[1].branch, "");
        assert!(records[1].month.is_none());
        assert!(records[1].source.is_none());
        assert!(records[1].customer.is_none());

        let sales = SalesAggregator::normalize(&records);
        assert_eq!(sales[0].month.label, BLANK_LABEL);
        assert_eq!(sales[0].source, SourceChannel::Blank);
        assert_eq!(SalesAggregator::kpis(&[&records[0]]).total_customers, 0);
    }

    #[test]
    fn test_read_sales_short_row_is_padded() {
        let data = sales_csv(&["INV-3,Jakarta,Mar"]);
        let records = read_sales(data.as_bytes(), Path::new("sales.csv")).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].month.as_deref(), Some("Mar"));
        assert_eq!(records[0].grand_total, 0.0);
    }

    #[test]
    fn test_read_sales_optional_columns_may_be_absent() {
        let data = "ID,Branch,Month,Customer,Item Name (Sales Invoice Item),Quantity,Grand Total (Company Currency)\n\
                    1,Jakarta,April,Carol,Serum,2,5000\n";
        let records = read_sales(data.as_bytes(), Path::new("sales.csv")).unwrap();

        assert!(records[0].month_number.is_none());
        assert!(records[0].source.is_none());
        assert_eq!(records[0].grand_total, 5000.0);
    }

    #[test]
    fn test_read_sales_missing_required_column_is_fatal() {
        let data = "ID,Branch,Month,Customer,Quantity,Grand Total (Company Currency)\n1,A,Jan,C,1,1\n";
        let err = read_sales(data.as_bytes(), Path::new("sales.csv")).unwrap_err();

        match err {
            DashboardError::MissingColumn { column, .. } => {
                assert_eq!(column, "Item Name (Sales Invoice Item)");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_sales_quoted_fields() {
        let data = sales_csv(&["INV-4,\"Jakarta, Pusat\",May,5,app,\"Dewi\",\"Hair Mask, 200g\",1,\"99000\""]);
        let records = read_sales(data.as_bytes(), Path::new("sales.csv")).unwrap();

        assert_eq!(records[0].branch, "Jakarta, Pusat");
        assert_eq!(records[0].item_name.as_deref(), Some("Hair Mask, 200g"));
        assert_eq!(records[0].grand_total, 99_000.0);
    }

    // ── read_rfm ──────────────────────────────────────────────────────────────

    #[test]
    fn test_read_rfm() {
        let data = "Customer,Recency,Segment_Name_Current\nAlice,3,Champions\nBob,90,\n";
        let records = read_rfm(data.as_bytes(), Path::new("rfm.csv")).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].segment.as_deref(), Some("Champions"));
        assert!(records[1].segment.is_none());
    }

    #[test]
    fn test_read_rfm_missing_segment_column() {
        let data = "Customer,Segment\nAlice,Champions\n";
        let err = read_rfm(data.as_bytes(), Path::new("rfm.csv")).unwrap_err();
        assert!(err.to_string().contains("Segment_Name_Current"));
    }

    // ── load_* (filesystem) ───────────────────────────────────────────────────

    #[test]
    fn test_load_sales_from_file() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("SalesInvoice.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "{}", sales_csv(&["1,Jakarta,Jan,,Apps,Alice,Shampoo,1,100"])).unwrap();

        let records = load_sales(&path).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_load_sales_missing_file() {
        let tmp = TempDir::new().expect("tempdir");
        let err = load_sales(&tmp.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::FileRead { .. }));
    }

    #[test]
    fn test_load_rfm_from_file_with_bom() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("RFMCurrent.csv");
        std::fs::write(&path, "\u{feff}Customer,Segment_Name_Current\nAlice,Loyal\n").unwrap();

        let records = load_rfm(&path).unwrap();
        assert_eq!(records[0].customer.as_deref(), Some("Alice"));
        assert_eq!(records[0].segment.as_deref(), Some("Loyal"));
    }
}
