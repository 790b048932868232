use serde::{Deserialize, Serialize};

// ── Column names ──────────────────────────────────────────────────────────────

/// Header names used by the sales invoice export.
pub mod sales_columns {
    pub const BRANCH: &str = "Branch";
    pub const MONTH: &str = "Month";
    pub const MONTH_NUMBER: &str = "MonthNumber";
    pub const SOURCE: &str = "Source";
    pub const CUSTOMER: &str = "Customer";
    pub const ITEM_NAME: &str = "Item Name (Sales Invoice Item)";
    pub const QUANTITY: &str = "Quantity";
    pub const GRAND_TOTAL: &str = "Grand Total (Company Currency)";
    pub const ID: &str = "ID";
}

/// Header names used by the RFM segmentation export.
pub mod rfm_columns {
    pub const CUSTOMER: &str = "Customer";
    pub const SEGMENT: &str = "Segment_Name_Current";
}

// ── Records ───────────────────────────────────────────────────────────────────

/// One line of the sales invoice dataset.
///
/// Numeric cells that are missing or malformed have already been coerced to
/// `0.0` by the time a record exists; textual cells that were empty are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Branch (store) name. Empty when the cell was blank.
    pub branch: String,
    /// Free-text month as typed into the export.
    pub month: Option<String>,
    /// Numeric month, when the optional `MonthNumber` column holds a number.
    pub month_number: Option<f64>,
    /// Raw sales channel (`"Apps"`, `"ERP"`, …).
    pub source: Option<String>,
    /// Customer name.
    pub customer: Option<String>,
    /// Invoice line item name.
    pub item_name: Option<String>,
    /// Units sold.
    pub quantity: f64,
    /// Line revenue in company currency.
    pub grand_total: f64,
    /// Invoice identifier.
    pub id: Option<String>,
}

/// One customer row of the pre-computed RFM segmentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RfmRecord {
    pub customer: Option<String>,
    pub segment: Option<String>,
}

// ── CellConverter ─────────────────────────────────────────────────────────────

/// Cell contents the exports use for "no value". Matched case-sensitively
/// after trimming, as spreadsheet tools write them.
pub const MISSING_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Lenient conversions from raw CSV cells.
pub struct CellConverter;

impl CellConverter {
    /// `true` for blank cells and the [`MISSING_TOKENS`] placeholders.
    pub fn is_missing(raw: &str) -> bool {
        let trimmed = raw.trim();
        trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed)
    }

    /// Trimmed cell content, or `None` when the cell is blank or holds a
    /// missing-value placeholder such as `NA` or `NULL`.
    pub fn text(raw: &str) -> Option<String> {
        if Self::is_missing(raw) {
            None
        } else {
            Some(raw.trim().to_string())
        }
    }

    /// Parse a numeric cell. Blank, non-numeric and non-finite values yield
    /// `None`.
    pub fn number(raw: &str) -> Option<f64> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Parse a numeric cell, treating anything unparseable as zero.
    pub fn number_or_zero(raw: &str) -> f64 {
        Self::number(raw).unwrap_or(0.0)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
