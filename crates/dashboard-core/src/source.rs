//! Sales channel normalization.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::month::BLANK_LABEL;

/// Cleaned sales channel of an invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceChannel {
    /// Orders placed through the mobile apps.
    Apps,
    /// Orders entered in the ERP.
    Erp,
    /// No source recorded.
    Blank,
    /// Any other value, kept lowercased and trimmed.
    Other(String),
}

impl SourceChannel {
    /// Display label: `"Apps"`, `"ERP"`, `"(blank)"` or the stored value.
    pub fn label(&self) -> &str {
        match self {
            SourceChannel::Apps => "Apps",
            SourceChannel::Erp => "ERP",
            SourceChannel::Blank => BLANK_LABEL,
            SourceChannel::Other(value) => value,
        }
    }
}

impl fmt::Display for SourceChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for SourceChannel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Normalize a raw `Source` cell.
///
/// Blank cells become [`SourceChannel::Blank`]; `app`/`apps` and `erp` are
/// matched case-insensitively; everything else is kept in lowercase.
pub fn normalize_source(raw: Option<&str>) -> SourceChannel {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return SourceChannel::Blank;
    }

    let lower = trimmed.to_lowercase();
    match lower.as_str() {
        "apps" | "app" => SourceChannel::Apps,
        "erp" => SourceChannel::Erp,
        BLANK_LABEL => SourceChannel::Blank,
        _ => SourceChannel::Other(lower),
    }
}
