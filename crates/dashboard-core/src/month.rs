//! Month label normalization.
//!
//! Sales exports carry the month as free text typed by hand ("Jan", "Sept",
//! "Oktober", blanks, …) and sometimes a separate numeric month column. This
//! module folds both into a [`NormalizedMonth`]: a display label plus a sort
//! order that puts the calendar months first, blanks next and anything
//! unrecognized last.

use chrono::Month;
use serde::{Deserialize, Serialize};

/// Label used for records whose month is missing.
pub const BLANK_LABEL: &str = "(blank)";

/// Sort order for blank months (right after December).
pub const BLANK_ORDER: u8 = 13;

/// Sort order for months that could not be resolved.
pub const UNRECOGNIZED_ORDER: u8 = 99;

/// The twelve calendar months in order.
pub const CANONICAL_MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Abbreviations and Indonesian spellings seen in the exports, mapped to the
/// lowercase English month name.
const MONTH_ALIASES: &[(&str, &str)] = &[
    ("jan", "january"),
    ("januari", "january"),
    ("feb", "february"),
    ("peb", "february"),
    ("februari", "february"),
    ("mar", "march"),
    ("maret", "march"),
    ("apr", "april"),
    ("mei", "may"),
    ("jun", "june"),
    ("juni", "june"),
    ("jul", "july"),
    ("juli", "july"),
    ("aug", "august"),
    ("agu", "august"),
    ("agt", "august"),
    ("agustus", "august"),
    ("sep", "september"),
    ("sept", "september"),
    ("oct", "october"),
    ("okt", "october"),
    ("oktober", "october"),
    ("nov", "november"),
    ("dec", "december"),
    ("des", "december"),
    ("desember", "december"),
];

// ── NormalizedMonth ───────────────────────────────────────────────────────────

/// Display label and sort order derived from a raw month cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedMonth {
    /// Canonical month name, [`BLANK_LABEL`], or the title-cased raw value.
    pub label: String,
    /// `1..=12`, [`BLANK_ORDER`] or [`UNRECOGNIZED_ORDER`].
    pub order: u8,
}

impl NormalizedMonth {
    /// The bucket for missing months.
    pub fn blank() -> Self {
        Self {
            label: BLANK_LABEL.to_string(),
            order: BLANK_ORDER,
        }
    }

    /// `true` for the blank bucket.
    pub fn is_blank(&self) -> bool {
        self.order == BLANK_ORDER
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Normalize a raw month cell and the optional numeric month cell.
///
/// * Missing, empty, `"nan"` and `"(blank)"` become the blank bucket (order 13)
///   whatever the numeric month says.
/// * Known abbreviations are resolved through the alias table.
/// * A numeric month that is a whole number in `1..=12` wins over the
///   name-derived order; other numbers are ignored.
/// * Unresolved names keep their text (title-cased) and get order 99 unless a
///   valid numeric month supplies one.
///
/// Never fails.
pub fn normalize_month(raw: Option<&str>, month_number: Option<f64>) -> NormalizedMonth {
    let clean = raw.map(|s| s.trim().to_lowercase()).unwrap_or_default();
    if is_blank_token(&clean) {
        return NormalizedMonth::blank();
    }

    let canonical = resolve_alias(&clean);
    let from_name = month_from_name(canonical);

    let order = month_number
        .and_then(month_from_number)
        .or_else(|| from_name.map(|m| m.number_from_month() as u8))
        .unwrap_or(UNRECOGNIZED_ORDER);

    let label = match from_name {
        Some(month) => month.name().to_string(),
        None => title_case(canonical),
    };

    NormalizedMonth { label, order }
}

/// Upper-case the first letter of every alphabetic run and lower-case the
/// rest, so `"q1-end"` becomes `"Q1-End"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn is_blank_token(clean: &str) -> bool {
    clean.is_empty() || clean == "nan" || clean == BLANK_LABEL
}

fn resolve_alias(clean: &str) -> &str {
    MONTH_ALIASES
        .iter()
        .find(|(alias, _)| *alias == clean)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(clean)
}

fn month_from_name(name: &str) -> Option<Month> {
    CANONICAL_MONTHS
        .iter()
        .copied()
        .find(|m| m.name().eq_ignore_ascii_case(name))
}

fn month_from_number(n: f64) -> Option<u8> {
    if n.fract() == 0.0 && (1.0..=12.0).contains(&n) {
        Some(n as u8)
    } else {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
