//! Core types for the sales dashboard.
//!
//! Holds the record models, the month and source normalizers, the filter
//! selection, number formatting helpers, CLI settings and the shared error
//! type used by every other crate in the workspace.

pub mod error;
pub mod filter;
pub mod formatting;
pub mod models;
pub mod month;
pub mod settings;
pub mod source;
