//! Data layer for the sales dashboard.
//!
//! Reads the sales invoice and RFM CSV exports, normalizes months and sales
//! channels, and runs the aggregation pipeline behind every chart and table.

pub mod aggregator;
pub mod analysis;
pub mod reader;

pub use dashboard_core as core;
