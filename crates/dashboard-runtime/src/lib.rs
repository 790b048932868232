//! Runtime layer for the sales dashboard.
//!
//! Owns the load-once dataset service and the interactive session that
//! recomputes the report whenever the slicer selection changes.

pub mod data_manager;
pub mod session;

pub use dashboard_core as core;
pub use dashboard_data as data;
