//! Terminal UI layer for the sales dashboard.
//!
//! Provides themes, the header, KPI cards, bar and share-bar components, the
//! dashboard and branch table views, the plain-text report, and the
//! interactive event loop built on top of [`ratatui`].

pub mod app;
pub mod components;
pub mod dashboard_view;
pub mod report_text;
pub mod table_view;
pub mod themes;

pub use dashboard_core as core;
