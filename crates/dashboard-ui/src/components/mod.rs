//! Reusable dashboard widgets.

pub mod bar_chart;
pub mod header;
pub mod kpi_cards;
pub mod share_bar;
