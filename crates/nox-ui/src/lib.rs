//! Terminal presenter for the NOx report.
//!
//! Draws the aggregate series as bar charts with regulatory reference
//! lines, plus a per-year summary table, using [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod table_view;
pub mod themes;

pub use nox_core as core;
