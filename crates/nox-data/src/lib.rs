//! Data pipeline for the NOx air-quality report.
//!
//! Discovers and reads the source CSV files, merges them into one table,
//! normalizes it into typed measurements and aggregates those into the
//! yearly, monthly and daily series the presenter draws.

pub mod aggregator;
pub mod analysis;
pub mod merger;
pub mod normalizer;
pub mod reader;

pub use nox_core as core;
