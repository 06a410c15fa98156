//! Core types for the NOx air-quality pipeline.
//!
//! Holds the record and aggregate models, the error taxonomy, per-field
//! coercion policies, summary statistics, regulatory limits and the small
//! formatting helpers shared by the data and UI crates.

pub mod coercion;
pub mod config;
pub mod error;
pub mod formatting;
pub mod limits;
pub mod models;
pub mod stats;
pub mod time_utils;
