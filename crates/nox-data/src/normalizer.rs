//! Normalization of the merged table into typed [`Measurement`]s.
//!
//! Stages run column by column in a fixed order: rename the measurement
//! column, clean Status, split Date, split Time, coerce the calendar
//! components strictly, then coerce the measurement leniently. The first
//! strict failure stops the run.

use std::str::FromStr;
use std::sync::OnceLock;

use nox_core::coercion::{coerce_component, coerce_reading, Field};
use nox_core::error::{NoxError, Result};
use nox_core::limits::{DATE_COLUMN, NOX_COLUMN, NOX_COLUMN_SOURCE, STATUS_COLUMN, TIME_COLUMN};
use nox_core::models::{Dataset, Measurement, MergedTable, RawRecord};
use nox_core::time_utils::{hour_part, split_date};
use regex::Regex;
use tracing::{debug, info};

// ── Public API ────────────────────────────────────────────────────────────────

/// Normalize a merged table into a [`Dataset`].
pub fn normalize(mut table: MergedTable) -> Result<Dataset> {
    // Nothing was merged, so there is no header to check.
    if table.headers.is_empty() && table.is_empty() {
        return Ok(Dataset::default());
    }

    table.rename_column(NOX_COLUMN_SOURCE, NOX_COLUMN);
    let records = extract_records(&table)?;

    let statuses: Vec<String> = records.iter().map(|r| clean_status(&r.status)).collect();

    let (days, months, years, hours) = {
        let dates: Vec<_> = records.iter().map(|r| split_date(&r.date)).collect();
        let hour_text: Vec<&str> = records.iter().map(|r| hour_part(&r.time)).collect();

        let days: Vec<u32> = coerce_column(Field::Day, &records, |i| dates[i].day)?;
        let months: Vec<u32> = coerce_column(Field::Month, &records, |i| dates[i].month)?;
        let years: Vec<i32> = coerce_column(Field::Year, &records, |i| dates[i].year)?;
        let hours: Vec<u32> = coerce_column(Field::Hour, &records, |i| hour_text[i])?;
        (days, months, years, hours)
    };

    let readings = records
        .iter()
        .map(|r| coerce_reading(r.index, &r.nitrogen_oxides))
        .collect::<Result<Vec<_>>>()?;

    let measurements: Vec<Measurement> = records
        .into_iter()
        .zip(statuses)
        .enumerate()
        .map(|(i, (record, status))| Measurement {
            index: record.index,
            date: record.date,
            time: record.time,
            status,
            nitrogen_oxides: readings[i],
            day: days[i],
            month: months[i],
            year: years[i],
            hour: hours[i],
        })
        .collect();

    let dataset = Dataset::new(measurements);
    info!(
        "Normalized {} measurements ({} missing readings)",
        dataset.len(),
        dataset.missing_count()
    );
    Ok(dataset)
}

/// Strip the leading "word + space" from a Status value, leaving the unit.
///
/// `"V ugm-3"` becomes `"ugm-3"`; values without a leading token followed by
/// a space pass through unchanged.
pub fn clean_status(status: &str) -> String {
    status_prefix().replace(status, "").into_owned()
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn status_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\S+ ").expect("regex is valid"))
}

/// Pull the four source columns out of every row.
fn extract_records(table: &MergedTable) -> Result<Vec<RawRecord>> {
    let column = |name: &str| {
        table
            .column_index(name)
            .ok_or_else(|| NoxError::MissingColumn(name.to_string()))
    };
    let date = column(DATE_COLUMN)?;
    let time = column(TIME_COLUMN)?;
    let status = column(STATUS_COLUMN)?;
    let nox = column(NOX_COLUMN)?;

    let records: Vec<RawRecord> = table
        .rows
        .iter()
        .map(|row| RawRecord {
            index: row.index,
            date: row.values[date].clone(),
            time: row.values[time].clone(),
            status: row.values[status].clone(),
            nitrogen_oxides: row.values[nox].clone(),
        })
        .collect();

    debug!("Extracted {} raw records", records.len());
    Ok(records)
}

/// Strictly coerce one calendar column; `text(i)` yields row `i`'s raw text.
fn coerce_column<'a, T: FromStr>(
    field: Field,
    records: &[RawRecord],
    text: impl Fn(usize) -> &'a str,
) -> Result<Vec<T>> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| coerce_component::<T>(field, record.index, text(i)))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
