use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::error::Result;
use crate::limits::{ANNUAL_MEAN_LIMIT_UGM3, HOURLY_EXCEEDANCES_ALLOWED};
use crate::stats::SummaryStats;
use crate::time_utils::calendar_date;

/// A NOx concentration in µg/m³, or `None` when no valid measurement exists.
pub type Reading = Option<f64>;

// ── Tables ────────────────────────────────────────────────────────────────────

/// One source file parsed into header names and text rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    /// File the table was read from.
    pub source: PathBuf,
    /// Column names from the header row.
    pub headers: Vec<String>,
    /// Data rows in file order; every row has `headers.len()` fields.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The header names as an unordered set.
    pub fn column_set(&self) -> BTreeSet<&str> {
        self.headers.iter().map(String::as_str).collect()
    }
}

/// A row of the merged table with its freshly assigned index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedRow {
    pub index: usize,
    pub values: Vec<String>,
}

/// All source tables concatenated under one header with a contiguous index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedTable {
    pub headers: Vec<String>,
    pub rows: Vec<IndexedRow>,
}

impl MergedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column called `name`, if any.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Rename column `from` to `to`. Returns `false` when `from` is absent.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_index(from) {
            Some(i) => {
                self.headers[i] = to.to_string();
                true
            }
            None => false,
        }
    }
}

// ── Records ───────────────────────────────────────────────────────────────────

/// A measurement row as read from a source file, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub index: usize,
    pub date: String,
    pub time: String,
    pub status: String,
    pub nitrogen_oxides: String,
}

/// A normalized measurement.
///
/// `day`, `month`, `year` and `hour` are extracted from `date` and `time` by
/// fixed character position. `nitrogen_oxides` is a non-negative value or
/// missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub index: usize,
    pub date: String,
    pub time: String,
    /// Unit suffix only, e.g. `ugm-3`.
    pub status: String,
    pub nitrogen_oxides: Reading,
    pub day: u32,
    pub month: u32,
    pub year: i32,
    pub hour: u32,
}

// ── Dataset ───────────────────────────────────────────────────────────────────

/// The normalized measurements of one run, in merge order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    measurements: Vec<Measurement>,
}

impl Dataset {
    pub fn new(measurements: Vec<Measurement>) -> Self {
        Self { measurements }
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Measurement> {
        self.measurements.iter()
    }

    /// Distinct years in first-seen order.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = Vec::new();
        for m in &self.measurements {
            if !years.contains(&m.year) {
                years.push(m.year);
            }
        }
        years
    }

    /// Number of measurements whose reading is missing.
    pub fn missing_count(&self) -> usize {
        self.measurements
            .iter()
            .filter(|m| m.nitrogen_oxides.is_none())
            .count()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Measurement;
    type IntoIter = std::slice::Iter<'a, Measurement>;

    fn into_iter(self) -> Self::IntoIter {
        self.measurements.iter()
    }
}

// ── Aggregates ────────────────────────────────────────────────────────────────

/// Statistics for one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyStat {
    pub year: i32,
    pub summary: SummaryStats,
    /// Readings at or above the hourly limit.
    pub count_over_threshold: u32,
}

impl YearlyStat {
    /// Annual mean above the 40 µg/m³ objective. Missing means never breach.
    pub fn breaches_annual_mean(&self) -> bool {
        self.summary
            .mean
            .map(|m| m > ANNUAL_MEAN_LIMIT_UGM3)
            .unwrap_or(false)
    }

    /// More hourly exceedances than the 18 allowed per year.
    pub fn breaches_hourly_limit(&self) -> bool {
        self.count_over_threshold > HOURLY_EXCEEDANCES_ALLOWED
    }
}

/// Statistics for one (year, month) cell of the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyStat {
    pub year: i32,
    pub month: u32,
    pub summary: SummaryStats,
}

/// Statistics for one (year, month, day) cell of the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStat {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub summary: SummaryStats,
}

impl DailyStat {
    /// The real calendar date, or `None` for impossible cells like 30 February.
    pub fn date(&self) -> Option<chrono::NaiveDate> {
        calendar_date(self.year, self.month, self.day)
    }
}

// ── NoxSeries ─────────────────────────────────────────────────────────────────

/// Flat, positionally aligned series handed to the presenter.
///
/// Yearly series are parallel to `year_list`; monthly series have
/// `year_list.len() * 12` entries and daily series
/// `year_list.len() * 12 * 30`, ordered year, then month, then day.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoxSeries {
    pub year_list: Vec<i32>,
    pub yearly_average_nox: Vec<Reading>,
    pub yearly_max_nox: Vec<Reading>,
    pub yearly_min_nox: Vec<Reading>,
    pub yearly_count_over_200: Vec<u32>,
    pub monthly_average_nox: Vec<Reading>,
    pub monthly_max_nox: Vec<Reading>,
    pub monthly_min_nox: Vec<Reading>,
    pub daily_average_nox: Vec<Reading>,
    pub daily_max_nox: Vec<Reading>,
    pub daily_min_nox: Vec<Reading>,
}

impl NoxSeries {
    /// Flatten the aggregate tables into presenter series.
    pub fn from_stats(yearly: &[YearlyStat], monthly: &[MonthlyStat], daily: &[DailyStat]) -> Self {
        Self {
            year_list: yearly.iter().map(|y| y.year).collect(),
            yearly_average_nox: yearly.iter().map(|y| y.summary.mean).collect(),
            yearly_max_nox: yearly.iter().map(|y| y.summary.max).collect(),
            yearly_min_nox: yearly.iter().map(|y| y.summary.min).collect(),
            yearly_count_over_200: yearly.iter().map(|y| y.count_over_threshold).collect(),
            monthly_average_nox: monthly.iter().map(|m| m.summary.mean).collect(),
            monthly_max_nox: monthly.iter().map(|m| m.summary.max).collect(),
            monthly_min_nox: monthly.iter().map(|m| m.summary.min).collect(),
            daily_average_nox: daily.iter().map(|d| d.summary.mean).collect(),
            daily_max_nox: daily.iter().map(|d| d.summary.max).collect(),
            daily_min_nox: daily.iter().map(|d| d.summary.min).collect(),
        }
    }

    /// Pretty JSON with missing readings encoded as `null`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
