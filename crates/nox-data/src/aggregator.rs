//! Yearly, monthly and daily NOx statistics over a fixed calendar grid.
//!
//! Years are taken from the dataset in first-seen order. Monthly and daily
//! statistics enumerate every (year, month) and (year, month, day) cell of
//! the grid, not only the observed ones, so each series has a predictable
//! length. The daily grid stops at day 30.

use std::collections::HashMap;

use nox_core::limits::{DAYS_PER_MONTH_EVALUATED, HOURLY_LIMIT_UGM3, MONTHS_PER_YEAR};
use nox_core::models::{DailyStat, Dataset, MonthlyStat, NoxSeries, Reading, YearlyStat};
use nox_core::stats::{count_at_or_above, SummaryStats};
use tracing::debug;

// ── AggregateTables ───────────────────────────────────────────────────────────

/// The three aggregate tables of one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateTables {
    pub yearly: Vec<YearlyStat>,
    pub monthly: Vec<MonthlyStat>,
    pub daily: Vec<DailyStat>,
}

impl AggregateTables {
    /// Flatten into the presenter series.
    pub fn to_series(&self) -> NoxSeries {
        NoxSeries::from_stats(&self.yearly, &self.monthly, &self.daily)
    }
}

// ── NoxAggregator ─────────────────────────────────────────────────────────────

/// Groups readings by calendar period and summarises each group.
#[derive(Debug, Clone)]
pub struct NoxAggregator {
    threshold: f64,
}

impl Default for NoxAggregator {
    fn default() -> Self {
        Self::new(HOURLY_LIMIT_UGM3)
    }
}

impl NoxAggregator {
    /// Aggregator counting readings at or above `threshold` per year.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Run all three aggregations over `dataset`.
    pub fn aggregate(&self, dataset: &Dataset) -> AggregateTables {
        let years = dataset.years();
        let tables = AggregateTables {
            yearly: self.aggregate_yearly(dataset, &years),
            monthly: self.aggregate_monthly(dataset, &years),
            daily: self.aggregate_daily(dataset, &years),
        };
        debug!(
            "Aggregated {} years, {} months, {} days",
            tables.yearly.len(),
            tables.monthly.len(),
            tables.daily.len()
        );
        tables
    }

    /// One [`YearlyStat`] per entry of `years`, in that order.
    pub fn aggregate_yearly(&self, dataset: &Dataset, years: &[i32]) -> Vec<YearlyStat> {
        let groups = group_readings(dataset, |m| m.year);
        years
            .iter()
            .map(|&year| {
                let readings = groups.get(&year).map(Vec::as_slice).unwrap_or(&[]);
                YearlyStat {
                    year,
                    summary: SummaryStats::from_readings(readings.iter().copied()),
                    count_over_threshold: count_at_or_above(
                        readings.iter().copied(),
                        self.threshold,
                    ),
                }
            })
            .collect()
    }

    /// `years.len() * 12` cells ordered by year then month 1–12.
    pub fn aggregate_monthly(&self, dataset: &Dataset, years: &[i32]) -> Vec<MonthlyStat> {
        let groups = group_readings(dataset, |m| (m.year, m.month));
        let mut stats = Vec::with_capacity(years.len() * MONTHS_PER_YEAR as usize);
        for &year in years {
            for month in 1..=MONTHS_PER_YEAR {
                stats.push(MonthlyStat {
                    year,
                    month,
                    summary: summarise(groups.get(&(year, month))),
                });
            }
        }
        stats
    }

    /// `years.len() * 12 * 30` cells ordered by year, month, then day 1–30.
    ///
    /// Impossible dates such as 30 February are empty cells. Observations
    /// on day 31 are never part of any cell.
    pub fn aggregate_daily(&self, dataset: &Dataset, years: &[i32]) -> Vec<DailyStat> {
        let groups = group_readings(dataset, |m| (m.year, m.month, m.day));
        let cells = years.len() * (MONTHS_PER_YEAR * DAYS_PER_MONTH_EVALUATED) as usize;
        let mut stats = Vec::with_capacity(cells);
        for &year in years {
            for month in 1..=MONTHS_PER_YEAR {
                for day in 1..=DAYS_PER_MONTH_EVALUATED {
                    stats.push(DailyStat {
                        year,
                        month,
                        day,
                        summary: summarise(groups.get(&(year, month, day))),
                    });
                }
            }
        }
        stats
    }
}

// ── Private ───────────────────────────────────────────────────────────────────

/// Bucket every reading (missing included) under `key_fn`.
fn group_readings<K, F>(dataset: &Dataset, key_fn: F) -> HashMap<K, Vec<Reading>>
where
    K: std::hash::Hash + Eq,
    F: Fn(&nox_core::models::Measurement) -> K,
{
    let mut groups: HashMap<K, Vec<Reading>> = HashMap::new();
    for m in dataset {
        groups.entry(key_fn(m)).or_default().push(m.nitrogen_oxides);
    }
    groups
}

fn summarise(group: Option<&Vec<Reading>>) -> SummaryStats {
    match group {
        Some(readings) => SummaryStats::from_readings(readings.iter().copied()),
        None => SummaryStats::MISSING,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
