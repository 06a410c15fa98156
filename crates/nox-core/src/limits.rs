//! Source-file layout constants and the regulatory NOx limits.
//!
//! The hourly and annual limits are the UK air-quality objectives for
//! nitrogen dioxide: an hourly mean of 200 µg/m³ must not be exceeded more
//! than 18 times a year, and the annual mean must not exceed 40 µg/m³.

// ── Source layout ─────────────────────────────────────────────────────────────

/// Default file-name pattern for the downloaded measurement files.
pub const SOURCE_FILE_PATTERN: &str = "Bristol NOx*.csv";

/// Preamble lines before the header row (the header sits at row index 4).
pub const HEADER_ROWS: usize = 4;

/// Trailing non-data lines at the end of every source file.
pub const FOOTER_ROWS: usize = 4;

/// Columns per row: Date, Time, the measurement and Status.
pub const SOURCE_COLUMN_COUNT: usize = 4;

/// Descriptive measurement column name as it appears in the source files.
pub const NOX_COLUMN_SOURCE: &str = "Nitrogen oxides as nitrogen dioxide";

/// Canonical short name the normalizer renames the measurement column to.
pub const NOX_COLUMN: &str = "Nitrogen_Oxides";

pub const DATE_COLUMN: &str = "Date";
pub const TIME_COLUMN: &str = "Time";
pub const STATUS_COLUMN: &str = "Status";

// ── Regulatory limits ─────────────────────────────────────────────────────────

/// Hourly concentration at or above which a sample counts as an exceedance.
pub const HOURLY_LIMIT_UGM3: f64 = 200.0;

/// Number of hourly exceedances tolerated per calendar year.
pub const HOURLY_EXCEEDANCES_ALLOWED: u32 = 18;

/// Ceiling for the annual mean concentration.
pub const ANNUAL_MEAN_LIMIT_UGM3: f64 = 40.0;

// ── Calendar grid ─────────────────────────────────────────────────────────────

pub const MONTHS_PER_YEAR: u32 = 12;

/// Days enumerated per month in the daily grid. Day 31 is never evaluated.
pub const DAYS_PER_MONTH_EVALUATED: u32 = 30;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions() {
        assert_eq!(MONTHS_PER_YEAR * DAYS_PER_MONTH_EVALUATED, 360);
    }

    #[test]
    fn test_limits_are_ordered() {
        assert!(ANNUAL_MEAN_LIMIT_UGM3 < HOURLY_LIMIT_UGM3);
    }

    #[test]
    fn test_canonical_column_names_differ() {
        assert_ne!(NOX_COLUMN, NOX_COLUMN_SOURCE);
        assert!(!NOX_COLUMN.contains(' '));
    }
}
