use crate::models::Reading;

/// Placeholder shown wherever a reading is missing.
pub const MISSING_MARKER: &str = "–";

/// Format a reading with a fixed number of decimals, or the missing marker.
///
/// # Examples
///
/// ```
/// use nox_core::formatting::format_reading;
///
/// assert_eq!(format_reading(Some(50.0), 1), "50.0");
/// assert_eq!(format_reading(Some(12.346), 2), "12.35");
/// assert_eq!(format_reading(None, 1), "–");
/// ```
pub fn format_reading(reading: Reading, decimals: usize) -> String {
    match reading {
        Some(value) => format!("{:.prec$}", value, prec = decimals),
        None => MISSING_MARKER.to_string(),
    }
}

/// Reading with its unit, e.g. `"41.3 µg/m³"`, or the missing marker.
///
/// # Examples
///
/// ```
/// use nox_core::formatting::format_concentration;
///
/// assert_eq!(format_concentration(Some(41.26)), "41.3 µg/m³");
/// assert_eq!(format_concentration(None), "–");
/// ```
pub fn format_concentration(reading: Reading) -> String {
    match reading {
        Some(_) => format!("{} µg/m³", format_reading(reading, 1)),
        None => MISSING_MARKER.to_string(),
    }
}

/// Label for a monthly grid cell.
///
/// # Examples
///
/// ```
/// use nox_core::formatting::month_label;
///
/// assert_eq!(month_label(2019, 3), "2019-03");
/// ```
pub fn month_label(year: i32, month: u32) -> String {
    format!("{}-{:02}", year, month)
}

/// Label for a daily grid cell. Impossible dates such as 30 February are
/// labelled like any other cell.
///
/// # Examples
///
/// ```
/// use nox_core::formatting::day_label;
///
/// assert_eq!(day_label(2021, 2, 30), "2021-02-30");
/// ```
pub fn day_label(year: i32, month: u32, day: u32) -> String {
    format!("{}-{:02}-{:02}", year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_reading ───────────────────────────────────────────────────────

    #[test]
    fn test_format_reading_zero_is_not_missing() {
        assert_eq!(format_reading(Some(0.0), 1), "0.0");
    }

    #[test]
    fn test_format_reading_no_decimals() {
        assert_eq!(format_reading(Some(209.6), 0), "210");
    }

    #[test]
    fn test_format_reading_missing() {
        assert_eq!(format_reading(None, 3), MISSING_MARKER);
    }

    // ── format_concentration ─────────────────────────────────────────────────

    #[test]
    fn test_format_concentration_unit_suffix() {
        assert_eq!(format_concentration(Some(200.0)), "200.0 µg/m³");
    }

    // ── labels ───────────────────────────────────────────────────────────────

    #[test]
    fn test_month_label_pads() {
        assert_eq!(month_label(2020, 12), "2020-12");
        assert_eq!(month_label(2020, 1), "2020-01");
    }

    #[test]
    fn test_day_label_pads() {
        assert_eq!(day_label(2019, 7, 4), "2019-07-04");
    }
}
