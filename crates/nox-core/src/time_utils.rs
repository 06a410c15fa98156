//! Fixed-position extraction of calendar components from `DD/MM/YYYY`
//! dates and `HH:MM` times.
//!
//! Positions are counted in characters, not bytes, and out-of-range bounds
//! clamp to the end of the string. A date shorter than the layout therefore
//! yields short or empty components; those fail strict coercion downstream
//! rather than being repaired here.

use chrono::NaiveDate;

// ── Character slicing ─────────────────────────────────────────────────────────

/// Substring covering characters `[start, end)`; `end = None` runs to the end.
///
/// Bounds past the end of `s` clamp, and an inverted range yields `""`.
pub fn char_slice(s: &str, start: usize, end: Option<usize>) -> &str {
    let offset = |n: usize| s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len());
    let from = offset(start);
    let to = end.map(offset).unwrap_or(s.len());
    if to <= from {
        ""
    } else {
        &s[from..to]
    }
}

// ── Date / time components ────────────────────────────────────────────────────

/// Textual day, month and year components of a `DD/MM/YYYY` date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts<'a> {
    pub day: &'a str,
    pub month: &'a str,
    pub year: &'a str,
}

/// Split `date` at characters `[0,2)`, `[3,5)` and `[6,end)`.
pub fn split_date(date: &str) -> DateParts<'_> {
    DateParts {
        day: char_slice(date, 0, Some(2)),
        month: char_slice(date, 3, Some(5)),
        year: char_slice(date, 6, None),
    }
}

/// Leading two characters of an `HH:MM` time.
pub fn hour_part(time: &str) -> &str {
    char_slice(time, 0, Some(2))
}

/// The calendar date for a grid cell, or `None` for cells such as 30 February.
pub fn calendar_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}
