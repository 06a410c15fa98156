//! Per-field coercion policy.
//!
//! Calendar components are coerced strictly: an unparsable value is a
//! [`NoxError::StrictCoercion`]. The measurement column is coerced
//! leniently: anything that is not a finite, non-negative number (notably
//! the `No data` sentinel) becomes a missing reading.

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::error::{NoxError, Result};
use crate::models::Reading;

// ── CoercionPolicy ────────────────────────────────────────────────────────────

/// How a text field is converted to its numeric type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionPolicy {
    /// Unparsable input is an error that stops the run.
    Strict,
    /// Unparsable input becomes a missing value.
    LenientToMissing,
}

// ── Field ─────────────────────────────────────────────────────────────────────

/// The normalized columns that go through numeric coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Day,
    Month,
    Year,
    Hour,
    NitrogenOxides,
}

impl Field {
    /// The coercion policy this field is subject to.
    pub const fn policy(self) -> CoercionPolicy {
        match self {
            Field::Day | Field::Month | Field::Year | Field::Hour => CoercionPolicy::Strict,
            Field::NitrogenOxides => CoercionPolicy::LenientToMissing,
        }
    }

    /// Column name in the normalized dataset.
    pub const fn name(self) -> &'static str {
        match self {
            Field::Day => "Day",
            Field::Month => "Month",
            Field::Year => "Year",
            Field::Hour => "Hour",
            Field::NitrogenOxides => "Nitrogen_Oxides",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Coercion entry points ─────────────────────────────────────────────────────

impl CoercionPolicy {
    /// Parse `raw` under this policy.
    ///
    /// `Strict` returns `Ok(Some(_))` or an error; `LenientToMissing` never
    /// errors and returns `Ok(None)` for unparsable input.
    pub fn apply<T: FromStr>(self, field: Field, row: usize, raw: &str) -> Result<Option<T>> {
        match (self, raw.parse::<T>()) {
            (_, Ok(value)) => Ok(Some(value)),
            (CoercionPolicy::LenientToMissing, Err(_)) => {
                trace!("Row {}: {} value {:?} treated as missing", row, field, raw);
                Ok(None)
            }
            (CoercionPolicy::Strict, Err(_)) => Err(strict_error(field, row, raw)),
        }
    }
}

/// Coerce a calendar component under its field's policy.
///
/// Calendar fields are strict, so a successful return always carries a value.
pub fn coerce_component<T: FromStr>(field: Field, row: usize, raw: &str) -> Result<T> {
    field
        .policy()
        .apply::<T>(field, row, raw)?
        .ok_or_else(|| strict_error(field, row, raw))
}

/// Coerce a measurement value to a [`Reading`].
///
/// Surrounding whitespace is ignored. Negative and non-finite values are
/// treated like any other unparsable input.
pub fn coerce_reading(row: usize, raw: &str) -> Result<Reading> {
    let field = Field::NitrogenOxides;
    let parsed = field.policy().apply::<f64>(field, row, raw.trim())?;
    Ok(parsed.filter(|v| v.is_finite() && *v >= 0.0))
}

fn strict_error(field: Field, row: usize, raw: &str) -> NoxError {
    NoxError::StrictCoercion {
        row,
        field: field.name().to_string(),
        value: raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Field::policy ────────────────────────────────────────────────────────

    #[test]
    fn test_calendar_fields_are_strict() {
        for field in [Field::Day, Field::Month, Field::Year, Field::Hour] {
            assert_eq!(field.policy(), CoercionPolicy::Strict, "{field}");
        }
    }

    #[test]
    fn test_measurement_field_is_lenient() {
        assert_eq!(
            Field::NitrogenOxides.policy(),
            CoercionPolicy::LenientToMissing
        );
    }

    // ── coerce_component ─────────────────────────────────────────────────────

    #[test]
    fn test_coerce_component_leading_zero() {
        let day: u32 = coerce_component(Field::Day, 0, "07").unwrap();
        assert_eq!(day, 7);
    }

    #[test]
    fn test_coerce_component_rejects_non_numeric() {
        let err = coerce_component::<u32>(Field::Month, 12, "/2").unwrap_err();
        match err {
            NoxError::StrictCoercion { row, field, value } => {
                assert_eq!(row, 12);
                assert_eq!(field, "Month");
                assert_eq!(value, "/2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_coerce_component_rejects_empty() {
        assert!(coerce_component::<i32>(Field::Year, 0, "").is_err());
    }

    // ── coerce_reading ───────────────────────────────────────────────────────

    #[test]
    fn test_coerce_reading_numeric() {
        assert_eq!(coerce_reading(0, "50").unwrap(), Some(50.0));
        assert_eq!(coerce_reading(0, " 12.75 ").unwrap(), Some(12.75));
    }

    #[test]
    fn test_coerce_reading_no_data_is_missing() {
        assert_eq!(coerce_reading(0, "No data").unwrap(), None);
        assert_eq!(coerce_reading(0, "").unwrap(), None);
    }

    #[test]
    fn test_coerce_reading_rejects_negative_and_non_finite() {
        assert_eq!(coerce_reading(0, "-3.0").unwrap(), None);
        assert_eq!(coerce_reading(0, "NaN").unwrap(), None);
        assert_eq!(coerce_reading(0, "inf").unwrap(), None);
    }

    #[test]
    fn test_coerce_reading_zero_is_a_value() {
        assert_eq!(coerce_reading(0, "0").unwrap(), Some(0.0));
    }

    // ── CoercionPolicy::apply ────────────────────────────────────────────────

    #[test]
    fn test_strict_policy_on_measurement_errors() {
        let result = CoercionPolicy::Strict.apply::<f64>(Field::NitrogenOxides, 3, "No data");
        assert!(result.is_err());
    }
}
