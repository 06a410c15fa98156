use serde::Serialize;

use crate::models::Reading;

// ── SummaryStats ──────────────────────────────────────────────────────────────

/// Mean, maximum and minimum over a group of readings.
///
/// Missing readings are ignored. When a group has no valid reading all
/// three statistics are `None`; they never default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SummaryStats {
    pub mean: Reading,
    pub max: Reading,
    pub min: Reading,
}

impl SummaryStats {
    /// Statistics of an empty or all-missing group.
    pub const MISSING: Self = Self {
        mean: None,
        max: None,
        min: None,
    };

    /// Summarise `readings`, skipping missing values.
    pub fn from_readings<I>(readings: I) -> Self
    where
        I: IntoIterator<Item = Reading>,
    {
        let mut sum = 0.0_f64;
        let mut count = 0usize;
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;

        for value in readings.into_iter().flatten() {
            sum += value;
            count += 1;
            max = max.max(value);
            min = min.min(value);
        }

        if count == 0 {
            return Self::MISSING;
        }

        Self {
            mean: Some(sum / count as f64),
            max: Some(max),
            min: Some(min),
        }
    }

    /// `true` when the group had no valid reading.
    pub fn is_missing(&self) -> bool {
        self.mean.is_none()
    }
}

// ── Threshold counting ────────────────────────────────────────────────────────

/// Number of readings at or above `threshold`. Missing readings never count.
pub fn count_at_or_above<I>(readings: I, threshold: f64) -> u32
where
    I: IntoIterator<Item = Reading>,
{
    readings
        .into_iter()
        .flatten()
        .filter(|v| *v >= threshold)
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── SummaryStats::from_readings ──────────────────────────────────────────

    #[test]
    fn test_summary_basic() {
        let s = SummaryStats::from_readings([Some(10.0), Some(20.0), Some(60.0)]);
        assert_eq!(s.mean, Some(30.0));
        assert_eq!(s.max, Some(60.0));
        assert_eq!(s.min, Some(10.0));
    }

    #[test]
    fn test_summary_ignores_missing() {
        let s = SummaryStats::from_readings([Some(10.0), None, Some(30.0), None]);
        assert_eq!(s.mean, Some(20.0));
        assert_eq!(s.max, Some(30.0));
        assert_eq!(s.min, Some(10.0));
    }

    #[test]
    fn test_summary_all_missing_is_missing_not_zero() {
        let s = SummaryStats::from_readings([None, None]);
        assert_eq!(s, SummaryStats::MISSING);
        assert!(s.is_missing());
    }

    #[test]
    fn test_summary_empty_group_is_missing() {
        let s = SummaryStats::from_readings(std::iter::empty());
        assert!(s.is_missing());
        assert_eq!(s.max, None);
        assert_eq!(s.min, None);
    }

    #[test]
    fn test_summary_zero_reading_is_not_missing() {
        let s = SummaryStats::from_readings([Some(0.0)]);
        assert_eq!(s.mean, Some(0.0));
        assert!(!s.is_missing());
    }

    // ── count_at_or_above ────────────────────────────────────────────────────

    #[test]
    fn test_count_includes_boundary_excludes_missing() {
        let readings = [Some(150.0), Some(200.0), Some(250.0), None];
        assert_eq!(count_at_or_above(readings, 200.0), 2);
    }

    #[test]
    fn test_count_empty() {
        assert_eq!(count_at_or_above(std::iter::empty(), 200.0), 0);
    }

    #[test]
    fn test_count_just_below_threshold() {
        assert_eq!(count_at_or_above([Some(199.999)], 200.0), 0);
    }
}
