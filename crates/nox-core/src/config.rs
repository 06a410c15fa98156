use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::limits::{FOOTER_ROWS, HEADER_ROWS, HOURLY_LIMIT_UGM3, SOURCE_FILE_PATTERN};

// ── PipelineConfig ────────────────────────────────────────────────────────────

/// Parameters for one pipeline run.
///
/// The defaults describe the downloaded Bristol St Pauls files; tests and
/// callers override individual fields with the `with_*` builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory scanned for source files (not recursive).
    pub data_dir: PathBuf,
    /// Glob matched against file names; `*` and `?` are supported.
    pub file_pattern: String,
    /// Preamble lines skipped before the header row.
    pub header_rows: usize,
    /// Trailing lines dropped after the last data row.
    pub footer_rows: usize,
    /// Readings at or above this value count toward the yearly exceedances.
    pub exceedance_threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            file_pattern: SOURCE_FILE_PATTERN.to_string(),
            header_rows: HEADER_ROWS,
            footer_rows: FOOTER_ROWS,
            exceedance_threshold: HOURLY_LIMIT_UGM3,
        }
    }
}

impl PipelineConfig {
    /// Default configuration rooted at `data_dir`.
    pub fn for_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_pattern = pattern.into();
        self
    }

    pub fn with_boilerplate(mut self, header_rows: usize, footer_rows: usize) -> Self {
        self.header_rows = header_rows;
        self.footer_rows = footer_rows;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.exceedance_threshold = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_source_layout() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.file_pattern, "Bristol NOx*.csv");
        assert_eq!(cfg.header_rows, 4);
        assert_eq!(cfg.footer_rows, 4);
        assert_eq!(cfg.exceedance_threshold, 200.0);
        assert_eq!(cfg.data_dir, PathBuf::from("."));
    }

    #[test]
    fn test_for_dir_keeps_other_defaults() {
        let cfg = PipelineConfig::for_dir("/tmp/nox");
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/nox"));
        assert_eq!(cfg.header_rows, HEADER_ROWS);
    }

    #[test]
    fn test_builders_override_fields() {
        let cfg = PipelineConfig::for_dir("d")
            .with_pattern("*.csv")
            .with_boilerplate(1, 0)
            .with_threshold(150.0);
        assert_eq!(cfg.file_pattern, "*.csv");
        assert_eq!(cfg.header_rows, 1);
        assert_eq!(cfg.footer_rows, 0);
        assert_eq!(cfg.exceedance_threshold, 150.0);
    }

    #[test]
    fn test_serde_roundtrip_preserves_config() {
        let cfg = PipelineConfig::for_dir("data").with_threshold(180.0);
        let json = serde_json::to_string(&cfg).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
