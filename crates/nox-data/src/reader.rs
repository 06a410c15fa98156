//! Source file discovery and loading.
//!
//! Finds the measurement files in a directory by file-name glob and parses
//! each into a [`RawTable`], skipping the fixed preamble before the header
//! row and the fixed footer after the last data row.

use std::path::{Path, PathBuf};

use nox_core::config::PipelineConfig;
use nox_core::error::{NoxError, Result};
use nox_core::limits::SOURCE_COLUMN_COUNT;
use nox_core::models::RawTable;
use regex::Regex;
use tracing::{debug, info, warn};

// ── FilePattern ───────────────────────────────────────────────────────────────

/// A file-name glob supporting `*` (any run of characters) and `?` (one
/// character). Everything else matches literally.
#[derive(Debug, Clone)]
pub struct FilePattern {
    glob: String,
    regex: Regex,
}

impl FilePattern {
    pub fn new(glob: &str) -> Result<Self> {
        let mut source = String::with_capacity(glob.len() + 8);
        source.push('^');
        for c in glob.chars() {
            match c {
                '*' => source.push_str(".*"),
                '?' => source.push('.'),
                other => source.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
            }
        }
        source.push('$');

        let regex = Regex::new(&source).map_err(|e| NoxError::InvalidPattern(e.to_string()))?;
        Ok(Self {
            glob: glob.to_string(),
            regex,
        })
    }

    /// Whether a bare file name matches the glob.
    pub fn matches(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }

    pub fn as_str(&self) -> &str {
        &self.glob
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Files directly inside `dir` whose names match `pattern`, sorted by path.
///
/// A matching entry that cannot be inspected, such as a dangling symlink,
/// is a [`NoxError::FileRead`] naming it.
pub fn find_source_files(dir: &Path, pattern: &FilePattern) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(NoxError::DataPathNotFound(dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = Vec::new();
    let entries = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true);
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let matched = err
                    .path()
                    .and_then(Path::file_name)
                    .and_then(|name| name.to_str())
                    .map(|name| pattern.matches(name))
                    .unwrap_or(false);
                if !matched {
                    warn!("Skipping unreadable entry in {}: {}", dir.display(), err);
                    continue;
                }
                let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                let message = err.to_string();
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other(message));
                return Err(NoxError::FileRead { path, source });
            }
        };
        let matched = entry
            .file_name()
            .to_str()
            .map(|name| pattern.matches(name))
            .unwrap_or(false);
        if matched && entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!(
        "Found {} files matching {:?} in {}",
        files.len(),
        pattern.as_str(),
        dir.display()
    );
    Ok(files)
}

/// Parse one source file.
///
/// The first `header_rows` lines and the last `footer_rows` lines are
/// dropped; the remainder is CSV with a header row. Any deviation from the
/// expected layout is a [`NoxError::FileFormat`] naming `path`.
pub fn load_table(path: &Path, header_rows: usize, footer_rows: usize) -> Result<RawTable> {
    let bytes = std::fs::read(path).map_err(|source| NoxError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|e| format_error(path, e))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let lines: Vec<&str> = text.lines().collect();
    let minimum = header_rows + 1 + footer_rows;
    if lines.len() < minimum {
        return Err(format_error(
            path,
            format!(
                "expected at least {} lines, found {}",
                minimum,
                lines.len()
            ),
        ));
    }
    let body = lines[header_rows..lines.len() - footer_rows].join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| format_error(path, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.len() != SOURCE_COLUMN_COUNT {
        return Err(format_error(
            path,
            format!(
                "expected {} columns, found {} ({})",
                SOURCE_COLUMN_COUNT,
                headers.len(),
                headers.join(", ")
            ),
        ));
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| format_error(path, e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!("File {}: {} data rows", path.display(), rows.len());

    Ok(RawTable {
        source: path.to_path_buf(),
        headers,
        rows,
    })
}

/// Discover and parse every source file described by `config`.
///
/// Fails with [`NoxError::NoDataFiles`] when nothing matches, and with the
/// first per-file error otherwise; no partial result is returned.
pub fn load_tables(config: &PipelineConfig) -> Result<Vec<RawTable>> {
    let pattern = FilePattern::new(&config.file_pattern)?;
    let files = find_source_files(&config.data_dir, &pattern)?;
    if files.is_empty() {
        return Err(NoxError::NoDataFiles {
            dir: config.data_dir.clone(),
            pattern: config.file_pattern.clone(),
        });
    }

    let tables = files
        .iter()
        .map(|path| load_table(path, config.header_rows, config.footer_rows))
        .collect::<Result<Vec<_>>>()?;

    info!(
        "Loaded {} rows from {} files",
        tables.iter().map(RawTable::len).sum::<usize>(),
        tables.len()
    );
    Ok(tables)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn format_error(path: &Path, reason: impl ToString) -> NoxError {
    NoxError::FileFormat {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    const PREAMBLE: &str = "Hourly data from Defra UK-AIR\n\
                            Site Name,Bristol St Paul's\n\
                            Currently showing the selected data\n\
                            All Data GMT hour ending\n";
    const HEADER: &str = "Date,Time,Nitrogen oxides as nitrogen dioxide,Status\n";
    const FOOTER: &str = "\nEnd\n\n\n";

    fn write_source(dir: &Path, name: &str, rows: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}{}", PREAMBLE, HEADER).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        write!(file, "{}", FOOTER).unwrap();
        path
    }

    // ── FilePattern ───────────────────────────────────────────────────────────

    #[test]
    fn test_pattern_star_matches_suffix() {
        let p = FilePattern::new("Bristol NOx*.csv").unwrap();
        assert!(p.matches("Bristol NOx 2005-2010.csv"));
        assert!(p.matches("Bristol NOx.csv"));
        assert!(!p.matches("Bristol SO2 2010.csv"));
        assert!(!p.matches("Bristol NOx 2010.csv.bak"));
    }

    #[test]
    fn test_pattern_dot_is_literal() {
        let p = FilePattern::new("a.csv").unwrap();
        assert!(p.matches("a.csv"));
        assert!(!p.matches("abcsv"));
    }

    #[test]
    fn test_pattern_question_mark() {
        let p = FilePattern::new("nox_?.csv").unwrap();
        assert!(p.matches("nox_1.csv"));
        assert!(!p.matches("nox_12.csv"));
    }

    // ── find_source_files ─────────────────────────────────────────────────────

    #[test]
    fn test_find_source_files_filters_by_pattern() {
        let dir = TempDir::new().unwrap();
        write_source(dir.path(), "Bristol NOx 2019.csv", &[]);
        write_source(dir.path(), "Bristol NOx 2020.csv", &[]);
        write_source(dir.path(), "notes.csv", &[]);

        let pattern = FilePattern::new("Bristol NOx*.csv").unwrap();
        let files = find_source_files(dir.path(), &pattern).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_find_source_files_not_recursive() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("archive");
        std::fs::create_dir_all(&sub).unwrap();
        write_source(&sub, "Bristol NOx old.csv", &[]);

        let pattern = FilePattern::new("Bristol NOx*.csv").unwrap();
        let files = find_source_files(dir.path(), &pattern).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_find_source_files_sorted() {
        let dir = TempDir::new().unwrap();
        write_source(dir.path(), "Bristol NOx c.csv", &[]);
        write_source(dir.path(), "Bristol NOx a.csv", &[]);
        write_source(dir.path(), "Bristol NOx b.csv", &[]);

        let pattern = FilePattern::new("Bristol NOx*.csv").unwrap();
        let files = find_source_files(dir.path(), &pattern).unwrap();
        let names: Vec<&str> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["Bristol NOx a.csv", "Bristol NOx b.csv", "Bristol NOx c.csv"]
        );
    }

    #[test]
    fn test_find_source_files_nonexistent_dir() {
        let pattern = FilePattern::new("*.csv").unwrap();
        let err = find_source_files(Path::new("/tmp/does-not-exist-nox-test-xyz"), &pattern)
            .unwrap_err();
        assert!(matches!(err, NoxError::DataPathNotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_find_source_files_dangling_match_is_read_error() {
        let dir = TempDir::new().unwrap();
        write_source(dir.path(), "Bristol NOx 2019.csv", &["01/01/2019,01:00,50,V ugm-3"]);
        let link = dir.path().join("Bristol NOx 2020.csv");
        std::os::unix::fs::symlink(dir.path().join("gone.csv"), &link).unwrap();

        let pattern = FilePattern::new("Bristol NOx*.csv").unwrap();
        let err = find_source_files(dir.path(), &pattern).unwrap_err();
        match err {
            NoxError::FileRead { path, .. } => assert_eq!(path, link),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_find_source_files_dangling_non_match_is_skipped() {
        let dir = TempDir::new().unwrap();
        let good = write_source(dir.path(), "Bristol NOx 2019.csv", &["01/01/2019,01:00,50,V ugm-3"]);
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("notes.txt")).unwrap();

        let pattern = FilePattern::new("Bristol NOx*.csv").unwrap();
        let files = find_source_files(dir.path(), &pattern).unwrap();
        assert_eq!(files, vec![good]);
    }

    // ── load_table ────────────────────────────────────────────────────────────

    #[test]
    fn test_load_table_skips_preamble_and_footer() {
        let dir = TempDir::new().unwrap();
        let path = write_source(
            dir.path(),
            "Bristol NOx 2019.csv",
            &[
                "01/01/2019,01:00,45.5,V ugm-3",
                "01/01/2019,02:00,No data,V ugm-3",
            ],
        );

        let table = load_table(&path, 4, 4).unwrap();
        assert_eq!(
            table.headers,
            vec![
                "Date",
                "Time",
                "Nitrogen oxides as nitrogen dioxide",
                "Status"
            ]
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1][2], "No data");
        assert_eq!(table.source, path);
    }

    #[test]
    fn test_load_table_header_only() {
        let dir = TempDir::new().unwrap();
        let path = write_source(dir.path(), "Bristol NOx empty.csv", &[]);
        let table = load_table(&path, 4, 4).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.headers.len(), 4);
    }

    #[test]
    fn test_load_table_ragged_row_is_format_error() {
        let dir = TempDir::new().unwrap();
        let path = write_source(
            dir.path(),
            "Bristol NOx bad.csv",
            &["01/01/2019,01:00,45.5,V ugm-3", "01/01/2019,02:00"],
        );

        let err = load_table(&path, 4, 4).unwrap_err();
        match err {
            NoxError::FileFormat { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_table_wrong_column_count_is_format_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Bristol NOx wide.csv");
        let content = format!(
            "{}Date,Time,Nitrogen oxides as nitrogen dioxide,Status,Extra\n\
             01/01/2019,01:00,45.5,V ugm-3,x\n{}",
            PREAMBLE, FOOTER
        );
        std::fs::write(&path, content).unwrap();

        let err = load_table(&path, 4, 4).unwrap_err();
        assert!(err.to_string().contains("expected 4 columns, found 5"));
    }

    #[test]
    fn test_load_table_invalid_utf8_is_format_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Bristol NOx latin1.csv");
        let mut bytes = format!("{}{}", PREAMBLE, HEADER).into_bytes();
        bytes.extend_from_slice(b"01/01/2019,01:00,45.5,V \xb5gm-3\n");
        bytes.extend_from_slice(FOOTER.as_bytes());
        std::fs::write(&path, bytes).unwrap();

        let err = load_table(&path, 4, 4).unwrap_err();
        assert!(matches!(err, NoxError::FileFormat { .. }));
    }

    #[test]
    fn test_load_table_too_short_is_format_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Bristol NOx stub.csv");
        std::fs::write(&path, "only\nthree\nlines\n").unwrap();

        let err = load_table(&path, 4, 4).unwrap_err();
        assert!(err.to_string().contains("expected at least 9 lines, found 3"));
    }

    #[test]
    fn test_load_table_missing_file_is_read_error() {
        let err = load_table(Path::new("/tmp/nox-missing-file-xyz.csv"), 4, 4).unwrap_err();
        assert!(matches!(err, NoxError::FileRead { .. }));
    }

    // ── load_tables ───────────────────────────────────────────────────────────

    #[test]
    fn test_load_tables_reads_every_match() {
        let dir = TempDir::new().unwrap();
        write_source(dir.path(), "Bristol NOx 2019.csv", &["01/01/2019,01:00,50,V ugm-3"]);
        write_source(
            dir.path(),
            "Bristol NOx 2020.csv",
            &["01/01/2020,01:00,60,V ugm-3", "01/01/2020,02:00,70,V ugm-3"],
        );

        let tables = load_tables(&PipelineConfig::for_dir(dir.path())).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].len(), 1);
        assert_eq!(tables[1].len(), 2);
    }

    #[test]
    fn test_load_tables_no_matches() {
        let dir = TempDir::new().unwrap();
        let err = load_tables(&PipelineConfig::for_dir(dir.path())).unwrap_err();
        assert!(matches!(err, NoxError::NoDataFiles { .. }));
    }

    #[test]
    fn test_load_tables_one_bad_file_fails_run() {
        let dir = TempDir::new().unwrap();
        write_source(dir.path(), "Bristol NOx 2019.csv", &["01/01/2019,01:00,50,V ugm-3"]);
        let bad = write_source(dir.path(), "Bristol NOx 2020.csv", &["01/01/2020,01:00"]);

        let err = load_tables(&PipelineConfig::for_dir(dir.path())).unwrap_err();
        assert!(err.to_string().contains(&bad.display().to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn test_load_tables_dangling_match_fails_run() {
        let dir = TempDir::new().unwrap();
        write_source(dir.path(), "Bristol NOx 2019.csv", &["01/01/2019,01:00,50,V ugm-3"]);
        let link = dir.path().join("Bristol NOx 2020.csv");
        std::os::unix::fs::symlink(dir.path().join("gone.csv"), &link).unwrap();

        let err = load_tables(&PipelineConfig::for_dir(dir.path())).unwrap_err();
        assert!(matches!(err, NoxError::FileRead { .. }));
        assert!(err.to_string().contains(&link.display().to_string()));
    }
}
