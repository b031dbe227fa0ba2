//! CSV ingestion of reference data and strategy submissions.

pub mod reference;
pub mod submission;

use std::fs;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use thiserror::Error;

use crate::site::ProfileError;
use crate::strategy::TimelineError;

/// Errors raised while loading an input file.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("cannot read \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unknown file type: \"{}\" is not UTF-8 text", .path.display())]
    UnreadableFile { path: PathBuf },
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: {message}")]
    Malformed { line: u64, message: String },
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Timeline(#[from] TimelineError),
}

/// Reads a whole file as UTF-8 text.
///
/// Any byte sequence that is not valid UTF-8 makes the file unreadable,
/// regardless of where it occurs.
pub(crate) fn read_text(path: &Path) -> Result<String, ReadError> {
    let bytes = fs::read(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| ReadError::UnreadableFile {
        path: path.to_path_buf(),
    })
}

/// Flexible, trimming CSV reader with a single header row.
pub(crate) fn csv_reader<R: std::io::Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map_or(0, csv::Position::line)
}

pub(crate) fn malformed(record: &StringRecord, message: impl Into<String>) -> ReadError {
    ReadError::Malformed {
        line: line_of(record),
        message: message.into(),
    }
}

/// Returns field `idx`, or a malformed-row error naming `column`.
pub(crate) fn field<'r>(
    record: &'r StringRecord,
    idx: usize,
    column: &str,
) -> Result<&'r str, ReadError> {
    record
        .get(idx)
        .ok_or_else(|| malformed(record, format!("missing column `{column}`")))
}

pub(crate) fn parse_f64(record: &StringRecord, idx: usize, column: &str) -> Result<f64, ReadError> {
    let raw = field(record, idx, column)?;
    raw.parse::<f64>()
        .map_err(|_| malformed(record, format!("`{column}`: expected number, got \"{raw}\"")))
}

pub(crate) fn parse_index(
    record: &StringRecord,
    idx: usize,
    column: &str,
) -> Result<usize, ReadError> {
    let raw = field(record, idx, column)?;
    raw.parse::<usize>().map_err(|_| {
        malformed(
            record,
            format!("`{column}`: expected non-negative integer, got \"{raw}\""),
        )
    })
}

/// Case-insensitive `"true"`; every other token reads as `false`.
pub(crate) fn parse_flag(token: &str) -> bool {
    token.trim().eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn flags_are_case_insensitive() {
        assert!(parse_flag("true"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" True "));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn non_utf8_file_is_unreadable() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"site,index\n\xff\xfe,1\n").expect("write");
        let err = read_text(file.path());
        assert!(matches!(err, Err(ReadError::UnreadableFile { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_text(Path::new("/definitely/not/here.csv"));
        assert!(matches!(err, Err(ReadError::Io { .. })));
    }

    #[test]
    fn malformed_number_names_column() {
        let mut rdr = csv_reader("a,b\nx,1.5\ny,abc\n".as_bytes());
        let records: Vec<StringRecord> = rdr.records().filter_map(Result::ok).collect();
        assert_eq!(parse_f64(&records[0], 1, "b").ok(), Some(1.5));
        let err = parse_f64(&records[1], 1, "b").map_err(|e| e.to_string());
        assert_eq!(
            err,
            Err("line 3: `b`: expected number, got \"abc\"".to_string())
        );
    }
}
