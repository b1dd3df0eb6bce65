//! Probe mesh text formats and format detection.
//!
//! Detection tries each format of [`ProbeFormat::DETECTION_ORDER`] in turn.
//! Every attempt yields a definite [`FormatError`] on failure, and when none
//! matches all the reasons are reported together.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::LoadError;

/// Supported height-table layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeFormat {
    /// `rows` and `cols` on the first two lines, then `rows * cols` values
    /// (one per line, blank lines between row groups are ignored).
    Custom,
    /// Comma-separated rows with an optional header line.
    Csv,
    /// Whitespace-separated rows.
    Whitespace,
}

impl ProbeFormat {
    pub const DETECTION_ORDER: [ProbeFormat; 3] =
        [ProbeFormat::Custom, ProbeFormat::Csv, ProbeFormat::Whitespace];

    pub fn name(self) -> &'static str {
        match self {
            ProbeFormat::Custom => "custom",
            ProbeFormat::Csv => "csv",
            ProbeFormat::Whitespace => "whitespace",
        }
    }

    /// Parse `text` strictly as this format.
    pub fn parse(self, text: &str) -> Result<DMatrix<f64>, FormatError> {
        match self {
            ProbeFormat::Custom => parse_custom(text),
            ProbeFormat::Csv => parse_table(text, Delimiter::Comma),
            ProbeFormat::Whitespace => parse_table(text, Delimiter::Whitespace),
        }
    }
}

impl fmt::Display for ProbeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProbeFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::DETECTION_ORDER
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown probe format '{s}' (expected custom, csv or whitespace)"))
    }
}

/// Why a format rejected its input. Line numbers are 1-based.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("input is empty")]
    Empty,
    #[error("line {line}: expected a grid dimension, found '{text}'")]
    BadDimension { line: usize, text: String },
    #[error("line {line}: '{text}' is not a number")]
    BadNumber { line: usize, text: String },
    #[error("header dimensions {rows}x{cols} overflow the value count")]
    DimensionOverflow { rows: usize, cols: usize },
    #[error("header announces {expected} values, found {actual}")]
    CountMismatch { expected: usize, actual: usize },
    #[error("line {line}: {actual} columns, expected {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        actual: usize,
    },
    #[error("only {columns} column(s) per row, a table needs at least 2")]
    TooFewColumns { columns: usize },
    #[error("no data rows")]
    NoData,
}

/// One failed detection attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatAttempt {
    pub format: ProbeFormat,
    pub error: FormatError,
}

impl fmt::Display for FormatAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.format, self.error)
    }
}

/// Heights read from a source, with the format that matched.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedHeights {
    pub format: ProbeFormat,
    pub heights: DMatrix<f64>,
}

/// Detect the format of `text` and parse it.
///
/// `origin` names the input in error messages (usually the file path).
pub fn parse_heights(text: &str, origin: &str) -> Result<LoadedHeights, LoadError> {
    let mut attempts = Vec::with_capacity(ProbeFormat::DETECTION_ORDER.len());
    for format in ProbeFormat::DETECTION_ORDER {
        match format.parse(text) {
            Ok(heights) => {
                debug!(
                    "{origin}: parsed as {format} ({}x{})",
                    heights.nrows(),
                    heights.ncols()
                );
                return Ok(LoadedHeights { format, heights });
            }
            Err(error) => {
                debug!("{origin}: not {format}: {error}");
                attempts.push(FormatAttempt { format, error });
            }
        }
    }
    Err(LoadError::NoFormatMatched {
        origin: origin.to_string(),
        attempts,
    })
}

/// Read a file and detect its format.
pub fn load_heights(path: impl AsRef<Path>) -> Result<LoadedHeights, LoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_heights(&text, &path.display().to_string())
}

/// Parse `text` with a fixed format, skipping detection.
pub fn parse_with(format: ProbeFormat, text: &str) -> Result<LoadedHeights, FormatError> {
    let heights = format.parse(text)?;
    Ok(LoadedHeights { format, heights })
}

fn numbered_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines().enumerate().map(|(i, l)| (i + 1, l.trim()))
}

fn parse_number(line: usize, token: &str) -> Result<f64, FormatError> {
    token.parse::<f64>().map_err(|_| FormatError::BadNumber {
        line,
        text: token.to_string(),
    })
}

fn parse_custom(text: &str) -> Result<DMatrix<f64>, FormatError> {
    let mut lines = numbered_lines(text);

    let mut dimension = || -> Result<usize, FormatError> {
        let (line, token) = lines.next().ok_or(FormatError::Empty)?;
        token.parse::<usize>().map_err(|_| FormatError::BadDimension {
            line,
            text: token.to_string(),
        })
    };
    let rows = dimension()?;
    let cols = dimension()?;

    let expected = rows
        .checked_mul(cols)
        .ok_or(FormatError::DimensionOverflow { rows, cols })?;
    // The header is untrusted; let the values themselves size the buffer.
    let mut values = Vec::new();
    for (line, content) in lines {
        for token in content.split_whitespace() {
            values.push(parse_number(line, token)?);
        }
    }
    if values.len() != expected {
        return Err(FormatError::CountMismatch {
            expected,
            actual: values.len(),
        });
    }
    Ok(DMatrix::from_row_slice(rows, cols, &values))
}

#[derive(Clone, Copy)]
enum Delimiter {
    Comma,
    Whitespace,
}

impl Delimiter {
    fn fields(self, line: &str) -> Vec<&str> {
        match self {
            Delimiter::Comma => line.split(',').map(str::trim).collect(),
            Delimiter::Whitespace => line.split_whitespace().collect(),
        }
    }

    fn allows_header(self) -> bool {
        matches!(self, Delimiter::Comma)
    }
}

fn parse_table(text: &str, delimiter: Delimiter) -> Result<DMatrix<f64>, FormatError> {
    if text.trim().is_empty() {
        return Err(FormatError::Empty);
    }

    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut width = None;
    for (line, content) in numbered_lines(text) {
        if content.is_empty() || content.starts_with('#') {
            continue;
        }
        let fields = delimiter.fields(content);
        let parsed: Result<Vec<f64>, FormatError> =
            fields.iter().map(|f| parse_number(line, f)).collect();
        let row = match parsed {
            Ok(row) => row,
            // A single leading non-numeric line is a column header.
            Err(_) if delimiter.allows_header() && width.is_none() => {
                width = Some(fields.len());
                continue;
            }
            Err(e) => return Err(e),
        };

        let expected = *width.get_or_insert(row.len());
        if row.len() != expected {
            return Err(FormatError::RaggedRow {
                line,
                expected,
                actual: row.len(),
            });
        }
        rows.push(row);
    }

    let Some(first) = rows.first() else {
        return Err(FormatError::NoData);
    };
    let cols = first.len();
    if cols < 2 {
        return Err(FormatError::TooFewColumns { columns: cols });
    }
    Ok(DMatrix::from_row_iterator(
        rows.len(),
        cols,
        rows.iter().flatten().copied(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUSTOM: &str = "2\n3\n\n0.1000\n0.2000\n0.3000\n\n-0.1000\n-0.2000\n-0.3000\n\n";

    #[test]
    fn custom_format_reads_grouped_values() {
        let m = ProbeFormat::Custom.parse(CUSTOM).expect("custom");
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m[(0, 2)], 0.3);
        assert_eq!(m[(1, 0)], -0.1);
    }

    #[test]
    fn custom_format_checks_value_count() {
        let err = ProbeFormat::Custom.parse("2\n2\n1\n2\n3\n").unwrap_err();
        assert_eq!(
            err,
            FormatError::CountMismatch {
                expected: 4,
                actual: 3
            }
        );
        let err = ProbeFormat::Custom.parse("x,y\n1,2\n").unwrap_err();
        assert!(matches!(err, FormatError::BadDimension { line: 1, .. }));
    }

    #[test]
    fn oversized_custom_header_is_rejected_without_allocating() {
        let err = ProbeFormat::Custom
            .parse("4294967296\n4294967296\n1.0\n2.0\n")
            .unwrap_err();
        assert_eq!(
            err,
            FormatError::DimensionOverflow {
                rows: 4_294_967_296,
                cols: 4_294_967_296
            }
        );

        let err = ProbeFormat::Custom
            .parse("1000000000\n1000000\n1.0\n2.0\n")
            .unwrap_err();
        assert_eq!(
            err,
            FormatError::CountMismatch {
                expected: 1_000_000_000_000_000,
                actual: 2
            }
        );
    }

    #[test]
    fn overflowing_header_does_not_stop_detection() {
        let err = parse_heights("4294967296\n4294967296\n1.0,2.0\n3.0,4.0\n", "mem")
            .unwrap_err();
        let LoadError::NoFormatMatched { attempts, .. } = &err else {
            panic!("unexpected error {err:?}");
        };
        let formats: Vec<ProbeFormat> = attempts.iter().map(|a| a.format).collect();
        assert_eq!(formats, ProbeFormat::DETECTION_ORDER.to_vec());
        assert!(matches!(
            attempts[0].error,
            FormatError::DimensionOverflow { .. }
        ));

        // The same body without the bogus header is plain CSV.
        let found = parse_heights("1.0,2.0\n3.0,4.0\n", "mem").expect("detect");
        assert_eq!(found.format, ProbeFormat::Csv);
    }

    #[test]
    fn csv_skips_header_and_rejects_ragged_rows() {
        let m = ProbeFormat::Csv
            .parse("x0,x1,x2\n1.0, 2.0, 3.0\n4.0,5.0,6.0\n")
            .expect("csv");
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m[(1, 2)], 6.0);

        let err = ProbeFormat::Csv.parse("1,2,3\n4,5\n").unwrap_err();
        assert_eq!(
            err,
            FormatError::RaggedRow {
                line: 2,
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn csv_header_only_has_no_data() {
        assert_eq!(ProbeFormat::Csv.parse("a,b\n"), Err(FormatError::NoData));
    }

    #[test]
    fn whitespace_table_needs_two_columns() {
        let m = ProbeFormat::Whitespace
            .parse("# probe run 3\n0.1 0.2\n0.3 0.4\n")
            .expect("whitespace");
        assert_eq!(m.shape(), (2, 2));

        let err = ProbeFormat::Whitespace.parse("0.1\n0.2\n").unwrap_err();
        assert_eq!(err, FormatError::TooFewColumns { columns: 1 });
    }

    #[test]
    fn detection_tries_formats_in_order() {
        let found = parse_heights(CUSTOM, "mem").expect("detect");
        assert_eq!(found.format, ProbeFormat::Custom);

        let found = parse_heights("a,b\n1,2\n3,4\n", "mem").expect("detect");
        assert_eq!(found.format, ProbeFormat::Csv);

        let found = parse_heights("1 2 3\n4 5 6\n", "mem").expect("detect");
        assert_eq!(found.format, ProbeFormat::Whitespace);
    }

    #[test]
    fn failed_detection_reports_every_reason() {
        let err = parse_heights("hello\nworld\n", "probe.txt").unwrap_err();
        let LoadError::NoFormatMatched { origin, attempts } = &err else {
            panic!("unexpected error {err:?}");
        };
        assert_eq!(origin, "probe.txt");
        let formats: Vec<ProbeFormat> = attempts.iter().map(|a| a.format).collect();
        assert_eq!(formats, ProbeFormat::DETECTION_ORDER.to_vec());

        let message = err.to_string();
        assert!(message.contains("probe.txt"));
        assert!(message.contains("custom: line 1"));
        assert!(message.contains("csv:"));
        assert!(message.contains("whitespace: line 1: 'hello' is not a number"));
    }

    #[test]
    fn format_names_parse() {
        assert_eq!("CSV".parse::<ProbeFormat>(), Ok(ProbeFormat::Csv));
        assert!("xlsx".parse::<ProbeFormat>().is_err());
    }
}
