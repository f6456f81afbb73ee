use std::collections::HashMap;
use std::path::Path;

use viewer_core::string_error::ErrorStringExt;

/// Tabular data parsed from a delimited text file: named columns of floats.
///
/// Unparseable cells become NaN, so row indices stay aligned across
/// columns. Lines starting with '#' are treated as comments.
#[derive(Clone, Debug, Default)]
pub struct DataTable {
    column_names: Vec<String>,
    columns: Vec<Vec<f64>>,
    comments: String,
}

// Counts how often candidate delimiter characters occur per row, to pick
// the delimiter that splits rows most consistently.
#[derive(Debug)]
struct DelimiterCounter {
    char: char,
    row_counter: HashMap<usize, usize>,
}

const DELIMITER_CANDIDATES: [char; 3] = [',', ';', '\t'];

impl DataTable {
    pub fn from_path(path: &Path) -> Result<DataTable, String> {
        let raw = std::fs::read_to_string(path)
            .err_to_string(&format!("unable to read data file {:?}", path))?;
        Self::parse_str(&raw)
    }

    pub(crate) fn parse_str(raw: &str) -> Result<DataTable, String> {
        let mut comments = String::new();
        let mut data_lines = Vec::new();
        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(comment) = line.strip_prefix('#') {
                comments.push_str(comment.trim());
                comments.push('\n');
            } else {
                data_lines.push(line);
            }
        }

        let Some(first_line) = data_lines.first() else {
            return Err("data file contains no data rows".to_string());
        };

        let delimiter = detect_delimiter(&data_lines);
        let split = |line: &str| -> Vec<String> {
            match delimiter {
                Some(delim) => line.split(delim).map(|f| f.trim().to_string()).collect(),
                // Fall back to splitting on any whitespace.
                None => line.split_whitespace().map(|f| f.to_string()).collect(),
            }
        };

        // If no field of the first row parses as a number, it is a header.
        let first_fields = split(first_line);
        let has_header = !first_fields
            .iter()
            .any(|field| field.parse::<f64>().is_ok());
        let column_names: Vec<String> = if has_header {
            first_fields
        } else {
            (0..first_fields.len()).map(|i| format!("col{}", i)).collect()
        };

        let n_columns = column_names.len();
        let mut columns = vec![Vec::new(); n_columns];
        let body = if has_header {
            &data_lines[1..]
        } else {
            &data_lines[..]
        };
        for line in body {
            let fields = split(line);
            if fields.len() != n_columns {
                log::warn!(
                    "skipping row with {} fields, expected {}: '{}'",
                    fields.len(),
                    n_columns,
                    line
                );
                continue;
            }
            for (col, field) in columns.iter_mut().zip(fields) {
                col.push(field.parse::<f64>().unwrap_or(f64::NAN));
            }
        }

        if columns.iter().all(|col| col.is_empty()) {
            return Err("data file contains no data rows".to_string());
        }

        Ok(DataTable {
            column_names,
            columns,
            comments,
        })
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        let index = self.column_names.iter().position(|n| n == name)?;
        self.columns.get(index).map(|col| col.as_slice())
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map(|col| col.len()).unwrap_or(0)
    }

    /// Minimum and maximum of a column, ignoring NaNs.
    pub fn column_limits(&self, name: &str) -> Option<(f64, f64)> {
        let mut limits: Option<(f64, f64)> = None;
        for &value in self.column(name)?.iter().filter(|v| !v.is_nan()) {
            limits = Some(match limits {
                Some((min, max)) => (min.min(value), max.max(value)),
                None => (value, value),
            });
        }
        limits
    }

    pub fn comments(&self) -> &str {
        &self.comments
    }
}

/// Pick the candidate delimiter with the most consistent per-row count.
/// Returns None if no candidate occurs at all (whitespace-delimited data).
fn detect_delimiter(lines: &[&str]) -> Option<char> {
    let mut counters: Vec<DelimiterCounter> = DELIMITER_CANDIDATES
        .iter()
        .map(|&char| DelimiterCounter {
            char,
            row_counter: HashMap::new(),
        })
        .collect();

    for line in lines.iter().take(50) {
        for counter in counters.iter_mut() {
            let count = line.matches(counter.char).count();
            *counter.row_counter.entry(count).or_insert(0) += 1;
        }
    }

    // Score: how many of the sampled rows agree on the most common
    // (non-zero) per-row count.
    counters
        .iter()
        .filter_map(|counter| {
            counter
                .row_counter
                .iter()
                .filter(|(count, _)| **count > 0)
                .max_by_key(|(_, rows)| **rows)
                .map(|(_, rows)| (*rows, counter.char))
        })
        .max()
        .map(|(_, char)| char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_csv_with_header() {
        let table = DataTable::parse_str("a,b\n1.0,2.0\n3.0,4.0\n").unwrap();
        assert_eq!(table.column_names(), &["a", "b"]);
        assert_eq!(table.column("a").unwrap(), &[1.0, 3.0]);
        assert_eq!(table.column("b").unwrap(), &[2.0, 4.0]);
        assert_eq!(table.n_rows(), 2);
    }

    #[test]
    fn parses_headerless_whitespace_data() {
        let table = DataTable::parse_str("1 2\n3 4\n5 6\n").unwrap();
        assert_eq!(table.column_names(), &["col0", "col1"]);
        assert_eq!(table.column("col1").unwrap(), &[2.0, 4.0, 6.0]);
    }

    #[test]
    fn collects_comments_and_skips_bad_rows() {
        let table = DataTable::parse_str("# run 42\nx;y\n1;2\n3;4;5\n6;7\n").unwrap();
        assert_eq!(table.comments(), "run 42\n");
        // The row with the wrong field count is skipped.
        assert_eq!(table.column("x").unwrap(), &[1.0, 6.0]);
    }

    #[test]
    fn unparseable_cells_become_nan() {
        let table = DataTable::parse_str("x,y\n1.0,oops\n2.0,4.0\n").unwrap();
        let y = table.column("y").unwrap();
        assert!(y[0].is_nan());
        assert_eq!(y[1], 4.0);
        assert_eq!(table.column_limits("y"), Some((4.0, 4.0)));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(DataTable::parse_str("# only comments\n").is_err());
    }
}
