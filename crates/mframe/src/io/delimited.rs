//! Delimited numeric text reader.
//!
//! One record per line, fields split on a caller-supplied separator and
//! parsed as `f64`. An optional first line names the columns. Rows where any
//! field fails to parse, or whose width disagrees with the table, are skipped
//! and counted rather than treated as fatal.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::data_handling::DataFrame;
use crate::error::{Error, Result};
use crate::math::Matrix;

/// A parsed table plus bookkeeping about the rows that were dropped.
#[derive(Debug, Clone)]
pub struct TableData {
    pub frame: DataFrame,
    /// Data rows that made it into `frame`.
    pub rows_read: usize,
    /// Data rows dropped because they were not fully numeric or had the wrong width.
    pub rows_skipped: usize,
}

/// Configuration for reading delimited text tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReaderConfig {
    /// Field separator. Single-byte separators other than whitespace go
    /// through the `csv` reader; whitespace and longer separators are split
    /// line by line after trimming the line.
    pub separator: String,
    /// Whether the first line holds column labels.
    pub header: bool,
}

impl Default for TableReaderConfig {
    fn default() -> Self {
        Self {
            separator: " ".to_string(),
            header: true,
        }
    }
}

impl TableReaderConfig {
    pub fn new(separator: impl Into<String>, header: bool) -> Self {
        Self {
            separator: separator.into(),
            header,
        }
    }
}

enum RawRow {
    Fields(Vec<String>),
    /// A row that was not valid UTF-8.
    Undecodable,
}

type RowIter<'a> = Box<dyn Iterator<Item = Result<RawRow>> + 'a>;

/// Read a delimited text file into a [`DataFrame`].
///
/// When `header` is true the first line supplies the column labels.
/// Fails only when the file cannot be read, the separator is empty, the
/// header repeats a label, or no numeric row survives.
pub fn read_data<P: AsRef<Path>>(path: P, separator: &str, header: bool) -> Result<DataFrame> {
    read_table_with_config(path, &TableReaderConfig::new(separator, header)).map(|t| t.frame)
}

/// Read a table using the default configuration (space separated, with header).
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<TableData> {
    read_table_with_config(path, &TableReaderConfig::default())
}

/// Read a table using a custom configuration and report skipped rows.
pub fn read_table_with_config<P: AsRef<Path>>(
    path: P,
    config: &TableReaderConfig,
) -> Result<TableData> {
    if config.separator.is_empty() {
        return Err(Error::InvalidParameter {
            name: "separator",
            reason: "separator cannot be empty".to_string(),
        });
    }

    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "Reading table from {} (separator {:?}, header: {})",
        path.display(),
        config.separator,
        config.header
    );

    // Leading or trailing whitespace separators must not produce empty edge fields.
    let mut rows: RowIter<'_> = match config.separator.as_bytes() {
        [delimiter] if !delimiter.is_ascii_whitespace() => {
            byte_delimited_rows(file, *delimiter, path)
        }
        _ => string_delimited_rows(file, &config.separator, path),
    };

    let labels = if config.header {
        match rows.next().transpose()? {
            Some(RawRow::Fields(fields)) => Some(fields),
            Some(RawRow::Undecodable) => {
                return Err(Error::InvalidParameter {
                    name: "header",
                    reason: format!("header row of {} is not valid UTF-8", path.display()),
                })
            }
            None => None,
        }
    } else {
        None
    };

    let mut width = labels.as_ref().map(Vec::len);
    let mut data = Vec::new();
    let mut rows_read = 0;
    let mut rows_skipped = 0;

    for row in rows {
        let parsed = match row? {
            RawRow::Fields(fields) => parse_row(&fields),
            RawRow::Undecodable => None,
        };
        match parsed {
            Some(values) if width.map_or(true, |w| w == values.len()) => {
                width.get_or_insert(values.len());
                data.extend(values);
                rows_read += 1;
            }
            _ => rows_skipped += 1,
        }
    }

    if rows_skipped > 0 {
        log::warn!(
            "Skipped {} malformed row(s) while reading {}",
            rows_skipped,
            path.display()
        );
    }

    let Some(width) = width.filter(|_| rows_read > 0) else {
        return Err(Error::shape(
            "read_data",
            "at least one numeric row",
            format!("0 rows in {}", path.display()),
        ));
    };

    let values = Matrix::from_shape_vec((rows_read, width), data)?;
    let frame = DataFrame::from_matrix(values, labels)?;
    log::debug!(
        "Read {} rows x {} columns from {}",
        rows_read,
        width,
        path.display()
    );

    Ok(TableData {
        frame,
        rows_read,
        rows_skipped,
    })
}

fn parse_row(fields: &[String]) -> Option<Vec<f64>> {
    fields.iter().map(|field| field.parse::<f64>().ok()).collect()
}

fn byte_delimited_rows(file: File, delimiter: u8, path: &Path) -> RowIter<'_> {
    let reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(file);

    Box::new(reader.into_byte_records().map(move |result| match result {
        Ok(record) => Ok(record
            .iter()
            .map(|field| std::str::from_utf8(field).map(str::to_string))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_or(RawRow::Undecodable, RawRow::Fields)),
        Err(err) => match err.into_kind() {
            csv::ErrorKind::Io(source) => Err(Error::Io {
                path: path.to_path_buf(),
                source,
            }),
            _ => Ok(RawRow::Undecodable),
        },
    }))
}

fn string_delimited_rows<'a>(file: File, separator: &'a str, path: &'a Path) -> RowIter<'a> {
    Box::new(
        BufReader::new(file)
            .split(b'\n')
            .filter_map(move |line| {
                let line = match line {
                    Ok(line) => line,
                    Err(source) => {
                        return Some(Err(Error::Io {
                            path: path.to_path_buf(),
                            source,
                        }))
                    }
                };
                let Ok(text) = String::from_utf8(line) else {
                    return Some(Ok(RawRow::Undecodable));
                };
                let text = text.trim();
                if text.is_empty() {
                    return None;
                }
                Some(Ok(RawRow::Fields(
                    text.split(separator)
                        .map(|field| field.trim().to_string())
                        .collect(),
                )))
            }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_table(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn skips_rows_that_fail_to_parse() {
        let file = write_table("a,b,c\n1,2,3\nx,2,3\n");
        let table = read_table_with_config(file.path(), &TableReaderConfig::new(",", true)).unwrap();
        assert_eq!(table.rows_read, 1);
        assert_eq!(table.rows_skipped, 1);
        assert_eq!(table.frame.shape(), (1, 3));
        assert_eq!(
            table.frame.labels().unwrap(),
            &["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn multi_character_separator_splits_lines() {
        let file = write_table("1::2\r\n3::4\r\n\r\n");
        let frame = read_data(file.path(), "::", false).unwrap();
        assert_eq!(frame.matrix().to_vec2(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert!(frame.labels().is_none());
    }

    #[test]
    fn rows_with_the_wrong_width_are_skipped() {
        let file = write_table("1 2\n3 4 5\n6 7\n");
        let table = read_table_with_config(file.path(), &TableReaderConfig::new(" ", false)).unwrap();
        assert_eq!(table.rows_read, 2);
        assert_eq!(table.rows_skipped, 1);
    }

    #[test]
    fn whitespace_separator_ignores_padding_around_the_line() {
        let file = write_table("a\tb\t\n\t1\t2\t\n3\t4\n");
        let table = read_table_with_config(file.path(), &TableReaderConfig::new("\t", true)).unwrap();
        assert_eq!(table.rows_read, 2);
        assert_eq!(table.rows_skipped, 0);
        assert_eq!(table.frame.labels().unwrap(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn comma_separator_keeps_trailing_empty_field() {
        let file = write_table("1,2\n3,4,\n5,6\n");
        let table = read_table_with_config(file.path(), &TableReaderConfig::new(",", false)).unwrap();
        assert_eq!(table.rows_read, 2);
        assert_eq!(table.rows_skipped, 1);
    }

    #[test]
    fn empty_separator_is_rejected() {
        let file = write_table("1,2\n");
        assert!(matches!(
            read_data(file.path(), "", false),
            Err(Error::InvalidParameter { name: "separator", .. })
        ));
    }
}
