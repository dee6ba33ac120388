//! Labeled tables built on top of [`Matrix`].
//!
//! A `DataFrame` owns a `Matrix` plus optional column labels. Columns are
//! extracted with a [`ColumnIndex`]: a position, a column slice, a single
//! label, or a list of labels. Every extraction returns a fresh `Matrix`.
use std::collections::HashSet;
use std::fmt;
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo};
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{thread_rng, SeedableRng};

use crate::error::{Axis, Error, Result};
use crate::math::Matrix;

/// Rows rendered by the `Display` impl before truncating.
const DISPLAY_ROWS: usize = 5;
/// Cell width used when there are no labels to size the columns by.
const UNLABELED_WIDTH: usize = 8;

/// A column range with an optional step, resolved against the column count
/// the same way a half-open slice is: bounds past the end are clipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSlice {
    pub start: Option<usize>,
    pub end: Option<usize>,
    pub step: usize,
}

impl ColumnSlice {
    pub fn new(start: Option<usize>, end: Option<usize>) -> Self {
        Self {
            start,
            end,
            step: 1,
        }
    }

    pub fn step_by(mut self, step: usize) -> Self {
        self.step = step;
        self
    }

    fn indices(&self, ncols: usize) -> Result<Vec<usize>> {
        if self.step == 0 {
            return Err(Error::InvalidParameter {
                name: "step",
                reason: "slice step cannot be zero".to_string(),
            });
        }
        let end = self.end.unwrap_or(ncols).min(ncols);
        let start = self.start.unwrap_or(0).min(end);
        Ok((start..end).step_by(self.step).collect())
    }
}

impl From<Range<usize>> for ColumnSlice {
    fn from(r: Range<usize>) -> Self {
        ColumnSlice::new(Some(r.start), Some(r.end))
    }
}

impl From<RangeFrom<usize>> for ColumnSlice {
    fn from(r: RangeFrom<usize>) -> Self {
        ColumnSlice::new(Some(r.start), None)
    }
}

impl From<RangeTo<usize>> for ColumnSlice {
    fn from(r: RangeTo<usize>) -> Self {
        ColumnSlice::new(None, Some(r.end))
    }
}

impl From<RangeInclusive<usize>> for ColumnSlice {
    fn from(r: RangeInclusive<usize>) -> Self {
        ColumnSlice::new(Some(*r.start()), Some(r.end() + 1))
    }
}

impl From<RangeFull> for ColumnSlice {
    fn from(_: RangeFull) -> Self {
        ColumnSlice::new(None, None)
    }
}

/// The four ways of selecting columns from a [`DataFrame`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnIndex {
    /// A single column, returned as an `(nrows, 1)` matrix.
    Position(usize),
    /// A column range of every row.
    Slice(ColumnSlice),
    /// A single column resolved by label.
    Label(String),
    /// Several columns resolved by label, in the order given.
    Labels(Vec<String>),
}

impl From<usize> for ColumnIndex {
    fn from(value: usize) -> Self {
        ColumnIndex::Position(value)
    }
}

impl From<ColumnSlice> for ColumnIndex {
    fn from(value: ColumnSlice) -> Self {
        ColumnIndex::Slice(value)
    }
}

impl From<Range<usize>> for ColumnIndex {
    fn from(value: Range<usize>) -> Self {
        ColumnIndex::Slice(value.into())
    }
}

impl From<RangeFrom<usize>> for ColumnIndex {
    fn from(value: RangeFrom<usize>) -> Self {
        ColumnIndex::Slice(value.into())
    }
}

impl From<RangeTo<usize>> for ColumnIndex {
    fn from(value: RangeTo<usize>) -> Self {
        ColumnIndex::Slice(value.into())
    }
}

impl From<RangeInclusive<usize>> for ColumnIndex {
    fn from(value: RangeInclusive<usize>) -> Self {
        ColumnIndex::Slice(value.into())
    }
}

impl From<RangeFull> for ColumnIndex {
    fn from(value: RangeFull) -> Self {
        ColumnIndex::Slice(value.into())
    }
}

impl From<&str> for ColumnIndex {
    fn from(value: &str) -> Self {
        ColumnIndex::Label(value.to_string())
    }
}

impl From<String> for ColumnIndex {
    fn from(value: String) -> Self {
        ColumnIndex::Label(value)
    }
}

impl From<&[&str]> for ColumnIndex {
    fn from(value: &[&str]) -> Self {
        ColumnIndex::Labels(value.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ColumnIndex {
    fn from(value: [&str; N]) -> Self {
        ColumnIndex::Labels(value.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Vec<String>> for ColumnIndex {
    fn from(value: Vec<String>) -> Self {
        ColumnIndex::Labels(value)
    }
}

impl FromStr for ColumnIndex {
    type Err = Error;

    /// Parse a textual selector: `"2"`, `"1..3"`, `"1:3"`, `":"`, `"a,b"` or `"a"`.
    ///
    /// Text that only resembles a slice, such as the label `"time:s"`, is
    /// taken as a label. Slices with numeric but invalid bounds (`"-1..2"`,
    /// `"0:1.5"`) are rejected.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(position) = s.parse::<usize>() {
            return Ok(ColumnIndex::Position(position));
        }
        let range = s.split_once("..").or_else(|| s.split_once(':'));
        if let Some((start, end)) = range {
            let (start, end) = (start.trim(), end.trim());
            match (parse_bound(start), parse_bound(end)) {
                (Some(start), Some(end)) => {
                    return Ok(ColumnIndex::Slice(ColumnSlice::new(start, end)));
                }
                _ if looks_numeric(start) && looks_numeric(end) => {
                    return Err(Error::TypeMismatch(format!(
                        "cannot use '{}' as a column index; expected a non-negative integer, \
                         a slice such as '1..3', a label, or a comma-separated list of labels",
                        s
                    )));
                }
                _ => {}
            }
        }
        if s.contains(',') {
            return Ok(ColumnIndex::Labels(
                s.split(',').map(|label| label.trim().to_string()).collect(),
            ));
        }
        Ok(ColumnIndex::Label(s.to_string()))
    }
}

/// `Some(None)` for an open bound, `Some(Some(n))` for a position.
fn parse_bound(text: &str) -> Option<Option<usize>> {
    if text.is_empty() {
        return Some(None);
    }
    text.parse::<usize>().ok().map(Some)
}

/// Empty (open) or numeric text.
fn looks_numeric(text: &str) -> bool {
    text.is_empty() || (text.parse::<f64>().is_ok() && text.bytes().any(|b| b.is_ascii_digit()))
}

/// A numeric table: a [`Matrix`] with optional, unique column labels.
#[derive(Clone, Debug, PartialEq)]
pub struct DataFrame {
    values: Matrix,
    labels: Option<Vec<String>>,
}

impl DataFrame {
    /// Build a table from a grid of rows and optional labels.
    ///
    /// The grid is validated by [`Matrix::new`]. When labels are given there
    /// must be exactly one per column and no label may repeat.
    pub fn new<R: AsRef<[f64]>>(data: &[R], labels: Option<Vec<String>>) -> Result<Self> {
        Self::from_matrix(Matrix::new(data)?, labels)
    }

    pub fn from_matrix(values: Matrix, labels: Option<Vec<String>>) -> Result<Self> {
        if let Some(labels) = &labels {
            validate_labels(labels, values.ncols())?;
        }
        Ok(Self { values, labels })
    }

    pub fn matrix(&self) -> &Matrix {
        &self.values
    }

    pub fn into_matrix(self) -> Matrix {
        self.values
    }

    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    pub fn has_labels(&self) -> bool {
        self.labels.is_some()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    /// Position of the first column carrying `label`.
    pub fn column_position(&self, label: &str) -> Result<usize> {
        let labels = self.labels.as_ref().ok_or(Error::MissingLabels)?;
        labels
            .iter()
            .position(|name| name == label)
            .ok_or_else(|| Error::LabelNotFound(label.to_string()))
    }

    /// Extract columns as a new matrix.
    ///
    /// ```
    /// use mframe::data_handling::DataFrame;
    ///
    /// let df = DataFrame::new(
    ///     &[[1.0, 10.0, 100.0], [2.0, 20.0, 200.0]],
    ///     Some(vec!["a".into(), "b".into(), "c".into()]),
    /// )
    /// .unwrap();
    /// assert_eq!(df.get("b").unwrap(), df.get(1).unwrap());
    /// assert_eq!(df.get(1..).unwrap().to_vec2(), vec![vec![10.0, 100.0], vec![20.0, 200.0]]);
    /// assert_eq!(df.get(["c", "a"]).unwrap().to_vec2(), vec![vec![100.0, 1.0], vec![200.0, 2.0]]);
    /// ```
    pub fn get(&self, idx: impl Into<ColumnIndex>) -> Result<Matrix> {
        match idx.into() {
            ColumnIndex::Position(col) => self.position(col),
            ColumnIndex::Slice(slice) => {
                let indices = slice.indices(self.ncols())?;
                if indices.is_empty() {
                    return Err(Error::shape(
                        "column slice",
                        "at least one selected column",
                        "0 columns",
                    ));
                }
                self.values.select_columns(&indices)
            }
            ColumnIndex::Label(label) => {
                let col = self.column_position(&label)?;
                self.position(col)
            }
            ColumnIndex::Labels(labels) => self.gather(&labels),
        }
    }

    fn position(&self, col: usize) -> Result<Matrix> {
        if col >= self.ncols() {
            return Err(Error::IndexOutOfBounds {
                axis: Axis::Column,
                index: col,
                len: self.ncols(),
            });
        }
        Matrix::from_column(&self.values.column(col)?)
    }

    fn gather(&self, labels: &[String]) -> Result<Matrix> {
        if self.labels.is_none() {
            return Err(Error::MissingLabels);
        }
        let mut result: Option<Matrix> = None;
        for label in labels {
            let col = self.column_position(label)?;
            if let Some(acc) = result.as_mut() {
                acc.add_column(&self.values.column(col)?)?;
            } else {
                result = Some(self.position(col)?);
            }
        }
        result.ok_or_else(|| Error::shape("label list", "at least one label", "0 labels"))
    }

    /// Append a row of values, one per column.
    pub fn add_row(&mut self, values: &[f64]) -> Result<&mut Self> {
        self.values.add_row(values)?;
        Ok(self)
    }

    /// Append a column. A labeled table needs a new, unused label; an
    /// unlabeled table must not be given one.
    pub fn add_column(&mut self, label: Option<&str>, values: &[f64]) -> Result<&mut Self> {
        match (&mut self.labels, label) {
            (Some(labels), Some(label)) => {
                if labels.iter().any(|existing| existing == label) {
                    return Err(Error::DuplicateLabel(label.to_string()));
                }
                self.values.add_column(values)?;
                labels.push(label.to_string());
            }
            (None, None) => {
                self.values.add_column(values)?;
            }
            (Some(_), None) => {
                return Err(Error::InvalidParameter {
                    name: "label",
                    reason: "a labeled table needs a label for every new column".to_string(),
                });
            }
            (None, Some(_)) => return Err(Error::MissingLabels),
        }
        Ok(self)
    }

    /// Split rows into `(train, test)` tables, keeping labels on both.
    ///
    /// Rows are shuffled first; pass a seed to make the split reproducible.
    /// `test_fraction` must lie strictly between 0 and 1 and leave at least
    /// one row on each side.
    pub fn train_test_split(&self, test_fraction: f64, seed: Option<u64>) -> Result<(Self, Self)> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(Error::InvalidParameter {
                name: "test_fraction",
                reason: format!("must be between 0 and 1, got {}", test_fraction),
            });
        }
        let n_samples = self.nrows();
        let n_test = (n_samples as f64 * test_fraction).round() as usize;
        if n_test == 0 || n_test >= n_samples {
            return Err(Error::InvalidParameter {
                name: "test_fraction",
                reason: format!(
                    "{} of {} rows leaves one side of the split empty",
                    test_fraction, n_samples
                ),
            });
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        match seed {
            Some(seed) => indices.shuffle(&mut StdRng::seed_from_u64(seed)),
            None => indices.shuffle(&mut thread_rng()),
        }
        let (test_idx, train_idx) = indices.split_at(n_test);

        let train = Self {
            values: self.values.select_rows(train_idx)?,
            labels: self.labels.clone(),
        };
        let test = Self {
            values: self.values.select_rows(test_idx)?,
            labels: self.labels.clone(),
        };
        log::debug!(
            "Split {} rows into {} train / {} test",
            n_samples,
            train.nrows(),
            test.nrows()
        );
        Ok((train, test))
    }
}

fn validate_labels(labels: &[String], ncols: usize) -> Result<()> {
    if labels.len() != ncols {
        return Err(Error::shape(
            "labels",
            format!("{} labels", ncols),
            format!("{} labels", labels.len()),
        ));
    }
    let mut seen = HashSet::with_capacity(labels.len());
    for label in labels {
        if !seen.insert(label.as_str()) {
            return Err(Error::DuplicateLabel(label.clone()));
        }
    }
    Ok(())
}

impl fmt::Display for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .labels
            .as_ref()
            .and_then(|labels| labels.iter().map(|l| l.chars().count()).max())
            .unwrap_or(UNLABELED_WIDTH);
        let sep_line = "-".repeat((width + 3) * self.ncols()) + "-";

        writeln!(f, "{}", sep_line)?;
        if let Some(labels) = &self.labels {
            for name in labels {
                write!(f, "| {:^width$} ", name, width = width)?;
            }
            writeln!(f, "|")?;
            writeln!(f, "{}", sep_line)?;
        }
        for row in self.values.rows().take(DISPLAY_ROWS) {
            for value in row {
                write!(f, "| {:^width$} ", format!("{:?}", value), width = width)?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{}", sep_line)?;
        write!(f, "size: {} rows x {} columns", self.nrows(), self.ncols())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(
            &[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
            Some(vec!["a".into(), "b".into(), "c".into()]),
        )
        .unwrap()
    }

    #[test]
    fn slice_is_clipped_to_column_count() {
        let df = frame();
        let m = df.get(1..10).unwrap();
        assert_eq!(m.to_vec2(), vec![vec![2.0, 3.0], vec![5.0, 6.0]]);
    }

    #[test]
    fn stepped_slice_skips_columns() {
        let df = frame();
        let m = df.get(ColumnSlice::new(None, None).step_by(2)).unwrap();
        assert_eq!(m.to_vec2(), vec![vec![1.0, 3.0], vec![4.0, 6.0]]);
    }

    #[test]
    fn empty_slice_is_rejected() {
        let df = frame();
        assert!(matches!(df.get(2..2), Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn parses_textual_selectors() {
        assert_eq!("2".parse::<ColumnIndex>().unwrap(), ColumnIndex::Position(2));
        assert_eq!(
            "1..3".parse::<ColumnIndex>().unwrap(),
            ColumnIndex::Slice(ColumnSlice::new(Some(1), Some(3)))
        );
        assert_eq!(
            ":".parse::<ColumnIndex>().unwrap(),
            ColumnIndex::Slice(ColumnSlice::new(None, None))
        );
        assert_eq!(
            "width, length".parse::<ColumnIndex>().unwrap(),
            ColumnIndex::Labels(vec!["width".into(), "length".into()])
        );
        assert!(matches!(
            "-1..2".parse::<ColumnIndex>(),
            Err(Error::TypeMismatch(_))
        ));
        assert!(matches!(
            "0:1.5".parse::<ColumnIndex>(),
            Err(Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn labels_that_resemble_slices_stay_labels() {
        assert_eq!(
            "time:s".parse::<ColumnIndex>().unwrap(),
            ColumnIndex::Label("time:s".into())
        );
        assert_eq!(
            "1..x".parse::<ColumnIndex>().unwrap(),
            ColumnIndex::Label("1..x".into())
        );
        assert_eq!(
            "time:s, depth".parse::<ColumnIndex>().unwrap(),
            ColumnIndex::Labels(vec!["time:s".into(), "depth".into()])
        );
    }

    #[test]
    fn display_matches_table_layout() {
        let df = DataFrame::new(&[[1.0, 2.0]], Some(vec!["ab".into(), "c".into()])).unwrap();
        let expected = "\
-----------
| ab | c  |
-----------
| 1.0 | 2.0 |
-----------
size: 1 rows x 2 columns";
        assert_eq!(df.to_string(), expected);
    }
}
