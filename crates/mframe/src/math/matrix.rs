use std::fmt;
use std::iter;
use std::ops::{Index, IndexMut};
use std::slice::ChunksExact;

use serde::{Deserialize, Serialize};

use crate::error::{Axis, Error, Result};

/// Dense, row-major matrix of `f64` values.
///
/// A `Matrix` always holds at least one row and one column and every row has
/// the same length. Value-returning operations (`add`, `sub`, `mul_scalar`,
/// `matmul`, `transpose`) leave `self` untouched and allocate a new matrix;
/// mutating operations either take `&mut self` with an `_in_place` suffix or
/// are inherently shape-changing (`reshape`, `add_row`, `add_column`), and
/// return `&mut Self` so calls can be chained.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

/// Right-hand side of an element-wise addition or subtraction.
#[derive(Clone, Copy, Debug)]
pub enum Operand<'a> {
    /// Combined cell by cell; shapes must match.
    Matrix(&'a Matrix),
    /// Broadcast to every cell.
    Scalar(f64),
}

impl<'a> From<&'a Matrix> for Operand<'a> {
    fn from(value: &'a Matrix) -> Self {
        Operand::Matrix(value)
    }
}

impl From<f64> for Operand<'_> {
    fn from(value: f64) -> Self {
        Operand::Scalar(value)
    }
}

impl Matrix {
    /// Build a matrix from a grid of rows. The shape is inferred from the input.
    ///
    /// Fails with [`Error::ShapeMismatch`] when the grid is empty, its first row
    /// is empty, or the rows are ragged.
    pub fn new<R: AsRef<[f64]>>(values: &[R]) -> Result<Self> {
        let (rows, cols) = grid_shape("new", values)?;
        let mut data = Vec::with_capacity(rows * cols);
        for row in values {
            data.extend_from_slice(row.as_ref());
        }
        Ok(Self { data, rows, cols })
    }

    /// Build a matrix from a grid, then refill it into `shape`.
    ///
    /// The grid is flattened row-major and poured into the new shape: missing
    /// cells are padded with zero, and once the new grid is full any remaining
    /// input values are dropped.
    pub fn with_shape<R: AsRef<[f64]>>(values: &[R], shape: (usize, usize)) -> Result<Self> {
        let source = Self::new(values)?;
        let (rows, cols) = shape;
        check_dims("with_shape", rows, cols)?;
        Ok(Self {
            data: refill(&source.data, rows * cols),
            rows,
            cols,
        })
    }

    /// An all-zero matrix of the given shape, seeded from a single zero cell
    /// through the reshape path.
    pub fn zeros(shape: (usize, usize)) -> Result<Self> {
        Self::with_shape(&[[0.0]], shape)
    }

    pub fn from_shape_vec(shape: (usize, usize), data: Vec<f64>) -> Result<Self> {
        let (rows, cols) = shape;
        check_dims("from_shape_vec", rows, cols)?;
        if data.len() != rows * cols {
            return Err(Error::shape(
                "from_shape_vec",
                format!("{} values for shape ({}, {})", rows * cols, rows, cols),
                format!("{} values", data.len()),
            ));
        }
        Ok(Self { data, rows, cols })
    }

    /// A single-column matrix with one row per value.
    pub fn from_column(values: &[f64]) -> Result<Self> {
        Self::from_shape_vec((values.len(), 1), values.to_vec())
    }

    /// A single-row matrix.
    pub fn from_row(values: &[f64]) -> Result<Self> {
        Self::from_shape_vec((1, values.len()), values.to_vec())
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// `(row_count, column_count)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.rows {
            return Err(Error::IndexOutOfBounds {
                axis: Axis::Row,
                index: row,
                len: self.rows,
            });
        }
        Ok(())
    }

    fn check_col(&self, col: usize) -> Result<()> {
        if col >= self.cols {
            return Err(Error::IndexOutOfBounds {
                axis: Axis::Column,
                index: col,
                len: self.cols,
            });
        }
        Ok(())
    }

    /// Borrow a full row.
    pub fn row(&self, row: usize) -> Result<&[f64]> {
        self.check_row(row)?;
        let start = self.offset(row, 0);
        Ok(&self.data[start..start + self.cols])
    }

    /// Read a single cell.
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        self.check_row(row)?;
        self.check_col(col)?;
        Ok(self.data[self.offset(row, col)])
    }

    /// Overwrite a single cell.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        self.check_row(row)?;
        self.check_col(col)?;
        let offset = self.offset(row, col);
        self.data[offset] = value;
        Ok(())
    }

    /// Replace a full row. The replacement must have exactly `ncols()` values.
    pub fn set_row(&mut self, row: usize, values: &[f64]) -> Result<()> {
        self.check_row(row)?;
        if values.len() != self.cols {
            return Err(Error::shape(
                "set_row",
                format!("{} values", self.cols),
                format!("{} values", values.len()),
            ));
        }
        let start = self.offset(row, 0);
        self.data[start..start + self.cols].copy_from_slice(values);
        Ok(())
    }

    pub fn column(&self, col: usize) -> Result<Vec<f64>> {
        self.check_col(col)?;
        Ok((0..self.rows).map(|row| self.data[self.offset(row, col)]).collect())
    }

    pub fn rows(&self) -> ChunksExact<'_, f64> {
        self.data.chunks_exact(self.cols)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.data.iter()
    }

    /// The grid as nested rows.
    pub fn to_vec2(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    pub fn select_rows(&self, indices: &[usize]) -> Result<Matrix> {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &row in indices {
            data.extend_from_slice(self.row(row)?);
        }
        Matrix::from_shape_vec((indices.len(), self.cols), data)
    }

    /// Gather the given columns, in order, into a new matrix.
    pub fn select_columns(&self, indices: &[usize]) -> Result<Matrix> {
        for &col in indices {
            self.check_col(col)?;
        }
        let mut data = Vec::with_capacity(self.rows * indices.len());
        for row in self.rows() {
            data.extend(indices.iter().map(|&col| row[col]));
        }
        Matrix::from_shape_vec((self.rows, indices.len()), data)
    }

    pub fn mapv<F>(&self, f: F) -> Matrix
    where
        F: FnMut(&f64) -> f64,
    {
        Matrix {
            data: self.data.iter().map(f).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Arithmetic mean over all cells.
    pub fn mean(&self) -> f64 {
        self.sum() / self.data.len() as f64
    }

    /// Element-wise sum with another matrix of identical shape, or with a scalar.
    pub fn add<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Matrix> {
        let mut out = self.clone();
        out.add_in_place(rhs)?;
        Ok(out)
    }

    /// Element-wise difference with another matrix of identical shape, or with a scalar.
    pub fn sub<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Matrix> {
        let mut out = self.clone();
        out.sub_in_place(rhs)?;
        Ok(out)
    }

    pub fn mul_scalar(&self, factor: f64) -> Matrix {
        self.mapv(|v| v * factor)
    }

    pub fn add_in_place<'a>(&mut self, rhs: impl Into<Operand<'a>>) -> Result<&mut Self> {
        self.combine_in_place("add", rhs.into(), |a, b| a + b)
    }

    pub fn sub_in_place<'a>(&mut self, rhs: impl Into<Operand<'a>>) -> Result<&mut Self> {
        self.combine_in_place("sub", rhs.into(), |a, b| a - b)
    }

    pub fn scale_in_place(&mut self, factor: f64) -> &mut Self {
        for v in self.data.iter_mut() {
            *v *= factor;
        }
        self
    }

    fn combine_in_place<F>(&mut self, op: &'static str, rhs: Operand<'_>, f: F) -> Result<&mut Self>
    where
        F: Fn(f64, f64) -> f64,
    {
        match rhs {
            Operand::Matrix(other) => {
                if self.shape() != other.shape() {
                    return Err(Error::shape(
                        op,
                        format_shape(self.shape()),
                        format_shape(other.shape()),
                    ));
                }
                for (a, &b) in self.data.iter_mut().zip(other.data.iter()) {
                    *a = f(*a, b);
                }
            }
            Operand::Scalar(b) => {
                for a in self.data.iter_mut() {
                    *a = f(*a, b);
                }
            }
        }
        Ok(self)
    }

    /// Matrix product `self · other`.
    ///
    /// Each output cell is the full dot product accumulated in `k` order
    /// into a zero-initialised result, so results are reproducible bit for bit.
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(Error::shape(
                "matmul",
                format!("{} rows on the right-hand side", self.cols),
                format!("{} rows", other.rows),
            ));
        }
        let mut result = Matrix::zeros((self.rows, other.cols))?;
        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut acc = result.data[i * other.cols + j];
                for k in 0..self.cols {
                    acc += self.data[self.offset(i, k)] * other.data[other.offset(k, j)];
                }
                result.data[i * other.cols + j] = acc;
            }
        }
        Ok(result)
    }

    /// A transposed copy; `self` is not modified.
    pub fn transpose(&self) -> Matrix {
        let mut data = Vec::with_capacity(self.data.len());
        for col in 0..self.cols {
            for row in 0..self.rows {
                data.push(self.data[self.offset(row, col)]);
            }
        }
        Matrix {
            data,
            rows: self.cols,
            cols: self.rows,
        }
    }

    pub fn transpose_in_place(&mut self) -> &mut Self {
        *self = self.transpose();
        self
    }

    /// Change the shape in place, padding with zeros or dropping trailing
    /// values as described for [`Matrix::with_shape`].
    pub fn reshape(&mut self, rows: usize, cols: usize) -> Result<&mut Self> {
        check_dims("reshape", rows, cols)?;
        self.data = refill(&self.data, rows * cols);
        self.rows = rows;
        self.cols = cols;
        Ok(self)
    }

    /// Append a column; `values` must hold one value per row.
    pub fn add_column(&mut self, values: &[f64]) -> Result<&mut Self> {
        if values.len() != self.rows {
            return Err(Error::shape(
                "add_column",
                format!("{} values", self.rows),
                format!("{} values", values.len()),
            ));
        }
        let extra = self.cols;
        let mut grown = Matrix::zeros((self.rows, self.cols + 1))?;
        for i in 0..grown.rows {
            for j in 0..grown.cols {
                let cell = if j == extra {
                    values[i]
                } else {
                    self.data[self.offset(i, j)]
                };
                let offset = grown.offset(i, j);
                grown.data[offset] = cell;
            }
        }
        *self = grown;
        Ok(self)
    }

    /// Append a row; `values` must hold one value per column.
    pub fn add_row(&mut self, values: &[f64]) -> Result<&mut Self> {
        if values.len() != self.cols {
            return Err(Error::shape(
                "add_row",
                format!("{} values", self.cols),
                format!("{} values", values.len()),
            ));
        }
        let extra = self.rows;
        let mut grown = Matrix::zeros((self.rows + 1, self.cols))?;
        for i in 0..grown.rows {
            for j in 0..grown.cols {
                let cell = if i == extra {
                    values[j]
                } else {
                    self.data[self.offset(i, j)]
                };
                let offset = grown.offset(i, j);
                grown.data[offset] = cell;
            }
        }
        *self = grown;
        Ok(self)
    }
}

fn grid_shape<R: AsRef<[f64]>>(op: &'static str, values: &[R]) -> Result<(usize, usize)> {
    let Some(first) = values.first() else {
        return Err(Error::shape(op, "at least one row", "0 rows"));
    };
    let cols = first.as_ref().len();
    if cols == 0 {
        return Err(Error::shape(op, "at least one column", "0 columns"));
    }
    for (idx, row) in values.iter().enumerate() {
        let len = row.as_ref().len();
        if len != cols {
            return Err(Error::shape(
                op,
                format!("rows of length {}", cols),
                format!("row {} of length {}", idx, len),
            ));
        }
    }
    Ok((values.len(), cols))
}

fn check_dims(op: &'static str, rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(Error::shape(
            op,
            "non-zero row and column counts",
            format_shape((rows, cols)),
        ));
    }
    Ok(())
}

fn refill(flat: &[f64], len: usize) -> Vec<f64> {
    flat.iter()
        .copied()
        .chain(iter::repeat(0.0))
        .take(len)
        .collect()
}

pub(crate) fn format_shape(shape: (usize, usize)) -> String {
    format!("({}, {})", shape.0, shape.1)
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = Error;

    fn try_from(values: Vec<Vec<f64>>) -> Result<Self> {
        Matrix::new(&values)
    }
}

impl From<Matrix> for Vec<Vec<f64>> {
    fn from(value: Matrix) -> Self {
        value.to_vec2()
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        assert!(
            index.0 < self.rows && index.1 < self.cols,
            "index {:?} out of bounds for shape {}",
            index,
            format_shape(self.shape())
        );
        &self.data[self.offset(index.0, index.1)]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        assert!(
            index.0 < self.rows && index.1 < self.cols,
            "index {:?} out of bounds for shape {}",
            index,
            format_shape(self.shape())
        );
        let offset = self.offset(index.0, index.1);
        &mut self.data[offset]
    }
}

/// Row access; `m[i]` is the `i`-th row.
impl Index<usize> for Matrix {
    type Output = [f64];

    fn index(&self, row: usize) -> &Self::Output {
        assert!(row < self.rows, "row {} out of bounds for {} rows", row, self.rows);
        let start = self.offset(row, 0);
        &self.data[start..start + self.cols]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, row) in self.rows().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for (col, value) in row.iter().enumerate() {
                if col > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:?}", value)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
