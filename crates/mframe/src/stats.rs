use crate::error::{Error, Result};
use crate::math::matrix::format_shape;
use crate::math::Matrix;

/// Mean absolute error between targets and predictions.
///
/// # Arguments
///
/// * `y_true` - An `(n, 1)` matrix of observed targets.
/// * `y_pred` - An `(n, 1)` matrix of predictions, in the same row order.
///
/// # Returns
///
/// The mean of `|y_true - y_pred|` over all rows, or `ShapeMismatch` when the
/// inputs are not single columns of equal length.
pub fn mean_absolute_error(y_true: &Matrix, y_pred: &Matrix) -> Result<f64> {
    let residuals = residuals("mean_absolute_error", y_true, y_pred)?;
    Ok(residuals.mapv(|r| r.abs()).mean())
}

/// Mean squared error between targets and predictions.
///
/// This is the same quantity the linear regression trainer records per epoch.
pub fn mean_squared_error(y_true: &Matrix, y_pred: &Matrix) -> Result<f64> {
    let residuals = residuals("mean_squared_error", y_true, y_pred)?;
    Ok(residuals.mapv(|r| r * r).mean())
}

/// Coefficient of determination.
///
/// A constant target has no variance to explain; in that case the score is
/// 1.0 for an exact fit and 0.0 otherwise.
pub fn r2_score(y_true: &Matrix, y_pred: &Matrix) -> Result<f64> {
    let residuals = residuals("r2_score", y_true, y_pred)?;
    let ss_res = residuals.mapv(|r| r * r).sum();
    let y_mean = y_true.mean();
    let ss_tot = y_true.mapv(|y| (y - y_mean) * (y - y_mean)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

fn residuals(op: &'static str, y_true: &Matrix, y_pred: &Matrix) -> Result<Matrix> {
    if y_true.ncols() != 1 || y_true.shape() != y_pred.shape() {
        return Err(Error::shape(
            op,
            format!("two {} column matrices", format_shape((y_true.nrows(), 1))),
            format!("{} and {}", format_shape(y_true.shape()), format_shape(y_pred.shape())),
        ));
    }
    y_true.sub(y_pred)
}
