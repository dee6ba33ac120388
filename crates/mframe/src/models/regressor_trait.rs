use crate::error::Result;
use crate::math::Matrix;

/// Contract shared by the regression trainers in this crate.
///
/// `x` is always an `(n_samples, n_features)` matrix and targets are an
/// `(n_samples, 1)` column matrix.
pub trait RegressorModel {
    /// Fit the model, discarding any previous fit.
    fn fit(&mut self, x: &Matrix, y: &Matrix) -> Result<()>;

    /// Predict an `(n_samples, 1)` column of targets. Fails with
    /// `NotFitted` before [`RegressorModel::fit`] has been called.
    fn predict(&self, x: &Matrix) -> Result<Matrix>;

    /// Training loss recorded after each epoch of the last fit; empty if unfitted.
    fn losses(&self) -> &[f64];

    /// Write the model, including any fitted parameters, as JSON.
    fn write_json(&self, writer: &mut dyn std::io::Write) -> serde_json::Result<()>;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "regressor"
    }
}
