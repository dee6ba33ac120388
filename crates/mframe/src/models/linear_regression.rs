use serde::{Deserialize, Serialize};

use crate::config::{ModelConfig, ModelType, DEFAULT_LEARNING_RATE, DEFAULT_N_EPOCHS};
use crate::error::{Error, Result};
use crate::math::matrix::format_shape;
use crate::math::Matrix;
use crate::models::regressor_trait::RegressorModel;

/// Ordinary least squares fitted by batch gradient descent.
///
/// Every epoch uses the full training set:
///
/// ```text
/// predictions = X·w + b
/// errors      = y - predictions
/// w          += learning_rate · 2 · (Xᵗ·errors) / n_samples
/// b          += learning_rate · 2 · mean(errors)
/// loss        = mean(errors²)
/// ```
///
/// There is no convergence check; `fit` always runs exactly `n_epochs`
/// epochs starting from zero weights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    learning_rate: f64,
    n_epochs: usize,
    #[serde(default)]
    fitted: Option<Fitted>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Fitted {
    /// `(n_features, 1)` column of weights.
    weights: Matrix,
    bias: f64,
    losses: Vec<f64>,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new(DEFAULT_LEARNING_RATE, DEFAULT_N_EPOCHS)
    }
}

impl LinearRegression {
    pub fn new(learning_rate: f64, n_epochs: usize) -> Self {
        if !(learning_rate > 0.0 && learning_rate <= 1.0) {
            log::warn!(
                "learning_rate {} is outside (0, 1]; gradient descent may diverge",
                learning_rate
            );
        }
        Self {
            learning_rate,
            n_epochs,
            fitted: None,
        }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        match config.model_type {
            ModelType::LinearRegression { n_epochs } => Self::new(config.learning_rate, n_epochs),
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn n_epochs(&self) -> usize {
        self.n_epochs
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    pub fn weights(&self) -> Option<&Matrix> {
        self.fitted.as_ref().map(|f| &f.weights)
    }

    pub fn bias(&self) -> Option<f64> {
        self.fitted.as_ref().map(|f| f.bias)
    }

    /// Fit weights and bias to `x` (`n_samples` × `n_features`) and `y`
    /// (`n_samples` × 1). `x` is only read; its transpose is computed once
    /// into a separate matrix.
    pub fn fit(&mut self, x: &Matrix, y: &Matrix) -> Result<()> {
        if y.shape() != (x.nrows(), 1) {
            return Err(Error::shape(
                "fit",
                format!("targets of shape {}", format_shape((x.nrows(), 1))),
                format_shape(y.shape()),
            ));
        }
        self.fitted = None;

        let n_samples = x.nrows() as f64;
        let step = self.learning_rate * 2.0;
        let x_t = x.transpose();
        let mut weights = Matrix::zeros((x.ncols(), 1))?;
        let mut bias = 0.0;
        let mut losses = Vec::with_capacity(self.n_epochs);

        log::debug!(
            "Fitting linear regression: {} samples, {} features, {} epochs, learning_rate {}",
            x.nrows(),
            x.ncols(),
            self.n_epochs,
            self.learning_rate
        );

        for epoch in 0..self.n_epochs {
            let mut predictions = x.matmul(&weights)?;
            predictions.add_in_place(bias)?;
            let errors = y.sub(&predictions)?;

            let mut gradient = x_t.matmul(&errors)?;
            gradient.scale_in_place(step / n_samples);
            weights.add_in_place(&gradient)?;
            bias += step * errors.mean();

            let loss = errors.mapv(|e| e * e).mean();
            log::trace!("epoch {}/{}: loss {}", epoch + 1, self.n_epochs, loss);
            losses.push(loss);
        }

        match losses.last() {
            Some(loss) if !loss.is_finite() => log::warn!(
                "Training loss diverged to {}; try a smaller learning_rate",
                loss
            ),
            Some(loss) => log::debug!("Finished fitting: final loss {}, bias {}", loss, bias),
            None => log::debug!("n_epochs is 0; weights and bias stay at zero"),
        }

        self.fitted = Some(Fitted {
            weights,
            bias,
            losses,
        });
        Ok(())
    }

    /// `x·weights + bias` for an `(n_samples, n_features)` matrix.
    pub fn predict(&self, x: &Matrix) -> Result<Matrix> {
        let fitted = self.fitted.as_ref().ok_or(Error::NotFitted)?;
        let mut predictions = x.matmul(&fitted.weights)?;
        predictions.add_in_place(fitted.bias)?;
        Ok(predictions)
    }

    /// Predict a single sample given as one value per feature.
    pub fn predict_row(&self, features: &[f64]) -> Result<f64> {
        let predictions = self.predict(&Matrix::from_row(features)?)?;
        predictions.get(0, 0)
    }

    pub fn losses(&self) -> &[f64] {
        self.fitted
            .as_ref()
            .map(|f| f.losses.as_slice())
            .unwrap_or_default()
    }

    /// R² of the predictions for `x` against `y`.
    pub fn score(&self, x: &Matrix, y: &Matrix) -> Result<f64> {
        let predictions = self.predict(x)?;
        crate::stats::r2_score(y, &predictions)
    }
}

impl RegressorModel for LinearRegression {
    fn fit(&mut self, x: &Matrix, y: &Matrix) -> Result<()> {
        LinearRegression::fit(self, x, y)
    }

    fn predict(&self, x: &Matrix) -> Result<Matrix> {
        LinearRegression::predict(self, x)
    }

    fn losses(&self) -> &[f64] {
        LinearRegression::losses(self)
    }

    fn write_json(&self, writer: &mut dyn std::io::Write) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }

    fn name(&self) -> &str {
        "linear_regression"
    }
}
