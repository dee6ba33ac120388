use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// Default gradient step scale.
pub const DEFAULT_LEARNING_RATE: f64 = 0.01;
/// Default number of training epochs.
pub const DEFAULT_N_EPOCHS: usize = 100;

/// Central configuration for models in the crate.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub learning_rate: f64,

    #[serde(flatten)]
    pub model_type: ModelType,
}

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum ModelType {
    LinearRegression { n_epochs: usize },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::LinearRegression {
            n_epochs: DEFAULT_N_EPOCHS,
        }
    }
}

impl ModelType {
    /// Short name used in logs and config files.
    pub fn name(&self) -> &'static str {
        match self {
            ModelType::LinearRegression { .. } => "linear_regression",
        }
    }
}

impl FromStr for ModelType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear_regression" | "linear" => Ok(ModelType::default()),
            _ => Err(Error::InvalidParameter {
                name: "model_type",
                reason: format!(
                    "unknown model type '{}'; supported types: linear_regression (alias: linear)",
                    s
                ),
            }),
        }
    }
}

impl ModelConfig {
    pub fn new(learning_rate: f64, model_type: ModelType) -> Self {
        Self {
            learning_rate,
            model_type,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            model_type: ModelType::default(),
        }
    }
}
