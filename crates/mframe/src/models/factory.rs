use crate::config::{ModelConfig, ModelType};
use crate::models::linear_regression::LinearRegression;
use crate::models::regressor_trait::RegressorModel;

/// Build a boxed regressor from a `ModelConfig`.
pub fn build_model(params: ModelConfig) -> Box<dyn RegressorModel> {
    match params.model_type {
        ModelType::LinearRegression { .. } => Box::new(LinearRegression::from_config(&params)),
    }
}
