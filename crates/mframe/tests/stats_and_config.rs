//! Integration tests for regression metrics and config types.

use mframe::config::{ModelConfig, ModelType};
use mframe::error::Error;
use mframe::stats::{mean_absolute_error, mean_squared_error, r2_score};
use mframe::Matrix;

fn column(values: &[f64]) -> Matrix {
    Matrix::from_column(values).unwrap()
}

// ---------------------------------------------------------------------------
// Regression metrics
// ---------------------------------------------------------------------------

#[test]
fn perfect_predictions() {
    let y = column(&[1.5, -2.0, 3.25]);
    assert_eq!(mean_absolute_error(&y, &y).unwrap(), 0.0);
    assert_eq!(mean_squared_error(&y, &y).unwrap(), 0.0);
    assert_eq!(r2_score(&y, &y).unwrap(), 1.0);
}

#[test]
fn mae_and_mse_weigh_errors_differently() {
    let y_true = column(&[0.0, 0.0, 0.0, 0.0]);
    let y_pred = column(&[1.0, -1.0, 1.0, 3.0]);
    assert!((mean_absolute_error(&y_true, &y_pred).unwrap() - 1.5).abs() < 1e-12);
    assert!((mean_squared_error(&y_true, &y_pred).unwrap() - 3.0).abs() < 1e-12);
}

#[test]
fn r2_of_mean_prediction_is_zero() {
    let y_true = column(&[1.0, 2.0, 3.0]);
    let y_pred = column(&[2.0, 2.0, 2.0]);
    assert!(r2_score(&y_true, &y_pred).unwrap().abs() < 1e-12);
}

#[test]
fn metrics_require_single_columns() {
    let wide = Matrix::new(&[[1.0, 2.0]]).unwrap();
    assert!(matches!(
        mean_squared_error(&wide, &wide),
        Err(Error::ShapeMismatch { .. })
    ));
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn model_config_default() {
    let config = ModelConfig::default();
    assert_eq!(config.learning_rate, 0.01);
    assert_eq!(config.model_type, ModelType::LinearRegression { n_epochs: 100 });
}

#[test]
fn model_config_from_json_file_layout() {
    let json = r#"{ "learning_rate": 0.0001, "LinearRegression": { "n_epochs": 10 } }"#;
    let config: ModelConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.learning_rate, 0.0001);
    assert_eq!(config.model_type, ModelType::LinearRegression { n_epochs: 10 });
}

#[test]
fn model_type_from_str_unknown() {
    let err = "svm".parse::<ModelType>().unwrap_err();
    assert!(err.to_string().contains("unknown model type 'svm'"));
}

#[test]
fn model_type_name() {
    assert_eq!(ModelType::default().name(), "linear_regression");
}
