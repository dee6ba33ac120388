use mframe::config::{ModelConfig, ModelType};
use mframe::models::factory;
use mframe::{LinearRegression, Matrix};

#[test]
fn test_factory_builds_and_predicts() {
    // y = 3 * x0 - x1 + 1
    let x = Matrix::from_shape_vec(
        (6, 2),
        vec![
            0.0, 0.0, //
            1.0, 0.0, //
            0.0, 1.0, //
            1.0, 1.0, //
            2.0, 1.0, //
            1.0, 2.0, //
        ],
    )
    .expect("failed to create feature matrix");
    let y = Matrix::from_column(&[1.0, 4.0, 0.0, 3.0, 6.0, 2.0]).unwrap();

    let params = ModelConfig {
        learning_rate: 0.05,
        model_type: ModelType::LinearRegression { n_epochs: 3000 },
    };

    let mut model = factory::build_model(params);
    assert_eq!(model.name(), "linear_regression");
    model.fit(&x, &y).unwrap();

    let predictions = model.predict(&x).unwrap();
    assert_eq!(predictions.shape(), (6, 1));
    for (p, t) in predictions.iter().zip(y.iter()) {
        assert!((p - t).abs() < 1e-3, "prediction {} too far from {}", p, t);
    }
    assert_eq!(model.losses().len(), 3000);
}

#[test]
fn test_factory_model_round_trips_through_json() {
    let x = Matrix::new(&[[1.0], [2.0], [3.0]]).unwrap();
    let y = Matrix::new(&[[2.0], [4.0], [6.0]]).unwrap();

    let mut model = factory::build_model(ModelConfig::default());
    model.fit(&x, &y).unwrap();

    let mut buffer = Vec::new();
    model.write_json(&mut buffer).unwrap();
    let restored: LinearRegression = serde_json::from_slice(&buffer).unwrap();

    assert!(restored.is_fitted());
    assert_eq!(restored.losses().len(), model.losses().len());
    let expected = model.predict(&x).unwrap();
    let actual = restored.predict(&x).unwrap();
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert!((a - e).abs() < 1e-9);
    }
}

#[test]
fn test_unfitted_model_deserializes_without_state() {
    let restored: LinearRegression =
        serde_json::from_str(r#"{ "learning_rate": 0.5, "n_epochs": 3 }"#).unwrap();
    assert!(!restored.is_fitted());
    assert_eq!(restored.n_epochs(), 3);
}

#[test]
fn test_factory_model_carries_config_hyperparameters() {
    let params = ModelConfig {
        learning_rate: 0.02,
        model_type: ModelType::LinearRegression { n_epochs: 7 },
    };
    let model = factory::build_model(params.clone());

    let mut buffer = Vec::new();
    model.write_json(&mut buffer).unwrap();
    let restored: LinearRegression = serde_json::from_slice(&buffer).unwrap();

    assert_eq!(restored, LinearRegression::from_config(&params));
    assert_eq!(restored.learning_rate(), 0.02);
    assert_eq!(restored.n_epochs(), 7);
}
