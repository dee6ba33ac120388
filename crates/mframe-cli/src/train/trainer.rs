use anyhow::{Context, Result};
use mframe::io::{read_table_with_config, TableData};
use mframe::models::factory::build_model;
use mframe::stats::{mean_absolute_error, r2_score};
use mframe::{DataFrame, Matrix};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::input::TrainConfig;

/// What a training run produced, for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    pub model_name: String,
    pub train_rows: usize,
    pub test_rows: usize,
    pub final_loss: Option<f64>,
    pub mean_absolute_error: f64,
    pub r2: f64,
}

pub fn run_training(config: &TrainConfig) -> Result<TrainingSummary> {
    let reader = config.reader_config();

    let train_table = load_table(&config.train_data, &reader)?;
    let (train_frame, test_frame) = match &config.test_data {
        Some(test_path) => (train_table.frame, load_table(test_path, &reader)?.frame),
        None => {
            log::info!(
                "No test data provided; holding out {:.0}% of the training rows",
                config.test_fraction * 100.0
            );
            train_table
                .frame
                .train_test_split(config.test_fraction, config.seed)
                .context("Failed to split training data")?
        }
    };

    let (x_train, y_train) = select_columns(config, &train_frame).context("Training data")?;
    let (x_test, y_test) = select_columns(config, &test_frame).context("Test data")?;

    let mut model = build_model(config.model.clone());
    log::info!(
        "Training {} on {} rows x {} features",
        model.name(),
        x_train.nrows(),
        x_train.ncols()
    );
    model
        .fit(&x_train, &y_train)
        .context("Failed to fit model")?;

    let final_loss = model.losses().last().copied();
    if let Some(loss) = final_loss {
        log::info!("Final training loss (MSE): {:.6}", loss);
    }

    let predictions = model
        .predict(&x_test)
        .context("Failed to predict test data")?;
    let mae = mean_absolute_error(&y_test, &predictions)?;
    let r2 = r2_score(&y_test, &predictions)?;

    if let Some(output_file) = &config.output_file {
        write_predictions(Path::new(output_file), &y_test, &predictions)?;
        log::info!("Wrote predictions to {}", output_file);
    }

    if let Some(model_file) = &config.model_file {
        let file = File::create(model_file)
            .with_context(|| format!("Failed to create model file: {}", model_file))?;
        let mut writer = BufWriter::new(file);
        model
            .write_json(&mut writer)
            .with_context(|| format!("Failed to write model file: {}", model_file))?;
        writer.flush()?;
        log::info!("Saved fitted model to {}", model_file);
    }

    Ok(TrainingSummary {
        model_name: model.name().to_string(),
        train_rows: x_train.nrows(),
        test_rows: x_test.nrows(),
        final_loss,
        mean_absolute_error: mae,
        r2,
    })
}

fn load_table(path: &str, reader: &mframe::io::TableReaderConfig) -> Result<TableData> {
    let table = read_table_with_config(path, reader)
        .with_context(|| format!("Failed to load data from {}", path))?;
    log::info!(
        "Loaded {} rows from {} ({} skipped)",
        table.rows_read,
        path,
        table.rows_skipped
    );
    Ok(table)
}

fn select_columns(config: &TrainConfig, frame: &DataFrame) -> Result<(Matrix, Matrix)> {
    let x = frame
        .get(config.feature_index()?)
        .with_context(|| format!("Failed to select feature columns {:?}", config.features))?;
    let y = frame
        .get(config.target_index()?)
        .with_context(|| format!("Failed to select target column {:?}", config.target))?;
    Ok((x, y))
}

/// Write `actual,predicted` pairs, one per test row.
pub fn write_predictions(path: &Path, actual: &Matrix, predicted: &Matrix) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create predictions file: {:?}", path))?;
    writer.write_record(["actual", "predicted"])?;
    for (a, p) in actual.iter().zip(predicted.iter()) {
        writer.write_record([a.to_string(), p.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}
