use anyhow::{Context, Result};
use clap::ArgMatches;
use mframe::config::{ModelConfig, ModelType};
use mframe::io::TableReaderConfig;
use mframe::ColumnIndex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::util::validate_data_file;

/// Settings for `mframe train`. Fields missing from the JSON file take
/// their default values.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct TrainConfig {
    pub train_data: String,
    /// When absent, `test_fraction` of the training rows are held out.
    pub test_data: Option<String>,
    /// CSV file that receives `actual,predicted` pairs for the test rows.
    pub output_file: Option<String>,
    /// JSON file that receives the fitted model.
    pub model_file: Option<String>,
    pub separator: String,
    pub header: bool,
    /// Column selector for the target: a label or a position.
    pub target: String,
    /// Column selector for the features: a label, a comma-separated list of
    /// labels, a position or a slice such as `1..3`.
    pub features: String,
    pub test_fraction: f64,
    pub seed: Option<u64>,
    pub model: ModelConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            train_data: String::from("train_data.txt"),
            test_data: None,
            output_file: None,
            model_file: None,
            separator: String::from(","),
            header: true,
            target: String::from("length"),
            features: String::from("width"),
            test_fraction: 0.2,
            seed: Some(42),
            model: ModelConfig::default(),
        }
    }
}

impl TrainConfig {
    pub fn from_arguments(config_path: &PathBuf, matches: &ArgMatches) -> Result<Self> {
        let config_json = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let mut config: TrainConfig = serde_json::from_str(&config_json)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        config.apply_overrides(matches)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply command line overrides on top of the file values.
    pub fn apply_overrides(&mut self, matches: &ArgMatches) -> Result<()> {
        if let Some(train_data) = matches.get_one::<String>("train_data") {
            self.train_data = train_data.clone();
        }

        if let Some(test_data) = matches.get_one::<String>("test_data") {
            self.test_data = Some(test_data.clone());
        }

        if let Some(output_file) = matches.get_one::<String>("output_file") {
            self.output_file = Some(output_file.clone());
        }

        if let Some(model_file) = matches.get_one::<String>("model_file") {
            self.model_file = Some(model_file.clone());
        }

        if let Some(target) = matches.get_one::<String>("target") {
            self.target = target.clone();
        }

        if let Some(features) = matches.get_one::<String>("features") {
            self.features = features.clone();
        }

        if let Some(learning_rate) = matches.get_one::<f64>("learning_rate") {
            self.model.learning_rate = *learning_rate;
        }

        if let Some(epochs) = matches.get_one::<usize>("epochs") {
            match &mut self.model.model_type {
                ModelType::LinearRegression { n_epochs } => *n_epochs = *epochs,
            }
        }

        Ok(())
    }

    /// Check data paths and column selectors before any data is read.
    pub fn validate(&self) -> Result<()> {
        validate_data_file(&self.train_data)?;
        if let Some(test_data) = &self.test_data {
            validate_data_file(test_data)?;
        } else if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            anyhow::bail!(
                "test_fraction must be between 0 and 1 when no test_data is given, got {}",
                self.test_fraction
            );
        }
        self.target_index()?;
        self.feature_index()?;
        Ok(())
    }

    pub fn reader_config(&self) -> TableReaderConfig {
        TableReaderConfig::new(self.separator.clone(), self.header)
    }

    pub fn target_index(&self) -> Result<ColumnIndex> {
        let index: ColumnIndex = self
            .target
            .parse()
            .with_context(|| format!("Invalid target column: {:?}", self.target))?;
        match index {
            ColumnIndex::Position(_) | ColumnIndex::Label(_) => Ok(index),
            _ => anyhow::bail!(
                "Target must name a single column, got {:?}",
                self.target
            ),
        }
    }

    pub fn feature_index(&self) -> Result<ColumnIndex> {
        self.features
            .parse()
            .with_context(|| format!("Invalid feature columns: {:?}", self.features))
    }
}
