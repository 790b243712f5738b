//! Конфигурация пайплайна обучения

use std::path::PathBuf;

use crate::error::{MlError, Result};
use crate::types::ModelVariant;

pub const DEFAULT_DATA_PATH: &str = "training_data.csv";
pub const DEFAULT_ASSETS_DIR: &str = "app/src/main/assets";
pub const DEFAULT_MODEL_NAME: &str = "statistics_model";
pub const DEFAULT_SYNTHETIC_SAMPLES: usize = 1000;
pub const DEFAULT_TRAIN_FRACTION: f64 = 0.8;

#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 50,
            batch_size: 32,
            learning_rate: 0.001,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Веса в int8 (dynamic range), иначе float32
    pub quantize_weights: bool,
    /// Стандартизация внутри графа: вшивается в веса для float32,
    /// отдельными SUB/MUL перед первым слоем для int8
    pub embed_normalization: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            quantize_weights: true,
            embed_normalization: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub variant: ModelVariant,
    pub data_path: PathBuf,
    pub synthetic_samples: usize,
    /// None - недетерминированный запуск
    pub seed: Option<u64>,
    pub train_fraction: f64,
    pub assets_dir: PathBuf,
    pub model_name: String,
    pub training: TrainingConfig,
    pub export: ExportConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            variant: ModelVariant::default(),
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            synthetic_samples: DEFAULT_SYNTHETIC_SAMPLES,
            seed: None,
            train_fraction: DEFAULT_TRAIN_FRACTION,
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            training: TrainingConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.training.epochs == 0 {
            return Err(MlError::Config("epochs must be > 0".to_string()));
        }
        if self.training.batch_size == 0 {
            return Err(MlError::Config("batch_size must be > 0".to_string()));
        }
        if !(self.training.learning_rate.is_finite() && self.training.learning_rate > 0.0) {
            return Err(MlError::Config(
                "learning_rate must be finite and > 0".to_string(),
            ));
        }
        if !(self.train_fraction > 0.0 && self.train_fraction <= 1.0) {
            return Err(MlError::Config(format!(
                "train_fraction must be in (0, 1], got {}",
                self.train_fraction
            )));
        }
        if self.synthetic_samples == 0 {
            return Err(MlError::Config("synthetic_samples must be > 0".to_string()));
        }
        if self.model_name.trim().is_empty() || self.model_name.contains(['/', '\\']) {
            return Err(MlError::Config(format!(
                "invalid model_name {:?}",
                self.model_name
            )));
        }
        Ok(())
    }

    pub fn model_path(&self) -> PathBuf {
        self.assets_dir.join(format!("{}.tflite", self.model_name))
    }

    pub fn card_path(&self) -> PathBuf {
        self.assets_dir.join(format!("{}.json", self.model_name))
    }
}
