//! Dice Stats ML - обучение модели статистики игрока и экспорт в TFLite

pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod types;

pub use config::{ExportConfig, PipelineConfig, TrainingConfig};
pub use error::{MlError, Result};
pub use export::{ExportReport, ModelCard, ModelExporter, NormalizationStage};
pub use models::{StatsNetwork, StatsNetworkConfig, StatsPredictor, Trainer};
pub use pipeline::{run, PipelineOutcome};
pub use preprocessing::{DataNormalizer, FeatureEngineer};
pub use types::*;
