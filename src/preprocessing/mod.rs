//! Модуль предобработки данных

pub mod feature_engineering;
pub mod normalization;
pub mod split;

pub use feature_engineering::FeatureEngineer;
pub use normalization::{DataNormalizer, NormalizerParams};
pub use split::{train_validation_split, TrainValidationSplit};
