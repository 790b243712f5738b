//! Разделение на train/validation без перемешивания

use ndarray::{s, Array2};

use crate::error::{MlError, Result};

#[derive(Debug, Clone)]
pub struct TrainValidationSplit {
    pub train_features: Array2<f64>,
    pub train_labels: Array2<f64>,
    pub val_features: Array2<f64>,
    pub val_labels: Array2<f64>,
}

impl TrainValidationSplit {
    pub fn train_len(&self) -> usize {
        self.train_features.nrows()
    }

    pub fn val_len(&self) -> usize {
        self.val_features.nrows()
    }
}

/// Индекс разделения: floor(train_fraction * n)
pub fn split_index(n: usize, train_fraction: f64) -> usize {
    ((n as f64 * train_fraction).floor() as usize).min(n)
}

/// Первые floor(train_fraction * N) строк - обучение, остаток - валидация.
/// Порядок строк сохраняется.
pub fn train_validation_split(
    features: &Array2<f64>,
    labels: &Array2<f64>,
    train_fraction: f64,
) -> Result<TrainValidationSplit> {
    if features.nrows() != labels.nrows() {
        return Err(MlError::ShapeMismatch(format!(
            "{} feature rows vs {} label rows",
            features.nrows(),
            labels.nrows()
        )));
    }
    if !(train_fraction > 0.0 && train_fraction <= 1.0) {
        return Err(MlError::Config(format!(
            "train_fraction must be in (0, 1], got {}",
            train_fraction
        )));
    }

    let split_idx = split_index(features.nrows(), train_fraction);

    Ok(TrainValidationSplit {
        train_features: features.slice(s![..split_idx, ..]).to_owned(),
        train_labels: labels.slice(s![..split_idx, ..]).to_owned(),
        val_features: features.slice(s![split_idx.., ..]).to_owned(),
        val_labels: labels.slice(s![split_idx.., ..]).to_owned(),
    })
}
