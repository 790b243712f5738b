//! Цикл обучения: MSE + Adam, фиксированное число эпох

use burn::module::AutodiffModule;
use burn::nn::loss::{MseLoss, Reduction};
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::prelude::*;
use ndarray::{Array2, Axis};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::TrainingConfig;
use crate::error::{MlError, Result};
use crate::models::network::{
    to_array, to_scalar, to_tensor, InferenceBackend, StatsNetwork, TrainingBackend,
};
use crate::preprocessing::TrainValidationSplit;
use crate::types::{EpochMetrics, TrainingHistory};

const ADAM_EPSILON: f32 = 1e-7;

/// Ошибки на выборке: (mse, mae)
pub fn evaluate(
    network: &StatsNetwork<InferenceBackend>,
    features: &Array2<f64>,
    labels: &Array2<f64>,
) -> Result<(f64, f64)> {
    if features.nrows() != labels.nrows() {
        return Err(MlError::ShapeMismatch(format!(
            "{} feature rows vs {} label rows",
            features.nrows(),
            labels.nrows()
        )));
    }
    if features.nrows() == 0 {
        return Err(MlError::EmptyDataset("nothing to evaluate".to_string()));
    }

    let device = Default::default();
    let predictions = to_array(network.forward(to_tensor(features, &device)))?;
    let diff = predictions - labels;
    let mse = diff.mapv(|d| d * d).mean().unwrap_or(0.0);
    let mae = diff.mapv(f64::abs).mean().unwrap_or(0.0);
    Ok((mse, mae))
}

pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Обучение на train-части; валидация только для мониторинга
    /// (без early stopping и чекпоинтов). Возвращает сеть для инференса.
    pub fn fit<R: Rng + ?Sized>(
        &self,
        network: StatsNetwork<TrainingBackend>,
        split: &TrainValidationSplit,
        rng: &mut R,
    ) -> Result<(StatsNetwork<InferenceBackend>, TrainingHistory)> {
        let n_train = split.train_len();
        if n_train == 0 {
            return Err(MlError::EmptyDataset(
                "training subset has no rows".to_string(),
            ));
        }
        if self.config.batch_size == 0 {
            return Err(MlError::Config("batch_size must be > 0".to_string()));
        }
        if split.train_features.ncols() != network.input_dim() {
            return Err(MlError::ShapeMismatch(format!(
                "network expects {} features, data has {}",
                network.input_dim(),
                split.train_features.ncols()
            )));
        }
        if split.train_labels.ncols() != network.output_dim() {
            return Err(MlError::ShapeMismatch(format!(
                "network predicts {} outputs, data has {} labels",
                network.output_dim(),
                split.train_labels.ncols()
            )));
        }

        tracing::info!(
            "Training: {} train / {} val rows, epochs={}, batch={}, lr={}, params={}",
            n_train,
            split.val_len(),
            self.config.epochs,
            self.config.batch_size,
            self.config.learning_rate,
            network.num_params()
        );

        let device = Default::default();
        let mut model = network;
        let mut optimizer = AdamConfig::new().with_epsilon(ADAM_EPSILON).init();
        let loss_fn = MseLoss::new();

        let mut history = TrainingHistory::default();
        let mut indices: Vec<usize> = (0..n_train).collect();

        for epoch in 1..=self.config.epochs {
            indices.shuffle(rng);

            let mut sum_mse = 0.0;
            let mut sum_mae = 0.0;

            for batch in indices.chunks(self.config.batch_size) {
                let x = to_tensor::<TrainingBackend>(
                    &split.train_features.select(Axis(0), batch),
                    &device,
                );
                let y = to_tensor::<TrainingBackend>(
                    &split.train_labels.select(Axis(0), batch),
                    &device,
                );

                let output = model.forward(x);
                let mae = (output.clone() - y.clone()).abs().mean();
                let loss = loss_fn.forward(output, y, Reduction::Mean);

                // Средние по эпохе взвешиваются размером батча
                let weight = batch.len() as f64;
                sum_mse += to_scalar(loss.clone())? * weight;
                sum_mae += to_scalar(mae)? * weight;

                let grads = GradientsParams::from_grads(loss.backward(), &model);
                model = optimizer.step(self.config.learning_rate, model, grads);
            }

            let mse = sum_mse / n_train as f64;
            let mae = sum_mae / n_train as f64;

            let (val_mse, val_mae) = if split.val_len() > 0 {
                let (val_mse, val_mae) =
                    evaluate(&model.valid(), &split.val_features, &split.val_labels)?;
                (Some(val_mse), Some(val_mae))
            } else {
                (None, None)
            };

            let metrics = EpochMetrics {
                epoch,
                loss: mse,
                mae,
                mse,
                val_loss: val_mse,
                val_mae,
                val_mse,
            };
            tracing::info!("Epoch {}/{} - {}", epoch, self.config.epochs, metrics);
            history.epochs.push(metrics);
        }

        Ok((model.valid(), history))
    }
}
