//! Экспорт обученной модели в ассеты мобильного приложения

pub mod quantize;
pub mod tflite;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::config::ExportConfig;
use crate::error::{MlError, Result};
use crate::models::{Activation, DenseWeights, StatsPredictor};
use crate::preprocessing::{DataNormalizer, NormalizerParams};
use crate::types::{DataSource, EpochMetrics, ModelVariant, LABEL_NAMES};

pub use quantize::{quantize_symmetric, QuantizedWeights};
pub use tflite::{build_model, FullyConnectedSpec, GraphSpec, InputNormalization};

/// Где выполняется стандартизация входа экспортированной модели
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationStage {
    /// Вариант без нормализации
    Absent,
    /// Приложение само стандартизует вход по `normalizer`
    External,
    /// Вшита в веса первого слоя (только float32)
    Folded,
    /// Отдельные float-операции SUB/MUL перед первым слоем
    GraphOps,
}

/// Описание модели, которое кладётся рядом с `.tflite`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelCard {
    pub model_name: String,
    pub variant: ModelVariant,
    pub feature_names: Vec<String>,
    pub label_names: Vec<String>,
    /// Параметры стандартизации, подобранные при обучении
    pub normalizer: Option<NormalizerParams>,
    pub normalization: NormalizationStage,
    pub quantized_weights: bool,
    pub seed: Option<u64>,
    pub data_source: DataSource,
    pub samples: usize,
    pub final_metrics: Option<EpochMetrics>,
    pub created_at: DateTime<Utc>,
}

impl ModelCard {
    pub fn new(
        model_name: &str,
        variant: ModelVariant,
        seed: Option<u64>,
        data_source: DataSource,
        samples: usize,
        final_metrics: Option<EpochMetrics>,
    ) -> Self {
        Self {
            model_name: model_name.to_string(),
            variant,
            feature_names: variant.feature_names().iter().map(|s| s.to_string()).collect(),
            label_names: LABEL_NAMES.iter().map(|s| s.to_string()).collect(),
            normalizer: None,
            normalization: NormalizationStage::Absent,
            quantized_weights: false,
            seed,
            data_source,
            samples,
            final_metrics,
            created_at: Utc::now(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[derive(Debug, Clone)]
pub struct ExportReport {
    pub model_path: PathBuf,
    pub card_path: PathBuf,
    pub bytes: usize,
    pub quantized: bool,
    pub normalization: NormalizationStage,
    /// Максимальная ошибка квантования весов
    pub max_weight_error: f64,
}

/// Вшивает стандартизацию в первый dense-слой:
/// W'[i][o] = W[i][o] / std[i], b'[o] = b[o] - sum_i W[i][o] * mean[i] / std[i]
///
/// Только для float32: при per-tensor int8 малые столбцы W' округляются в ноль.
pub fn fold_normalization(
    layers: &[DenseWeights],
    normalizer: &DataNormalizer,
) -> Result<Vec<DenseWeights>> {
    let params = normalizer.params()?;
    let mut folded = layers.to_vec();
    let first = folded
        .first_mut()
        .ok_or_else(|| MlError::Export("network has no dense layers".to_string()))?;

    if params.mean.len() != first.in_dim() {
        return Err(MlError::ShapeMismatch(format!(
            "normalizer has {} columns, network takes {}",
            params.mean.len(),
            first.in_dim()
        )));
    }

    let mean = Array1::from(params.mean);
    let std = Array1::from(params.std);

    for (i, mut row) in first.weights.rows_mut().into_iter().enumerate() {
        row.mapv_inplace(|w| w / std[i]);
    }
    // Сдвиг считается уже по масштабированным весам
    let shift = mean.dot(&first.weights);
    first.bias = &first.bias - &shift;

    Ok(folded)
}

fn input_normalization(params: &NormalizerParams) -> InputNormalization {
    InputNormalization {
        mean: params.mean.iter().map(|&m| m as f32).collect(),
        scale: params.std.iter().map(|&s| (1.0 / s) as f32).collect(),
    }
}

pub struct ModelExporter {
    config: ExportConfig,
}

impl ModelExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Куда попадёт стандартизация при текущих настройках
    pub fn normalization_stage(&self, predictor: &StatsPredictor) -> NormalizationStage {
        match (
            predictor.normalizer().is_some(),
            self.config.embed_normalization,
            self.config.quantize_weights,
        ) {
            (false, _, _) => NormalizationStage::Absent,
            (true, false, _) => NormalizationStage::External,
            (true, true, false) => NormalizationStage::Folded,
            (true, true, true) => NormalizationStage::GraphOps,
        }
    }

    pub fn graph_spec(
        &self,
        layers: &[DenseWeights],
        input_normalization: Option<InputNormalization>,
        description: &str,
    ) -> Result<(GraphSpec, f64)> {
        let input_dim = layers
            .first()
            .map(DenseWeights::in_dim)
            .ok_or_else(|| MlError::Export("network has no dense layers".to_string()))?;
        let last = layers.len() - 1;
        let mut specs = Vec::with_capacity(layers.len());
        let mut max_error = 0.0f64;

        for (idx, layer) in layers.iter().enumerate() {
            let fused_relu = match layer.activation {
                Activation::Relu => true,
                Activation::Sigmoid if idx == last => false,
                Activation::Sigmoid => {
                    return Err(MlError::Export(format!(
                        "sigmoid is only supported on the output layer (layer {idx})"
                    )))
                }
            };

            // TFLite хранит веса FULLY_CONNECTED как [out, in]
            let weights: Vec<f32> = layer.weights.t().iter().map(|&w| w as f32).collect();
            let bias: Vec<f32> = layer.bias.iter().map(|&b| b as f32).collect();
            let (spec, error) = FullyConnectedSpec::new(
                layer.in_dim(),
                layer.out_dim(),
                weights,
                bias,
                fused_relu,
                self.config.quantize_weights,
            );
            max_error = max_error.max(error as f64);
            specs.push(spec);
        }

        let sigmoid_output = layers[last].activation == Activation::Sigmoid;

        Ok((
            GraphSpec {
                input_dim,
                input_normalization,
                layers: specs,
                sigmoid_output,
                description: description.to_string(),
            },
            max_error,
        ))
    }

    pub fn to_bytes(&self, predictor: &StatsPredictor) -> Result<(Vec<u8>, f64)> {
        let layers = predictor.network().dense_layers()?;
        let description = format!("dice stats model ({})", predictor.variant());

        let (layers, normalization) = match (
            self.normalization_stage(predictor),
            predictor.normalizer(),
        ) {
            (NormalizationStage::Folded, Some(normalizer)) => {
                (fold_normalization(&layers, normalizer)?, None)
            }
            (NormalizationStage::GraphOps, Some(normalizer)) => {
                (layers, Some(input_normalization(&normalizer.params()?)))
            }
            _ => (layers, None),
        };

        let (graph, max_error) = self.graph_spec(&layers, normalization, &description)?;
        Ok((build_model(&graph)?, max_error))
    }

    /// Пишет `.tflite` и карточку модели; файлы появляются только целиком
    pub fn export(
        &self,
        predictor: &StatsPredictor,
        mut card: ModelCard,
        model_path: &Path,
        card_path: &Path,
    ) -> Result<ExportReport> {
        let (bytes, max_weight_error) = self.to_bytes(predictor)?;
        let normalization = self.normalization_stage(predictor);

        card.normalizer = predictor.normalizer().map(|n| n.params()).transpose()?;
        card.normalization = normalization;
        card.quantized_weights = self.config.quantize_weights;
        let card_json = serde_json::to_string_pretty(&card)?;

        write_all_atomic(&[
            (model_path, bytes.as_slice()),
            (card_path, card_json.as_bytes()),
        ])?;

        tracing::info!(
            "Exported {} bytes to {} (quantized: {}, normalization: {:?}, max weight error: {:.6})",
            bytes.len(),
            model_path.display(),
            self.config.quantize_weights,
            normalization,
            max_weight_error
        );

        Ok(ExportReport {
            model_path: model_path.to_path_buf(),
            card_path: card_path.to_path_buf(),
            bytes: bytes.len(),
            quantized: self.config.quantize_weights,
            normalization,
            max_weight_error,
        })
    }
}

fn tmp_path(path: &Path) -> Result<PathBuf> {
    let mut name = path
        .file_name()
        .ok_or_else(|| MlError::Export(format!("{} has no file name", path.display())))?
        .to_os_string();
    name.push(".tmp");
    Ok(path.with_file_name(name))
}

/// Сначала пишутся все временные файлы, потом все rename.
/// Ошибка на любом шаге удаляет оставшиеся временные файлы.
fn write_all_atomic(files: &[(&Path, &[u8])]) -> Result<()> {
    let mut staged = Vec::with_capacity(files.len());
    for (path, _) in files {
        staged.push((tmp_path(path)?, *path));
    }

    let result = stage_and_commit(files, &staged);
    if result.is_err() {
        for (tmp, _) in &staged {
            let _ = fs::remove_file(tmp);
        }
    }
    result
}

fn stage_and_commit(files: &[(&Path, &[u8])], staged: &[(PathBuf, &Path)]) -> Result<()> {
    for ((path, bytes), (tmp, _)) in files.iter().zip(staged) {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(tmp, bytes)?;
    }
    for (tmp, path) in staged {
        fs::rename(tmp, path)?;
    }
    Ok(())
}
