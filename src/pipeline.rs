//! Полный цикл: данные -> нормализация -> обучение -> экспорт

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::PipelineConfig;
use crate::data::DataProvider;
use crate::error::Result;
use crate::export::{ExportReport, ModelCard, ModelExporter};
use crate::models::{seeded_backend, StatsNetworkConfig, StatsPredictor, Trainer, TrainingBackend};
use crate::preprocessing::{train_validation_split, DataNormalizer};
use crate::types::{DataSource, PlayerAnalysis, PlayerStats, TrainingHistory};

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub model_path: PathBuf,
    pub card_path: PathBuf,
    pub data_source: DataSource,
    pub samples: usize,
    pub history: TrainingHistory,
    pub export: ExportReport,
    /// Контрольный прогноз для `PlayerStats::sample()`
    pub sample_analysis: PlayerAnalysis,
}

pub fn run(config: &PipelineConfig) -> Result<PipelineOutcome> {
    config.validate()?;

    // Генератор burn общий на процесс: держим его до конца обучения и экспорта
    let _backend = seeded_backend(config.seed);

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let dataset = DataProvider::load(config, &mut rng)?;
    let samples = dataset.len();

    let (features, normalizer) = if config.variant.normalizes_inputs() {
        let mut normalizer = DataNormalizer::new();
        let normalized = normalizer.fit_transform(&dataset.features)?;
        (normalized, Some(normalizer))
    } else {
        (dataset.features.clone(), None)
    };

    let split = train_validation_split(&features, &dataset.labels, config.train_fraction)?;

    let network = StatsNetworkConfig::for_variant(config.variant)
        .init::<TrainingBackend>(&Default::default());
    let (network, history) = Trainer::new(config.training.clone()).fit(network, &split, &mut rng)?;

    let predictor = StatsPredictor::new(config.variant, normalizer, network)?;

    let card = ModelCard::new(
        &config.model_name,
        config.variant,
        config.seed,
        dataset.source.clone(),
        samples,
        history.last().cloned(),
    );
    let model_path = config.model_path();
    let card_path = config.card_path();
    let export = ModelExporter::new(config.export.clone()).export(
        &predictor,
        card,
        &model_path,
        &card_path,
    )?;

    let sample_analysis = predictor.analyze(&PlayerStats::sample())?;
    tracing::info!(
        "Sample prediction: win rate {:.3}, consistency {:.3}, improvement {:.3}, style {:?}",
        sample_analysis.predicted_win_rate,
        sample_analysis.consistency,
        sample_analysis.improvement,
        sample_analysis.play_style
    );

    Ok(PipelineOutcome {
        model_path,
        card_path,
        data_source: dataset.source,
        samples,
        history,
        export,
        sample_analysis,
    })
}
