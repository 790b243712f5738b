use std::fs;
use std::path::Path;

use dice_stats_ml::config::{ExportConfig, PipelineConfig, TrainingConfig};
use dice_stats_ml::{pipeline, MlError, ModelCard, ModelVariant, NormalizationStage, PlayStyle};

fn config_in(dir: &Path, variant: ModelVariant) -> PipelineConfig {
    PipelineConfig {
        variant,
        data_path: dir.join("training_data.csv"),
        synthetic_samples: 120,
        seed: Some(42),
        assets_dir: dir.join("app/src/main/assets"),
        training: TrainingConfig {
            epochs: 3,
            batch_size: 16,
            learning_rate: 0.001,
        },
        ..PipelineConfig::default()
    }
}

fn write_csv(path: &Path, header: &str, rows: usize) {
    let mut content = String::from(header);
    content.push('\n');
    for i in 0..rows {
        let games = 10 + i * 9;
        let win_rate = 0.1 + 0.08 * i as f64;
        let score = 150 + i * 70;
        let consistency = 0.2 + 0.06 * i as f64;
        content.push_str(&format!(
            "{games},{win_rate},{score},{consistency},{},{},{}\n",
            win_rate * 0.95,
            0.05 * (i % 3) as f64,
            (i % 4) as f64 / 3.0
        ));
    }
    fs::write(path, content).unwrap();
}

const HEADER: &str =
    "games_played,win_rate,avg_score,consistency,pred_win_rate,improvement,play_style";

#[test]
fn csv_training_produces_model_and_bounded_prediction() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), ModelVariant::Extended);
    write_csv(&config.data_path, HEADER, 10);

    let outcome = pipeline::run(&config).unwrap();

    let bytes = fs::read(&outcome.model_path).unwrap();
    assert!(!bytes.is_empty());
    assert_eq!(&bytes[4..8], b"TFL3");
    assert_eq!(outcome.samples, 10);
    assert_eq!(outcome.history.len(), 3);

    let outputs = outcome.sample_analysis.outputs();
    assert_eq!(outputs.len(), 4);
    assert!(outputs.iter().all(|v| (0.0..=1.0).contains(v)));
    assert_eq!(
        outcome.sample_analysis.play_style,
        PlayStyle::from_score(outcome.sample_analysis.play_style_score)
    );

    let card = ModelCard::from_file(&outcome.card_path).unwrap();
    assert_eq!(card.samples, 10);
    assert_eq!(card.seed, Some(42));
    assert!(card.final_metrics.is_some());
    assert_eq!(card.normalization, NormalizationStage::GraphOps);
    assert_eq!(card.normalizer.unwrap().std.len(), 6);
}

#[test]
fn float_export_folds_normalization_into_weights() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), ModelVariant::Extended);
    config.export = ExportConfig {
        quantize_weights: false,
        embed_normalization: true,
    };

    let outcome = pipeline::run(&config).unwrap();

    assert_eq!(outcome.export.normalization, NormalizationStage::Folded);
    assert_eq!(outcome.export.max_weight_error, 0.0);
    let card = ModelCard::from_file(&outcome.card_path).unwrap();
    assert_eq!(card.normalization, NormalizationStage::Folded);
    assert!(card.normalizer.is_some());
}

#[test]
fn missing_csv_falls_back_to_synthetic_data() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), ModelVariant::Extended);

    let outcome = pipeline::run(&config).unwrap();

    assert_eq!(outcome.samples, 120);
    assert!(outcome.model_path.ends_with("app/src/main/assets/statistics_model.tflite"));
    assert!(outcome.model_path.is_file());
    assert!(outcome.export.quantized);
    assert_eq!(outcome.export.normalization, NormalizationStage::GraphOps);
}

#[test]
fn csv_without_label_column_fails_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), ModelVariant::Extended);
    fs::write(
        &config.data_path,
        "games_played,win_rate,avg_score,consistency,improvement,play_style\n10,0.5,300,0.4,0.1,0.5\n",
    )
    .unwrap();

    let err = pipeline::run(&config).unwrap_err();
    assert!(matches!(err, MlError::MissingColumn(ref c) if c == "pred_win_rate"));
    assert!(!config.model_path().exists());
}

#[test]
fn same_seed_gives_identical_model_bytes() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();

    let a = pipeline::run(&config_in(first.path(), ModelVariant::Extended)).unwrap();
    let b = pipeline::run(&config_in(second.path(), ModelVariant::Extended)).unwrap();

    assert_eq!(fs::read(a.model_path).unwrap(), fs::read(b.model_path).unwrap());
    assert_eq!(a.sample_analysis.outputs(), b.sample_analysis.outputs());
}

#[test]
fn basic_variant_trains_on_raw_features() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), ModelVariant::Basic);
    config.export = ExportConfig {
        quantize_weights: false,
        embed_normalization: true,
    };

    let outcome = pipeline::run(&config).unwrap();

    let card = ModelCard::from_file(&outcome.card_path).unwrap();
    assert_eq!(card.feature_names.len(), 4);
    assert!(card.normalizer.is_none());
    assert_eq!(card.normalization, NormalizationStage::Absent);
    assert!(!card.quantized_weights);
}

#[test]
fn invalid_model_name_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), ModelVariant::Extended);
    config.model_name = "../escape".to_string();

    assert!(matches!(pipeline::run(&config), Err(MlError::Config(_))));
}
