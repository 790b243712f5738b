/// Обучение модели статистики и выгрузка `.tflite` в ассеты приложения

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use dice_stats_ml::{pipeline, PipelineConfig};

fn main() -> anyhow::Result<()> {
    // Инициализация логирования
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = PipelineConfig::default();
    let outcome = pipeline::run(&config).context("training pipeline failed")?;

    println!("Model saved to {}", outcome.model_path.display());
    println!("Model card saved to {}", outcome.card_path.display());
    println!("Test prediction: {:?}", outcome.sample_analysis.outputs());

    Ok(())
}
