//! Источник обучающих данных: CSV или синтетика

pub mod csv_source;
pub mod synthetic;

use ndarray::Array2;
use rand::Rng;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::types::DataSource;

pub use csv_source::CsvSource;
pub use synthetic::SyntheticGenerator;

/// Признаки (N x F) и метки (N x 4) в порядке загрузки
#[derive(Debug, Clone)]
pub struct Dataset {
    pub features: Array2<f64>,
    pub labels: Array2<f64>,
    pub source: DataSource,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.features.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.features.nrows() == 0
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }
}

pub struct DataProvider;

impl DataProvider {
    /// CSV, если файл есть; иначе синтетические данные
    pub fn load<R: Rng + ?Sized>(config: &PipelineConfig, rng: &mut R) -> Result<Dataset> {
        let dataset = if config.data_path.is_file() {
            CsvSource::load(&config.data_path, config.variant)?
        } else {
            tracing::info!(
                "{} not found, generating synthetic data",
                config.data_path.display()
            );
            SyntheticGenerator::generate(config.synthetic_samples, config.variant, rng)
        };

        tracing::info!(
            "Dataset ready: {} rows x {} features from {}",
            dataset.len(),
            dataset.n_features(),
            dataset.source
        );

        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn missing_file_falls_back_to_synthetic() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig {
            data_path: dir.path().join("training_data.csv"),
            synthetic_samples: 25,
            ..PipelineConfig::default()
        };

        let data = DataProvider::load(&config, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(data.len(), 25);
        assert_eq!(data.source, DataSource::Synthetic { samples: 25 });
    }
}
