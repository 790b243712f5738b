//! Загрузка реальных данных из CSV

use std::path::Path;

use ndarray::Array2;

use crate::error::{MlError, Result};
use crate::preprocessing::FeatureEngineer;
use crate::types::{DataSource, ModelVariant, PlayerStats, N_LABELS};

use super::Dataset;

/// Обязательные столбцы файла
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "games_played",
    "win_rate",
    "avg_score",
    "consistency",
    "pred_win_rate",
    "improvement",
    "play_style",
];

pub struct CsvSource;

impl CsvSource {
    pub fn load<P: AsRef<Path>>(path: P, variant: ModelVariant) -> Result<Dataset> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        // Позиции столбцов по заголовку; лишние столбцы игнорируются
        let headers = reader.headers()?.clone();
        let mut positions = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, name) in positions.iter_mut().zip(REQUIRED_COLUMNS.iter()) {
            *slot = headers
                .iter()
                .position(|h| h == *name)
                .ok_or_else(|| MlError::MissingColumn(name.to_string()))?;
        }

        let mut stats = Vec::new();
        let mut label_rows: Vec<[f64; N_LABELS]> = Vec::new();

        for (row_idx, record) in reader.records().enumerate() {
            let record = record?;
            let mut values = [0.0f64; REQUIRED_COLUMNS.len()];
            for (k, &pos) in positions.iter().enumerate() {
                let raw = record.get(pos).unwrap_or("");
                values[k] = raw.parse::<f64>().map_err(|_| MlError::InvalidValue {
                    row: row_idx + 1,
                    column: REQUIRED_COLUMNS[k].to_string(),
                    value: raw.to_string(),
                })?;
            }

            let player = PlayerStats::new(values[0], values[1], values[2], values[3]);
            stats.push(player);
            label_rows.push([values[4], player.consistency, values[5], values[6]]);
        }

        if stats.is_empty() {
            return Err(MlError::EmptyDataset(format!(
                "{} has no data rows",
                path.display()
            )));
        }

        let features = FeatureEngineer::extract_features(&stats, variant);
        let mut labels = Array2::zeros((label_rows.len(), N_LABELS));
        for (i, row) in label_rows.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                labels[[i, j]] = *value;
            }
        }

        tracing::debug!("Loaded {} rows from {}", stats.len(), path.display());

        Ok(Dataset {
            features,
            labels,
            source: DataSource::Csv {
                path: path.to_path_buf(),
            },
        })
    }
}
