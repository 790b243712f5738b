use thiserror::Error;

/// Ошибки обучения и экспорта модели
#[derive(Error, Debug)]
pub enum MlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Ошибки данных
    #[error("Missing column `{0}` in training data")]
    MissingColumn(String),

    #[error("Invalid value {value:?} in column `{column}` at row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    // Ошибки модели
    #[error("Tensor error: {0}")]
    Tensor(String),

    #[error("Normalizer not fitted")]
    NotFitted,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, MlError>;
