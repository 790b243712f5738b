//! Типы данных для модели статистики игроков

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Имена сырых признаков в порядке столбцов матрицы
pub const BASE_FEATURE_NAMES: [&str; 4] = ["games_played", "win_rate", "avg_score", "consistency"];

/// Производные признаки расширенной модели
pub const DERIVED_FEATURE_NAMES: [&str; 2] = ["games_experience", "score_consistency"];

/// Выходы модели (и столбцы меток)
pub const LABEL_NAMES: [&str; 4] = ["pred_win_rate", "consistency", "improvement", "play_style"];

pub const N_LABELS: usize = LABEL_NAMES.len();

/// Статистика одного игрока
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub games_played: f64, // 0-100
    pub win_rate: f64,     // 0-1
    pub avg_score: f64,    // 0-1000
    pub consistency: f64,  // 0-1
}

impl PlayerStats {
    pub fn new(games_played: f64, win_rate: f64, avg_score: f64, consistency: f64) -> Self {
        Self {
            games_played,
            win_rate,
            avg_score,
            consistency,
        }
    }

    /// Эталонный игрок для контрольного предсказания после экспорта
    pub fn sample() -> Self {
        Self::new(50.0, 0.7, 500.0, 0.8)
    }
}

/// Вариант модели: набор признаков и топология сети
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelVariant {
    /// 4 сырых признака, без нормализации
    Basic,
    /// 6 признаков (сырые + производные), стандартизация и dropout
    #[default]
    Extended,
}

impl ModelVariant {
    pub fn n_features(&self) -> usize {
        match self {
            ModelVariant::Basic => BASE_FEATURE_NAMES.len(),
            ModelVariant::Extended => BASE_FEATURE_NAMES.len() + DERIVED_FEATURE_NAMES.len(),
        }
    }

    pub fn feature_names(&self) -> Vec<&'static str> {
        let mut names = BASE_FEATURE_NAMES.to_vec();
        if *self == ModelVariant::Extended {
            names.extend_from_slice(&DERIVED_FEATURE_NAMES);
        }
        names
    }

    pub fn normalizes_inputs(&self) -> bool {
        matches!(self, ModelVariant::Extended)
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelVariant::Basic => write!(f, "basic"),
            ModelVariant::Extended => write!(f, "extended"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayStyle {
    Aggressive,
    Balanced,
    Cautious,
}

impl PlayStyle {
    /// Те же пороги, что и у эвристики risk-taking в приложении
    pub fn from_score(score: f64) -> Self {
        if score > 0.7 {
            PlayStyle::Aggressive
        } else if score < 0.3 {
            PlayStyle::Cautious
        } else {
            PlayStyle::Balanced
        }
    }
}

/// Результат анализа игрока моделью
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerAnalysis {
    pub predicted_win_rate: f64,
    pub consistency: f64,
    pub improvement: f64,
    pub play_style_score: f64,
    pub play_style: PlayStyle,
}

impl PlayerAnalysis {
    pub fn from_outputs(outputs: [f64; N_LABELS]) -> Self {
        Self {
            predicted_win_rate: outputs[0],
            consistency: outputs[1],
            improvement: outputs[2],
            play_style_score: outputs[3],
            play_style: PlayStyle::from_score(outputs[3]),
        }
    }

    pub fn outputs(&self) -> [f64; N_LABELS] {
        [
            self.predicted_win_rate,
            self.consistency,
            self.improvement,
            self.play_style_score,
        ]
    }
}

/// Откуда взялись обучающие данные
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    Csv { path: PathBuf },
    Synthetic { samples: usize },
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Csv { path } => write!(f, "csv ({})", path.display()),
            DataSource::Synthetic { samples } => write!(f, "synthetic ({} samples)", samples),
        }
    }
}

/// Метрики одной эпохи
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch: usize,
    pub loss: f64,
    pub mae: f64,
    pub mse: f64,
    pub val_loss: Option<f64>,
    pub val_mae: Option<f64>,
    pub val_mse: Option<f64>,
}

impl fmt::Display for EpochMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "loss={:.4} mae={:.4} mse={:.4}",
            self.loss, self.mae, self.mse
        )?;
        if let (Some(val_loss), Some(val_mae), Some(val_mse)) =
            (self.val_loss, self.val_mae, self.val_mse)
        {
            write!(
                f,
                " val_loss={:.4} val_mae={:.4} val_mse={:.4}",
                val_loss, val_mae, val_mse
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub epochs: Vec<EpochMetrics>,
}

impl TrainingHistory {
    pub fn last(&self) -> Option<&EpochMetrics> {
        self.epochs.last()
    }

    pub fn first(&self) -> Option<&EpochMetrics> {
        self.epochs.first()
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_names_follow_variant() {
        assert_eq!(ModelVariant::Basic.feature_names().len(), 4);
        assert_eq!(
            ModelVariant::Extended.feature_names(),
            vec![
                "games_played",
                "win_rate",
                "avg_score",
                "consistency",
                "games_experience",
                "score_consistency"
            ]
        );
        assert_eq!(ModelVariant::Extended.n_features(), 6);
    }

    #[test]
    fn play_style_thresholds() {
        assert_eq!(PlayStyle::from_score(0.9), PlayStyle::Aggressive);
        assert_eq!(PlayStyle::from_score(0.7), PlayStyle::Balanced);
        assert_eq!(PlayStyle::from_score(0.3), PlayStyle::Balanced);
        assert_eq!(PlayStyle::from_score(0.1), PlayStyle::Cautious);
    }

    #[test]
    fn variant_serializes_snake_case() {
        let json = serde_json::to_string(&ModelVariant::Extended).unwrap();
        assert_eq!(json, "\"extended\"");
        let parsed: ModelVariant = serde_json::from_str("\"basic\"").unwrap();
        assert_eq!(parsed, ModelVariant::Basic);
    }
}
