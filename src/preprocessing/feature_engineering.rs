//! Feature engineering для модели статистики

use ndarray::Array2;

use crate::types::{ModelVariant, PlayerStats, N_LABELS};

pub struct FeatureEngineer;

impl FeatureEngineer {
    /// Вектор признаков игрока в порядке `ModelVariant::feature_names`
    pub fn feature_row(stats: &PlayerStats, variant: ModelVariant) -> Vec<f64> {
        let mut row = vec![
            stats.games_played,
            stats.win_rate,
            stats.avg_score,
            stats.consistency,
        ];

        if variant == ModelVariant::Extended {
            // Опыт растёт логарифмически с числом игр
            row.push(stats.games_played.ln_1p());
            row.push(stats.consistency * stats.avg_score);
        }

        row
    }

    pub fn extract_features(stats: &[PlayerStats], variant: ModelVariant) -> Array2<f64> {
        let n_features = variant.n_features();
        let mut features = Array2::zeros((stats.len(), n_features));

        for (i, player) in stats.iter().enumerate() {
            for (j, value) in Self::feature_row(player, variant).into_iter().enumerate() {
                features[[i, j]] = value;
            }
        }

        features
    }

    /// Метки для синтетических данных:
    /// [pred_win_rate, consistency, improvement, play_style]
    pub fn synthetic_labels(stats: &PlayerStats) -> [f64; N_LABELS] {
        [
            0.6 * stats.win_rate + 0.4 * stats.consistency,
            stats.consistency,
            1.0 - stats.games_played / 100.0,
            0.4 * stats.win_rate + 0.6 * stats.avg_score / 1000.0,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_row_has_derived_features() {
        let row = FeatureEngineer::feature_row(&PlayerStats::sample(), ModelVariant::Extended);
        assert_eq!(row.len(), 6);
        assert!((row[4] - 51.0_f64.ln()).abs() < 1e-12);
        assert!((row[4] - 3.93).abs() < 0.01);
        assert!((row[5] - 400.0).abs() < 1e-9);
    }

    #[test]
    fn basic_row_is_raw_stats() {
        let row = FeatureEngineer::feature_row(&PlayerStats::sample(), ModelVariant::Basic);
        assert_eq!(row, vec![50.0, 0.7, 500.0, 0.8]);
    }

    #[test]
    fn labels_stay_in_unit_interval_at_domain_corners() {
        for &games in &[0.0, 100.0] {
            for &win in &[0.0, 1.0] {
                for &score in &[0.0, 1000.0] {
                    for &cons in &[0.0, 1.0] {
                        let labels = FeatureEngineer::synthetic_labels(&PlayerStats::new(
                            games, win, score, cons,
                        ));
                        for label in labels {
                            assert!((0.0..=1.0).contains(&label), "label {label} out of range");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn extract_features_shapes_matrix() {
        let stats = vec![PlayerStats::sample(); 3];
        let features = FeatureEngineer::extract_features(&stats, ModelVariant::Extended);
        assert_eq!(features.dim(), (3, 6));
        assert_eq!(features[[2, 0]], 50.0);
    }
}
