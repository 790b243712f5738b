//! Инференс: сохранённая нормализация + обученная сеть

use burn::backend::ndarray::NdArrayDevice;
use ndarray::Array2;

use crate::error::{MlError, Result};
use crate::models::network::{to_array, to_tensor, InferenceBackend, StatsNetwork};
use crate::preprocessing::{DataNormalizer, FeatureEngineer};
use crate::types::{ModelVariant, PlayerAnalysis, PlayerStats, N_LABELS};

pub struct StatsPredictor {
    variant: ModelVariant,
    normalizer: Option<DataNormalizer>,
    network: StatsNetwork<InferenceBackend>,
    device: NdArrayDevice,
}

impl StatsPredictor {
    pub fn new(
        variant: ModelVariant,
        normalizer: Option<DataNormalizer>,
        network: StatsNetwork<InferenceBackend>,
    ) -> Result<Self> {
        if network.input_dim() != variant.n_features() {
            return Err(MlError::ShapeMismatch(format!(
                "{} variant needs {} inputs, network takes {}",
                variant,
                variant.n_features(),
                network.input_dim()
            )));
        }
        if network.output_dim() != N_LABELS {
            return Err(MlError::ShapeMismatch(format!(
                "network must predict {} outputs, got {}",
                N_LABELS,
                network.output_dim()
            )));
        }
        if let Some(normalizer) = &normalizer {
            if !normalizer.is_fitted() {
                return Err(MlError::NotFitted);
            }
        }

        Ok(Self {
            variant,
            normalizer,
            network,
            device: NdArrayDevice::default(),
        })
    }

    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    pub fn network(&self) -> &StatsNetwork<InferenceBackend> {
        &self.network
    }

    pub fn normalizer(&self) -> Option<&DataNormalizer> {
        self.normalizer.as_ref()
    }

    /// Сырые признаки -> 4 выхода. Нормализация берётся из обучения,
    /// а не подгоняется заново под вход.
    pub fn predict(&self, features: &[f64]) -> Result<[f64; N_LABELS]> {
        let input = Array2::from_shape_vec((1, features.len()), features.to_vec())
            .map_err(|e| MlError::ShapeMismatch(e.to_string()))?;
        let output = self.predict_batch(&input)?;

        let mut result = [0.0; N_LABELS];
        for (slot, value) in result.iter_mut().zip(output.row(0).iter()) {
            *slot = *value;
        }
        Ok(result)
    }

    pub fn predict_batch(&self, features: &Array2<f64>) -> Result<Array2<f64>> {
        if features.ncols() != self.network.input_dim() {
            return Err(MlError::ShapeMismatch(format!(
                "network input dim mismatch: got {}, expected {}",
                features.ncols(),
                self.network.input_dim()
            )));
        }

        let input = match &self.normalizer {
            Some(normalizer) => normalizer.transform(features)?,
            None => features.clone(),
        };
        to_array(self.network.forward(to_tensor(&input, &self.device)))
    }

    pub fn analyze(&self, stats: &PlayerStats) -> Result<PlayerAnalysis> {
        let features = FeatureEngineer::feature_row(stats, self.variant);
        Ok(PlayerAnalysis::from_outputs(self.predict(&features)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatsNetworkConfig;
    use ndarray::array;

    fn network(variant: ModelVariant) -> StatsNetwork<InferenceBackend> {
        StatsNetworkConfig::for_variant(variant).init(&Default::default())
    }

    fn fitted_normalizer() -> DataNormalizer {
        let mut normalizer = DataNormalizer::new();
        normalizer
            .fit(&array![
                [10.0, 0.2, 100.0, 0.3, 2.39, 30.0],
                [90.0, 0.8, 900.0, 0.9, 4.51, 810.0],
                [50.0, 0.5, 500.0, 0.6, 3.93, 300.0]
            ])
            .unwrap();
        normalizer
    }

    #[test]
    fn single_row_prediction_uses_persisted_normalizer() {
        let network = network(ModelVariant::Extended);
        let predictor =
            StatsPredictor::new(ModelVariant::Extended, Some(fitted_normalizer()), network).unwrap();

        let features = FeatureEngineer::feature_row(&PlayerStats::sample(), ModelVariant::Extended);
        let single = predictor.predict(&features).unwrap();
        let batch = predictor
            .predict_batch(&Array2::from_shape_vec((1, 6), features).unwrap())
            .unwrap();

        for (a, b) in single.iter().zip(batch.row(0).iter()) {
            assert!((a - b).abs() < 1e-12);
        }
        assert!(single.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn analyze_decodes_play_style() {
        let network = network(ModelVariant::Basic);
        let predictor = StatsPredictor::new(ModelVariant::Basic, None, network).unwrap();

        let analysis = predictor.analyze(&PlayerStats::sample()).unwrap();
        assert_eq!(
            analysis.play_style,
            crate::types::PlayStyle::from_score(analysis.play_style_score)
        );
    }

    #[test]
    fn variant_and_network_must_agree() {
        let network = network(ModelVariant::Basic);
        assert!(StatsPredictor::new(ModelVariant::Extended, None, network).is_err());
    }

    #[test]
    fn wrong_feature_count_fails() {
        let network = network(ModelVariant::Extended);
        let predictor =
            StatsPredictor::new(ModelVariant::Extended, Some(fitted_normalizer()), network).unwrap();
        assert!(predictor.predict(&[1.0, 2.0]).is_err());
    }
}
