//! Нормализация данных

#![allow(non_snake_case)]

use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{MlError, Result};

/// Порог, ниже которого столбец считается константным
const MIN_STD: f64 = 1e-10;

/// Параметры стандартизации, сохраняемые рядом с моделью
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizerParams {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct DataNormalizer {
    mean: Option<Array1<f64>>,
    std: Option<Array1<f64>>,
    is_fitted: bool,
}

impl DataNormalizer {
    pub fn new() -> Self {
        Self {
            mean: None,
            std: None,
            is_fitted: false,
        }
    }

    pub fn from_params(params: &NormalizerParams) -> Result<Self> {
        if params.mean.len() != params.std.len() {
            return Err(MlError::ShapeMismatch(format!(
                "normalizer mean has {} columns, std has {}",
                params.mean.len(),
                params.std.len()
            )));
        }
        if params.std.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(MlError::Config(
                "normalizer std must be finite and > 0".to_string(),
            ));
        }

        Ok(Self {
            mean: Some(Array1::from(params.mean.clone())),
            std: Some(Array1::from(params.std.clone())),
            is_fitted: true,
        })
    }

    pub fn fit(&mut self, X: &Array2<f64>) -> Result<()> {
        if X.nrows() == 0 {
            return Err(MlError::EmptyDataset(
                "cannot fit normalizer on zero rows".to_string(),
            ));
        }

        // Среднее и стандартное отклонение (ddof = 0) по каждому признаку
        let mean = X
            .mean_axis(Axis(0))
            .ok_or_else(|| MlError::EmptyDataset("failed to compute mean".to_string()))?;
        let mut std = X.std_axis(Axis(0), 0.0);

        // Избегаем деления на ноль
        for val in std.iter_mut() {
            if *val < MIN_STD {
                *val = 1.0;
            }
        }

        self.mean = Some(mean);
        self.std = Some(std);
        self.is_fitted = true;
        Ok(())
    }

    pub fn transform(&self, X: &Array2<f64>) -> Result<Array2<f64>> {
        let (mean, std) = self.fitted()?;

        if X.ncols() != mean.len() {
            return Err(MlError::ShapeMismatch(format!(
                "normalizer fitted on {} columns, got {}",
                mean.len(),
                X.ncols()
            )));
        }

        // (X - mean) / std
        let mut normalized = X.clone();
        for mut row in normalized.rows_mut() {
            for (i, val) in row.iter_mut().enumerate() {
                *val = (*val - mean[i]) / std[i];
            }
        }

        Ok(normalized)
    }

    pub fn transform_row(&self, row: ArrayView1<f64>) -> Result<Array1<f64>> {
        let (mean, std) = self.fitted()?;

        if row.len() != mean.len() {
            return Err(MlError::ShapeMismatch(format!(
                "normalizer fitted on {} columns, got {}",
                mean.len(),
                row.len()
            )));
        }

        Ok((&row - mean) / std)
    }

    pub fn fit_transform(&mut self, X: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(X)?;
        self.transform(X)
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    pub fn params(&self) -> Result<NormalizerParams> {
        let (mean, std) = self.fitted()?;
        Ok(NormalizerParams {
            mean: mean.to_vec(),
            std: std.to_vec(),
        })
    }

    fn fitted(&self) -> Result<(&Array1<f64>, &Array1<f64>)> {
        if !self.is_fitted {
            return Err(MlError::NotFitted);
        }
        match (&self.mean, &self.std) {
            (Some(mean), Some(std)) => Ok((mean, std)),
            _ => Err(MlError::NotFitted),
        }
    }
}

impl Default for DataNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
