//! Симметричное int8-квантование весов (dynamic range)

/// Веса в int8 с общим масштабом, zero point = 0
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedWeights {
    pub values: Vec<i8>,
    pub scale: f32,
}

impl QuantizedWeights {
    pub fn dequantize(&self) -> Vec<f32> {
        self.values.iter().map(|&q| q as f32 * self.scale).collect()
    }

    /// Максимальное абсолютное отклонение от исходных весов
    pub fn max_error(&self, original: &[f32]) -> f32 {
        self.dequantize()
            .iter()
            .zip(original.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f32::max)
    }
}

pub fn quantize_symmetric(values: &[f32]) -> QuantizedWeights {
    let max_abs = values.iter().fold(0.0f32, |acc, v| acc.max(v.abs()));
    // Нулевой тензор: масштаб произвольный, берём 1
    let scale = if max_abs > 0.0 { max_abs / 127.0 } else { 1.0 };

    let values = values
        .iter()
        .map(|v| (v / scale).round().clamp(-127.0, 127.0) as i8)
        .collect();

    QuantizedWeights { values, scale }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_map_to_full_range() {
        let q = quantize_symmetric(&[-0.5, 0.0, 0.3, 0.5]);
        assert_eq!(q.values, vec![-127, 0, 76, 127]);
        assert!((q.scale - 0.5 / 127.0).abs() < 1e-9);
    }

    #[test]
    fn error_is_bounded_by_half_scale() {
        let weights: Vec<f32> = (0..200).map(|i| ((i as f32) * 0.37).sin() * 1.3).collect();
        let q = quantize_symmetric(&weights);
        assert!(q.max_error(&weights) <= q.scale / 2.0 + 1e-6);
    }

    #[test]
    fn zero_tensor_stays_zero() {
        let q = quantize_symmetric(&[0.0; 8]);
        assert!(q.values.iter().all(|&v| v == 0));
        assert_eq!(q.scale, 1.0);
        assert_eq!(q.dequantize(), vec![0.0; 8]);
    }
}
