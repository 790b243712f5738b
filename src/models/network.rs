//! Полносвязная сеть на burn (CPU, ndarray backend)
//!
//! Обучение идёт на `Autodiff<NdArray>`, инференс и экспорт - на `NdArray`.
//! Веса `Linear` в burn хранятся как [d_input, d_output], та же раскладка
//! используется в `DenseWeights`.

use burn::backend::{Autodiff, NdArray};
use burn::nn::{Dropout, DropoutConfig, Initializer, Linear, LinearConfig, Relu};
use burn::prelude::*;
use burn::tensor::activation::sigmoid;
use burn::tensor::TensorData;
use ndarray::{Array1, Array2};

use crate::error::MlError;
use crate::types::{ModelVariant, N_LABELS};

pub type InferenceBackend = NdArray<f32>;
pub type TrainingBackend = Autodiff<InferenceBackend>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Relu,
    Sigmoid,
}

/// Конфигурация сети
#[derive(Config, Debug)]
pub struct StatsNetworkConfig {
    pub input_dim: usize,
    /// Ширины скрытых слоёв (relu)
    pub hidden: Vec<usize>,
    #[config(default = "0.0")]
    pub dropout: f64,
    /// Dropout ставится после первых `dropout_layers` скрытых слоёв
    #[config(default = "0")]
    pub dropout_layers: usize,
}

impl StatsNetworkConfig {
    /// Фиксированные топологии:
    /// - basic: 4 -> 8 -> 16 -> 8 -> 4
    /// - extended: 6 -> 12 -> dropout -> 24 -> dropout -> 12 -> 4
    pub fn for_variant(variant: ModelVariant) -> Self {
        let n_in = variant.n_features();
        match variant {
            ModelVariant::Basic => Self::new(n_in, vec![8, 16, 8]),
            ModelVariant::Extended => Self::new(n_in, vec![12, 24, 12])
                .with_dropout(0.2)
                .with_dropout_layers(2),
        }
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> StatsNetwork<B> {
        let mut hidden = Vec::with_capacity(self.hidden.len());
        let mut d_in = self.input_dim;
        for &width in &self.hidden {
            hidden.push(glorot_linear(d_in, width, device));
            d_in = width;
        }

        StatsNetwork {
            hidden,
            output: glorot_linear(d_in, N_LABELS, device),
            dropout: DropoutConfig::new(self.dropout).init(),
            dropout_layers: self.dropout_layers,
            activation: Relu::new(),
        }
    }
}

fn glorot_linear<B: Backend>(d_in: usize, d_out: usize, device: &B::Device) -> Linear<B> {
    LinearConfig::new(d_in, d_out)
        .with_initializer(Initializer::XavierUniform { gain: 1.0 })
        .init(device)
}

/// MLP: relu-слои, dropout (активен только на autodiff backend), sigmoid-выход
#[derive(Module, Debug)]
pub struct StatsNetwork<B: Backend> {
    hidden: Vec<Linear<B>>,
    output: Linear<B>,
    dropout: Dropout,
    dropout_layers: usize,
    activation: Relu,
}

impl<B: Backend> StatsNetwork<B> {
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let mut x = input;
        for (idx, layer) in self.hidden.iter().enumerate() {
            x = self.activation.forward(layer.forward(x));
            if idx < self.dropout_layers {
                x = self.dropout.forward(x);
            }
        }
        sigmoid(self.output.forward(x))
    }

    pub fn input_dim(&self) -> usize {
        self.hidden.first().unwrap_or(&self.output).weight.dims()[0]
    }

    pub fn output_dim(&self) -> usize {
        self.output.weight.dims()[1]
    }

    /// Веса dense-слоёв по порядку, в f64
    pub fn dense_layers(&self) -> crate::error::Result<Vec<DenseWeights>> {
        let mut layers = self
            .hidden
            .iter()
            .map(|linear| DenseWeights::from_linear(linear, Activation::Relu))
            .collect::<crate::error::Result<Vec<_>>>()?;
        layers.push(DenseWeights::from_linear(&self.output, Activation::Sigmoid)?);
        Ok(layers)
    }
}

/// Снимок весов одного `Linear`
#[derive(Debug, Clone)]
pub struct DenseWeights {
    /// [in_dim, out_dim]
    pub weights: Array2<f64>,
    pub bias: Array1<f64>,
    pub activation: Activation,
}

impl DenseWeights {
    fn from_linear<B: Backend>(linear: &Linear<B>, activation: Activation) -> crate::error::Result<Self> {
        let [d_in, d_out] = linear.weight.dims();
        let weights = tensor_values(linear.weight.val())?;
        let weights = Array2::from_shape_vec((d_in, d_out), weights)
            .map_err(|e| MlError::ShapeMismatch(e.to_string()))?;
        let bias = match &linear.bias {
            Some(bias) => Array1::from(tensor_values(bias.val())?),
            None => Array1::zeros(d_out),
        };

        Ok(Self {
            weights,
            bias,
            activation,
        })
    }

    pub fn in_dim(&self) -> usize {
        self.weights.nrows()
    }

    pub fn out_dim(&self) -> usize {
        self.weights.ncols()
    }
}

pub fn to_tensor<B: Backend>(x: &Array2<f64>, device: &B::Device) -> Tensor<B, 2> {
    let values: Vec<f32> = x.iter().map(|&v| v as f32).collect();
    Tensor::from_data(TensorData::new(values, [x.nrows(), x.ncols()]), device)
}

pub fn to_array<B: Backend>(tensor: Tensor<B, 2>) -> crate::error::Result<Array2<f64>> {
    let [rows, cols] = tensor.dims();
    Array2::from_shape_vec((rows, cols), tensor_values(tensor)?)
        .map_err(|e| MlError::ShapeMismatch(e.to_string()))
}

pub fn to_scalar<B: Backend>(tensor: Tensor<B, 1>) -> crate::error::Result<f64> {
    tensor_values(tensor)?
        .first()
        .copied()
        .ok_or_else(|| MlError::Tensor("empty scalar tensor".to_string()))
}

fn tensor_values<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> crate::error::Result<Vec<f64>> {
    let values = tensor
        .into_data()
        .to_vec::<f32>()
        .map_err(|e| MlError::Tensor(format!("{e:?}")))?;
    Ok(values.into_iter().map(f64::from).collect())
}
