//! Запись графа в формате TensorFlow Lite (flatbuffer, идентификатор `TFL3`)
//!
//! Пишется только то подмножество схемы, которое нужно для MLP:
//! SUB/MUL для стандартизации входа, FULLY_CONNECTED (с fused relu) и
//! LOGISTIC, один subgraph, статические веса в буферах модели. Таблицы собираются напрямую через
//! `FlatBufferBuilder`, без сгенерированного кода схемы.

use flatbuffers::{FlatBufferBuilder, TableFinishedWIPOffset, VOffsetT, WIPOffset};

use crate::error::{MlError, Result};

use super::quantize::{quantize_symmetric, QuantizedWeights};

pub const FILE_IDENTIFIER: &str = "TFL3";
pub const SCHEMA_VERSION: u32 = 3;
pub const MIN_RUNTIME_VERSION: &str = "1.14.0";

type Table = WIPOffset<TableFinishedWIPOffset>;

const fn field(index: u16) -> VOffsetT {
    4 + 2 * index
}

// Model
const MODEL_VERSION: VOffsetT = field(0);
const MODEL_OPERATOR_CODES: VOffsetT = field(1);
const MODEL_SUBGRAPHS: VOffsetT = field(2);
const MODEL_DESCRIPTION: VOffsetT = field(3);
const MODEL_BUFFERS: VOffsetT = field(4);
const MODEL_METADATA: VOffsetT = field(6);
// OperatorCode
const OPCODE_DEPRECATED_BUILTIN_CODE: VOffsetT = field(0);
const OPCODE_VERSION: VOffsetT = field(2);
const OPCODE_BUILTIN_CODE: VOffsetT = field(3);
// SubGraph
const SUBGRAPH_TENSORS: VOffsetT = field(0);
const SUBGRAPH_INPUTS: VOffsetT = field(1);
const SUBGRAPH_OUTPUTS: VOffsetT = field(2);
const SUBGRAPH_OPERATORS: VOffsetT = field(3);
const SUBGRAPH_NAME: VOffsetT = field(4);
// Tensor
const TENSOR_SHAPE: VOffsetT = field(0);
const TENSOR_TYPE: VOffsetT = field(1);
const TENSOR_BUFFER: VOffsetT = field(2);
const TENSOR_NAME: VOffsetT = field(3);
const TENSOR_QUANTIZATION: VOffsetT = field(4);
const TENSOR_SHAPE_SIGNATURE: VOffsetT = field(7);
// QuantizationParameters
const QUANT_SCALE: VOffsetT = field(2);
const QUANT_ZERO_POINT: VOffsetT = field(3);
const QUANT_QUANTIZED_DIMENSION: VOffsetT = field(6);
// Operator
const OP_OPCODE_INDEX: VOffsetT = field(0);
const OP_INPUTS: VOffsetT = field(1);
const OP_OUTPUTS: VOffsetT = field(2);
const OP_BUILTIN_OPTIONS_TYPE: VOffsetT = field(3);
const OP_BUILTIN_OPTIONS: VOffsetT = field(4);
// FullyConnectedOptions, SubOptions, MulOptions
const OPTIONS_FUSED_ACTIVATION: VOffsetT = field(0);
// Buffer
const BUFFER_DATA: VOffsetT = field(0);
// Metadata
const METADATA_NAME: VOffsetT = field(0);
const METADATA_BUFFER: VOffsetT = field(1);

// Значения перечислений схемы
const BUILTIN_FULLY_CONNECTED: i32 = 9;
const BUILTIN_LOGISTIC: i32 = 14;
const BUILTIN_MUL: i32 = 18;
const BUILTIN_SUB: i32 = 41;
const BUILTIN_OPTIONS_FULLY_CONNECTED: u8 = 8;
const BUILTIN_OPTIONS_MUL: u8 = 21;
const BUILTIN_OPTIONS_SUB: u8 = 28;
const ACTIVATION_NONE: i8 = 0;
const ACTIVATION_RELU: i8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i8)]
pub enum TensorType {
    Float32 = 0,
    Int8 = 9,
}

/// Данные весов dense-слоя в раскладке TFLite [out_dim, in_dim]
#[derive(Debug, Clone)]
pub enum WeightData {
    Float32(Vec<f32>),
    Int8(QuantizedWeights),
}

impl WeightData {
    pub fn tensor_type(&self) -> TensorType {
        match self {
            WeightData::Float32(_) => TensorType::Float32,
            WeightData::Int8(_) => TensorType::Int8,
        }
    }

    fn len(&self) -> usize {
        match self {
            WeightData::Float32(v) => v.len(),
            WeightData::Int8(q) => q.values.len(),
        }
    }

    fn to_le_bytes(&self) -> Vec<u8> {
        match self {
            WeightData::Float32(v) => f32_bytes(v),
            WeightData::Int8(q) => q.values.iter().map(|&v| v as u8).collect(),
        }
    }
}

fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

#[derive(Debug, Clone)]
pub struct FullyConnectedSpec {
    pub in_dim: usize,
    pub out_dim: usize,
    pub weights: WeightData,
    pub bias: Vec<f32>,
    pub fused_relu: bool,
}

impl FullyConnectedSpec {
    /// `weights` - float32 в раскладке [out_dim, in_dim].
    /// Возвращает слой и ошибку квантования (0 без квантования).
    pub fn new(
        in_dim: usize,
        out_dim: usize,
        weights: Vec<f32>,
        bias: Vec<f32>,
        fused_relu: bool,
        quantize: bool,
    ) -> (Self, f32) {
        let (weights, error) = if quantize {
            let q = quantize_symmetric(&weights);
            let error = q.max_error(&weights);
            (WeightData::Int8(q), error)
        } else {
            (WeightData::Float32(weights), 0.0)
        };

        (
            Self {
                in_dim,
                out_dim,
                weights,
                bias,
                fused_relu,
            },
            error,
        )
    }
}

/// Стандартизация входа внутри графа: (x - mean) * scale, всё во float32
#[derive(Debug, Clone)]
pub struct InputNormalization {
    pub mean: Vec<f32>,
    /// 1 / std
    pub scale: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct GraphSpec {
    pub input_dim: usize,
    pub input_normalization: Option<InputNormalization>,
    pub layers: Vec<FullyConnectedSpec>,
    pub sigmoid_output: bool,
    pub description: String,
}

impl GraphSpec {
    pub fn output_dim(&self) -> usize {
        self.layers.last().map(|l| l.out_dim).unwrap_or(self.input_dim)
    }

    fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(MlError::Export("graph has no layers".to_string()));
        }
        if let Some(norm) = &self.input_normalization {
            if norm.mean.len() != self.input_dim || norm.scale.len() != self.input_dim {
                return Err(MlError::Export(format!(
                    "input normalization has {}/{} values, input_dim is {}",
                    norm.mean.len(),
                    norm.scale.len(),
                    self.input_dim
                )));
            }
        }
        let mut expected_in = self.input_dim;
        for (idx, layer) in self.layers.iter().enumerate() {
            if layer.in_dim != expected_in {
                return Err(MlError::Export(format!(
                    "layer[{idx}] in_dim {} != expected {expected_in}",
                    layer.in_dim
                )));
            }
            if layer.weights.len() != layer.in_dim * layer.out_dim {
                return Err(MlError::Export(format!(
                    "layer[{idx}] has {} weights, expected {}",
                    layer.weights.len(),
                    layer.in_dim * layer.out_dim
                )));
            }
            if layer.bias.len() != layer.out_dim {
                return Err(MlError::Export(format!(
                    "layer[{idx}] bias len {} != out_dim {}",
                    layer.bias.len(),
                    layer.out_dim
                )));
            }
            expected_in = layer.out_dim;
        }
        Ok(())
    }
}

struct TensorDef {
    name: String,
    shape: Vec<i32>,
    shape_signature: Option<Vec<i32>>,
    tensor_type: TensorType,
    buffer: u32,
    scale: Option<f32>,
}

impl TensorDef {
    /// Тензор активаций [1, width] с динамическим батчем
    fn activation(name: String, width: usize) -> Self {
        Self {
            name,
            shape: vec![1, width as i32],
            shape_signature: Some(vec![-1, width as i32]),
            tensor_type: TensorType::Float32,
            buffer: 0,
            scale: None,
        }
    }

    /// Константный float32-вектор
    fn constant(name: String, width: usize, buffer: u32) -> Self {
        Self {
            name,
            shape: vec![width as i32],
            shape_signature: None,
            tensor_type: TensorType::Float32,
            buffer,
            scale: None,
        }
    }
}

struct OperatorDef {
    opcode_index: u32,
    inputs: Vec<i32>,
    outputs: Vec<i32>,
    /// (тип BuiltinOptions, fused activation)
    options: Option<(u8, i8)>,
}

struct GraphPlan {
    /// (builtin code, version)
    opcodes: Vec<(i32, i32)>,
    /// Буфер 0 - пустой sentinel
    buffers: Vec<Option<Vec<u8>>>,
    tensors: Vec<TensorDef>,
    operators: Vec<OperatorDef>,
}

impl GraphPlan {
    fn new() -> Self {
        Self {
            opcodes: Vec::new(),
            buffers: vec![None],
            tensors: Vec::new(),
            operators: Vec::new(),
        }
    }

    fn opcode(&mut self, code: i32, version: i32) -> u32 {
        let index = match self.opcodes.iter().position(|&(c, _)| c == code) {
            Some(index) => index,
            None => {
                self.opcodes.push((code, version));
                self.opcodes.len() - 1
            }
        };
        index as u32
    }

    fn push_buffer(&mut self, data: Vec<u8>) -> u32 {
        self.buffers.push(Some(data));
        (self.buffers.len() - 1) as u32
    }

    fn push_tensor(&mut self, tensor: TensorDef) -> i32 {
        self.tensors.push(tensor);
        (self.tensors.len() - 1) as i32
    }

    fn push_operator(
        &mut self,
        opcode_index: u32,
        inputs: Vec<i32>,
        output: TensorDef,
        options: Option<(u8, i8)>,
    ) -> i32 {
        let output = self.push_tensor(output);
        self.operators.push(OperatorDef {
            opcode_index,
            inputs,
            outputs: vec![output],
            options,
        });
        output
    }
}

/// Сериализует граф в байты `.tflite`
pub fn build_model(graph: &GraphSpec) -> Result<Vec<u8>> {
    graph.validate()?;

    let quantized = graph
        .layers
        .iter()
        .any(|l| matches!(l.weights, WeightData::Int8(_)));
    // Гибридный FULLY_CONNECTED (int8 веса, float входы) - версия 3
    let fc_version = if quantized { 3 } else { 1 };

    let mut plan = GraphPlan::new();

    let input = plan.push_tensor(TensorDef::activation(
        "serving_default_input:0".to_string(),
        graph.input_dim,
    ));
    let mut current = input;

    if let Some(norm) = &graph.input_normalization {
        let mean_buffer = plan.push_buffer(f32_bytes(&norm.mean));
        let mean = plan.push_tensor(TensorDef::constant(
            "normalization/mean".to_string(),
            graph.input_dim,
            mean_buffer,
        ));
        let scale_buffer = plan.push_buffer(f32_bytes(&norm.scale));
        let scale = plan.push_tensor(TensorDef::constant(
            "normalization/scale".to_string(),
            graph.input_dim,
            scale_buffer,
        ));

        let sub = plan.opcode(BUILTIN_SUB, 1);
        current = plan.push_operator(
            sub,
            vec![current, mean],
            TensorDef::activation("normalization/sub".to_string(), graph.input_dim),
            Some((BUILTIN_OPTIONS_SUB, ACTIVATION_NONE)),
        );
        let mul = plan.opcode(BUILTIN_MUL, 1);
        current = plan.push_operator(
            mul,
            vec![current, scale],
            TensorDef::activation("normalization/mul".to_string(), graph.input_dim),
            Some((BUILTIN_OPTIONS_MUL, ACTIVATION_NONE)),
        );
    }

    let fully_connected = plan.opcode(BUILTIN_FULLY_CONNECTED, fc_version);
    for (i, layer) in graph.layers.iter().enumerate() {
        let weights_buffer = plan.push_buffer(layer.weights.to_le_bytes());
        let scale = match &layer.weights {
            WeightData::Int8(q) => Some(q.scale),
            WeightData::Float32(_) => None,
        };
        let weights = plan.push_tensor(TensorDef {
            name: format!("dense_{i}/MatMul"),
            shape: vec![layer.out_dim as i32, layer.in_dim as i32],
            shape_signature: None,
            tensor_type: layer.weights.tensor_type(),
            buffer: weights_buffer,
            scale,
        });

        let bias_buffer = plan.push_buffer(f32_bytes(&layer.bias));
        let bias = plan.push_tensor(TensorDef::constant(
            format!("dense_{i}/BiasAdd/ReadVariableOp"),
            layer.out_dim,
            bias_buffer,
        ));

        let activation = if layer.fused_relu {
            ACTIVATION_RELU
        } else {
            ACTIVATION_NONE
        };
        current = plan.push_operator(
            fully_connected,
            vec![current, weights, bias],
            TensorDef::activation(format!("dense_{i}/output"), layer.out_dim),
            Some((BUILTIN_OPTIONS_FULLY_CONNECTED, activation)),
        );
    }

    if graph.sigmoid_output {
        let logistic = plan.opcode(BUILTIN_LOGISTIC, 1);
        current = plan.push_operator(
            logistic,
            vec![current],
            TensorDef::activation("StatefulPartitionedCall:0".to_string(), graph.output_dim()),
            None,
        );
    }

    let mut runtime_version = MIN_RUNTIME_VERSION.as_bytes().to_vec();
    runtime_version.resize(16, 0);
    let runtime_buffer = plan.push_buffer(runtime_version);

    Ok(serialize(
        &plan,
        input,
        current,
        runtime_buffer,
        &graph.description,
    ))
}

fn serialize(
    plan: &GraphPlan,
    input: i32,
    output: i32,
    runtime_buffer: u32,
    description: &str,
) -> Vec<u8> {
    let mut fbb = FlatBufferBuilder::with_capacity(4096);

    let buffers: Vec<Table> = plan
        .buffers
        .iter()
        .map(|data| write_buffer(&mut fbb, data.as_deref()))
        .collect();

    let tensors: Vec<Table> = plan
        .tensors
        .iter()
        .map(|tensor| write_tensor(&mut fbb, tensor))
        .collect();

    let operators: Vec<Table> = plan
        .operators
        .iter()
        .map(|op| write_operator(&mut fbb, op))
        .collect();

    let operator_codes: Vec<Table> = plan
        .opcodes
        .iter()
        .map(|&(code, version)| {
            let start = fbb.start_table();
            fbb.push_slot::<i8>(OPCODE_DEPRECATED_BUILTIN_CODE, code as i8, 0);
            fbb.push_slot::<i32>(OPCODE_VERSION, version, 1);
            fbb.push_slot::<i32>(OPCODE_BUILTIN_CODE, code, 0);
            fbb.end_table(start)
        })
        .collect();

    // SubGraph
    let tensors = fbb.create_vector(tensors.as_slice());
    let inputs = fbb.create_vector(&[input]);
    let outputs = fbb.create_vector(&[output]);
    let operators = fbb.create_vector(operators.as_slice());
    let name = fbb.create_string("main");
    let start = fbb.start_table();
    fbb.push_slot_always(SUBGRAPH_TENSORS, tensors);
    fbb.push_slot_always(SUBGRAPH_INPUTS, inputs);
    fbb.push_slot_always(SUBGRAPH_OUTPUTS, outputs);
    fbb.push_slot_always(SUBGRAPH_OPERATORS, operators);
    fbb.push_slot_always(SUBGRAPH_NAME, name);
    let subgraph = fbb.end_table(start);

    // Metadata
    let metadata_name = fbb.create_string("min_runtime_version");
    let start = fbb.start_table();
    fbb.push_slot_always(METADATA_NAME, metadata_name);
    fbb.push_slot::<u32>(METADATA_BUFFER, runtime_buffer, 0);
    let metadata = fbb.end_table(start);

    // Model
    let operator_codes = fbb.create_vector(operator_codes.as_slice());
    let subgraphs = fbb.create_vector(&[subgraph]);
    let description = fbb.create_string(description);
    let buffers = fbb.create_vector(buffers.as_slice());
    let metadata = fbb.create_vector(&[metadata]);
    let start = fbb.start_table();
    fbb.push_slot::<u32>(MODEL_VERSION, SCHEMA_VERSION, 0);
    fbb.push_slot_always(MODEL_OPERATOR_CODES, operator_codes);
    fbb.push_slot_always(MODEL_SUBGRAPHS, subgraphs);
    fbb.push_slot_always(MODEL_DESCRIPTION, description);
    fbb.push_slot_always(MODEL_BUFFERS, buffers);
    fbb.push_slot_always(MODEL_METADATA, metadata);
    let model = fbb.end_table(start);

    fbb.finish(model, Some(FILE_IDENTIFIER));
    fbb.finished_data().to_vec()
}

fn write_buffer(fbb: &mut FlatBufferBuilder, data: Option<&[u8]>) -> Table {
    let data = data.map(|bytes| fbb.create_vector(bytes));
    let start = fbb.start_table();
    if let Some(data) = data {
        fbb.push_slot_always(BUFFER_DATA, data);
    }
    fbb.end_table(start)
}

fn write_tensor(fbb: &mut FlatBufferBuilder, tensor: &TensorDef) -> Table {
    let shape = fbb.create_vector(tensor.shape.as_slice());
    let shape_signature = tensor
        .shape_signature
        .as_ref()
        .map(|sig| fbb.create_vector(sig.as_slice()));
    let name = fbb.create_string(&tensor.name);

    let quantization = tensor.scale.map(|scale| {
        let scales = fbb.create_vector(&[scale]);
        let zero_points = fbb.create_vector(&[0i64]);
        let start = fbb.start_table();
        fbb.push_slot_always(QUANT_SCALE, scales);
        fbb.push_slot_always(QUANT_ZERO_POINT, zero_points);
        fbb.push_slot::<i32>(QUANT_QUANTIZED_DIMENSION, 0, 0);
        fbb.end_table(start)
    });

    let start = fbb.start_table();
    fbb.push_slot_always(TENSOR_SHAPE, shape);
    fbb.push_slot::<i8>(TENSOR_TYPE, tensor.tensor_type as i8, 0);
    fbb.push_slot::<u32>(TENSOR_BUFFER, tensor.buffer, 0);
    fbb.push_slot_always(TENSOR_NAME, name);
    if let Some(quantization) = quantization {
        fbb.push_slot_always(TENSOR_QUANTIZATION, quantization);
    }
    if let Some(shape_signature) = shape_signature {
        fbb.push_slot_always(TENSOR_SHAPE_SIGNATURE, shape_signature);
    }
    fbb.end_table(start)
}

fn write_operator(fbb: &mut FlatBufferBuilder, op: &OperatorDef) -> Table {
    let inputs = fbb.create_vector(op.inputs.as_slice());
    let outputs = fbb.create_vector(op.outputs.as_slice());

    let options = op.options.map(|(options_type, activation)| {
        let start = fbb.start_table();
        fbb.push_slot::<i8>(OPTIONS_FUSED_ACTIVATION, activation, ACTIVATION_NONE);
        (options_type, fbb.end_table(start))
    });

    let start = fbb.start_table();
    fbb.push_slot::<u32>(OP_OPCODE_INDEX, op.opcode_index, 0);
    fbb.push_slot_always(OP_INPUTS, inputs);
    fbb.push_slot_always(OP_OUTPUTS, outputs);
    if let Some((options_type, options)) = options {
        fbb.push_slot::<u8>(OP_BUILTIN_OPTIONS_TYPE, options_type, 0);
        fbb.push_slot_always(OP_BUILTIN_OPTIONS, options);
    }
    fbb.end_table(start)
}


#[cfg(test)]
mod tests {
    use super::reader::*;
    use super::*;

    fn two_layer_graph(quantize: bool) -> GraphSpec {
        let (hidden, _) = FullyConnectedSpec::new(
            3,
            2,
            vec![0.1, -0.2, 0.3, 0.4, 0.5, -0.6],
            vec![0.0, 0.1],
            true,
            quantize,
        );
        let (head, _) = FullyConnectedSpec::new(2, 1, vec![1.0, -1.0], vec![0.5], false, quantize);
        GraphSpec {
            input_dim: 3,
            input_normalization: None,
            layers: vec![hidden, head],
            sigmoid_output: true,
            description: "test".to_string(),
        }
    }

    fn sigmoid(x: f32) -> f32 {
        1.0 / (1.0 + (-x).exp())
    }

    #[test]
    fn writes_identifier_and_model_header() {
        let bytes = build_model(&two_layer_graph(true)).unwrap();
        assert_eq!(&bytes[4..8], FILE_IDENTIFIER.as_bytes());

        let model = root(&bytes);
        let version = field_pos(&bytes, model, 0).unwrap();
        assert_eq!(u32_at(&bytes, version), SCHEMA_VERSION);
        assert_eq!(string(&bytes, model, 3).as_deref(), Some("test"));

        // 2 FULLY_CONNECTED + LOGISTIC
        let subgraphs = tables(&bytes, model, 2);
        assert_eq!(subgraphs.len(), 1);
        assert_eq!(vector_len(&bytes, subgraphs[0], 3), 3);
        assert_eq!(string(&bytes, subgraphs[0], 4).as_deref(), Some("main"));

        // input + (weights, bias, output) x 2 + sigmoid output
        assert_eq!(vector_len(&bytes, subgraphs[0], 0), 8);
        // sentinel + (weights, bias) x 2 + min_runtime_version
        assert_eq!(vector_len(&bytes, model, 4), 6);
        assert_eq!(vector_len(&bytes, model, 1), 2);
    }

    #[test]
    fn quantized_weights_are_int8_tensors() {
        let bytes = build_model(&two_layer_graph(true)).unwrap();
        let model = root(&bytes);
        let subgraph = tables(&bytes, model, 2)[0];
        let tensors = tables(&bytes, subgraph, 0);

        let weights = tensors[1];
        let ty = field_pos(&bytes, weights, 1).map(|pos| bytes[pos] as i8);
        assert_eq!(ty, Some(TensorType::Int8 as i8));
        assert!(field_pos(&bytes, weights, 4).is_some());

        // float32 - значение по умолчанию, поле не пишется
        assert_eq!(field_pos(&bytes, tensors[0], 1), None);
    }

    #[test]
    fn float_export_has_no_quantization_params() {
        let bytes = build_model(&two_layer_graph(false)).unwrap();
        let model = root(&bytes);
        let subgraph = tables(&bytes, model, 2)[0];
        let tensors = tables(&bytes, subgraph, 0);
        assert!(tensors.iter().all(|&t| field_pos(&bytes, t, 4).is_none()));
    }

    #[test]
    fn graph_computes_dense_relu_sigmoid() {
        let x = [1.0f32, 2.0, -1.0];
        // hidden = relu([0.1 - 0.4 - 0.3, 0.4 + 1.0 + 0.6 + 0.1]) = [0, 2.1]
        let expected = sigmoid(0.0 - 2.1 + 0.5);

        let float = run(&build_model(&two_layer_graph(false)).unwrap(), &x);
        assert_eq!(float.len(), 1);
        assert!((float[0] - expected).abs() < 1e-6);

        let quantized = run(&build_model(&two_layer_graph(true)).unwrap(), &x);
        assert!((quantized[0] - expected).abs() < 1e-2);
    }

    #[test]
    fn input_normalization_runs_before_first_layer() {
        let mut graph = two_layer_graph(false);
        graph.input_normalization = Some(InputNormalization {
            mean: vec![10.0, 0.0, 500.0],
            scale: vec![0.5, 1.0, 0.01],
        });
        let bytes = build_model(&graph).unwrap();

        let model = root(&bytes);
        let subgraph = tables(&bytes, model, 2)[0];
        // SUB, MUL, 2 x FULLY_CONNECTED, LOGISTIC
        assert_eq!(vector_len(&bytes, subgraph, 3), 5);
        assert_eq!(vector_len(&bytes, model, 1), 4);

        // (12 - 10) * 0.5 = 1, (400 - 500) * 0.01 = -1
        let raw = run(&bytes, &[12.0, 2.0, 400.0]);
        let standardized = run(&build_model(&two_layer_graph(false)).unwrap(), &[1.0, 2.0, -1.0]);
        assert!((raw[0] - standardized[0]).abs() < 1e-6);
    }

    #[test]
    fn inconsistent_graph_is_rejected() {
        let mut graph = two_layer_graph(false);
        graph.layers[1].in_dim = 5;
        assert!(matches!(build_model(&graph), Err(MlError::Export(_))));

        let mut graph = two_layer_graph(false);
        graph.input_normalization = Some(InputNormalization {
            mean: vec![0.0; 2],
            scale: vec![1.0; 3],
        });
        assert!(matches!(build_model(&graph), Err(MlError::Export(_))));
    }
}
