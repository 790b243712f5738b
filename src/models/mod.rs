//! ML модели

pub mod network;
pub mod predictor;
pub mod trainer;

use std::sync::{Mutex, MutexGuard, PoisonError};

use burn::tensor::backend::Backend;

pub use network::{
    Activation, DenseWeights, InferenceBackend, StatsNetwork, StatsNetworkConfig, TrainingBackend,
};
pub use predictor::StatsPredictor;
pub use trainer::{evaluate, Trainer};

/// ГСЧ ndarray backend - глобальный, поэтому инициализация весов и dropout
/// сериализуются между запусками внутри процесса
static BACKEND_RNG: Mutex<()> = Mutex::new(());

/// Захватывает backend и, если задан seed, переинициализирует его ГСЧ.
/// Сеть нужно создавать и обучать, пока guard жив.
pub fn seeded_backend(seed: Option<u64>) -> MutexGuard<'static, ()> {
    let guard = BACKEND_RNG.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(seed) = seed {
        TrainingBackend::seed(seed);
    }
    guard
}
