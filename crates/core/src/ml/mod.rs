//! Minimal dense neural network toolkit: layers, Adam, full-batch training.

mod layer;
mod network;
mod optimizer;

pub use layer::{Activation, DenseLayer, LayerGradients};
pub use network::{argmax_rows, softmax, Loss, Network, TrainingConfig};
pub use optimizer::Adam;
