//! Fully connected layer: `output = activation(input · weights + biases)`.

use ndarray::{Array1, Array2, Axis};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    ReLU,
    /// No activation; used on output layers that emit logits or raw values.
    Identity,
}

impl Activation {
    fn apply(&self, z: &Array2<f64>) -> Array2<f64> {
        match self {
            Activation::ReLU => z.mapv(|v| v.max(0.0)),
            Activation::Identity => z.clone(),
        }
    }

    fn derivative(&self, z: &Array2<f64>) -> Array2<f64> {
        match self {
            Activation::ReLU => z.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }),
            Activation::Identity => Array2::ones(z.dim()),
        }
    }
}

/// Gradients produced by one backward pass through a layer.
#[derive(Debug, Clone)]
pub struct LayerGradients {
    /// Gradient with respect to the layer input, handed to the previous layer.
    pub input: Array2<f64>,
    pub weights: Array2<f64>,
    pub biases: Array1<f64>,
}

#[derive(Debug, Clone)]
pub struct DenseLayer {
    /// Weight matrix (input_size x output_size)
    pub weights: Array2<f64>,
    pub biases: Array1<f64>,
    pub activation: Activation,
    last_input: Option<Array2<f64>>,
    last_z: Option<Array2<f64>>,
}

impl DenseLayer {
    /// Weights and biases drawn from `U(-1/sqrt(in), 1/sqrt(in))`.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Self {
        let bound = 1.0 / (input_size.max(1) as f64).sqrt();
        let weights = Array2::from_shape_fn((input_size, output_size), |_| {
            rng.gen_range(-bound..=bound)
        });
        let biases = Array1::from_shape_fn(output_size, |_| rng.gen_range(-bound..=bound));

        Self {
            weights,
            biases,
            activation,
            last_input: None,
            last_z: None,
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.nrows()
    }

    pub fn output_size(&self) -> usize {
        self.weights.ncols()
    }

    fn linear(&self, input: &Array2<f64>) -> Array2<f64> {
        input.dot(&self.weights) + &self.biases.view().insert_axis(Axis(0))
    }

    /// Forward pass that keeps what `backward` needs.
    pub fn forward(&mut self, input: &Array2<f64>) -> Array2<f64> {
        let z = self.linear(input);
        let output = self.activation.apply(&z);
        self.last_input = Some(input.clone());
        self.last_z = Some(z);
        output
    }

    /// Forward pass without caching.
    pub fn infer(&self, input: &Array2<f64>) -> Array2<f64> {
        self.activation.apply(&self.linear(input))
    }

    /// Gradients for `output_gradient`, or `None` if `forward` has not run.
    pub fn backward(&self, output_gradient: &Array2<f64>) -> Option<LayerGradients> {
        let z = self.last_z.as_ref()?;
        let input = self.last_input.as_ref()?;

        let delta = output_gradient * &self.activation.derivative(z);

        Some(LayerGradients {
            input: delta.dot(&self.weights.t()),
            weights: input.t().dot(&delta),
            biases: delta.sum_axis(Axis(0)),
        })
    }
}
