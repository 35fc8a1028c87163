//! Adam optimizer (Adaptive Moment Estimation).

use ndarray::{Array1, Array2};

use super::layer::{DenseLayer, LayerGradients};

#[derive(Debug, Clone)]
struct Moments {
    m_w: Array2<f64>,
    v_w: Array2<f64>,
    m_b: Array1<f64>,
    v_b: Array1<f64>,
}

impl Moments {
    fn zeros_like(layer: &DenseLayer) -> Self {
        Self {
            m_w: Array2::zeros(layer.weights.dim()),
            v_w: Array2::zeros(layer.weights.dim()),
            m_b: Array1::zeros(layer.biases.len()),
            v_b: Array1::zeros(layer.biases.len()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    t: i32,
    moments: Vec<Moments>,
}

impl Adam {
    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            t: 0,
            moments: Vec::new(),
        }
    }

    /// Applies one update to every layer. `gradients[i]` belongs to `layers[i]`.
    pub fn step(&mut self, layers: &mut [DenseLayer], gradients: &[LayerGradients]) {
        if self.moments.len() != layers.len() {
            self.moments = layers.iter().map(Moments::zeros_like).collect();
            self.t = 0;
        }
        self.t += 1;

        let correction1 = 1.0 - self.beta1.powi(self.t);
        let correction2 = 1.0 - self.beta2.powi(self.t);

        for ((layer, grads), moments) in layers
            .iter_mut()
            .zip(gradients)
            .zip(self.moments.iter_mut())
        {
            moments.m_w = &moments.m_w * self.beta1 + &grads.weights * (1.0 - self.beta1);
            moments.v_w =
                &moments.v_w * self.beta2 + &(&grads.weights * &grads.weights) * (1.0 - self.beta2);
            let m_hat = &moments.m_w / correction1;
            let v_hat = &moments.v_w / correction2;
            layer.weights =
                &layer.weights - &(m_hat * self.learning_rate / (v_hat.mapv(f64::sqrt) + self.epsilon));

            moments.m_b = &moments.m_b * self.beta1 + &grads.biases * (1.0 - self.beta1);
            moments.v_b =
                &moments.v_b * self.beta2 + &(&grads.biases * &grads.biases) * (1.0 - self.beta2);
            let m_hat = &moments.m_b / correction1;
            let v_hat = &moments.v_b / correction2;
            layer.biases =
                &layer.biases - &(m_hat * self.learning_rate / (v_hat.mapv(f64::sqrt) + self.epsilon));
        }
    }
}
