//! Feed-forward network with full-batch training.

use log::{debug, info};
use ndarray::{Array2, Axis};
use rand::Rng;

use super::layer::{Activation, DenseLayer};
use super::optimizer::Adam;
use crate::errors::{Error, Result};

const LOG_EPSILON: f64 = 1e-12;

/// Training hyper-parameters shared by the classifier and the scorer.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    /// Synthetic samples generated for the questionnaire scorer.
    pub synthetic_samples: usize,
    /// Synthetic samples held out to measure scorer accuracy.
    pub holdout_samples: usize,
    pub log_every: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 100,
            learning_rate: 0.001,
            synthetic_samples: 1000,
            holdout_samples: 200,
            log_every: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loss {
    MeanSquaredError,
    /// Softmax over output logits followed by negative log-likelihood.
    /// Targets are one-hot rows.
    CrossEntropy,
}

impl Loss {
    fn value(&self, output: &Array2<f64>, targets: &Array2<f64>) -> f64 {
        match self {
            Loss::MeanSquaredError => (output - targets).mapv(|d| d * d).mean().unwrap_or(0.0),
            Loss::CrossEntropy => {
                let rows = output.nrows().max(1) as f64;
                let log_probs = softmax(output).mapv(|p| (p + LOG_EPSILON).ln());
                -(targets * &log_probs).sum() / rows
            }
        }
    }

    fn gradient(&self, output: &Array2<f64>, targets: &Array2<f64>) -> Array2<f64> {
        match self {
            Loss::MeanSquaredError => (output - targets) * (2.0 / output.len().max(1) as f64),
            Loss::CrossEntropy => (softmax(output) - targets) / output.nrows().max(1) as f64,
        }
    }
}

/// Row-wise softmax, shifted by the row maximum for stability.
pub fn softmax(logits: &Array2<f64>) -> Array2<f64> {
    let mut out = logits.clone();
    for mut row in out.rows_mut() {
        let max = row.fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        if sum > 0.0 {
            row.mapv_inplace(|v| v / sum);
        }
    }
    out
}

/// Index of the largest value in each row.
pub fn argmax_rows(values: &Array2<f64>) -> Vec<usize> {
    values
        .axis_iter(Axis(0))
        .map(|row| {
            row.iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |(best, max), (i, &v)| {
                    if v > max {
                        (i, v)
                    } else {
                        (best, max)
                    }
                })
                .0
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<DenseLayer>,
    loss: Loss,
}

impl Network {
    /// Builds a network with `sizes[0]` inputs and `sizes[last]` outputs.
    /// Hidden layers use ReLU; the output layer is linear.
    pub fn new<R: Rng + ?Sized>(sizes: &[usize], loss: Loss, rng: &mut R) -> Self {
        let last = sizes.len().saturating_sub(2);
        let layers = sizes
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                let activation = if i == last {
                    Activation::Identity
                } else {
                    Activation::ReLU
                };
                DenseLayer::new(pair[0], pair[1], activation, &mut *rng)
            })
            .collect();

        Self { layers, loss }
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    pub fn predict(&self, input: &Array2<f64>) -> Array2<f64> {
        self.layers
            .iter()
            .fold(input.clone(), |acc, layer| layer.infer(&acc))
    }

    /// One full-batch forward/backward pass and optimizer step. Returns the loss.
    pub fn train_step(
        &mut self,
        input: &Array2<f64>,
        targets: &Array2<f64>,
        optimizer: &mut Adam,
    ) -> Result<f64> {
        let mut output = input.clone();
        for layer in self.layers.iter_mut() {
            output = layer.forward(&output);
        }
        if output.dim() != targets.dim() {
            return Err(Error::Training(format!(
                "output shape {:?} does not match target shape {:?}",
                output.dim(),
                targets.dim()
            )));
        }
        let loss = self.loss.value(&output, targets);

        let mut gradient = self.loss.gradient(&output, targets);
        let mut gradients = Vec::with_capacity(self.layers.len());
        for layer in self.layers.iter().rev() {
            let grads = layer
                .backward(&gradient)
                .ok_or_else(|| Error::Training("backward pass without forward".to_string()))?;
            gradient = grads.input.clone();
            gradients.push(grads);
        }
        gradients.reverse();

        optimizer.step(&mut self.layers, &gradients);
        Ok(loss)
    }

    /// Trains for `config.epochs` full-batch epochs. Returns the per-epoch losses.
    pub fn fit(
        &mut self,
        input: &Array2<f64>,
        targets: &Array2<f64>,
        config: &TrainingConfig,
        name: &str,
    ) -> Result<Vec<f64>> {
        if input.nrows() == 0 {
            return Err(Error::Training(format!("{}: no training samples", name)));
        }
        if input.nrows() != targets.nrows() {
            return Err(Error::Training(format!(
                "{}: {} inputs but {} targets",
                name,
                input.nrows(),
                targets.nrows()
            )));
        }

        let mut optimizer = Adam::new(config.learning_rate);
        let mut losses = Vec::with_capacity(config.epochs);
        for epoch in 1..=config.epochs {
            let loss = self.train_step(input, targets, &mut optimizer)?;
            if config.log_every > 0 && epoch % config.log_every == 0 {
                info!("{} epoch {}/{}: loss = {:.6}", name, epoch, config.epochs, loss);
            }
            losses.push(loss);
        }
        debug!("{} trained on {} samples", name, input.nrows());
        Ok(losses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_layer_shapes_and_activations() {
        let net = Network::new(&[2, 16, 16, 3], Loss::CrossEntropy, &mut StdRng::seed_from_u64(1));
        let layers = net.layers();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0].activation, Activation::ReLU);
        assert_eq!(layers[1].activation, Activation::ReLU);
        assert_eq!(layers[2].activation, Activation::Identity);
        assert_eq!(net.predict(&array![[0.0, 1.0], [0.0, 2.0]]).dim(), (2, 3));
    }

    #[test]
    fn test_softmax_rows_sum_to_one() {
        let probs = softmax(&array![[1.0, 2.0, 3.0], [1000.0, 1000.0, 1000.0]]);
        for row in probs.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-12);
        }
        assert!((probs[[1, 0]] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_argmax_prefers_first_on_ties() {
        assert_eq!(argmax_rows(&array![[0.1, 0.7, 0.2], [0.5, 0.5, 0.0]]), vec![1, 0]);
    }

    #[test]
    fn test_regression_loss_decreases() {
        let mut net = Network::new(&[1, 8, 1], Loss::MeanSquaredError, &mut StdRng::seed_from_u64(5));
        let x = array![[0.0], [0.5], [1.0], [1.5], [2.0]];
        let y = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let config = TrainingConfig {
            epochs: 300,
            learning_rate: 0.01,
            ..TrainingConfig::default()
        };

        let losses = net.fit(&x, &y, &config, "regressor").unwrap();
        assert!(losses[losses.len() - 1] < losses[0]);
    }

    #[test]
    fn test_fit_rejects_empty_input() {
        let mut net = Network::new(&[2, 4, 3], Loss::CrossEntropy, &mut StdRng::seed_from_u64(5));
        let empty = Array2::<f64>::zeros((0, 2));
        let targets = Array2::<f64>::zeros((0, 3));
        let result = net.fit(&empty, &targets, &TrainingConfig::default(), "classifier");
        assert!(matches!(result, Err(Error::Training(_))));
    }
}
