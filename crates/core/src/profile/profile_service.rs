//! Questionnaire risk scorer.
//!
//! A `4 -> 8 -> 4 -> 1` regressor trained on synthetic answers labelled by
//! their mean grade. The rounded output, clamped to `0..=3`, is the user's
//! risk level.

use log::info;
use ndarray::Array2;
use rand::Rng;

use super::profile_model::{RiskCategory, UserRiskProfile, ANSWER_COUNT, MAX_GRADE};
use crate::errors::Result;
use crate::ml::{Loss, Network, TrainingConfig};

const LAYER_SIZES: [usize; 4] = [ANSWER_COUNT, 8, 4, 1];

/// Upper clamp bound of a predicted level. One past the last named category.
pub const MAX_RISK_LEVEL: u8 = 3;

/// Heuristic level of a set of answers: mean below 1.5 is 0, below 2.5 is 1,
/// otherwise 2.
pub fn heuristic_level(answers: &[f64]) -> u8 {
    let mean = answers.iter().sum::<f64>() / answers.len().max(1) as f64;
    if mean < 1.5 {
        0
    } else if mean < 2.5 {
        1
    } else {
        2
    }
}

/// Rounds a raw regression output and clamps it to `0..=MAX_RISK_LEVEL`.
pub fn level_from_output(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, MAX_RISK_LEVEL as f64) as u8
}

/// Uniform random answers and their heuristic levels.
fn synthetic_samples<R: Rng + ?Sized>(count: usize, rng: &mut R) -> (Array2<f64>, Array2<f64>) {
    let mut input = Array2::zeros((count, ANSWER_COUNT));
    let mut targets = Array2::zeros((count, 1));
    for row in 0..count {
        let mut answers = [0.0; ANSWER_COUNT];
        for (col, answer) in answers.iter_mut().enumerate() {
            *answer = rng.gen_range(0..=MAX_GRADE) as f64;
            input[[row, col]] = *answer;
        }
        targets[[row, 0]] = heuristic_level(&answers) as f64;
    }
    (input, targets)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScorerReport {
    pub losses: Vec<f64>,
    /// Share of hold-out samples whose rounded prediction matches the heuristic.
    pub holdout_accuracy: f64,
}

#[derive(Debug, Clone)]
pub struct UserRiskScorer {
    network: Network,
}

impl UserRiskScorer {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            network: Network::new(&LAYER_SIZES, Loss::MeanSquaredError, rng),
        }
    }

    /// Trains on fresh synthetic answers drawn from `rng`, then measures
    /// accuracy on a separate synthetic hold-out set.
    pub fn train<R: Rng + ?Sized>(
        &mut self,
        config: &TrainingConfig,
        rng: &mut R,
    ) -> Result<ScorerReport> {
        let (input, targets) = synthetic_samples(config.synthetic_samples, &mut *rng);
        let losses = self.network.fit(&input, &targets, config, "risk scorer")?;

        let (holdout, expected) = synthetic_samples(config.holdout_samples, &mut *rng);
        let holdout_accuracy = self.accuracy(&holdout, &expected);
        info!(
            "Risk scorer trained on {} samples, hold-out accuracy {:.1}% ({} samples)",
            config.synthetic_samples,
            holdout_accuracy * 100.0,
            config.holdout_samples
        );

        Ok(ScorerReport {
            losses,
            holdout_accuracy,
        })
    }

    fn accuracy(&self, input: &Array2<f64>, expected: &Array2<f64>) -> f64 {
        if input.nrows() == 0 {
            return 0.0;
        }
        let output = self.network.predict(input);
        let hits = output
            .column(0)
            .iter()
            .zip(expected.column(0).iter())
            .filter(|(raw, want)| level_from_output(**raw) as f64 == **want)
            .count();
        hits as f64 / input.nrows() as f64
    }

    /// Raw regression output for `profile`.
    pub fn score(&self, profile: &UserRiskProfile) -> f64 {
        let features = profile.as_features();
        let input = Array2::from_shape_fn((1, ANSWER_COUNT), |(_, col)| features[col]);
        self.network.predict(&input)[[0, 0]]
    }

    /// Predicted risk level in `0..=MAX_RISK_LEVEL`.
    pub fn level(&self, profile: &UserRiskProfile) -> u8 {
        level_from_output(self.score(profile))
    }

    /// Category for the predicted level; fails for the unnamed level 3.
    pub fn category(&self, profile: &UserRiskProfile) -> Result<RiskCategory> {
        RiskCategory::from_level(self.level(profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_heuristic_thresholds() {
        assert_eq!(heuristic_level(&[1.0, 1.0, 2.0, 1.0]), 0); // 1.25
        assert_eq!(heuristic_level(&[1.0, 2.0, 2.0, 1.0]), 1); // 1.5
        assert_eq!(heuristic_level(&[2.0, 3.0, 2.0, 2.0]), 1); // 2.25
        assert_eq!(heuristic_level(&[3.0, 2.0, 3.0, 2.0]), 2); // 2.5
        assert_eq!(heuristic_level(&[4.0, 4.0, 4.0, 4.0]), 2);
    }

    #[test]
    fn test_clamp_boundaries() {
        assert_eq!(level_from_output(-3.2), 0);
        assert_eq!(level_from_output(0.49), 0);
        assert_eq!(level_from_output(0.5), 1);
        assert_eq!(level_from_output(2.49), 2);
        assert_eq!(level_from_output(2.5), 3);
        assert_eq!(level_from_output(3.0), 3);
        assert_eq!(level_from_output(17.0), 3);
        assert_eq!(level_from_output(f64::NAN), 0);
    }

    #[test]
    fn test_synthetic_samples_are_labelled() {
        let (input, targets) = synthetic_samples(50, &mut StdRng::seed_from_u64(3));
        assert_eq!(input.dim(), (50, ANSWER_COUNT));
        for (row, target) in input.rows().into_iter().zip(targets.column(0)) {
            assert!(row.iter().all(|a| (0.0..=4.0).contains(a)));
            let answers: Vec<f64> = row.to_vec();
            assert_eq!(heuristic_level(&answers) as f64, *target);
        }
    }

    #[test]
    fn test_training_is_reproducible() {
        let config = TrainingConfig::default();

        let mut rng_a = StdRng::seed_from_u64(42);
        let mut a = UserRiskScorer::new(&mut rng_a);
        let report_a = a.train(&config, &mut rng_a).unwrap();

        let mut rng_b = StdRng::seed_from_u64(42);
        let mut b = UserRiskScorer::new(&mut rng_b);
        let report_b = b.train(&config, &mut rng_b).unwrap();

        assert_eq!(report_a, report_b);
        assert_eq!(report_a.losses.len(), 100);
        assert!((0.0..=1.0).contains(&report_a.holdout_accuracy));

        let profile = UserRiskProfile::new(&[2, 3, 1, 4]).unwrap();
        assert_eq!(a.level(&profile), b.level(&profile));
        assert!(a.level(&profile) <= MAX_RISK_LEVEL);
    }

    #[test]
    fn test_training_reduces_loss() {
        let config = TrainingConfig {
            epochs: 300,
            learning_rate: 0.01,
            ..TrainingConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        let mut scorer = UserRiskScorer::new(&mut rng);
        let report = scorer.train(&config, &mut rng).unwrap();
        assert!(report.losses[report.losses.len() - 1] < report.losses[0]);
    }
}
