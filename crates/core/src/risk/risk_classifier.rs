//! Feed-forward risk classifier.
//!
//! Architecture `2 -> 16 -> 16 -> 3` with ReLU hidden layers and logits for
//! Low/Medium/High. Retrained from scratch on every pipeline run.

use log::info;
use ndarray::Array2;
use rand::Rng;
use tierfolio_market_data::Instrument;

use super::risk_labeler::label;
use super::risk_model::{features, RiskTier};
use crate::errors::Result;
use crate::ml::{argmax_rows, Loss, Network, TrainingConfig};

const LAYER_SIZES: [usize; 4] = [2, 16, 16, 3];

#[derive(Debug, Clone)]
pub struct RiskClassifier {
    network: Network,
}

fn feature_matrix(instruments: &[Instrument]) -> Array2<f64> {
    let mut matrix = Array2::zeros((instruments.len(), 2));
    for (row, instrument) in instruments.iter().enumerate() {
        let [a, b] = features(instrument);
        matrix[[row, 0]] = a;
        matrix[[row, 1]] = b;
    }
    matrix
}

fn one_hot(tiers: &[RiskTier]) -> Array2<f64> {
    let mut matrix = Array2::zeros((tiers.len(), RiskTier::ALL.len()));
    for (row, tier) in tiers.iter().enumerate() {
        matrix[[row, tier.index()]] = 1.0;
    }
    matrix
}

impl RiskClassifier {
    /// Untrained classifier with weights drawn from `rng`.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            network: Network::new(&LAYER_SIZES, Loss::CrossEntropy, rng),
        }
    }

    /// Trains on heuristic labels of `instruments`, full batch.
    ///
    /// There is no held-out set; the returned losses are training losses.
    pub fn train(&mut self, instruments: &[Instrument], config: &TrainingConfig) -> Result<Vec<f64>> {
        let labels: Vec<RiskTier> = instruments.iter().map(label).collect();
        let input = feature_matrix(instruments);
        let targets = one_hot(&labels);

        let losses = self.network.fit(&input, &targets, config, "risk classifier")?;
        info!(
            "Risk classifier trained on {} instruments, final loss {:.6}",
            instruments.len(),
            losses.last().copied().unwrap_or_default()
        );
        Ok(losses)
    }

    pub fn classify(&self, instrument: &Instrument) -> RiskTier {
        self.classify_all(std::slice::from_ref(instrument))
            .pop()
            .unwrap_or(RiskTier::High)
    }

    /// Arg-max tier for each instrument, in input order.
    pub fn classify_all(&self, instruments: &[Instrument]) -> Vec<RiskTier> {
        if instruments.is_empty() {
            return Vec::new();
        }
        let logits = self.network.predict(&feature_matrix(instruments));
        argmax_rows(&logits)
            .into_iter()
            .map(|i| RiskTier::from_index(i).unwrap_or(RiskTier::High))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal_macros::dec;
    use tierfolio_market_data::{Bond, Stock};

    fn stock(ticker: &str, dividend: rust_decimal::Decimal) -> Instrument {
        let mut stock = Stock::new(ticker);
        stock.dividend_amount = dividend;
        Instrument::Stock(stock)
    }

    fn training_set() -> Vec<Instrument> {
        let mut set = Vec::new();
        for i in 0..5 {
            set.push(stock(&format!("H{}", i), dec!(0)));
            set.push(stock(&format!("M{}", i), dec!(10)));
        }
        set
    }

    #[test]
    fn test_same_seed_same_decisions() {
        let data = training_set();
        let config = TrainingConfig::default();

        let mut a = RiskClassifier::new(&mut StdRng::seed_from_u64(42));
        let mut b = RiskClassifier::new(&mut StdRng::seed_from_u64(42));
        let losses_a = a.train(&data, &config).unwrap();
        let losses_b = b.train(&data, &config).unwrap();

        assert_eq!(losses_a, losses_b);
        let mid = stock("MID", dec!(5));
        assert_eq!(a.classify(&mid), b.classify(&mid));
    }

    #[test]
    fn test_learns_dividend_split() {
        let data = training_set();
        let config = TrainingConfig {
            epochs: 300,
            learning_rate: 0.01,
            ..TrainingConfig::default()
        };

        let mut classifier = RiskClassifier::new(&mut StdRng::seed_from_u64(7));
        let losses = classifier.train(&data, &config).unwrap();

        assert!(losses[losses.len() - 1] < losses[0]);
        assert_eq!(classifier.classify(&stock("X", dec!(0))), RiskTier::High);
        assert_eq!(classifier.classify(&stock("Y", dec!(10))), RiskTier::Medium);
    }

    #[test]
    fn test_classify_all_keeps_order() {
        let classifier = RiskClassifier::new(&mut StdRng::seed_from_u64(1));
        let instruments = vec![
            stock("A", dec!(0)),
            Instrument::Bond(Bond::new("B")),
            stock("C", dec!(3)),
        ];
        assert_eq!(classifier.classify_all(&instruments).len(), 3);
        assert!(classifier.classify_all(&[]).is_empty());
    }

    #[test]
    fn test_training_without_instruments_fails() {
        let mut classifier = RiskClassifier::new(&mut StdRng::seed_from_u64(1));
        assert!(classifier.train(&[], &TrainingConfig::default()).is_err());
    }
}
