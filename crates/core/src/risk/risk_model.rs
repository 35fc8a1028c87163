//! Risk tiers and classifier features.

use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tierfolio_market_data::{Bond, Instrument, Stock};

/// Risk bucket of a market snapshot. Serialized as `Low` / `Medium` / `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Medium, RiskTier::High];

    /// Output index of the classifier, and the user risk level.
    pub fn index(&self) -> usize {
        match self {
            RiskTier::Low => 0,
            RiskTier::Medium => 1,
            RiskTier::High => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credit rating scale: 1 for `AAA`, 2 for `AA`, 3 for everything else.
pub const LOWEST_CREDIT_RATING: u8 = 3;

/// Rating for a letter grade.
pub fn rating_for_grade(grade: &str) -> u8 {
    match grade {
        "AAA" => 1,
        "AA" => 2,
        _ => LOWEST_CREDIT_RATING,
    }
}

/// Bond credit rating. The grade is read from the coupon frequency, which
/// is always numeric, so every bond lands on the lowest rating.
pub fn credit_rating(bond: &Bond) -> u8 {
    match bond.coupon_frequency_per_year {
        Some(frequency) => rating_for_grade(&frequency.to_string()),
        None => LOWEST_CREDIT_RATING,
    }
}

/// Classifier input `[0, value]`: dividend amount for stocks, credit rating for bonds.
pub fn features(instrument: &Instrument) -> [f64; 2] {
    match instrument {
        Instrument::Stock(stock) => [0.0, stock_feature(stock)],
        Instrument::Bond(bond) => [0.0, credit_rating(bond) as f64],
    }
}

fn stock_feature(stock: &Stock) -> f64 {
    stock.dividend_amount.to_f64().unwrap_or(0.0)
}
