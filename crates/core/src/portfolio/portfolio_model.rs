//! Portfolio domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tierfolio_market_data::Instrument;

use crate::profile::RiskCategory;

/// Default cap on instruments of one kind in a portfolio.
pub const DEFAULT_MAX_PER_KIND: usize = 10;

#[derive(Debug, Clone)]
pub struct SelectorConfig {
    pub max_per_kind: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_per_kind: DEFAULT_MAX_PER_KIND,
        }
    }
}

/// A risk-matched selection with its expected return estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub bonds: Vec<Instrument>,
    pub stocks: Vec<Instrument>,
    pub risk_category: RiskCategory,
    pub expected_return_pct: Decimal,
}

impl Portfolio {
    pub fn empty(risk_category: RiskCategory) -> Self {
        Self {
            bonds: Vec::new(),
            stocks: Vec::new(),
            risk_category,
            expected_return_pct: Decimal::ZERO,
        }
    }

    pub fn len(&self) -> usize {
        self.bonds.len() + self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_portfolio_wire_keys() {
        let mut portfolio = Portfolio::empty(RiskCategory::Low);
        portfolio.expected_return_pct = dec!(6.25);

        let json = serde_json::to_value(&portfolio).unwrap();
        assert_eq!(json["riskCategory"], "Низкий");
        assert_eq!(json["expectedReturnPct"], 6.25);
        assert!(json["bonds"].as_array().unwrap().is_empty());
        assert!(json["stocks"].as_array().unwrap().is_empty());
    }
}
