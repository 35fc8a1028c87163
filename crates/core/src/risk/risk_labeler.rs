//! Heuristic labels used to bootstrap classifier training.

use rust_decimal::Decimal;
use tierfolio_market_data::Instrument;

use super::risk_model::{credit_rating, RiskTier, LOWEST_CREDIT_RATING};

/// Stocks paying less than this in dividends are labeled high risk.
pub const DIVIDEND_THRESHOLD: Decimal = Decimal::TWO;

/// Training label for one instrument.
///
/// Stocks: `High` below the dividend threshold, otherwise `Medium`.
/// Bonds: `Medium` at the lowest credit rating, otherwise `Low`.
pub fn label(instrument: &Instrument) -> RiskTier {
    match instrument {
        Instrument::Stock(stock) => {
            if stock.dividend_amount < DIVIDEND_THRESHOLD {
                RiskTier::High
            } else {
                RiskTier::Medium
            }
        }
        Instrument::Bond(bond) => {
            if credit_rating(bond) == LOWEST_CREDIT_RATING {
                RiskTier::Medium
            } else {
                RiskTier::Low
            }
        }
    }
}
