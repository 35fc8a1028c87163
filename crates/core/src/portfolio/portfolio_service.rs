use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use tierfolio_market_data::{Instrument, InstrumentKind};

use super::portfolio_model::{Portfolio, SelectorConfig};
use crate::profile::RiskCategory;
use crate::snapshot::MarketSnapshot;

/// Price-weighted mean annual return of `instruments`, in percent, rounded to
/// two places.
///
/// Instruments without a price weigh 1. When the weights sum to zero the
/// plain mean is used; with no instruments the result is zero.
pub fn expected_return_pct(instruments: &[Instrument]) -> Decimal {
    let hundred = Decimal::ONE_HUNDRED;
    let returns: Vec<(Decimal, Decimal)> = instruments
        .iter()
        .filter_map(|i| {
            let r = i.annual_return_pct()? / hundred;
            Some((r, i.price().unwrap_or(Decimal::ONE)))
        })
        .collect();
    if returns.is_empty() {
        return Decimal::ZERO;
    }

    let total_weight: Decimal = returns.iter().map(|(_, w)| *w).sum();
    let pct = if total_weight.is_zero() {
        let sum: Decimal = returns.iter().map(|(r, _)| *r).sum();
        sum / Decimal::from(returns.len()) * hundred
    } else {
        let weighted: Decimal = returns.iter().map(|(r, w)| r * w).sum();
        weighted / total_weight * hundred
    };
    pct.round_dp(2)
}

/// Picks a bounded random selection from one tier of a snapshot.
#[derive(Debug, Clone, Default)]
pub struct PortfolioSelector {
    config: SelectorConfig,
}

impl PortfolioSelector {
    pub fn new(config: SelectorConfig) -> Self {
        Self { config }
    }

    fn pick<R: Rng + ?Sized>(&self, candidates: &[Instrument], rng: &mut R) -> Vec<Instrument> {
        let mut valid: Vec<Instrument> =
            candidates.iter().filter(|i| i.is_valid()).cloned().collect();
        valid.shuffle(rng);
        valid.truncate(self.config.max_per_kind);
        valid
    }

    /// Never fails: an empty or fully invalid tier gives an empty portfolio.
    pub fn select<R: Rng + ?Sized>(
        &self,
        snapshot: &MarketSnapshot,
        category: RiskCategory,
        rng: &mut R,
    ) -> Portfolio {
        let bucket = snapshot.tier(category.tier());
        let bonds = self.pick(bucket.of_kind(InstrumentKind::Bond), &mut *rng);
        let stocks = self.pick(bucket.of_kind(InstrumentKind::Stock), &mut *rng);
        debug!(
            "Selected {} bonds and {} stocks from tier {}",
            bonds.len(),
            stocks.len(),
            category.tier()
        );

        let chosen: Vec<Instrument> = bonds.iter().chain(stocks.iter()).cloned().collect();
        Portfolio {
            expected_return_pct: expected_return_pct(&chosen),
            bonds,
            stocks,
            risk_category: category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal_macros::dec;
    use tierfolio_market_data::{Bond, Stock};

    fn bond(ticker: &str, ytm: Decimal, price: Decimal) -> Instrument {
        let mut bond = Bond::new(ticker);
        bond.name = Some(format!("ОФЗ {}", ticker));
        bond.price = Some(price);
        bond.coupon_size = Some(dec!(35.4));
        bond.coupon_frequency_per_year = Some(2);
        bond.maturity_date = NaiveDate::from_ymd_opt(2031, 6, 1);
        bond.yield_to_maturity_pct = Some(ytm);
        Instrument::Bond(bond)
    }

    fn stock(ticker: &str, annual: Decimal, price: Decimal) -> Instrument {
        let mut stock = Stock::new(ticker);
        stock.name = Some(ticker.to_string());
        stock.price = Some(price);
        stock.annual_return_pct = Some(annual);
        Instrument::Stock(stock)
    }

    #[test]
    fn test_weighted_return() {
        let bonds = vec![bond("A", dec!(10), dec!(100)), bond("B", dec!(5), dec!(300))];
        assert_eq!(expected_return_pct(&bonds), dec!(6.25));
    }

    #[test]
    fn test_zero_weight_falls_back_to_plain_mean() {
        let bonds = vec![bond("A", dec!(10), dec!(0)), bond("B", dec!(5), dec!(0))];
        assert_eq!(expected_return_pct(&bonds), dec!(7.5));
    }

    #[test]
    fn test_missing_price_weighs_one() {
        let mut unpriced = Stock::new("X");
        unpriced.annual_return_pct = Some(dec!(20));
        let list = vec![Instrument::Stock(unpriced), stock("Y", dec!(10), dec!(1))];
        assert_eq!(expected_return_pct(&list), dec!(15));
    }

    #[test]
    fn test_no_instruments_returns_zero() {
        assert_eq!(expected_return_pct(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_empty_tier_gives_empty_portfolio() {
        let selector = PortfolioSelector::default();
        let portfolio = selector.select(
            &MarketSnapshot::default(),
            RiskCategory::Medium,
            &mut StdRng::seed_from_u64(1),
        );
        assert_eq!(portfolio, Portfolio::empty(RiskCategory::Medium));
    }

    #[test]
    fn test_selection_is_capped_and_valid() {
        let mut snapshot = MarketSnapshot::default();
        for i in 0..15 {
            snapshot.low.bonds.push(bond(&format!("B{}", i), dec!(9), dec!(950)));
            snapshot.low.stocks.push(stock(&format!("S{}", i), dec!(12), dec!(250)));
        }
        // Invalid candidates: zero coupon, missing name.
        let mut zero_coupon = bond("Z", dec!(0), dec!(1000));
        if let Instrument::Bond(b) = &mut zero_coupon {
            b.coupon_size = Some(Decimal::ZERO);
        }
        snapshot.low.bonds.push(zero_coupon);
        let mut unnamed = Stock::new("U");
        unnamed.price = Some(dec!(1));
        unnamed.annual_return_pct = Some(dec!(1));
        snapshot.low.stocks.push(Instrument::Stock(unnamed));

        let selector = PortfolioSelector::default();
        for seed in 0..20 {
            let portfolio =
                selector.select(&snapshot, RiskCategory::Low, &mut StdRng::seed_from_u64(seed));
            assert_eq!(portfolio.bonds.len(), 10);
            assert_eq!(portfolio.stocks.len(), 10);
            assert!(portfolio.bonds.iter().chain(&portfolio.stocks).all(|i| i.is_valid()));
            assert_eq!(portfolio.risk_category, RiskCategory::Low);
        }
    }

    #[test]
    fn test_selection_reads_only_requested_tier() {
        let mut snapshot = MarketSnapshot::default();
        snapshot.high.stocks.push(stock("YDEX", dec!(30), dec!(4000)));
        snapshot.low.bonds.push(bond("SU26238", dec!(8), dec!(600)));

        let selector = PortfolioSelector::new(SelectorConfig { max_per_kind: 3 });
        let portfolio =
            selector.select(&snapshot, RiskCategory::High, &mut StdRng::seed_from_u64(5));
        assert!(portfolio.bonds.is_empty());
        assert_eq!(portfolio.stocks.len(), 1);
        assert_eq!(portfolio.expected_return_pct, dec!(30));
    }
}
