//! Normalized instrument records.
//!
//! An [`Instrument`] is either a [`Stock`] or a [`Bond`]. Fields that the
//! sources may fail to provide are `Option`s; an instrument with missing
//! fields is still a valid record, it is just not eligible for selection.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The two instrument families the pipeline handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InstrumentKind {
    Stock,
    Bond,
}

impl InstrumentKind {
    /// ISS market name for this kind.
    pub fn market(&self) -> &'static str {
        match self {
            InstrumentKind::Stock => "shares",
            InstrumentKind::Bond => "bonds",
        }
    }
}

impl std::fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstrumentKind::Stock => write!(f, "stock"),
            InstrumentKind::Bond => write!(f, "bond"),
        }
    }
}

/// An equity after enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub ticker: String,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub has_dividends: bool,
    #[serde(default)]
    pub dividend_amount: Decimal,
    #[serde(default)]
    pub dividend_frequency_per_year: u32,
    pub annual_return_pct: Option<Decimal>,
    pub cagr_pct: Option<Decimal>,
}

impl Stock {
    /// An empty record for `ticker`.
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            name: None,
            price: None,
            has_dividends: false,
            dividend_amount: Decimal::ZERO,
            dividend_frequency_per_year: 0,
            annual_return_pct: None,
            cagr_pct: None,
        }
    }

    /// Price and return are known, so the stock can be used for training.
    pub fn is_complete(&self) -> bool {
        self.price.is_some() && self.annual_return_pct.is_some()
    }

    /// Every field the selector reads is known.
    pub fn is_valid(&self) -> bool {
        self.name.is_some() && self.is_complete()
    }
}

/// A bond after enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bond {
    pub ticker: String,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub coupon_size: Option<Decimal>,
    pub coupon_frequency_per_year: Option<u32>,
    pub maturity_date: Option<NaiveDate>,
    pub yield_to_maturity_pct: Option<Decimal>,
}

impl Bond {
    /// An empty record for `ticker`.
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            name: None,
            price: None,
            coupon_size: None,
            coupon_frequency_per_year: None,
            maturity_date: None,
            yield_to_maturity_pct: None,
        }
    }

    /// All pricing inputs and the yield are known.
    pub fn is_complete(&self) -> bool {
        self.price.is_some()
            && self.maturity_date.is_some()
            && self.coupon_size.is_some()
            && self.coupon_frequency_per_year.is_some()
            && self.yield_to_maturity_pct.is_some()
    }

    /// Complete, named and paying a positive coupon.
    pub fn is_valid(&self) -> bool {
        self.name.is_some()
            && self.is_complete()
            && self.coupon_size.is_some_and(|c| c > Decimal::ZERO)
    }
}

/// A tradable security, tagged by kind on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Instrument {
    Stock(Stock),
    Bond(Bond),
}

impl Instrument {
    pub fn ticker(&self) -> &str {
        match self {
            Instrument::Stock(s) => &s.ticker,
            Instrument::Bond(b) => &b.ticker,
        }
    }

    pub fn kind(&self) -> InstrumentKind {
        match self {
            Instrument::Stock(_) => InstrumentKind::Stock,
            Instrument::Bond(_) => InstrumentKind::Bond,
        }
    }

    pub fn price(&self) -> Option<Decimal> {
        match self {
            Instrument::Stock(s) => s.price,
            Instrument::Bond(b) => b.price,
        }
    }

    /// Annual return in percent: the stock's return, or the bond's yield to maturity.
    pub fn annual_return_pct(&self) -> Option<Decimal> {
        match self {
            Instrument::Stock(s) => s.annual_return_pct,
            Instrument::Bond(b) => b.yield_to_maturity_pct,
        }
    }

    /// Enough data to train on and to place in a snapshot.
    pub fn is_complete(&self) -> bool {
        match self {
            Instrument::Stock(s) => s.is_complete(),
            Instrument::Bond(b) => b.is_complete(),
        }
    }

    /// Eligible for portfolio selection.
    pub fn is_valid(&self) -> bool {
        match self {
            Instrument::Stock(s) => s.is_valid(),
            Instrument::Bond(b) => b.is_valid(),
        }
    }
}

impl From<Stock> for Instrument {
    fn from(stock: Stock) -> Self {
        Instrument::Stock(stock)
    }
}

impl From<Bond> for Instrument {
    fn from(bond: Bond) -> Self {
        Instrument::Bond(bond)
    }
}
