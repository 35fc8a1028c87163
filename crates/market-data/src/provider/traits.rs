//! Source trait definitions.
//!
//! The enricher talks to its sources only through these traits, so each
//! stage of the fallback chain can be replaced in tests.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{BondFields, CouponSchedule, DividendSummary, InstrumentKind, StockFields};

/// A source of per-ticker instrument attributes.
///
/// Both methods default to "nothing known", so a source that only covers
/// one kind implements just that method.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use tierfolio_market_data::provider::InstrumentSource;
///
/// struct StaticSource;
///
/// #[async_trait]
/// impl InstrumentSource for StaticSource {
///     fn id(&self) -> &'static str {
///         "STATIC"
///     }
///
///     async fn bond_fields(&self, ticker: &str) -> Result<BondFields, MarketDataError> {
///         Ok(BondFields { name: Some(ticker.to_string()), ..Default::default() })
///     }
/// }
/// ```
#[async_trait]
pub trait InstrumentSource: Send + Sync {
    /// Constant identifier used in logs and errors, e.g. "MOEX_ISS".
    fn id(&self) -> &'static str;

    async fn stock_fields(&self, _ticker: &str) -> Result<StockFields, MarketDataError> {
        Ok(StockFields::default())
    }

    async fn bond_fields(&self, _ticker: &str) -> Result<BondFields, MarketDataError> {
        Ok(BondFields::default())
    }
}

/// A source of dividend and coupon payment history.
#[async_trait]
pub trait PaymentHistorySource: Send + Sync {
    fn id(&self) -> &'static str;

    async fn dividends(&self, ticker: &str) -> Result<DividendSummary, MarketDataError>;

    async fn coupons(&self, ticker: &str) -> Result<CouponSchedule, MarketDataError>;
}

/// A source of the full list of tradable tickers.
#[async_trait]
pub trait ListingSource: Send + Sync {
    fn id(&self) -> &'static str;

    /// All tickers of `kind` currently listed. Failure here aborts a pipeline run.
    async fn list_tickers(&self, kind: InstrumentKind) -> Result<Vec<String>, MarketDataError>;
}
