//! Moscow Exchange ISS provider implementation.
//!
//! The primary structured source. No authentication is required.
//!
//! # API Endpoints
//!
//! - Listing: `{base}/engines/stock/markets/{market}/boards/{board}/securities.json`
//! - Security + market data: `{base}/engines/stock/markets/{market}/securities/{ticker}.json`
//! - Price history: `{base}/history/engines/stock/markets/shares/securities/{ticker}.json?from={date}`
//! - Dividends: `{base}/securities/{ticker}/dividends.json`
//! - Coupon calendar: `{base}/statistics/engines/stock/markets/bonds/bondization/{ticker}.json`
//!
//! # Response Format
//!
//! Each response holds named `{columns, data}` tables (`securities`,
//! `marketdata`, `history`, `dividends`, `coupons`).

mod models;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Months, Utc};
use log::{debug, warn};
use reqwest::Client;

use crate::errors::MarketDataError;
use crate::models::{BondFields, CouponSchedule, DividendSummary, InstrumentKind, StockFields};
use crate::provider::{http, InstrumentSource, ListingSource, PaymentHistorySource};

pub(crate) const PROVIDER_ID: &str = "MOEX_ISS";

/// Connection settings for the ISS API.
#[derive(Debug, Clone)]
pub struct MoexConfig {
    pub base_url: String,
    /// Board whose rows are preferred for shares.
    pub stock_board: String,
    /// Board whose rows are preferred for bonds.
    pub bond_board: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for MoexConfig {
    fn default() -> Self {
        Self {
            base_url: "https://iss.moex.com/iss".to_string(),
            stock_board: "TQBR".to_string(),
            bond_board: "TQOB".to_string(),
            timeout: Duration::from_secs(10),
            user_agent: "Mozilla/5.0".to_string(),
        }
    }
}

/// ISS client serving listings, instrument attributes and payment history.
pub struct MoexProvider {
    client: Client,
    config: MoexConfig,
}

impl MoexProvider {
    pub fn new(config: MoexConfig) -> Self {
        let client = http::build_client(config.timeout, &config.user_agent);

        Self { client, config }
    }

    fn board(&self, kind: InstrumentKind) -> &str {
        match kind {
            InstrumentKind::Stock => &self.config.stock_board,
            InstrumentKind::Bond => &self.config.bond_board,
        }
    }

    async fn fetch(&self, url: &str) -> Result<String, MarketDataError> {
        http::fetch_text(&self.client, PROVIDER_ID, url).await
    }

    async fn fetch_security(&self, ticker: &str, kind: InstrumentKind) -> Result<String, MarketDataError> {
        let url = format!(
            "{}/engines/stock/markets/{}/securities/{}.json",
            self.config.base_url,
            kind.market(),
            ticker
        );
        self.fetch(&url).await
    }

    /// Close price roughly one year ago.
    async fn year_ago_close(&self, ticker: &str) -> Result<Option<rust_decimal::Decimal>, MarketDataError> {
        let today = Utc::now().date_naive();
        let from = today.checked_sub_months(Months::new(12)).unwrap_or(today);
        let url = format!(
            "{}/history/engines/stock/markets/shares/securities/{}.json?from={}",
            self.config.base_url,
            ticker,
            from.format("%Y-%m-%d")
        );
        let body = self.fetch(&url).await?;
        models::parse_history_close(&body, &self.config.stock_board)
    }
}

#[async_trait]
impl InstrumentSource for MoexProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn stock_fields(&self, ticker: &str) -> Result<StockFields, MarketDataError> {
        let body = self.fetch_security(ticker, InstrumentKind::Stock).await?;
        let mut fields =
            models::parse_stock_security(&body, ticker, self.board(InstrumentKind::Stock))?;

        let Some(price) = fields.price else {
            return Ok(fields);
        };

        // History is best effort; the security data above is still usable without it.
        match self.year_ago_close(ticker).await {
            Ok(Some(close)) => {
                let growth = models::price_growth_pct(price, close);
                fields.cagr_pct = growth;
                fields.annual_return_pct = fields.annual_return_pct.or(growth);
            }
            Ok(None) => debug!("{}: no price history for {}", PROVIDER_ID, ticker),
            Err(e) => warn!("{}: history request failed for {}: {}", PROVIDER_ID, ticker, e),
        }

        Ok(fields)
    }

    async fn bond_fields(&self, ticker: &str) -> Result<BondFields, MarketDataError> {
        let body = self.fetch_security(ticker, InstrumentKind::Bond).await?;
        models::parse_bond_security(&body, ticker, self.board(InstrumentKind::Bond))
    }
}

#[async_trait]
impl PaymentHistorySource for MoexProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn dividends(&self, ticker: &str) -> Result<DividendSummary, MarketDataError> {
        let url = format!("{}/securities/{}/dividends.json", self.config.base_url, ticker);
        let body = self.fetch(&url).await?;
        models::parse_dividends(&body)
    }

    async fn coupons(&self, ticker: &str) -> Result<CouponSchedule, MarketDataError> {
        let url = format!(
            "{}/statistics/engines/stock/markets/bonds/bondization/{}.json?iss.only=coupons&limit=unlimited",
            self.config.base_url, ticker
        );
        let body = self.fetch(&url).await?;
        models::parse_coupons(&body)
    }
}

#[async_trait]
impl ListingSource for MoexProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn list_tickers(&self, kind: InstrumentKind) -> Result<Vec<String>, MarketDataError> {
        let url = format!(
            "{}/engines/stock/markets/{}/boards/{}/securities.json?iss.only=securities&securities.columns=SECID",
            self.config.base_url,
            kind.market(),
            self.board(kind)
        );

        let listing_error = |e: MarketDataError| MarketDataError::ListingUnavailable {
            market: kind.market().to_string(),
            message: e.to_string(),
        };

        let body = self.fetch(&url).await.map_err(listing_error)?;
        let tickers = models::parse_listing(&body).map_err(listing_error)?;
        if tickers.is_empty() {
            return Err(MarketDataError::ListingUnavailable {
                market: kind.market().to_string(),
                message: "empty listing".to_string(),
            });
        }

        debug!("{}: {} {} listed", PROVIDER_ID, tickers.len(), kind.market());
        Ok(tickers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MoexConfig::default();
        assert_eq!(config.stock_board, "TQBR");
        assert_eq!(config.bond_board, "TQOB");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_board_per_kind() {
        let provider = MoexProvider::new(MoexConfig {
            bond_board: "TQCB".to_string(),
            ..MoexConfig::default()
        });
        assert_eq!(provider.board(InstrumentKind::Stock), "TQBR");
        assert_eq!(provider.board(InstrumentKind::Bond), "TQCB");
        assert_eq!(InstrumentSource::id(&provider), "MOEX_ISS");
    }
}
