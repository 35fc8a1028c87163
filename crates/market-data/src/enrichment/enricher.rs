//! Per-ticker enrichment with a fixed fallback chain.
//!
//! Stages run in order and each one only fills fields that are still empty:
//!
//! 1. primary source (security table, market data, price history)
//! 2. payment history (dividends for stocks, coupon calendar for bonds)
//! 3. fallback source, only when a mandatory field is still missing
//! 4. yield solver, for bonds whose yield is still unknown
//!
//! A failing stage is logged and skipped. Enrichment itself never fails.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use log::{debug, warn};
use tokio::sync::Semaphore;

use crate::analytics::YieldSolver;
use crate::models::{Bond, BondFields, Instrument, InstrumentKind, Stock, StockFields};
use crate::provider::{InstrumentSource, PaymentHistorySource};

/// Default number of tickers enriched concurrently.
pub const DEFAULT_MAX_CONCURRENCY: usize = 50;

#[derive(Debug, Clone)]
pub struct EnricherConfig {
    pub max_concurrency: usize,
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

pub struct InstrumentEnricher {
    primary: Arc<dyn InstrumentSource>,
    payments: Arc<dyn PaymentHistorySource>,
    fallback: Arc<dyn InstrumentSource>,
    solver: YieldSolver,
    config: EnricherConfig,
}

impl InstrumentEnricher {
    pub fn new(
        primary: Arc<dyn InstrumentSource>,
        payments: Arc<dyn PaymentHistorySource>,
        fallback: Arc<dyn InstrumentSource>,
        config: EnricherConfig,
    ) -> Self {
        Self {
            primary,
            payments,
            fallback,
            solver: YieldSolver::new(),
            config,
        }
    }

    /// Best-effort record for one ticker, dated today.
    pub async fn enrich(&self, ticker: &str, kind: InstrumentKind) -> Instrument {
        self.enrich_as_of(ticker, kind, Utc::now().date_naive()).await
    }

    /// Best-effort record for one ticker, with maturities measured from `as_of`.
    pub async fn enrich_as_of(&self, ticker: &str, kind: InstrumentKind, as_of: NaiveDate) -> Instrument {
        match kind {
            InstrumentKind::Stock => Instrument::Stock(self.enrich_stock(ticker).await),
            InstrumentKind::Bond => Instrument::Bond(self.enrich_bond(ticker, as_of).await),
        }
    }

    /// Enriches `tickers` with at most `max_concurrency` in flight.
    ///
    /// Results are keyed by ticker; duplicate tickers collapse to one entry.
    pub async fn enrich_batch(
        &self,
        tickers: &[String],
        kind: InstrumentKind,
    ) -> HashMap<String, Instrument> {
        let as_of = Utc::now().date_naive();
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));

        let tasks = tickers.iter().map(|ticker| {
            let semaphore = Arc::clone(&semaphore);
            async move {
                // The semaphore is never closed, so acquire cannot fail here.
                let _permit = semaphore.acquire().await.ok();
                let instrument = self.enrich_as_of(ticker, kind, as_of).await;
                (ticker.clone(), instrument)
            }
        });

        let results: HashMap<String, Instrument> = join_all(tasks).await.into_iter().collect();
        debug!("Enriched {} {} tickers", results.len(), kind);
        results
    }

    async fn enrich_stock(&self, ticker: &str) -> Stock {
        let mut fields = StockFields::default();

        match self.primary.stock_fields(ticker).await {
            Ok(primary) => fields.fill_from(primary),
            Err(e) => warn!("{}: stock data for {} unavailable: {}", self.primary.id(), ticker, e),
        }

        match self.payments.dividends(ticker).await {
            Ok(summary) => fields.fill_from(summary.into()),
            Err(e) => warn!("{}: dividends for {} unavailable: {}", self.payments.id(), ticker, e),
        }

        if !fields.has_mandatory() {
            debug!("{}: querying {} for missing stock fields", ticker, self.fallback.id());
            match self.fallback.stock_fields(ticker).await {
                Ok(fallback) => fields.fill_from(fallback),
                Err(e) => warn!("{}: stock page for {} unavailable: {}", self.fallback.id(), ticker, e),
            }
        }

        fields.into_stock(ticker)
    }

    async fn enrich_bond(&self, ticker: &str, as_of: NaiveDate) -> Bond {
        let mut fields = BondFields::default();

        match self.primary.bond_fields(ticker).await {
            Ok(primary) => fields.fill_from(primary),
            Err(e) => warn!("{}: bond data for {} unavailable: {}", self.primary.id(), ticker, e),
        }

        if fields.coupon_size.is_none() || fields.coupon_frequency_per_year.is_none() {
            match self.payments.coupons(ticker).await {
                Ok(schedule) => fields.fill_from(schedule.to_fields(as_of)),
                Err(e) => warn!("{}: coupons for {} unavailable: {}", self.payments.id(), ticker, e),
            }
        }

        if !fields.has_mandatory() || fields.yield_to_maturity_pct.is_none() {
            debug!("{}: querying {} for missing bond fields", ticker, self.fallback.id());
            match self.fallback.bond_fields(ticker).await {
                Ok(fallback) => fields.fill_from(fallback),
                Err(e) => warn!("{}: bond page for {} unavailable: {}", self.fallback.id(), ticker, e),
            }
        }

        if fields.yield_to_maturity_pct.is_none() {
            fields.yield_to_maturity_pct = self.solver.solve_fields(&fields, as_of);
            if let Some(ytm) = fields.yield_to_maturity_pct {
                debug!("{}: solved yield to maturity {}%", ticker, ytm);
            }
        }

        fields.into_bond(ticker)
    }
}
