//! Tierfolio Market Data Crate
//!
//! This crate turns raw exchange tickers into normalized instrument records
//! for the Tierfolio pipeline.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Two instrument families: stocks and bonds
//! - A structured primary source (Moscow Exchange ISS) and an HTML fallback (Smart-Lab)
//! - Field-by-field merging where earlier sources always win
//! - Yield-to-maturity estimation when no source reports it
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |  ListingSource   |  (all tickers of a kind)
//! +------------------+
//!          |
//!          v
//! +--------------------+     +----------------------+
//! | InstrumentEnricher | --> | InstrumentSource     |  (MOEX ISS, then Smart-Lab)
//! +--------------------+     | PaymentHistorySource |  (dividends, coupons)
//!          |                 +----------------------+
//!          v
//! +------------------+
//! |   YieldSolver    |  (bonds with unknown yield)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |   Instrument     |  (Stock | Bond)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Instrument`] - Tagged Stock/Bond record with nullable fields
//! - [`InstrumentEnricher`] - Runs the fallback chain for one ticker or a bounded batch
//! - [`YieldSolver`] - Bisection solver for bond yield to maturity
//! - [`MoexProvider`] / [`SmartLabProvider`] - Concrete sources

pub mod analytics;
pub mod enrichment;
pub mod errors;
pub mod models;
pub mod provider;

pub use analytics::{BondTerms, YieldSolution, YieldSolver};
pub use enrichment::{EnricherConfig, InstrumentEnricher};
pub use errors::MarketDataError;
pub use models::{
    Bond, BondFields, CouponPayment, CouponSchedule, DividendSummary, Instrument, InstrumentKind,
    Stock, StockFields,
};
pub use provider::moex::{MoexConfig, MoexProvider};
pub use provider::smart_lab::{SmartLabConfig, SmartLabProvider};
pub use provider::{InstrumentSource, ListingSource, PaymentHistorySource};
