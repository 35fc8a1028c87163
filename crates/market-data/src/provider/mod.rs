//! Market data source abstractions and implementations.
//!
//! This module contains:
//! - The source traits the enricher and universe builder depend on
//! - `moex` - the Moscow Exchange ISS API (listings, attributes, payment history)
//! - `smart_lab` - the Smart-Lab HTML pages used as a bond fallback

mod http;
mod traits;

pub mod moex;
pub mod smart_lab;

pub use traits::{InstrumentSource, ListingSource, PaymentHistorySource};
