//! Market data models
//!
//! - `instrument` - Normalized instrument records (Stock, Bond, Instrument) and InstrumentKind
//! - `fields` - Partial per-source records and payment calendars merged by the enricher

mod fields;
mod instrument;

pub(crate) use fields::decimal_from_f64;
pub use fields::{BondFields, CouponPayment, CouponSchedule, DividendSummary, StockFields};
pub use instrument::{Bond, Instrument, InstrumentKind, Stock};
