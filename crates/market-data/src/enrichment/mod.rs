//! Instrument enrichment: merging sources into normalized records.

mod enricher;

#[cfg(test)]
mod enricher_tests;

pub use enricher::{EnricherConfig, InstrumentEnricher, DEFAULT_MAX_CONCURRENCY};
