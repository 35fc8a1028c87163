use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tierfolio_market_data::{Instrument, InstrumentEnricher, InstrumentKind, ListingSource};

use super::universe_model::{Universe, UniverseConfig};
use crate::errors::Result;

/// Seeded sample of at most `size` tickers.
///
/// The same listing and rng state always give the same sample.
pub fn sample_tickers(tickers: &[String], size: usize, rng: &mut StdRng) -> Vec<String> {
    tickers
        .choose_multiple(rng, size.min(tickers.len()))
        .cloned()
        .collect()
}

/// Reorders a ticker-keyed batch result into `order`.
fn in_sample_order(order: &[String], mut enriched: HashMap<String, Instrument>) -> Vec<Instrument> {
    order
        .iter()
        .filter_map(|ticker| enriched.remove(ticker))
        .collect()
}

/// Builds the raw universe: listing, seeded sampling, bounded enrichment.
pub struct UniverseBuilder {
    listing: Arc<dyn ListingSource>,
    enricher: Arc<InstrumentEnricher>,
    config: UniverseConfig,
}

impl UniverseBuilder {
    pub fn new(
        listing: Arc<dyn ListingSource>,
        enricher: Arc<InstrumentEnricher>,
        config: UniverseConfig,
    ) -> Self {
        Self {
            listing,
            enricher,
            config,
        }
    }

    /// Fails only when a listing cannot be fetched.
    pub async fn build(&self, rng: &mut StdRng) -> Result<Universe> {
        let stock_listing = self.listing.list_tickers(InstrumentKind::Stock).await?;
        let bond_listing = self.listing.list_tickers(InstrumentKind::Bond).await?;
        info!(
            "{} listing: {} stocks, {} bonds",
            self.listing.id(),
            stock_listing.len(),
            bond_listing.len()
        );

        let stock_sample = sample_tickers(&stock_listing, self.config.sample_size, rng);
        let bond_sample = sample_tickers(&bond_listing, self.config.sample_size, rng);
        debug!("Sampled stocks: {:?}", stock_sample);
        debug!("Sampled bonds: {:?}", bond_sample);

        let stocks = self
            .enricher
            .enrich_batch(&stock_sample, InstrumentKind::Stock)
            .await;
        let bonds = self
            .enricher
            .enrich_batch(&bond_sample, InstrumentKind::Bond)
            .await;

        let universe = Universe::from_enriched(
            in_sample_order(&stock_sample, stocks),
            in_sample_order(&bond_sample, bonds),
        );
        info!(
            "Universe built: {} stocks, {} bonds, {} rejected",
            universe.stocks.len(),
            universe.bonds.len(),
            universe.rejected.len()
        );
        Ok(universe)
    }
}
