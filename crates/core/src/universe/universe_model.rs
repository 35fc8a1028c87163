//! Universe domain models.

use serde::{Deserialize, Serialize};
use tierfolio_market_data::Instrument;

/// Default number of tickers sampled per kind.
pub const DEFAULT_SAMPLE_SIZE: usize = 50;

#[derive(Debug, Clone)]
pub struct UniverseConfig {
    /// Tickers sampled from each listing.
    pub sample_size: usize,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

/// Instruments considered in one pipeline run.
///
/// `stocks` and `bonds` hold complete records in sample order. Records that
/// are missing a pricing or return field are kept apart in `rejected`; they
/// are never used for training or placed in a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Universe {
    pub stocks: Vec<Instrument>,
    pub bonds: Vec<Instrument>,
    pub rejected: Vec<Instrument>,
}

impl Universe {
    /// Splits enriched records into complete and rejected ones, keeping order.
    pub fn from_enriched(
        stocks: impl IntoIterator<Item = Instrument>,
        bonds: impl IntoIterator<Item = Instrument>,
    ) -> Self {
        let mut universe = Universe::default();
        for instrument in stocks {
            if instrument.is_complete() {
                universe.stocks.push(instrument);
            } else {
                universe.rejected.push(instrument);
            }
        }
        for instrument in bonds {
            if instrument.is_complete() {
                universe.bonds.push(instrument);
            } else {
                universe.rejected.push(instrument);
            }
        }
        universe
    }

    /// Complete stocks followed by complete bonds.
    pub fn instruments(&self) -> Vec<Instrument> {
        self.stocks.iter().chain(self.bonds.iter()).cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty() && self.bonds.is_empty()
    }
}
