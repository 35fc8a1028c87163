use log::{debug, info};
use tierfolio_market_data::{Instrument, InstrumentKind};

use super::snapshot_model::{MarketSnapshot, SnapshotConfig};
use crate::risk::{RiskClassifier, RiskTier};
use crate::universe::Universe;

/// Buckets that are backfilled from the unclassified sample when left empty.
pub const BACKFILL_TARGETS: [(RiskTier, InstrumentKind); 3] = [
    (RiskTier::Low, InstrumentKind::Bond),
    (RiskTier::Medium, InstrumentKind::Stock),
    (RiskTier::High, InstrumentKind::Stock),
];

/// Classifies the universe with a trained classifier and assembles the snapshot.
pub fn build_snapshot(
    universe: &Universe,
    classifier: &RiskClassifier,
    config: &SnapshotConfig,
) -> MarketSnapshot {
    let stock_tiers = classifier.classify_all(&universe.stocks);
    let bond_tiers = classifier.classify_all(&universe.bonds);
    assemble_snapshot(universe, &stock_tiers, &bond_tiers, config)
}

/// Places each instrument in its tier, keeping universe order, then applies
/// the backfill policy.
///
/// `stock_tiers` and `bond_tiers` are parallel to `universe.stocks` and
/// `universe.bonds`.
pub fn assemble_snapshot(
    universe: &Universe,
    stock_tiers: &[RiskTier],
    bond_tiers: &[RiskTier],
    config: &SnapshotConfig,
) -> MarketSnapshot {
    let mut snapshot = MarketSnapshot::default();

    for (instrument, tier) in universe.stocks.iter().zip(stock_tiers) {
        snapshot.tier_mut(*tier).stocks.push(instrument.clone());
    }
    for (instrument, tier) in universe.bonds.iter().zip(bond_tiers) {
        snapshot.tier_mut(*tier).bonds.push(instrument.clone());
    }

    for tier in RiskTier::ALL {
        let bucket = snapshot.tier(tier);
        debug!(
            "Classified {}: {} stocks, {} bonds",
            tier,
            bucket.stocks.len(),
            bucket.bonds.len()
        );
    }

    if config.backfill_empty_tiers {
        backfill_empty(&mut snapshot, universe, config.backfill_limit);
    }

    info!(
        "Snapshot built: Low {}, Medium {}, High {}",
        snapshot.low.len(),
        snapshot.medium.len(),
        snapshot.high.len()
    );
    snapshot
}

fn backfill_empty(snapshot: &mut MarketSnapshot, universe: &Universe, limit: usize) {
    for (tier, kind) in BACKFILL_TARGETS {
        let bucket = snapshot.tier_mut(tier).of_kind_mut(kind);
        if !bucket.is_empty() {
            continue;
        }
        let source: &[Instrument] = match kind {
            InstrumentKind::Stock => &universe.stocks,
            InstrumentKind::Bond => &universe.bonds,
        };
        bucket.extend(source.iter().take(limit).cloned());
        if !bucket.is_empty() {
            info!(
                "Backfilled empty {}/{} with {} unclassified instruments",
                tier,
                kind,
                bucket.len()
            );
        }
    }
}
