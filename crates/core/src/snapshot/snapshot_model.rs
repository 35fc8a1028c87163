//! Market snapshot domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tierfolio_market_data::{Instrument, InstrumentKind};
use uuid::Uuid;

use crate::risk::RiskTier;

/// Instruments of one tier, split by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierBucket {
    #[serde(rename = "Stocks", default)]
    pub stocks: Vec<Instrument>,
    #[serde(rename = "Bonds", default)]
    pub bonds: Vec<Instrument>,
}

impl TierBucket {
    pub fn of_kind(&self, kind: InstrumentKind) -> &[Instrument] {
        match kind {
            InstrumentKind::Stock => &self.stocks,
            InstrumentKind::Bond => &self.bonds,
        }
    }

    pub(crate) fn of_kind_mut(&mut self, kind: InstrumentKind) -> &mut Vec<Instrument> {
        match kind {
            InstrumentKind::Stock => &mut self.stocks,
            InstrumentKind::Bond => &mut self.bonds,
        }
    }

    pub fn len(&self) -> usize {
        self.stocks.len() + self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The classified universe, keyed by tier then kind:
/// `{"Low": {"Stocks": [...], "Bonds": [...]}, "Medium": {...}, "High": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    #[serde(rename = "Low", default)]
    pub low: TierBucket,
    #[serde(rename = "Medium", default)]
    pub medium: TierBucket,
    #[serde(rename = "High", default)]
    pub high: TierBucket,
}

impl MarketSnapshot {
    pub fn tier(&self, tier: RiskTier) -> &TierBucket {
        match tier {
            RiskTier::Low => &self.low,
            RiskTier::Medium => &self.medium,
            RiskTier::High => &self.high,
        }
    }

    pub(crate) fn tier_mut(&mut self, tier: RiskTier) -> &mut TierBucket {
        match tier {
            RiskTier::Low => &mut self.low,
            RiskTier::Medium => &mut self.medium,
            RiskTier::High => &mut self.high,
        }
    }

    pub fn len(&self) -> usize {
        RiskTier::ALL.iter().map(|t| self.tier(*t).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A stored snapshot together with the run that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRecord {
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub snapshot: MarketSnapshot,
}

impl SnapshotRecord {
    pub fn new(snapshot: MarketSnapshot) -> Self {
        Self {
            run_id: Uuid::now_v7(),
            created_at: Utc::now(),
            snapshot,
        }
    }
}

/// Backfill policy for tiers the classifier left empty.
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// Fill empty Low/Bonds, Medium/Stocks and High/Stocks with unclassified instruments.
    pub backfill_empty_tiers: bool,
    /// Most instruments copied into one backfilled bucket.
    pub backfill_limit: usize,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            backfill_empty_tiers: true,
            backfill_limit: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tierfolio_market_data::{Bond, Stock};

    #[test]
    fn test_snapshot_wire_keys() {
        let mut snapshot = MarketSnapshot::default();
        snapshot.low.bonds.push(Instrument::Bond(Bond::new("SU26238RMFS4")));
        snapshot.high.stocks.push(Instrument::Stock(Stock::new("YDEX")));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["Low"]["Bonds"][0]["ticker"], "SU26238RMFS4");
        assert_eq!(json["High"]["Stocks"][0]["ticker"], "YDEX");
        assert!(json["Medium"]["Stocks"].as_array().unwrap().is_empty());

        let back: MarketSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
        assert_eq!(back.len(), 2);
    }

    #[test]
    fn test_missing_kind_defaults_to_empty() {
        let snapshot: MarketSnapshot =
            serde_json::from_str(r#"{"Low": {"Bonds": []}, "Medium": {}, "High": {"Stocks": []}}"#)
                .unwrap();
        assert!(snapshot.is_empty());
        assert!(snapshot.tier(RiskTier::Low).of_kind(InstrumentKind::Stock).is_empty());
    }
}
