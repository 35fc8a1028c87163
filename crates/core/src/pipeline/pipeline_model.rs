use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::ml::TrainingConfig;
use crate::portfolio::SelectorConfig;
use crate::profile::UserRiskProfile;
use crate::snapshot::SnapshotConfig;
use crate::universe::UniverseConfig;

/// Default seed for sampling and weight initialisation.
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub seed: u64,
    pub universe: UniverseConfig,
    pub snapshot: SnapshotConfig,
    pub training: TrainingConfig,
    pub selector: SelectorConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            universe: UniverseConfig::default(),
            snapshot: SnapshotConfig::default(),
            training: TrainingConfig::default(),
            selector: SelectorConfig::default(),
        }
    }
}

/// Per-run state threaded through the stages of one pipeline invocation.
///
/// Every run starts from the same seed, so identical upstream data gives an
/// identical sample and identical initial weights.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub seed: u64,
    pub rng: StdRng,
}

impl PipelineContext {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

/// Input of a portfolio generation.
#[derive(Debug, Clone, PartialEq)]
pub enum PortfolioRequest {
    /// Answers supplied directly; nothing is persisted.
    Profile(UserRiskProfile),
    /// Answers are looked up for this owner and the result is saved as their draft.
    Owner(String),
}

impl From<UserRiskProfile> for PortfolioRequest {
    fn from(profile: UserRiskProfile) -> Self {
        PortfolioRequest::Profile(profile)
    }
}
