use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::pipeline_model::{PipelineConfig, PipelineContext, PortfolioRequest};
use super::pipeline_traits::PipelineServiceTrait;
use crate::errors::{Error, Result};
use crate::portfolio::{DraftStoreTrait, Portfolio, PortfolioSelector};
use crate::profile::{RiskCategory, UserAnswersSourceTrait, UserRiskProfile, UserRiskScorer};
use crate::risk::RiskClassifier;
use crate::snapshot::{build_snapshot, MarketSnapshot, SnapshotRecord, SnapshotStoreTrait};
use crate::universe::UniverseBuilder;

/// Runs market analysis and serves portfolio requests against the stored snapshot.
pub struct PipelineService {
    universe: UniverseBuilder,
    snapshots: Arc<dyn SnapshotStoreTrait>,
    drafts: Arc<dyn DraftStoreTrait>,
    answers: Arc<dyn UserAnswersSourceTrait>,
    selector: PortfolioSelector,
    config: PipelineConfig,
    run_lock: tokio::sync::Mutex<()>,
    scorer: RwLock<Option<Arc<UserRiskScorer>>>,
    selection_rng: Mutex<StdRng>,
}

impl PipelineService {
    pub fn new(
        universe: UniverseBuilder,
        snapshots: Arc<dyn SnapshotStoreTrait>,
        drafts: Arc<dyn DraftStoreTrait>,
        answers: Arc<dyn UserAnswersSourceTrait>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            universe,
            snapshots,
            drafts,
            answers,
            selector: PortfolioSelector::new(config.selector.clone()),
            selection_rng: Mutex::new(StdRng::seed_from_u64(config.seed)),
            config,
            run_lock: tokio::sync::Mutex::new(()),
            scorer: RwLock::new(None),
        }
    }

    /// The questionnaire scorer, trained on first use from a fresh
    /// `PipelineContext` and kept for the life of the service.
    fn scorer(&self) -> Result<Arc<UserRiskScorer>> {
        {
            let cached = self.scorer.read().unwrap_or_else(|e| {
                warn!("Scorer lock poisoned, recovering");
                e.into_inner()
            });
            if let Some(scorer) = cached.as_ref() {
                return Ok(Arc::clone(scorer));
            }
        }

        let mut slot = self.scorer.write().unwrap_or_else(|e| {
            warn!("Scorer lock poisoned, recovering");
            e.into_inner()
        });
        if let Some(scorer) = slot.as_ref() {
            return Ok(Arc::clone(scorer));
        }

        let mut ctx = PipelineContext::new(self.config.seed);
        let mut scorer = UserRiskScorer::new(&mut ctx.rng);
        scorer.train(&self.config.training, &mut ctx.rng)?;
        let scorer = Arc::new(scorer);
        *slot = Some(Arc::clone(&scorer));
        Ok(scorer)
    }

    fn resolve_profile(&self, request: &PortfolioRequest) -> Result<UserRiskProfile> {
        match request {
            PortfolioRequest::Profile(profile) => Ok(*profile),
            PortfolioRequest::Owner(owner_key) => self
                .answers
                .get(owner_key)?
                .ok_or_else(|| Error::AnswersNotFound(owner_key.clone())),
        }
    }

    fn select(&self, snapshot: &MarketSnapshot, category: RiskCategory) -> Portfolio {
        let mut rng = self.selection_rng.lock().unwrap_or_else(|e| {
            warn!("Selection rng lock poisoned, recovering");
            e.into_inner()
        });
        self.selector.select(snapshot, category, &mut *rng)
    }
}

#[async_trait]
impl PipelineServiceTrait for PipelineService {
    async fn run_market_analysis(&self) -> Result<MarketSnapshot> {
        let _guard = self.run_lock.try_lock().map_err(|_| {
            warn!("Market analysis requested while another run is in progress");
            Error::PipelineBusy
        })?;

        let mut ctx = PipelineContext::new(self.config.seed);
        info!("Market analysis started (seed {})", ctx.seed);

        let universe = self.universe.build(&mut ctx.rng).await?;

        let mut classifier = RiskClassifier::new(&mut ctx.rng);
        classifier.train(&universe.instruments(), &self.config.training)?;

        let snapshot = build_snapshot(&universe, &classifier, &self.config.snapshot);
        let record = SnapshotRecord::new(snapshot);
        self.snapshots.save(&record).await?;

        info!(
            "Market analysis finished: run {} stored {} instruments",
            record.run_id,
            record.snapshot.len()
        );
        Ok(record.snapshot)
    }

    async fn generate_portfolio(&self, request: PortfolioRequest) -> Result<Portfolio> {
        let profile = self.resolve_profile(&request)?;
        let level = self.scorer()?.level(&profile);
        debug!("Answers {:?} scored as level {}", profile.answers(), level);
        let category = RiskCategory::from_level(level)?;

        let record = self.snapshots.load()?.ok_or(Error::SnapshotUnavailable)?;
        let portfolio = self.select(&record.snapshot, category);
        info!(
            "Generated {} portfolio from run {}: {} bonds, {} stocks, expected return {}%",
            category,
            record.run_id,
            portfolio.bonds.len(),
            portfolio.stocks.len(),
            portfolio.expected_return_pct
        );

        if let PortfolioRequest::Owner(owner_key) = &request {
            self.drafts.save(owner_key, &portfolio).await?;
        }
        Ok(portfolio)
    }

    fn get_draft(&self, owner_key: &str) -> Result<Option<Portfolio>> {
        self.drafts.load(owner_key)
    }

    async fn delete_draft(&self, owner_key: &str) -> Result<usize> {
        let deleted = self.drafts.delete(owner_key).await?;
        debug!("Deleted {} draft(s) for {}", deleted, owner_key);
        Ok(deleted)
    }
}
