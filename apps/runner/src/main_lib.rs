use std::sync::Arc;

use tierfolio_core::pipeline::{PipelineConfig, PipelineService, PipelineServiceTrait};
use tierfolio_core::snapshot::SnapshotConfig;
use tierfolio_core::universe::{UniverseBuilder, UniverseConfig};
use tierfolio_market_data::{
    EnricherConfig, InstrumentEnricher, MoexConfig, MoexProvider, SmartLabConfig,
    SmartLabProvider,
};
use tierfolio_storage_sqlite::{
    answers::AnswersRepository,
    db::{self, write_actor},
    drafts::DraftRepository,
    snapshots::SnapshotRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub struct AppState {
    pub pipeline: Arc<dyn PipelineServiceTrait>,
    pub answers: Arc<AnswersRepository>,
    pub db_path: String,
}

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn pipeline_config(config: &Config) -> PipelineConfig {
    PipelineConfig {
        seed: config.seed,
        universe: UniverseConfig {
            sample_size: config.sample_size,
        },
        snapshot: SnapshotConfig {
            backfill_empty_tiers: config.backfill_empty_tiers,
            ..SnapshotConfig::default()
        },
        ..PipelineConfig::default()
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let snapshot_repository = Arc::new(SnapshotRepository::new(pool.clone(), writer.clone()));
    let draft_repository = Arc::new(DraftRepository::new(pool.clone(), writer.clone()));
    let answers_repository = Arc::new(AnswersRepository::new(pool.clone(), writer.clone()));

    let moex = Arc::new(MoexProvider::new(MoexConfig {
        timeout: config.request_timeout,
        ..MoexConfig::default()
    }));
    let smart_lab = Arc::new(SmartLabProvider::new(SmartLabConfig {
        timeout: config.request_timeout,
        ..SmartLabConfig::default()
    }));
    let enricher = Arc::new(InstrumentEnricher::new(
        moex.clone(),
        moex.clone(),
        smart_lab,
        EnricherConfig {
            max_concurrency: config.max_concurrency,
        },
    ));

    let pipeline_config = pipeline_config(config);
    let universe = UniverseBuilder::new(moex, enricher, pipeline_config.universe.clone());
    let pipeline: Arc<dyn PipelineServiceTrait> = Arc::new(PipelineService::new(
        universe,
        snapshot_repository,
        draft_repository,
        answers_repository.clone(),
        pipeline_config,
    ));

    Ok(Arc::new(AppState {
        pipeline,
        answers: answers_repository,
        db_path,
    }))
}
