//! Runner configuration read from the environment.

use std::str::FromStr;
use std::time::Duration;

use tierfolio_core::pipeline::DEFAULT_SEED;
use tierfolio_core::universe::DEFAULT_SAMPLE_SIZE;
use tierfolio_market_data::enrichment::DEFAULT_MAX_CONCURRENCY;

const DEFAULT_DB_PATH: &str = "./db/tierfolio.db";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_INITIAL_DELAY_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub seed: u64,
    pub sample_size: usize,
    pub max_concurrency: usize,
    pub request_timeout: Duration,
    pub refresh_interval: Duration,
    pub initial_delay: Duration,
    pub backfill_empty_tiers: bool,
    pub log_format: String,
}

/// Parses `raw`, falling back to `default` when it is missing or malformed.
fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    parse_or(std::env::var(key).ok(), default)
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            db_path: std::env::var("TIERFOLIO_DB_PATH")
                .unwrap_or_else(|_| DEFAULT_DB_PATH.to_string()),
            seed: env_or("TIERFOLIO_SEED", DEFAULT_SEED),
            sample_size: env_or("TIERFOLIO_SAMPLE_SIZE", DEFAULT_SAMPLE_SIZE),
            max_concurrency: env_or("TIERFOLIO_MAX_CONCURRENCY", DEFAULT_MAX_CONCURRENCY),
            request_timeout: Duration::from_secs(env_or(
                "TIERFOLIO_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )),
            refresh_interval: Duration::from_secs(env_or(
                "TIERFOLIO_REFRESH_INTERVAL_SECS",
                DEFAULT_REFRESH_INTERVAL_SECS,
            )),
            initial_delay: Duration::from_secs(env_or(
                "TIERFOLIO_INITIAL_DELAY_SECS",
                DEFAULT_INITIAL_DELAY_SECS,
            )),
            backfill_empty_tiers: env_or("TIERFOLIO_BACKFILL_EMPTY_TIERS", true),
            log_format: std::env::var("TIERFOLIO_LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
        }
    }
}
