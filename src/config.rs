use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

/// Default favors one large page per query to keep round trips down.
pub const DEFAULT_PAGE_SIZE: i32 = 50_000;
const DEFAULT_RETRY_COUNT: u32 = 3;
const DEFAULT_QUERY_RETRY_DELAY_SECS: u64 = 15;
const DEFAULT_FRESHNESS_RETRY_DELAY_SECS: u64 = 5;
const DEFAULT_DAILY_TIME_ZONE: &str = "America/Los_Angeles";

/// Tuning knobs for the report query engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub page_size: i32,
    pub retry_count: u32,
    pub query_retry_delay: Duration,
    pub freshness_retry_delay: Duration,
    /// Zone id stamped onto daily timeline bounds (hourly bounds carry none).
    pub daily_time_zone: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            retry_count: DEFAULT_RETRY_COUNT,
            query_retry_delay: Duration::from_secs(DEFAULT_QUERY_RETRY_DELAY_SECS),
            freshness_retry_delay: Duration::from_secs(DEFAULT_FRESHNESS_RETRY_DELAY_SECS),
            daily_time_zone: DEFAULT_DAILY_TIME_ZONE.to_string(),
        }
    }
}

impl EngineConfig {
    /// Loads config from the environment, falling back to defaults per key.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(raw) = env::var("PLAY_REPORTING_PAGE_SIZE") {
            config.page_size = raw
                .parse()
                .with_context(|| format!("PLAY_REPORTING_PAGE_SIZE is not a number: {raw}"))?;
        }
        if let Ok(raw) = env::var("PLAY_REPORTING_RETRY_COUNT") {
            config.retry_count = raw
                .parse()
                .with_context(|| format!("PLAY_REPORTING_RETRY_COUNT is not a number: {raw}"))?;
        }
        if let Ok(raw) = env::var("PLAY_REPORTING_QUERY_RETRY_DELAY_SECS") {
            let secs: u64 = raw.parse().with_context(|| {
                format!("PLAY_REPORTING_QUERY_RETRY_DELAY_SECS is not a number: {raw}")
            })?;
            config.query_retry_delay = Duration::from_secs(secs);
        }
        if let Ok(raw) = env::var("PLAY_REPORTING_FRESHNESS_RETRY_DELAY_SECS") {
            let secs: u64 = raw.parse().with_context(|| {
                format!("PLAY_REPORTING_FRESHNESS_RETRY_DELAY_SECS is not a number: {raw}")
            })?;
            config.freshness_retry_delay = Duration::from_secs(secs);
        }
        if let Ok(zone) = env::var("PLAY_REPORTING_DAILY_TIME_ZONE") {
            config.daily_time_zone = zone;
        }

        debug!(?config, "Engine config loaded");
        Ok(config)
    }
}
