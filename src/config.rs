use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::stats::{DEFAULT_FREE_THROW_WEIGHT, DEFAULT_PYTHAGOREAN_EXPONENT, StatParams};

pub const DEFAULT_STATS_BASE_URL: &str = "https://stats.nba.com/stats";
pub const DEFAULT_ODDS_BASE_URL: &str = "https://api.the-odds-api.com/v4";
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct WorkbenchConfig {
    pub data_dir: PathBuf,
    pub stats_base_url: String,
    pub odds_base_url: String,
    pub odds_api_key: Option<String>,
    pub fetch_retries: u32,
    pub retry_delay: Duration,
    pub http_timeout: Duration,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
    pub fetch_parallelism: usize,
    /// Also persist the untouched provider payload under the raw stage.
    pub keep_raw: bool,
    pub stat_params: StatParams,
}

impl WorkbenchConfig {
    pub fn from_env() -> Self {
        let data_dir = env::var("NBA_DATA_DIR")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let stats_base_url = env_url("NBA_STATS_BASE_URL", DEFAULT_STATS_BASE_URL);
        let odds_base_url = env_url("ODDS_API_BASE_URL", DEFAULT_ODDS_BASE_URL);
        let odds_api_key = env::var("ODDS_API_KEY")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let mut stat_params = StatParams::default();
        stat_params.free_throw_weight =
            env_parse("STATS_FREE_THROW_WEIGHT", DEFAULT_FREE_THROW_WEIGHT).clamp(0.0, 1.0);
        stat_params.pythagorean_exponent =
            env_parse("STATS_PYTHAG_EXPONENT", DEFAULT_PYTHAGOREAN_EXPONENT).clamp(1.0, 30.0);

        Self {
            data_dir,
            stats_base_url,
            odds_base_url,
            odds_api_key,
            fetch_retries: env_parse("FETCH_RETRIES", 3u32).clamp(1, 10),
            retry_delay: Duration::from_secs(env_parse("FETCH_RETRY_DELAY_SECS", 30u64).clamp(0, 600)),
            http_timeout: Duration::from_secs(env_parse("HTTP_TIMEOUT_SECS", 60u64).clamp(5, 300)),
            cache_ttl: Duration::from_secs(env_parse("CACHE_TTL_SECS", 300u64).clamp(0, 86_400)),
            cache_capacity: env_parse("CACHE_CAPACITY", 128usize).clamp(1, 4096),
            fetch_parallelism: fetch_parallelism(),
            keep_raw: env_bool("KEEP_RAW", true),
            stat_params,
        }
    }
}

pub fn fetch_parallelism() -> usize {
    env_parse("FETCH_PARALLELISM", 6usize).clamp(2, 32)
}

/// Loads `.env.local` then `.env`; neither is required.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn env_url(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| {
            let t = v.trim().to_ascii_lowercase();
            !(t.is_empty() || t == "0" || t == "false" || t == "off" || t == "no")
        })
        .unwrap_or(default)
}
