use std::path::PathBuf;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

const ENV_PREFIX: &str = "UBER_VEHICLES";

pub const DEFAULT_BASE_URL: &str = "https://www.uber.com/global/pt-pt";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

/// Transport and output settings. Defaults, then `UBER_VEHICLES_*` env vars.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Total requests per fetch, first one included.
    pub max_attempts: u32,
    pub backoff_ms: u64,
    pub user_agent: String,
    pub accept_language: String,
    pub referer: String,
    pub output_dir: PathBuf,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("timeout_secs", 15_i64)?
            .set_default("max_attempts", 5_i64)?
            .set_default("backoff_ms", 1000_i64)?
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .set_default("accept_language", "en-US,en;q=0.9")?
            .set_default("referer", "https://www.google.com/")?
            .set_default("output_dir", ".")
    }

    /// `<base>/eligible-vehicles/?city=<city>`
    pub fn eligible_vehicles_url(&self, city: &str) -> String {
        format!(
            "{}/eligible-vehicles/?city={}",
            self.base_url.trim_end_matches('/'),
            city
        )
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
            max_attempts: 5,
            backoff_ms: 1000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            referer: "https://www.google.com/".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

// ── Tests ──
