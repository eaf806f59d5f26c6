use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::constants;
use crate::error::{EnrichError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub politeness: PolitenessConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub article_base_url: String,
    pub search_api_url: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            article_base_url: constants::DEFAULT_ARTICLE_BASE_URL.to_string(),
            search_api_url: constants::DEFAULT_SEARCH_API_URL.to_string(),
            user_agent: constants::DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: constants::DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolitenessConfig {
    pub enabled: bool,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for PolitenessConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_delay_ms: constants::DEFAULT_MIN_DELAY_MS,
            max_delay_ms: constants::DEFAULT_MAX_DELAY_MS,
        }
    }
}

impl PolitenessConfig {
    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: String,
    pub log_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: constants::DEFAULT_OUTPUT_DIR.to_string(),
            log_dir: "logs".to_string(),
        }
    }
}

impl Config {
    /// Load `path` (or `config.toml` when present), then apply `ENRICH_*`
    /// environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Path::new(constants::CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    debug!("No {} found, using defaults", constants::CONFIG_PATH);
                    Config::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EnrichError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("ENRICH_ARTICLE_BASE_URL") {
            self.source.article_base_url = v;
        }
        if let Some(v) = lookup("ENRICH_SEARCH_API_URL") {
            self.source.search_api_url = v;
        }
        if let Some(v) = lookup("ENRICH_USER_AGENT") {
            self.source.user_agent = v;
        }
        if let Some(v) = lookup("ENRICH_TIMEOUT_SECONDS") {
            self.source.timeout_seconds = parse_env("ENRICH_TIMEOUT_SECONDS", &v)?;
        }
        if let Some(v) = lookup("ENRICH_POLITENESS_ENABLED") {
            self.politeness.enabled = parse_env("ENRICH_POLITENESS_ENABLED", &v)?;
        }
        if let Some(v) = lookup("ENRICH_MIN_DELAY_MS") {
            self.politeness.min_delay_ms = parse_env("ENRICH_MIN_DELAY_MS", &v)?;
        }
        if let Some(v) = lookup("ENRICH_MAX_DELAY_MS") {
            self.politeness.max_delay_ms = parse_env("ENRICH_MAX_DELAY_MS", &v)?;
        }
        if let Some(v) = lookup("ENRICH_OUTPUT_DIR") {
            self.output.dir = v;
        }
        if let Some(v) = lookup("ENRICH_LOG_DIR") {
            self.output.log_dir = v;
        }
        Ok(())
    }

    /// Fatal setup problems are reported here, before any entity is processed.
    pub fn validate(&self) -> Result<()> {
        if self.source.user_agent.trim().is_empty() {
            return Err(EnrichError::Config("user_agent must not be empty".into()));
        }
        if self.source.timeout_seconds == 0 {
            return Err(EnrichError::Config(
                "timeout_seconds must be greater than zero".into(),
            ));
        }
        for (key, url) in [
            ("article_base_url", &self.source.article_base_url),
            ("search_api_url", &self.source.search_api_url),
        ] {
            reqwest::Url::parse(url)
                .map_err(|e| EnrichError::Config(format!("{} '{}' is invalid: {}", key, url, e)))?;
        }
        if self.politeness.min_delay_ms > self.politeness.max_delay_ms {
            return Err(EnrichError::Config(format!(
                "min_delay_ms ({}) exceeds max_delay_ms ({})",
                self.politeness.min_delay_ms, self.politeness.max_delay_ms
            )));
        }
        if self.output.dir.trim().is_empty() {
            return Err(EnrichError::Config("output dir must not be empty".into()));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| EnrichError::Config(format!("{} has invalid value '{}'", key, value)))
}
