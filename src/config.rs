use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::enrichment::PollSettings;
use crate::record::tags::{TagCaps, CAREER_TAG_CAP, INTEREST_TAG_CAP};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SparkConfig {
    pub server: ServerConfig,
    pub generation: GenerationConfig,
    pub scraper: ScraperConfig,
    pub enrichment: EnrichmentConfig,
    pub tags: TagConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GenerationConfig {
    pub provider: String,
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScraperConfig {
    pub base_url: String,
    pub actor_id: String,
    pub api_token: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EnrichmentConfig {
    pub poll_interval_secs: u64,
    pub deadline_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TagConfig {
    pub career_cap: Option<usize>,
    pub interest_cap: Option<usize>,
    pub personality_cap: Option<usize>,
    pub goal_cap: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
            log_level: "info".into(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: "openai".into(),
            base_url: "https://api.openai.com/v1".into(),
            model: "gpt-4o-mini".into(),
            api_key: String::new(),
            temperature: 0.7,
            timeout_secs: 120,
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.apify.com/v2".into(),
            actor_id: "dev_fusion~linkedin-profile-scraper".into(),
            api_token: String::new(),
            request_timeout_secs: 30,
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 3,
            deadline_secs: 120,
        }
    }
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            career_cap: Some(CAREER_TAG_CAP),
            interest_cap: Some(INTEREST_TAG_CAP),
            personality_cap: None,
            goal_cap: None,
        }
    }
}

impl EnrichmentConfig {
    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_secs(self.poll_interval_secs),
            deadline: Duration::from_secs(self.deadline_secs),
        }
    }
}

impl TagConfig {
    /// Effective caps. A cap of `0` lifts the limit for that category.
    pub fn caps(&self) -> TagCaps {
        let cap = |value: Option<usize>| value.filter(|&n| n > 0);
        TagCaps {
            personality: cap(self.personality_cap),
            goal: cap(self.goal_cap),
            interest: cap(self.interest_cap),
            career: cap(self.career_cap),
        }
    }
}

/// Returns `~/.relationship-spark/`
pub fn default_spark_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".relationship-spark")
}

/// Returns the default config file path: `~/.relationship-spark/config.toml`
pub fn default_config_path() -> PathBuf {
    default_spark_dir().join("config.toml")
}

impl SparkConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            SparkConfig::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the services cannot run with.
    fn validate(&self) -> Result<()> {
        if self.enrichment.poll_interval_secs == 0 {
            anyhow::bail!("enrichment.poll_interval_secs must be at least 1");
        }
        if self.enrichment.deadline_secs == 0 {
            anyhow::bail!("enrichment.deadline_secs must be at least 1");
        }
        Ok(())
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SPARK_HOST") {
            self.server.host = val;
        }
        if let Some(port) = std::env::var("SPARK_PORT").ok().and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }
        if let Ok(val) = std::env::var("SPARK_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("SPARK_LLM_API_KEY") {
            self.generation.api_key = val;
        }
        if let Ok(val) = std::env::var("SPARK_LLM_MODEL") {
            self.generation.model = val;
        }
        if let Ok(val) = std::env::var("SPARK_LLM_BASE_URL") {
            self.generation.base_url = val;
        }
        if let Ok(val) = std::env::var("APIFY_API_TOKEN") {
            self.scraper.api_token = val;
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SparkConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.generation.provider, "openai");
        assert_eq!(config.enrichment.poll_interval_secs, 3);
        assert_eq!(config.enrichment.deadline_secs, 120);
        assert_eq!(config.tags.caps(), TagCaps::default());
        assert!(default_config_path().ends_with("config.toml"));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
port = 9090

[generation]
model = "gemini-2.5-pro"
base_url = "https://generativelanguage.googleapis.com/v1beta/openai"

[enrichment]
deadline_secs = 60

[tags]
career_cap = 5
"#;
        let config: SparkConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.generation.model, "gemini-2.5-pro");
        assert_eq!(config.enrichment.deadline_secs, 60);
        assert_eq!(config.tags.career_cap, Some(5));
        // defaults still apply for unset fields
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.enrichment.poll_interval_secs, 3);
        assert_eq!(config.tags.interest_cap, Some(10));

        let poll = config.enrichment.poll_settings();
        assert_eq!(poll.deadline, Duration::from_secs(60));
        assert_eq!(poll.interval, Duration::from_secs(3));
    }

    #[test]
    fn load_from_file_and_missing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[server]\nhost = \"0.0.0.0\"\n").unwrap();

        let config = SparkConfig::load_from(&path).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");

        let missing = SparkConfig::load_from(tmp.path().join("nope.toml")).unwrap();
        assert_eq!(missing.generation.provider, "openai");
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();
        let err = SparkConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse config TOML"));
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[enrichment]\npoll_interval_secs = 0\ndeadline_secs = 2\n").unwrap();

        let err = SparkConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("poll_interval_secs"));
    }

    #[test]
    fn zero_tag_cap_means_uncapped() {
        let config: SparkConfig = toml::from_str("[tags]\ncareer_cap = 0\ngoal_cap = 3\n").unwrap();
        let caps = config.tags.caps();
        assert_eq!(caps.career, None);
        assert_eq!(caps.goal, Some(3));
        assert_eq!(caps.interest, Some(10));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = SparkConfig::default();
        std::env::set_var("SPARK_PORT", "7000");
        std::env::set_var("SPARK_LLM_MODEL", "llama3");
        std::env::set_var("APIFY_API_TOKEN", "apify-test");

        config.apply_env_overrides();

        assert_eq!(config.server.port, 7000);
        assert_eq!(config.generation.model, "llama3");
        assert_eq!(config.scraper.api_token, "apify-test");

        // Clean up
        std::env::remove_var("SPARK_PORT");
        std::env::remove_var("SPARK_LLM_MODEL");
        std::env::remove_var("APIFY_API_TOKEN");
    }
}
