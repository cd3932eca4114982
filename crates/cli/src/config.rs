//! CLI configuration
//!
//! Layered as built-in defaults, then `config.toml` in the data directory,
//! then `REEL_`-prefixed environment variables (`REEL_API__BASE_URL`).

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_BASE_URL: &str = "http://4.237.58.241:3000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Transport timeout per request (0 = none)
    pub timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Bearer tokens expiring within this many seconds are refreshed first
    pub refresh_window_secs: u64,
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_secs: 30,
                user_agent: None,
            },
            session: SessionConfig {
                refresh_window_secs: 60,
            },
        }
    }
}

impl ReelConfig {
    /// Load configuration for the given data directory
    ///
    /// # Errors
    ///
    /// Returns an error if the file or environment values cannot be parsed,
    /// or the result fails validation.
    pub fn load(data_dir: &Path) -> Result<Self> {
        Self::load_with_env(data_dir, None)
    }

    /// Load with an explicit set of environment variables (`None` reads the
    /// process environment)
    fn load_with_env(data_dir: &Path, env: Option<config::Map<String, String>>) -> Result<Self> {
        let defaults = Self::default();

        let settings = config::Config::builder()
            .set_default("api.base_url", defaults.api.base_url)?
            .set_default("api.timeout_secs", defaults.api.timeout_secs)?
            .set_default(
                "session.refresh_window_secs",
                defaults.session.refresh_window_secs,
            )?
            .add_source(config::File::from(data_dir.join(CONFIG_FILE)).required(false))
            .add_source(
                config::Environment::with_prefix("REEL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        let config: Self = settings
            .try_deserialize()
            .context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api.base_url)
            .with_context(|| format!("api.base_url '{}' is not a URL", self.api.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("api.base_url must use http or https");
        }
        if self.session.refresh_window_secs == 0 {
            bail!("session.refresh_window_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.api.timeout_secs > 0).then(|| Duration::from_secs(self.api.timeout_secs))
    }

    pub const fn refresh_window(&self) -> Duration {
        Duration::from_secs(self.session.refresh_window_secs)
    }
}

/// Resolve the data directory: flag, then `REEL_STATE_DIR`, then the platform data dir
pub fn resolve_data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| {
        if let Ok(dir) = std::env::var("REEL_STATE_DIR") {
            PathBuf::from(dir)
        } else {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("reel")
        }
    })
}

/// Write the default configuration as TOML
///
/// # Errors
///
/// Returns an error if the file exists and `force` is not set, or it cannot
/// be written.
pub fn generate_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(&ReelConfig::default())?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReelConfig::load_with_env(dir.path(), Some(config::Map::new())).unwrap();
        assert_eq!(config.session.refresh_window_secs, 60);
        assert_eq!(config.refresh_window(), Duration::from_secs(60));
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[api]\nbase_url = \"https://movies.example.com\"\ntimeout_secs = 0\n",
        )
        .unwrap();

        let config = ReelConfig::load_with_env(dir.path(), Some(config::Map::new())).unwrap();
        assert_eq!(config.api.base_url, "https://movies.example.com");
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.session.refresh_window_secs, 60);
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[api]\nbase_url = \"https://file.example.com\"\n",
        )
        .unwrap();

        let env = config::Map::from([
            (
                "REEL_API__BASE_URL".to_string(),
                "https://env.example.com".to_string(),
            ),
            ("REEL_API__TIMEOUT_SECS".to_string(), "5".to_string()),
            (
                "REEL_SESSION__REFRESH_WINDOW_SECS".to_string(),
                "120".to_string(),
            ),
            ("REEL_STATE_DIR".to_string(), "/tmp/elsewhere".to_string()),
        ]);

        let config = ReelConfig::load_with_env(dir.path(), Some(env)).unwrap();
        assert_eq!(config.api.base_url, "https://env.example.com");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.refresh_window(), Duration::from_secs(120));
    }

    #[test]
    fn generated_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        generate_default_config(&path, false).unwrap();
        assert!(generate_default_config(&path, false).is_err());
        generate_default_config(&path, true).unwrap();

        let loaded = ReelConfig::load_with_env(dir.path(), Some(config::Map::new())).unwrap();
        assert_eq!(loaded, ReelConfig::default());
    }

    #[test]
    fn invalid_values_rejected() {
        let mut config = ReelConfig::default();
        config.api.base_url = "ftp://example.com".into();
        assert!(config.validate().is_err());

        let mut config = ReelConfig::default();
        config.session.refresh_window_secs = 0;
        assert!(config.validate().is_err());
    }
}
