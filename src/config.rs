//! Configuration management for edgarsync using the prefer crate.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::fetch::resolve_user_agent;
use crate::repository::util::redact_url_password;
use crate::repository::DbContext;
use crate::services::PipelineContext;

pub const DEFAULT_BASE_URL: &str = "https://www.sec.gov";
const DEFAULT_DATABASE_FILENAME: &str = "edgar.db";
const CACHE_SUBDIR: &str = "cache";
const UNPACKED_SUBDIR: &str = "unpacked";

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory; defaults for the other paths live under it.
    pub data_dir: PathBuf,
    pub base_url: String,
    /// Mirror of the archive, one file per URL path.
    pub cache_dir: PathBuf,
    /// Where enclosure ZIPs are unpacked.
    pub unpacked_dir: PathBuf,
    /// SQLite path or URL, or `postgres://` with the `postgres` feature.
    /// Set via DATABASE_URL env var or config.
    pub database_url: String,
    /// Floor between requests in milliseconds. Zero disables throttling.
    pub rate_limit_ms: u64,
    pub retry_limit: u32,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub index_fsds: bool,
    pub index_mfd: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("edgarsync");
        Self::with_data_dir(data_dir)
    }
}

impl Settings {
    /// Create settings rooted at a custom data directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            cache_dir: data_dir.join(CACHE_SUBDIR),
            unpacked_dir: data_dir.join(UNPACKED_SUBDIR),
            database_url: data_dir
                .join(DEFAULT_DATABASE_FILENAME)
                .display()
                .to_string(),
            data_dir,
            base_url: DEFAULT_BASE_URL.to_string(),
            rate_limit_ms: 100,
            retry_limit: 5,
            request_timeout_secs: 30,
            user_agent: resolve_user_agent(None),
            index_fsds: true,
            index_mfd: true,
        }
    }

    /// DATABASE_URL wins over the config file.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                self.database_url = url;
            }
        }
    }

    /// Database URL safe for logs.
    pub fn display_database_url(&self) -> String {
        redact_url_password(&self.database_url)
    }

    pub fn pipeline_context(&self, db: DbContext) -> Result<PipelineContext, url::ParseError> {
        let base_url = Url::parse(&self.base_url)?;
        Ok(
            PipelineContext::new(db, &self.cache_dir, &self.unpacked_dir, base_url)
                .with_rate_limit(Duration::from_millis(self.rate_limit_ms))
                .with_retry_limit(self.retry_limit)
                .with_timeout(Duration::from_secs(self.request_timeout_secs))
                .with_user_agent(self.user_agent.clone()),
        )
    }
}

/// Which bulk products `index data` loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, prefer::FromValue)]
pub struct IndexModeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_statement_data_sets: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutual_fund_data: Option<bool>,
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, prefer::FromValue)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unpacked_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// sec.gov asks for "Company Name admin@example.com".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default)]
    #[prefer(default)]
    pub index_mode: IndexModeConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    #[prefer(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Falls back to defaults when no edgarsync config file exists.
    pub async fn load() -> Self {
        match prefer::load("edgarsync").await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => match Self::load_from_path(path).await {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!("Ignoring config {}: {}", path.display(), e);
                        Self::default()
                    }
                },
                None => Self::default(),
            },
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents)
                .map_err(|e| format!("Failed to parse TOML config: {}", e))?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e))?,
            _ => serde_json::from_str(&contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e))?,
        };

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Directory relative paths are resolved against: the config file's
    /// directory if there is one.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Expand `~` and resolve relative paths against `base_dir`.
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref data_dir) = self.data_dir {
            let data_dir = self.resolve_path(data_dir, base_dir);
            *settings = Settings {
                base_url: settings.base_url.clone(),
                user_agent: settings.user_agent.clone(),
                ..Settings::with_data_dir(data_dir)
            };
        }
        if let Some(ref base_url) = self.base_url {
            settings.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(ref dir) = self.cache_dir {
            settings.cache_dir = self.resolve_path(dir, base_dir);
        }
        if let Some(ref dir) = self.unpacked_dir {
            settings.unpacked_dir = self.resolve_path(dir, base_dir);
        }
        if let Some(ref url) = self.database_url {
            settings.database_url = if url.contains("://") || url.starts_with("sqlite:") {
                url.clone()
            } else {
                self.resolve_path(url, base_dir).display().to_string()
            };
        }
        if let Some(ms) = self.rate_limit_ms {
            settings.rate_limit_ms = ms;
        }
        if let Some(limit) = self.retry_limit {
            settings.retry_limit = limit;
        }
        if let Some(secs) = self.request_timeout_secs {
            settings.request_timeout_secs = secs;
        }
        settings.user_agent = resolve_user_agent(
            self.user_agent
                .as_deref()
                .or(Some(settings.user_agent.as_str())),
        );
        if let Some(flag) = self.index_mode.financial_statement_data_sets {
            settings.index_fsds = flag;
        }
        if let Some(flag) = self.index_mode.mutual_fund_data {
            settings.index_mfd = flag;
        }
    }

    /// Settings from this config, then the environment.
    pub fn settings(&self) -> Settings {
        let base_dir = self
            .base_dir()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        let mut settings = Settings::default();
        self.apply_to_settings(&mut settings, &base_dir);
        settings.apply_env();
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edgarsync.toml");
        std::fs::write(
            &path,
            r#"
data_dir = "data"
rate_limit_ms = 0
retry_limit = 3
user_agent = "Acme Research ops@acme.test"

[index_mode]
financial_statement_data_sets = true
mutual_fund_data = false
"#,
        )
        .unwrap();

        let config = Config::load_from_path(&path).await.unwrap();
        assert_eq!(config.base_dir().as_deref(), Some(dir.path()));

        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings, dir.path());
        assert_eq!(settings.cache_dir, dir.path().join("data").join("cache"));
        assert_eq!(
            settings.database_url,
            dir.path().join("data").join("edgar.db").display().to_string()
        );
        assert_eq!(settings.rate_limit_ms, 0);
        assert_eq!(settings.retry_limit, 3);
        assert_eq!(settings.request_timeout_secs, 30);
        assert_eq!(settings.user_agent, "Acme Research ops@acme.test");
        assert!(settings.index_fsds);
        assert!(!settings.index_mfd);
    }

    #[tokio::test]
    async fn test_load_yaml_with_explicit_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edgarsync.yaml");
        std::fs::write(
            &path,
            "cache_dir: /srv/edgar/cache\nunpacked_dir: unpacked\nbase_url: http://localhost:8080/\ndatabase_url: postgres://u:p@db/edgar\n",
        )
        .unwrap();

        let config = Config::load_from_path(&path).await.unwrap();
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings, dir.path());
        assert_eq!(settings.cache_dir, PathBuf::from("/srv/edgar/cache"));
        assert_eq!(settings.unpacked_dir, dir.path().join("unpacked"));
        assert_eq!(settings.base_url, "http://localhost:8080");
        assert_eq!(settings.database_url, "postgres://u:p@db/edgar");
        assert_eq!(settings.display_database_url(), "postgres://u:***@db/edgar");
    }

    #[tokio::test]
    async fn test_bad_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edgarsync.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(Config::load_from_path(&path).await.is_err());
    }
}
