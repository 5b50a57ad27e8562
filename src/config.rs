use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub cluster: ClusterConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Static cluster view and document identity settings
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterConfig {
    /// Address of the currently healthy master node, host[:port].
    /// Omit when no master is reachable; queries then fall back to shards.
    pub master: Option<String>,
    /// Shard node addresses, in the order the engine should merge them.
    #[serde(default)]
    pub shards: Vec<String>,
    /// User component of derived document identifiers (user@host:reference)
    #[serde(default = "default_user")]
    pub user: String,
    /// Host component of derived document identifiers
    #[serde(default = "default_host")]
    pub host: String,
}

/// Remote document fetch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Directory remote documents are downloaded into before ingestion
    #[serde(default = "default_spool_dir")]
    pub spool_dir: PathBuf,
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
}

/// Search-engine request configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_engine_timeout")]
    pub timeout_secs: u64,
}

fn default_user() -> String {
    std::env::var("USER").unwrap_or_else(|_| "searchcoord".to_string())
}

fn default_host() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string())
}

fn default_spool_dir() -> PathBuf {
    std::env::temp_dir().join("searchcoord-spool")
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_engine_timeout() -> u64 {
    30
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            spool_dir: default_spool_dir(),
            timeout_secs: default_fetch_timeout(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_engine_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in SEARCHCOORD_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config_path = std::env::var("SEARCHCOORD_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .context("Failed to parse config.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.engine.timeout_secs == 0 {
            anyhow::bail!("engine.timeout_secs must be greater than 0");
        }

        if self.fetch.timeout_secs == 0 {
            anyhow::bail!("fetch.timeout_secs must be greater than 0");
        }

        if self.fetch.spool_dir.as_os_str().is_empty() {
            anyhow::bail!("fetch.spool_dir must not be empty");
        }

        if self.cluster.user.is_empty() || self.cluster.host.is_empty() {
            anyhow::bail!("cluster.user and cluster.host must not be empty");
        }

        Ok(())
    }

    /// Bounded timeout applied to every engine request
    pub fn engine_timeout(&self) -> Duration {
        Duration::from_secs(self.engine.timeout_secs)
    }

    /// Bounded timeout applied to remote document downloads
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn write_config(temp_dir: &TempDir, body: &str) -> PathBuf {
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, body).unwrap();
        path
    }

    fn with_config_env(config_path: &std::path::Path, f: impl FnOnce()) {
        let original = std::env::var("SEARCHCOORD_CONFIG").ok();
        std::env::set_var("SEARCHCOORD_CONFIG", config_path.to_str().unwrap());
        f();
        std::env::remove_var("SEARCHCOORD_CONFIG");
        if let Some(val) = original {
            std::env::set_var("SEARCHCOORD_CONFIG", val);
        }
    }

    #[test]
    fn test_config_load_success() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            r#"
[cluster]
master = "localhost:8983"
shards = ["localhost:8983", "localhost:8984"]
user = "alice"
host = "workstation"

[fetch]
spool_dir = "/tmp/searchcoord-test-spool"
timeout_secs = 10

[engine]
timeout_secs = 15
"#,
        );
        with_config_env(&path, || {
            let config = Config::load().expect("config should load");
            assert_eq!(config.cluster.master.as_deref(), Some("localhost:8983"));
            assert_eq!(config.cluster.shards.len(), 2);
            assert_eq!(config.cluster.user, "alice");
            assert_eq!(config.engine_timeout(), Duration::from_secs(15));
            assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        });
    }

    #[test]
    fn test_config_defaults_fill_missing_sections() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            r#"
[cluster]
master = "h1:8983"
"#,
        );
        with_config_env(&path, || {
            let config = Config::load().expect("defaults should apply");
            assert!(config.cluster.shards.is_empty());
            assert!(!config.cluster.user.is_empty());
            assert_eq!(config.engine.timeout_secs, 30);
            assert_eq!(config.fetch.timeout_secs, 30);
        });
    }

    #[test]
    fn test_config_rejects_zero_timeout() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            r#"
[cluster]
master = "h1:8983"

[engine]
timeout_secs = 0
"#,
        );
        with_config_env(&path, || {
            let err = Config::load().unwrap_err();
            assert!(err.to_string().contains("engine.timeout_secs"));
        });
    }

    #[test]
    fn test_config_missing_file() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        with_config_env(std::path::Path::new("nonexistent.toml"), || {
            assert!(Config::load().is_err());
        });
    }
}
