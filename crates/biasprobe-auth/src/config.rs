//! biasprobe configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::kv::FileKvStore;
use crate::password::{DEFAULT_ITERATIONS, MIN_ITERATIONS};

/// Environment variable overriding `data_dir`.
pub const DATA_DIR_ENV: &str = "BIASPROBE_DATA_DIR";

/// Top-level biasprobe configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasprobeConfig {
    /// Where persisted key-value entries live.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// How many runs `recent` lists by default.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    /// Author shown on reviews submitted without a name.
    #[serde(default = "default_author")]
    pub default_author: String,
    /// PBKDF2 iteration count for new password hashes.
    #[serde(default = "default_iterations")]
    pub pbkdf2_iterations: u32,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./.biasprobe")
}
fn default_recent_limit() -> usize {
    5
}
fn default_author() -> String {
    "Anonymous".to_string()
}
fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

impl Default for BiasprobeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            recent_limit: default_recent_limit(),
            default_author: default_author(),
            pbkdf2_iterations: default_iterations(),
        }
    }
}

impl BiasprobeConfig {
    /// Key-value store rooted at `data_dir`.
    pub fn kv_store(&self) -> FileKvStore {
        FileKvStore::new(&self.data_dir)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.pbkdf2_iterations >= MIN_ITERATIONS,
            "pbkdf2_iterations must be at least {MIN_ITERATIONS}"
        );
        anyhow::ensure!(self.recent_limit >= 1, "recent_limit must be at least 1");
        Ok(())
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `biasprobe.toml` in the current directory
/// 2. `~/.config/biasprobe/config.toml`
///
/// `BIASPROBE_DATA_DIR` overrides `data_dir`.
pub fn load_config() -> Result<BiasprobeConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<BiasprobeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("biasprobe.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => parse_config_file(&path)?,
        None => BiasprobeConfig::default(),
    };

    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            config.data_dir = PathBuf::from(dir);
        }
    }

    config.validate()?;
    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<BiasprobeConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<BiasprobeConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("biasprobe"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = BiasprobeConfig::default();
        assert_eq!(config.recent_limit, 5);
        assert_eq!(config.default_author, "Anonymous");
        assert_eq!(config.pbkdf2_iterations, DEFAULT_ITERATIONS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let config: BiasprobeConfig = toml::from_str(
            r#"
data_dir = "/tmp/bp"
recent_limit = 10
"#,
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/bp"));
        assert_eq!(config.recent_limit, 10);
        assert_eq!(config.default_author, "Anonymous");
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = load_config_from(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_loaded_and_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("biasprobe.toml");

        std::fs::write(&path, "pbkdf2_iterations = 5000\nrecent_limit = 3\n").unwrap();
        let config = parse_config_file(&path).unwrap();
        assert_eq!(config.pbkdf2_iterations, 5000);
        assert!(config.validate().is_ok());

        std::fs::write(&path, "pbkdf2_iterations = 10\n").unwrap();
        assert!(parse_config_file(&path).unwrap().validate().is_err());

        std::fs::write(&path, "recent_limit = \"many\"\n").unwrap();
        assert!(parse_config_file(&path).is_err());
    }
}
