//! `reviews.toml` - where the review database lives

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Database file used when neither `--database` nor the config names one
pub const DEFAULT_DATABASE: &str = "restaurant_reviews.db";

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "reviews.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ReviewsConfig {
    pub database: Option<String>,
}

impl ReviewsConfig {
    /// Config written by `reviews init`
    pub fn with_defaults() -> Self {
        Self {
            database: Some(DEFAULT_DATABASE.to_string()),
        }
    }

    /// Read a config file; a missing file is `Ok(None)`
    pub fn load(path: Option<&Path>) -> anyhow::Result<Option<Self>> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        if !path.exists() {
            tracing::debug!("No config at {}", path.display());
            return Ok(None);
        }

        let config = toml::from_str(&std::fs::read_to_string(&path)?)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(Some(config))
    }

    /// Write this config, refusing to replace an existing file unless `force`
    pub fn save(&self, path: &Path, force: bool) -> anyhow::Result<()> {
        if path.exists() && !force {
            anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Database path: `--database` flag, then the config, then [`DEFAULT_DATABASE`].
/// Missing parent directories are created.
pub fn database_path(flag: Option<&Path>, config: Option<&ReviewsConfig>) -> anyhow::Result<PathBuf> {
    let path = match flag {
        Some(path) => path.to_path_buf(),
        None => config
            .and_then(|c| c.database.as_deref())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE)),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = ReviewsConfig::load(Some(&dir.path().join(CONFIG_FILE))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let config = ReviewsConfig {
            database: Some("data/reviews.db".to_string()),
        };

        config.save(&path, false).unwrap();
        assert_eq!(ReviewsConfig::load(Some(&path)).unwrap(), Some(config.clone()));

        assert!(config.save(&path, false).is_err());
        ReviewsConfig::with_defaults().save(&path, true).unwrap();
        assert_eq!(ReviewsConfig::load(Some(&path)).unwrap(), Some(ReviewsConfig::with_defaults()));
    }

    #[test]
    fn test_database_path_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReviewsConfig {
            database: Some(dir.path().join("from_config.db").to_string_lossy().into_owned()),
        };
        let flag = dir.path().join("from_flag.db");

        assert_eq!(database_path(Some(&flag), Some(&config)).unwrap(), flag);
        assert_eq!(
            database_path(None, Some(&config)).unwrap(),
            dir.path().join("from_config.db")
        );
        assert_eq!(database_path(None, None).unwrap(), PathBuf::from(DEFAULT_DATABASE));
    }

    #[test]
    fn test_database_path_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("reviews.db");
        assert_eq!(database_path(Some(&db), None).unwrap(), db);
        assert!(db.parent().unwrap().is_dir());
    }
}
