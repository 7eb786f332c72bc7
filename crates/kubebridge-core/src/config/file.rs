//! YAML configuration file
//!
//! Lives at `~/.config/kubebridge/config.yaml` unless a path is given.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::ConfigResult;
use super::settings::AppConfig;

/// Reads and writes an [`AppConfig`] as YAML
///
/// # Example
///
/// ```no_run
/// use kubebridge_core::config::ConfigFile;
///
/// let file = ConfigFile::user();
/// let config = file.load().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    /// Use a specific path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// User-level config (~/.config/kubebridge/config.yaml)
    pub fn user() -> Self {
        // XDG config directory (~/.config on Linux, ~/Library/Application Support on macOS)
        let config_dir = dirs::config_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
        });
        Self::new(config_dir.join("kubebridge").join("config.yaml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the file; a missing file yields the defaults
    pub fn load(&self) -> ConfigResult<AppConfig> {
        if !self.exists() {
            return Ok(AppConfig::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(AppConfig::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Write the configuration, creating parent directories
    pub fn save(&self, config: &AppConfig) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_yaml::to_string(config)?)?;
        Ok(())
    }

    /// Copy the current file next to itself with a `.backup` suffix
    pub fn backup(&self) -> ConfigResult<Option<PathBuf>> {
        if !self.exists() {
            return Ok(None);
        }
        let backup_path = self.path.with_extension("yaml.backup");
        fs::copy(&self.path, &backup_path)?;
        Ok(Some(backup_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProviderConfig;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let file = ConfigFile::new(dir.path().join("config.yaml"));
        assert!(!file.exists());
        assert_eq!(file.load().unwrap().provider.vendor, "gemini");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let file = ConfigFile::new(dir.path().join("nested").join("config.yaml"));

        let mut config = AppConfig::default();
        config.provider = ProviderConfig::new("openai", "gpt-4o").with_credential("sk-1");
        config.session.max_pairs = 3;
        file.save(&config).unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        assert!(content.contains("vendor: openai"));
        assert!(content.contains("api_key: sk-1"));

        let loaded = file.load().unwrap();
        assert_eq!(loaded.provider.model, "gpt-4o");
        assert_eq!(loaded.session.max_pairs, 3);
    }

    #[test]
    fn test_malformed_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "provider: [unclosed").unwrap();
        assert!(ConfigFile::new(&path).load().is_err());
    }

    #[test]
    fn test_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let file = ConfigFile::new(&path);

        assert!(file.backup().unwrap().is_none());

        fs::write(&path, "session:\n  max_pairs: 2\n").unwrap();
        let backup_path = file.backup().unwrap().unwrap();
        assert!(backup_path.exists());
        assert!(backup_path.to_string_lossy().ends_with("config.yaml.backup"));
    }
}
