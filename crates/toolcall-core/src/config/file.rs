//! File-based configuration provider (YAML)
//!
//! Supports user-level (`<config dir>/toolcall/config.yaml`) and
//! workspace-level (`<root>/.config/toolcall/config.yaml`) config.
//!
//! ```yaml
//! defaults:
//!   maxToolCalls: 3
//!   autoExecute: true
//!   temperature: 0.2
//!   markers: hermes
//!   disabledTools: [get_time]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::traits::{ConfigProvider, ConfigResult, DefaultSettings};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigFile {
    /// Default orchestration settings
    #[serde(default)]
    pub defaults: Option<DefaultSettings>,
}

/// Config level (user or workspace)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLevel {
    User,
    Workspace,
}

impl ConfigLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigLevel::User => "user",
            ConfigLevel::Workspace => "workspace",
        }
    }
}

/// File-based configuration provider
///
/// # Example
///
/// ```no_run
/// use toolcall_core::config::FileConfigProvider;
///
/// let user_config = FileConfigProvider::user();
/// let workspace_config = FileConfigProvider::workspace("/path/to/project");
/// ```
pub struct FileConfigProvider {
    path: PathBuf,
    level: ConfigLevel,
    cache: RwLock<Option<ConfigFile>>,
}

impl FileConfigProvider {
    /// Create a new file config provider for a specific path
    pub fn new(path: impl Into<PathBuf>, level: ConfigLevel) -> Self {
        Self {
            path: path.into(),
            level,
            cache: RwLock::new(None),
        }
    }

    /// User-level config in the platform config directory
    pub fn user() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        Self::new(config_dir.join("toolcall").join("config.yaml"), ConfigLevel::User)
    }

    /// Workspace-level config under `workspace_root`
    pub fn workspace(workspace_root: impl AsRef<Path>) -> Self {
        let path = workspace_root.as_ref().join(".config").join("toolcall").join("config.yaml");
        Self::new(path, ConfigLevel::Workspace)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn level(&self) -> ConfigLevel {
        self.level
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn load(&self) -> ConfigResult<ConfigFile> {
        if !self.path.exists() {
            return Ok(ConfigFile::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(ConfigFile::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    fn save(&self, config: &ConfigFile) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, serde_yaml::to_string(config)?)?;
        *self.cache.write() = Some(config.clone());
        Ok(())
    }

    /// Cached config, loading from disk on first use
    fn get_config(&self) -> ConfigResult<ConfigFile> {
        if let Some(config) = self.cache.read().as_ref() {
            return Ok(config.clone());
        }

        let config = self.load()?;
        *self.cache.write() = Some(config.clone());
        Ok(config)
    }

    /// Reload config from disk (invalidate cache)
    pub fn reload(&self) -> ConfigResult<ConfigFile> {
        let config = self.load()?;
        *self.cache.write() = Some(config.clone());
        Ok(config)
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

    /// Export the config as pretty JSON
    pub fn export_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(&self.get_config()?)?)
    }

    /// Replace the config with one given as JSON (e.g. from a host app)
    pub fn import_json(&self, json: &str) -> ConfigResult<()> {
        let config: ConfigFile = serde_json::from_str(json)?;
        self.save(&config)
    }
}

impl std::fmt::Debug for FileConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfigProvider")
            .field("path", &self.path)
            .field("level", &self.level)
            .field("exists", &self.exists())
            .finish()
    }
}

#[async_trait]
impl ConfigProvider for FileConfigProvider {
    fn source(&self) -> String {
        format!("{} ({})", self.level.as_str(), self.path.display())
    }

    async fn get_defaults(&self) -> ConfigResult<DefaultSettings> {
        Ok(self.get_config()?.defaults.unwrap_or_default())
    }

    async fn set_defaults(&self, defaults: DefaultSettings) -> ConfigResult<()> {
        let mut config = self.get_config()?;
        config.defaults = Some(defaults);
        self.save(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_yields_empty_defaults() {
        let dir = tempdir().unwrap();
        let provider = FileConfigProvider::new(dir.path().join("config.yaml"), ConfigLevel::User);

        assert!(!provider.exists());
        assert_eq!(provider.get_defaults().await.unwrap(), DefaultSettings::default());
    }

    #[tokio::test]
    async fn test_round_trip_through_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let provider = FileConfigProvider::new(&path, ConfigLevel::Workspace);

        let settings = DefaultSettings {
            max_tool_calls: Some(2),
            auto_execute: Some(false),
            markers: Some("function_call".to_string()),
            disabled_tools: vec!["get_time".to_string()],
            ..Default::default()
        };
        provider.set_defaults(settings.clone()).await.unwrap();
        assert!(provider.exists());

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("maxToolCalls: 2"));
        assert!(content.contains("function_call"));

        provider.reload().unwrap();
        assert_eq!(provider.get_defaults().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn test_reads_hand_written_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "defaults:\n  maxToolCalls: 5\n  temperature: 0.25\n").unwrap();

        let provider = FileConfigProvider::new(&path, ConfigLevel::User);
        let defaults = provider.get_defaults().await.unwrap();
        assert_eq!(defaults.max_tool_calls, Some(5));
        assert_eq!(defaults.temperature, Some(0.25));
        assert!(defaults.auto_execute.is_none());
    }

    #[tokio::test]
    async fn test_invalid_yaml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "defaults: [not, a, map").unwrap();

        let provider = FileConfigProvider::new(&path, ConfigLevel::User);
        assert!(matches!(provider.get_defaults().await, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let provider = FileConfigProvider::new(&path, ConfigLevel::User);

        assert!(provider.backup().unwrap().is_none());

        fs::write(&path, "defaults: {}").unwrap();
        let backup_path = provider.backup().unwrap().unwrap();
        assert!(backup_path.exists());
        assert!(backup_path.to_string_lossy().contains("backup"));
    }

    #[test]
    fn test_json_import_export() {
        let dir = tempdir().unwrap();
        let provider = FileConfigProvider::new(dir.path().join("config.yaml"), ConfigLevel::User);

        provider
            .import_json(r#"{"defaults": {"maxToolCalls": 4, "autoExecute": true}}"#)
            .unwrap();
        let exported = provider.export_json().unwrap();
        assert!(exported.contains("\"maxToolCalls\": 4"));
    }
}
