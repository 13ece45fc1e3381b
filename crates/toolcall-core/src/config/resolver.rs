//! Layered resolution of default settings
//!
//! Layers are read in order; a field set in a later layer overrides the same
//! field from an earlier one:
//! 1. User YAML config (`<config dir>/toolcall/config.yaml`)
//! 2. Workspace YAML config (`<root>/.config/toolcall/config.yaml`)
//! 3. Anything the host pushes on top (e.g. a `MemoryConfigProvider`)

use std::path::PathBuf;
use std::sync::Arc;

use super::file::FileConfigProvider;
use super::traits::{ConfigProvider, ConfigResult, DefaultSettings};
use crate::logging::{Logger, NoOpLogger, SharedLogger};
use crate::{log_debug, log_warn};

/// Result of resolving every layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedDefaults {
    /// Merged settings
    pub settings: DefaultSettings,
    /// Sources that contributed at least one field, lowest priority first
    pub sources: Vec<String>,
}

/// Merges default settings from several `ConfigProvider`s
#[derive(Clone)]
pub struct ConfigResolver {
    layers: Vec<Arc<dyn ConfigProvider>>,
    logger: SharedLogger,
}

impl ConfigResolver {
    /// Resolver with no layers; resolves to empty defaults
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            logger: Arc::new(NoOpLogger::new()),
        }
    }

    /// User config, plus workspace config when `workspace_path` is given
    pub fn standard(workspace_path: Option<PathBuf>) -> Self {
        let mut resolver = Self::new().with_layer(Arc::new(FileConfigProvider::user()));
        if let Some(root) = workspace_path {
            resolver = resolver.with_layer(Arc::new(FileConfigProvider::workspace(root)));
        }
        resolver
    }

    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Append a layer that overrides all existing ones
    pub fn with_layer(mut self, layer: Arc<dyn ConfigProvider>) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Read and merge every layer
    ///
    /// A layer that fails to load is logged and skipped so one broken file
    /// does not hide the others.
    pub async fn resolve(&self) -> ResolvedDefaults {
        let mut resolved = ResolvedDefaults::default();

        for layer in &self.layers {
            match layer.get_defaults().await {
                Ok(settings) if settings == DefaultSettings::default() => {}
                Ok(settings) => {
                    resolved.settings = resolved.settings.merge(settings);
                    resolved.sources.push(layer.source());
                }
                Err(e) => {
                    log_warn!(
                        self.logger,
                        "[ConfigResolver] Skipping {}: {}",
                        layer.source(),
                        e
                    );
                }
            }
        }

        log_debug!(
            self.logger,
            "[ConfigResolver] Resolved defaults from {} layer(s): {:?}",
            resolved.sources.len(),
            resolved.settings
        );
        resolved
    }

    /// Like `resolve`, but the first failing layer aborts resolution
    pub async fn resolve_strict(&self) -> ConfigResult<DefaultSettings> {
        let mut settings = DefaultSettings::default();
        for layer in &self.layers {
            settings = settings.merge(layer.get_defaults().await?);
        }
        Ok(settings)
    }
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sources: Vec<String> = self.layers.iter().map(|l| l.source()).collect();
        f.debug_struct("ConfigResolver").field("layers", &sources).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, ConfigLevel, MemoryConfigProvider};
    use crate::logging::{LogLevel, MemoryLogger};
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_later_layers_win() {
        let user = MemoryConfigProvider::with_defaults(DefaultSettings {
            max_tool_calls: Some(5),
            temperature: Some(0.9),
            ..Default::default()
        });
        let workspace = MemoryConfigProvider::with_defaults(DefaultSettings {
            max_tool_calls: Some(2),
            ..Default::default()
        });

        let resolved = ConfigResolver::new()
            .with_layer(Arc::new(user))
            .with_layer(Arc::new(workspace))
            .resolve()
            .await;

        assert_eq!(resolved.settings.max_tool_calls, Some(2));
        assert_eq!(resolved.settings.temperature, Some(0.9));
        assert_eq!(resolved.sources.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_layers_do_not_count_as_sources() {
        let dir = tempdir().unwrap();
        let resolved = ConfigResolver::new()
            .with_layer(Arc::new(FileConfigProvider::workspace(dir.path())))
            .resolve()
            .await;

        assert_eq!(resolved, ResolvedDefaults::default());
    }

    #[tokio::test]
    async fn test_broken_layer_is_skipped() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("broken.yaml");
        fs::write(&broken, "defaults: [").unwrap();

        let logger = Arc::new(MemoryLogger::new());
        let resolver = ConfigResolver::new()
            .with_logger(logger.clone())
            .with_layer(Arc::new(MemoryConfigProvider::with_defaults(DefaultSettings {
                auto_execute: Some(false),
                ..Default::default()
            })))
            .with_layer(Arc::new(FileConfigProvider::new(&broken, ConfigLevel::Workspace)));

        let resolved = resolver.resolve().await;
        assert_eq!(resolved.settings.auto_execute, Some(false));
        assert_eq!(logger.messages_at(LogLevel::Warn).len(), 1);

        assert!(matches!(resolver.resolve_strict().await, Err(ConfigError::Yaml(_))));
    }

    #[tokio::test]
    async fn test_workspace_file_overrides_user_file() {
        let dir = tempdir().unwrap();
        let user_path = dir.path().join("user.yaml");
        fs::write(&user_path, "defaults:\n  maxToolCalls: 4\n  markers: hermes\n").unwrap();

        let workspace = FileConfigProvider::workspace(dir.path());
        fs::create_dir_all(workspace.path().parent().unwrap()).unwrap();
        fs::write(workspace.path(), "defaults:\n  maxToolCalls: 1\n").unwrap();

        let resolved = ConfigResolver::new()
            .with_layer(Arc::new(FileConfigProvider::new(&user_path, ConfigLevel::User)))
            .with_layer(Arc::new(workspace))
            .resolve()
            .await;

        assert_eq!(resolved.settings.max_tool_calls, Some(1));
        assert_eq!(resolved.settings.markers.as_deref(), Some("hermes"));
    }
}
