//! In-memory configuration provider

use async_trait::async_trait;
use parking_lot::RwLock;

use super::traits::{ConfigProvider, ConfigResult, DefaultSettings};

/// In-memory configuration provider for testing and host-supplied settings
#[derive(Debug, Default)]
pub struct MemoryConfigProvider {
    defaults: RwLock<DefaultSettings>,
}

impl MemoryConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider holding `defaults`
    pub fn with_defaults(defaults: DefaultSettings) -> Self {
        Self {
            defaults: RwLock::new(defaults),
        }
    }

    /// Reset to empty settings
    pub fn clear(&self) {
        *self.defaults.write() = DefaultSettings::default();
    }
}

#[async_trait]
impl ConfigProvider for MemoryConfigProvider {
    fn source(&self) -> String {
        "memory".to_string()
    }

    async fn get_defaults(&self) -> ConfigResult<DefaultSettings> {
        Ok(self.defaults.read().clone())
    }

    async fn set_defaults(&self, defaults: DefaultSettings) -> ConfigResult<()> {
        *self.defaults.write() = defaults;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_config_provider() {
        let config = MemoryConfigProvider::new();
        assert_eq!(config.get_defaults().await.unwrap(), DefaultSettings::default());

        let settings = DefaultSettings {
            max_tool_calls: Some(2),
            ..Default::default()
        };
        config.set_defaults(settings.clone()).await.unwrap();
        assert_eq!(config.get_defaults().await.unwrap(), settings);

        config.clear();
        assert!(config.get_defaults().await.unwrap().max_tool_calls.is_none());
    }
}
