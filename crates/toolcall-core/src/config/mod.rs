//! Configuration of orchestration defaults
//!
//! Supports multiple configuration sources:
//! - `MemoryConfigProvider`: In-memory for testing and host-supplied settings
//! - `FileConfigProvider`: YAML file-based (user/workspace level)
//!
//! `ConfigResolver` layers them; `ToolCallingConfig::from_defaults` turns
//! the result into a per-request config.

mod traits;
mod memory;
mod file;
mod resolver;

pub use traits::{ConfigProvider, ConfigError, ConfigResult, DefaultSettings};
pub use memory::MemoryConfigProvider;
pub use file::{FileConfigProvider, ConfigFile, ConfigLevel};
pub use resolver::{ConfigResolver, ResolvedDefaults};
