//! Tool registry
//!
//! The ToolRegistry maps tool names to their schema and handler. It is
//! written during a registration phase and then read by any number of
//! concurrent orchestrations; orchestrations never mutate it.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;

use super::handler::{FnHandler, ToolHandler};
use super::error::ToolHandlerResult;
use crate::logging::{Logger, SharedLogger};
use crate::{log_debug, log_info};
use crate::types::{Arguments, SchemaError, ToolSchema};

/// A registered tool: its schema plus the handler that runs it
pub struct ToolRegistration {
    pub schema: ToolSchema,
    pub handler: Arc<dyn ToolHandler>,
}

impl ToolRegistration {
    pub fn name(&self) -> &str {
        &self.schema.name
    }
}

impl std::fmt::Debug for ToolRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistration")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// Filter deciding which registered tools a request may see
#[derive(Debug, Clone, Default)]
pub struct ToolFilter {
    /// If set, only include tools with these names
    pub include: Option<HashSet<String>>,
    /// Exclude tools with these names
    pub exclude: HashSet<String>,
}

impl ToolFilter {
    /// Filter that lets every tool through
    pub fn all() -> Self {
        Self::default()
    }

    /// Include only specific tools
    pub fn with_include(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.include = Some(names.into_iter().collect());
        self
    }

    /// Exclude specific tools
    pub fn with_exclude(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.exclude = names.into_iter().collect();
        self
    }

    /// Filter exposing exactly the named schemas, or everything when empty
    pub fn from_schemas(schemas: &[ToolSchema]) -> Self {
        if schemas.is_empty() {
            Self::all()
        } else {
            Self::all().with_include(schemas.iter().map(|s| s.name.clone()))
        }
    }

    /// Check if a tool name passes this filter
    pub fn matches(&self, name: &str) -> bool {
        if self.exclude.contains(name) {
            return false;
        }

        match self.include {
            Some(ref include) => include.contains(name),
            None => true,
        }
    }
}

#[derive(Default)]
struct Entries {
    by_name: HashMap<String, Arc<ToolRegistration>>,
    /// Names in first-registration order
    order: Vec<String>,
}

/// Registry of callable tools
pub struct ToolRegistry {
    entries: RwLock<Entries>,
    logger: SharedLogger,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new(logger: SharedLogger) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            logger,
        }
    }

    /// Insert or replace the tool named `schema.name`
    ///
    /// Replacing an existing tool is not an error; the last registration
    /// wins. Schemas that no call could satisfy are rejected.
    pub fn register(
        &self,
        schema: ToolSchema,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<(), SchemaError> {
        schema.check()?;

        let name = schema.name.clone();
        let registration = Arc::new(ToolRegistration { schema, handler });

        let mut entries = self.entries.write();
        if entries.by_name.insert(name.clone(), registration).is_some() {
            log_debug!(self.logger, "[ToolRegistry] Replaced tool: {}", name);
        } else {
            entries.order.push(name.clone());
            log_info!(self.logger, "[ToolRegistry] Registered tool: {}", name);
        }

        Ok(())
    }

    /// Register an async closure as a tool
    pub fn register_fn<F, Fut>(&self, schema: ToolSchema, func: F) -> Result<(), SchemaError>
    where
        F: Fn(Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolHandlerResult<Arguments>> + Send + 'static,
    {
        self.register(schema, Arc::new(FnHandler::new(func)))
    }

    /// Remove every tool
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        let removed = entries.order.len();
        entries.by_name.clear();
        entries.order.clear();
        log_debug!(self.logger, "[ToolRegistry] Cleared {} tools", removed);
    }

    /// Look up a tool by name
    pub fn lookup(&self, name: &str) -> Option<Arc<ToolRegistration>> {
        self.entries.read().by_name.get(name).cloned()
    }

    /// Check whether a tool is registered
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().by_name.contains_key(name)
    }

    /// Registered tool names, in registration order
    pub fn names(&self) -> Vec<String> {
        self.entries.read().order.clone()
    }

    /// Registered schemas, in registration order
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.schemas_matching(&ToolFilter::all())
    }

    /// Schemas passing `filter`, in registration order
    pub fn schemas_matching(&self, filter: &ToolFilter) -> Vec<ToolSchema> {
        let entries = self.entries.read();
        entries
            .order
            .iter()
            .filter(|name| filter.matches(name))
            .filter_map(|name| entries.by_name.get(name))
            .map(|r| r.schema.clone())
            .collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.entries.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::types::ToolParameter;
    use serde_json::json;

    fn registry() -> ToolRegistry {
        ToolRegistry::new(Arc::new(NoOpLogger::new()))
    }

    fn schema(name: &str) -> ToolSchema {
        ToolSchema::new(name, format!("{} tool", name))
    }

    fn register_constant(registry: &ToolRegistry, schema: ToolSchema, value: i64) {
        registry
            .register_fn(schema, move |_args: Arguments| async move {
                let mut out = Arguments::new();
                out.insert("value".to_string(), json!(value));
                Ok(out)
            })
            .unwrap();
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = registry();
        register_constant(&registry, schema("get_weather"), 1);

        let entry = registry.lookup("get_weather").expect("registered");
        assert_eq!(entry.name(), "get_weather");
        assert!(registry.lookup("get_time").is_none());
        assert!(registry.contains("get_weather"));
    }

    #[tokio::test]
    async fn test_last_registration_wins() {
        let registry = registry();
        register_constant(&registry, schema("calculate"), 1);
        register_constant(&registry, schema("calculate").with_parameter(ToolParameter::string("expression", "")), 2);

        assert_eq!(registry.len(), 1);
        let entry = registry.lookup("calculate").unwrap();
        assert_eq!(entry.schema.parameters.len(), 1);
        let out = entry.handler.call(Arguments::new()).await.unwrap();
        assert_eq!(out["value"], 2);
    }

    #[test]
    fn test_clear_then_register_is_idempotent() {
        let registry = registry();
        register_constant(&registry, schema("stale"), 0);
        register_constant(&registry, schema("get_weather"), 0);

        for _ in 0..3 {
            registry.clear();
            for name in ["get_weather", "calculate", "get_time"] {
                register_constant(&registry, schema(name), 0);
            }
            assert_eq!(registry.len(), 3);
            assert_eq!(registry.names(), vec!["get_weather", "calculate", "get_time"]);
            assert!(registry.lookup("stale").is_none());
        }
    }

    #[test]
    fn test_register_rejects_unsatisfiable_schema() {
        let registry = registry();
        let bad = schema("bad").with_parameter(
            ToolParameter::string("unit", "").with_enum(["a", "b"]).with_default("c"),
        );
        let result = registry.register_fn(bad, |_args: Arguments| async move { Ok(Arguments::new()) });
        assert!(matches!(result, Err(SchemaError::DefaultNotInEnum { .. })));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_tool_filter() {
        let registry = registry();
        for name in ["get_weather", "calculate", "get_time"] {
            register_constant(&registry, schema(name), 0);
        }

        let only_weather = ToolFilter::from_schemas(&[schema("get_weather")]);
        let names: Vec<String> = registry
            .schemas_matching(&only_weather)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["get_weather"]);

        let no_clock = ToolFilter::all().with_exclude(["get_time".to_string()]);
        assert!(!no_clock.matches("get_time"));
        assert!(no_clock.matches("calculate"));

        assert_eq!(registry.schemas_matching(&ToolFilter::from_schemas(&[])).len(), 3);
    }
}
