//! Feature handler registry
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Keep registration order for message fan-out and ticks
//! - 1.0.0: Initial implementation for handler dispatch

use std::collections::HashMap;
use std::sync::Arc;

use serenity::builder::CreateApplicationCommand;

use super::handler::FeatureHandler;

/// Registry of all feature handlers plus a command-name index
///
/// Commands dispatch to exactly one handler by name. Messages and scheduled ticks go
/// to every handler in registration order.
///
/// # Example
///
/// ```ignore
/// let mut registry = HandlerRegistry::new();
/// registry.register(Arc::new(PublicIpHandler::new(url)));
///
/// if let Some(handler) = registry.get("whats-my-ip") {
///     let reply = handler.handle_command(&request).await?;
/// }
/// ```
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: Vec<Arc<dyn FeatureHandler>>,
    by_command: HashMap<&'static str, Arc<dyn FeatureHandler>>,
}

impl HandlerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for its declared command names
    pub fn register(&mut self, handler: Arc<dyn FeatureHandler>) {
        for name in handler.command_names() {
            self.by_command.insert(name, Arc::clone(&handler));
        }
        self.handlers.push(handler);
    }

    /// Get the handler answering a command name
    pub fn get(&self, name: &str) -> Option<Arc<dyn FeatureHandler>> {
        self.by_command.get(name).cloned()
    }

    /// Check if a command is registered
    pub fn contains(&self, name: &str) -> bool {
        self.by_command.contains_key(name)
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// All handlers, in registration order
    pub fn handlers(&self) -> &[Arc<dyn FeatureHandler>] {
        &self.handlers
    }

    /// Get all registered command names
    pub fn command_names(&self) -> impl Iterator<Item = &&'static str> {
        self.by_command.keys()
    }

    /// Slash command definitions from every handler
    pub fn application_commands(&self) -> Vec<CreateApplicationCommand> {
        self.handlers
            .iter()
            .flat_map(|handler| handler.create_commands())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::request::CommandRequest;
    use anyhow::Result;
    use async_trait::async_trait;

    // Mock handler for testing
    struct MockHandler {
        names: &'static [&'static str],
    }

    #[async_trait]
    impl FeatureHandler for MockHandler {
        fn name(&self) -> &'static str {
            "mock"
        }

        fn command_names(&self) -> &'static [&'static str] {
            self.names
        }

        fn create_commands(&self) -> Vec<CreateApplicationCommand> {
            self.names
                .iter()
                .map(|name| {
                    CreateApplicationCommand::default()
                        .name(*name)
                        .description("mock")
                        .to_owned()
                })
                .collect()
        }

        async fn handle_command(&self, request: &CommandRequest) -> Result<String> {
            Ok(format!("handled {}", request.command))
        }
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry = HandlerRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_registry_register_single() {
        let mut registry = HandlerRegistry::new();
        registry.register(Arc::new(MockHandler { names: &["ac"] }));

        assert!(!registry.is_empty());
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("ac"));
        assert!(!registry.contains("image"));
    }

    #[test]
    fn test_registry_handler_without_commands() {
        let mut registry = HandlerRegistry::new();
        registry.register(Arc::new(MockHandler { names: &[] }));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.command_names().count(), 0);
        assert_eq!(registry.handlers().len(), 1);
    }

    #[tokio::test]
    async fn test_registry_get_dispatches() {
        let mut registry = HandlerRegistry::new();
        registry.register(Arc::new(MockHandler {
            names: &["reminder", "image"],
        }));

        let handler = registry.get("image").unwrap();
        let request = CommandRequest {
            command: "image".to_string(),
            ..Default::default()
        };
        assert_eq!(handler.handle_command(&request).await.unwrap(), "handled image");
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_registry_collects_application_commands() {
        let mut registry = HandlerRegistry::new();
        registry.register(Arc::new(MockHandler { names: &["a", "b"] }));
        registry.register(Arc::new(MockHandler { names: &["c"] }));

        assert_eq!(registry.application_commands().len(), 3);
    }
}
