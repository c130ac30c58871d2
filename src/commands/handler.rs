//! Feature handler trait
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Message and minute-tick hooks, replies returned as text
//! - 1.0.0: Initial implementation for modular command handling

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serenity::builder::CreateApplicationCommand;

use super::request::{CommandRequest, IncomingMessage};

/// Trait for feature handlers
///
/// Each handler owns one slice of the bot: optionally a slash command, optionally a
/// reaction to plain messages, optionally something to do every minute. Handlers are
/// registered with a [`HandlerRegistry`](super::HandlerRegistry) and dispatched by
/// command name; every handler sees every message and every tick.
///
/// # Example
///
/// ```ignore
/// pub struct PingHandler;
///
/// #[async_trait]
/// impl FeatureHandler for PingHandler {
///     fn name(&self) -> &'static str {
///         "ping"
///     }
///
///     fn command_names(&self) -> &'static [&'static str] {
///         &["ping"]
///     }
///
///     async fn handle_command(&self, _request: &CommandRequest) -> Result<String> {
///         Ok("Pong!".to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait FeatureHandler: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Command name(s) this handler answers
    fn command_names(&self) -> &'static [&'static str] {
        &[]
    }

    /// Slash command definitions to register with each guild
    fn create_commands(&self) -> Vec<CreateApplicationCommand> {
        Vec::new()
    }

    /// Handle a slash command, returning the reply text
    async fn handle_command(&self, request: &CommandRequest) -> Result<String> {
        Ok(format!("{} does not take commands", request.command))
    }

    /// Called for every message not written by a bot
    async fn handle_message(&self, _message: &IncomingMessage) -> Result<()> {
        Ok(())
    }

    /// Called once per wall-clock minute with the local time, truncated to the minute
    async fn scheduled_task(&self, _now: NaiveDateTime) -> Result<()> {
        Ok(())
    }
}
