//! # Command System
//!
//! Slash command (/) definitions, interaction/message dispatch and the feature
//! handler trait.
//!
//! - **Version**: 3.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 3.0.0: Handlers own message and scheduled-task hooks alongside commands
//! - 2.0.0: Slash-only command registration, legacy text commands removed
//! - 1.0.0: Initial handler registry

pub mod handler;
pub mod handlers;
pub mod registry;
pub mod request;
pub mod slash;

pub use handler::FeatureHandler;
pub use registry::HandlerRegistry;
pub use request::{CommandRequest, IncomingMessage};
pub use slash::register_guild_commands;
pub use handlers::{create_all_handlers, create_registry};
