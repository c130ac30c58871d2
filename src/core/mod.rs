//! # Core Module
//!
//! Configuration, JSON persistence and message-size helpers shared by every handler.
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Add JsonStore and snowflake serde helpers for per-handler data files
//! - 1.0.0: Initial creation with config module

pub mod config;
pub mod response;
pub mod snowflake;
pub mod store;

// Re-export commonly used items
pub use config::Config;
pub use response::{truncate_for_message, MESSAGE_LIMIT};
pub use store::JsonStore;
