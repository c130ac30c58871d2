//! # Features
//!
//! One module per bot feature. Each exposes a [`FeatureHandler`](crate::commands::FeatureHandler)
//! implementation plus the data types it persists.
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Per-feature JSON state, shared minute scheduler
//! - 1.0.0: Initial handlers

pub mod alternating_case;
pub mod echo;
pub mod fortune;
pub mod images;
pub mod public_ip;
pub mod reactions;
pub mod releases;
pub mod reminders;
pub mod schedule;

pub use alternating_case::AlternatingCaseHandler;
pub use echo::EchoHandler;
pub use fortune::FortuneHandler;
pub use images::ImageHandler;
pub use public_ip::PublicIpHandler;
pub use reactions::ReactionHandler;
pub use releases::ReleaseHandler;
pub use reminders::ReminderHandler;
pub use schedule::MinuteScheduler;
