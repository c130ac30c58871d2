// Core layer - configuration, persistence and shared helpers
pub mod core;

// Features layer - one module per bot feature
pub mod features;

// Outbound chat calls
pub mod messenger;

// Application layer
pub mod command_handler;
pub mod commands;

pub use core::Config;

pub use features::{
    AlternatingCaseHandler, EchoHandler, FortuneHandler, ImageHandler, MinuteScheduler,
    PublicIpHandler, ReactionHandler, ReleaseHandler, ReminderHandler,
};
pub use messenger::{DiscordMessenger, Messenger};
