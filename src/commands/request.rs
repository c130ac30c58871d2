//! Gateway events reduced to what the feature handlers need
//!
//! - **Version**: 1.0.0
//! - **Since**: 2.0.0

use anyhow::{anyhow, Result};
use serde_json::Value;
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::{
    ApplicationCommandInteraction, CommandDataOption,
};
use serenity::model::channel::Message;
use std::collections::HashMap;

/// A slash command invocation
#[derive(Debug, Clone, Default)]
pub struct CommandRequest {
    pub command: String,
    /// First-level subcommand, e.g. `track` in `/release-watch track`
    pub subcommand: Option<String>,
    pub channel_id: u64,
    pub user_id: u64,
    pub guild_id: Option<u64>,
    /// Option values of the (sub)command, keyed by option name
    pub options: HashMap<String, Value>,
}

impl CommandRequest {
    pub fn from_interaction(command: &ApplicationCommandInteraction) -> Self {
        let (subcommand, options) = split_subcommand(&command.data.options);

        Self {
            command: command.data.name.clone(),
            subcommand,
            channel_id: command.channel_id.0,
            user_id: command.user.id.0,
            guild_id: command.guild_id.map(|id| id.0),
            options,
        }
    }

    pub fn string(&self, name: &str) -> Option<String> {
        self.options
            .get(name)
            .and_then(|value| value.as_str())
            .map(|s| s.to_string())
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.options.get(name).and_then(|value| value.as_i64())
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.options.get(name).and_then(|value| value.as_bool())
    }

    pub fn require_string(&self, name: &str) -> Result<String> {
        self.string(name)
            .ok_or_else(|| anyhow!("Missing {name} parameter"))
    }

    pub fn require_integer(&self, name: &str) -> Result<i64> {
        self.integer(name)
            .ok_or_else(|| anyhow!("Missing {name} parameter"))
    }

    pub fn require_boolean(&self, name: &str) -> Result<bool> {
        self.boolean(name)
            .ok_or_else(|| anyhow!("Missing {name} parameter"))
    }
}

fn split_subcommand(options: &[CommandDataOption]) -> (Option<String>, HashMap<String, Value>) {
    match options.first() {
        Some(first) if first.kind == CommandOptionType::SubCommand => {
            (Some(first.name.clone()), collect_values(&first.options))
        }
        _ => (None, collect_values(options)),
    }
}

fn collect_values(options: &[CommandDataOption]) -> HashMap<String, Value> {
    options
        .iter()
        .filter_map(|opt| opt.value.clone().map(|value| (opt.name.clone(), value)))
        .collect()
}

/// A plain channel message
#[derive(Debug, Clone, Default)]
pub struct IncomingMessage {
    pub channel_id: u64,
    pub message_id: u64,
    pub author_id: u64,
    pub content: String,
}

impl IncomingMessage {
    pub fn from_message(msg: &Message) -> Self {
        Self {
            channel_id: msg.channel_id.0,
            message_id: msg.id.0,
            author_id: msg.author.id.0,
            content: msg.content.clone(),
        }
    }
}
