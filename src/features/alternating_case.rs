//! # Alternating Case Feature
//!
//! `/ac some text` → `sOmE TeXt`, both as a plain message and as a slash command.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Slash command, alternation by character instead of by byte
//! - 1.0.0: Message trigger

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use serenity::builder::CreateApplicationCommand;
use std::sync::Arc;

use crate::commands::slash;
use crate::commands::{CommandRequest, FeatureHandler, IncomingMessage};
use crate::messenger::Messenger;

const MESSAGE_PREFIX: &str = "/ac ";

/// Lowercase characters at even positions, uppercase the odd ones
pub fn alternate_case(text: &str) -> String {
    text.chars()
        .enumerate()
        .flat_map(|(i, c)| -> Box<dyn Iterator<Item = char>> {
            if i % 2 == 0 {
                Box::new(c.to_lowercase())
            } else {
                Box::new(c.to_uppercase())
            }
        })
        .collect()
}

pub struct AlternatingCaseHandler {
    messenger: Arc<dyn Messenger>,
}

impl AlternatingCaseHandler {
    pub fn new(messenger: Arc<dyn Messenger>) -> Self {
        Self { messenger }
    }
}

#[async_trait]
impl FeatureHandler for AlternatingCaseHandler {
    fn name(&self) -> &'static str {
        "alternating_case"
    }

    fn command_names(&self) -> &'static [&'static str] {
        &["ac"]
    }

    fn create_commands(&self) -> Vec<CreateApplicationCommand> {
        slash::text::create_alternating_case_commands()
    }

    async fn handle_command(&self, request: &CommandRequest) -> Result<String> {
        let text = request.require_string("text")?;
        Ok(alternate_case(&text))
    }

    async fn handle_message(&self, message: &IncomingMessage) -> Result<()> {
        let Some(text) = message.content.strip_prefix(MESSAGE_PREFIX) else {
            return Ok(());
        };
        // Same as `^/ac (.+)`: something other than a line break must follow
        if text.is_empty() || text.starts_with('\n') {
            return Ok(());
        }

        debug!("🔤 Alternating case for message {}", message.message_id);
        self.messenger
            .send_message(message.channel_id, &alternate_case(text))
            .await?;
        Ok(())
    }
}
