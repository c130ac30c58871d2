//! # Echo Feature
//!
//! Writes every message the bot sees to the log. Off unless `ECHO_ENABLED` is set.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: true

use anyhow::Result;
use async_trait::async_trait;
use log::info;

use crate::commands::{FeatureHandler, IncomingMessage};

pub struct EchoHandler;

#[async_trait]
impl FeatureHandler for EchoHandler {
    fn name(&self) -> &'static str {
        "echo"
    }

    async fn handle_message(&self, message: &IncomingMessage) -> Result<()> {
        info!(
            "💬 [{}] <{}> {}",
            message.channel_id, message.author_id, message.content
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_never_fails() {
        let message = IncomingMessage {
            content: "anything".to_string(),
            ..Default::default()
        };
        assert!(EchoHandler.handle_message(&message).await.is_ok());
        assert!(EchoHandler.command_names().is_empty());
    }
}
