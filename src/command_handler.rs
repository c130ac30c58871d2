//! Gateway event dispatch to the feature handlers

use anyhow::Result;
use log::{debug, error, info, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::channel::Message;
use serenity::prelude::Context;
use uuid::Uuid;

use crate::commands::{CommandRequest, HandlerRegistry, IncomingMessage};
use crate::core::truncate_for_message;

#[derive(Clone)]
pub struct CommandHandler {
    registry: HandlerRegistry,
}

impl CommandHandler {
    pub fn new(registry: HandlerRegistry) -> Self {
        CommandHandler { registry }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Pass a message to every handler, in registration order
    pub async fn handle_message(&self, msg: &Message) {
        self.dispatch_message(&IncomingMessage::from_message(msg))
            .await;
    }

    pub async fn dispatch_message(&self, message: &IncomingMessage) {
        for handler in self.registry.handlers() {
            if let Err(e) = handler.handle_message(message).await {
                error!(
                    "Handler {} failed on message {}: {e:#}",
                    handler.name(),
                    message.message_id
                );
            }
        }
    }

    /// Run a command against its handler. `None` when no handler owns the command.
    pub async fn run_command(&self, request: &CommandRequest) -> Option<Result<String>> {
        let handler = self.registry.get(&request.command)?;
        Some(handler.handle_command(request).await)
    }

    /// Answer a slash command interaction with the handler's reply
    pub async fn handle_slash_command(
        &self,
        ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let request_id = Uuid::new_v4();
        let request = CommandRequest::from_interaction(command);

        info!(
            "[{request_id}] 📥 Slash command /{} {} | User: {} | Channel: {} | Guild: {}",
            request.command,
            request.subcommand.as_deref().unwrap_or(""),
            request.user_id,
            request.channel_id,
            request
                .guild_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "DM".to_string())
        );

        let reply = match self.run_command(&request).await {
            Some(reply) => reply?,
            None => {
                warn!("[{request_id}] ❓ Unknown slash command: {}", request.command);
                return Ok(());
            }
        };

        debug!("[{request_id}] 📤 Sending {} char reply", reply.chars().count());
        let content = truncate_for_message(&reply);
        command
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| message.content(content))
            })
            .await?;
        info!("[{request_id}] ✅ Reply sent for /{}", request.command);

        Ok(())
    }
}
