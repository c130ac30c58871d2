use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use serenity::async_trait;
use serenity::http::Http;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::model::channel::Message;
use serenity::model::gateway::{Activity, Ready};
use serenity::prelude::*;
use std::sync::Arc;

use diskhard::command_handler::CommandHandler;
use diskhard::commands::{create_registry, register_guild_commands};
use diskhard::core::Config;
use diskhard::features::MinuteScheduler;
use diskhard::messenger::{DiscordMessenger, Messenger};

struct Handler {
    command_handler: Arc<CommandHandler>,
    status_text: String,
}

impl Handler {
    fn new(command_handler: CommandHandler, status_text: String) -> Self {
        Handler {
            command_handler: Arc::new(command_handler),
            status_text,
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, _ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        self.command_handler.handle_message(&msg).await;
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);

        if let Some(shard) = ready.shard {
            info!("⚡ Shard: {}/{}", shard[0] + 1, shard[1]);
        }

        ctx.set_activity(Activity::playing(&self.status_text)).await;

        let registry = self.command_handler.registry();
        for guild in &ready.guilds {
            match register_guild_commands(&ctx.http, guild.id, registry).await {
                Ok(()) => info!("✅ Slash commands registered for guild {}", guild.id),
                Err(e) => error!("❌ Failed to register commands for guild {}: {e:#}", guild.id),
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::ApplicationCommand(command) = interaction {
            if let Err(e) = self
                .command_handler
                .handle_slash_command(&ctx, &command)
                .await
            {
                error!(
                    "Error handling slash command '{}': {e:#}",
                    command.data.name
                );

                let error_message =
                    "❌ Sorry, I encountered an error processing your command. Please try again.";
                if let Err(why) = command
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| message.content(error_message))
                    })
                    .await
                {
                    error!("Failed to send error response: {why}");
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting {}...", config.bot_name);

    let http = Arc::new(Http::new(&config.discord_token));
    let messenger: Arc<dyn Messenger> = Arc::new(DiscordMessenger::new(http));
    let registry = create_registry(&config, messenger).await?;
    info!("🔌 {} feature handlers loaded", registry.len());

    // Scheduled work for every handler, once per minute
    let scheduler = MinuteScheduler::new(registry.clone());
    tokio::spawn(scheduler.run());

    let handler = Handler::new(CommandHandler::new(registry), config.status_text.clone());

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            error!("This could indicate:");
            error!("  - Invalid bot token format");
            error!("  - Network issues reaching Discord API");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Could not listen for shutdown signal: {e}");
            return;
        }
        info!("🛑 Shutdown requested, closing gateway connections");
        shard_manager.lock().await.shutdown_all().await;
    });

    info!("Establishing WebSocket connection to Discord gateway...");
    info!("Gateway intents: {intents:?}");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        error!("This could be due to:");
        error!("  - Invalid bot token");
        error!("  - Network connectivity issues");
        error!("  - Discord API outage");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
