//! # Slash Commands (/)
//!
//! Discord native slash command definitions, one file per feature.
//!
//! - **Version**: 3.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 3.0.0: Definitions come from the registered feature handlers
//! - 2.0.0: Guild registration replaces the whole command set
//! - 1.0.0: Reorganized from monolithic slash_commands.rs

pub mod images;
pub mod releases;
pub mod reminders;
pub mod text;

use anyhow::Result;
use log::info;
use serenity::http::Http;
use serenity::model::id::GuildId;

use super::registry::HandlerRegistry;

/// Registers every handler's slash commands for a guild
///
/// The guild's command set is overwritten, so commands left over from older
/// versions of the bot disappear in the same call.
pub async fn register_guild_commands(
    http: &Http,
    guild_id: GuildId,
    registry: &HandlerRegistry,
) -> Result<()> {
    let slash_commands = registry.application_commands();
    let count = slash_commands.len();

    guild_id
        .set_application_commands(http, |commands| {
            for command in slash_commands {
                commands.add_application_command(command);
            }
            commands
        })
        .await?;

    info!("Guild slash commands registered for guild {guild_id} ({count} commands)");
    Ok(())
}
