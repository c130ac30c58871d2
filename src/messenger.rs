//! # Outbound Messaging
//!
//! Every message, edit, pin, upload and reaction a handler makes goes through the
//! [`Messenger`] trait. The Discord implementation serializes all calls behind one lock
//! so scheduled tasks and command handlers never interleave their sends.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Custom emoji parsing for reactions
//! - 1.0.0: Initial shared sender with message lock

use anyhow::{anyhow, Context as _, Result};
use async_trait::async_trait;
use log::{debug, error};
use serenity::http::Http;
use serenity::model::channel::{AttachmentType, ReactionType};
use serenity::model::id::{ChannelId, EmojiId, MessageId};
use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Outbound chat operations used by the feature handlers
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Post a text message, returning the new message id
    async fn send_message(&self, channel_id: u64, content: &str) -> Result<u64>;

    /// Upload a local file as an attachment
    async fn send_file(&self, channel_id: u64, path: &Path) -> Result<()>;

    async fn edit_message(&self, channel_id: u64, message_id: u64, content: &str) -> Result<()>;

    async fn pin_message(&self, channel_id: u64, message_id: u64) -> Result<()>;

    /// Add a reaction; see [`parse_reaction`] for the accepted formats
    async fn react(&self, channel_id: u64, message_id: u64, reaction: &str) -> Result<()>;
}

/// [`Messenger`] backed by the Discord REST API
pub struct DiscordMessenger {
    http: Arc<Http>,
    message_lock: Mutex<()>,
}

impl DiscordMessenger {
    pub fn new(http: Arc<Http>) -> Self {
        Self {
            http,
            message_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl Messenger for DiscordMessenger {
    async fn send_message(&self, channel_id: u64, content: &str) -> Result<u64> {
        let _guard = self.message_lock.lock().await;
        match ChannelId(channel_id).say(&self.http, content).await {
            Ok(message) => {
                debug!("📤 Sent message {} to channel {channel_id}", message.id);
                Ok(message.id.0)
            }
            Err(e) => {
                error!("Error sending message to channel {channel_id}: {e}");
                Err(e.into())
            }
        }
    }

    async fn send_file(&self, channel_id: u64, path: &Path) -> Result<()> {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow!("{} has no file name", path.display()))?;

        let _guard = self.message_lock.lock().await;
        let result = ChannelId(channel_id)
            .send_message(&self.http, |m| {
                m.add_file(AttachmentType::Bytes {
                    data: Cow::Owned(data),
                    filename,
                })
            })
            .await;

        match result {
            Ok(_) => {
                debug!("📤 Uploaded {} to channel {channel_id}", path.display());
                Ok(())
            }
            Err(e) => {
                error!("Error sending image {} to channel {channel_id}: {e}", path.display());
                Err(e.into())
            }
        }
    }

    async fn edit_message(&self, channel_id: u64, message_id: u64, content: &str) -> Result<()> {
        let _guard = self.message_lock.lock().await;
        ChannelId(channel_id)
            .edit_message(&self.http, MessageId(message_id), |m| m.content(content))
            .await
            .map(|_| ())
            .map_err(|e| {
                error!("Error editing message {message_id} in channel {channel_id}: {e}");
                e.into()
            })
    }

    async fn pin_message(&self, channel_id: u64, message_id: u64) -> Result<()> {
        let _guard = self.message_lock.lock().await;
        ChannelId(channel_id)
            .pin(&self.http, MessageId(message_id))
            .await
            .map_err(|e| {
                error!("Error pinning message {message_id} in channel {channel_id}: {e}");
                e.into()
            })
    }

    async fn react(&self, channel_id: u64, message_id: u64, reaction: &str) -> Result<()> {
        let reaction_type = parse_reaction(reaction);
        let _guard = self.message_lock.lock().await;
        ChannelId(channel_id)
            .create_reaction(&self.http, MessageId(message_id), reaction_type)
            .await
            .map_err(|e| {
                error!("Error reacting to message {message_id} with {reaction}: {e}");
                e.into()
            })
    }
}

/// Turn a configured reaction into a [`ReactionType`].
///
/// Custom emoji may be written `name:id`, `<:name:id>` or `<a:name:id>`; anything
/// else is sent as a unicode emoji.
pub fn parse_reaction(reaction: &str) -> ReactionType {
    let trimmed = reaction.trim();
    let (animated, body) = match trimmed
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
    {
        Some(inner) => match inner.strip_prefix("a:") {
            Some(rest) => (true, rest),
            None => (false, inner.strip_prefix(':').unwrap_or(inner)),
        },
        None => (false, trimmed),
    };

    if let Some((name, id)) = body.rsplit_once(':') {
        if let Ok(id) = id.parse::<u64>() {
            if !name.is_empty() {
                return ReactionType::Custom {
                    animated,
                    id: EmojiId(id),
                    name: Some(name.to_string()),
                };
            }
        }
    }

    ReactionType::Unicode(trimmed.to_string())
}
