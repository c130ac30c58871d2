//! Release tracking handler: commands, pinned list and daily notices

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDateTime, Timelike};
use log::{error, info, warn};
use serenity::builder::CreateApplicationCommand;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{format_release_list, sort_releases, ChannelReleases, Release};
use crate::commands::slash;
use crate::commands::{CommandRequest, FeatureHandler};
use crate::core::{truncate_for_message, JsonStore};
use crate::messenger::Messenger;

pub struct ReleaseHandler {
    messenger: Arc<dyn Messenger>,
    store: JsonStore,
    notify_hour: u32,
    channels: Mutex<BTreeMap<u64, ChannelReleases>>,
}

impl ReleaseHandler {
    /// Load saved releases, re-parsing and re-sorting every channel's list
    pub async fn load(store: JsonStore, messenger: Arc<dyn Messenger>, notify_hour: u32) -> Result<Self> {
        let saved: Vec<ChannelReleases> = store.load().await?;

        let mut channels = BTreeMap::new();
        for mut channel in saved {
            for release in &mut channel.releases {
                release.reparse();
            }
            sort_releases(&mut channel.releases);
            channels.insert(channel.channel_id, channel);
        }
        info!("📅 Tracking releases for {} channel(s)", channels.len());

        Ok(Self {
            messenger,
            store,
            notify_hour,
            channels: Mutex::new(channels),
        })
    }

    pub async fn list(&self, channel_id: u64) -> String {
        let channels = self.channels.lock().await;
        let releases = channels
            .get(&channel_id)
            .map(|c| c.releases.as_slice())
            .unwrap_or_default();
        format_release_list(releases)
    }

    pub async fn track(
        &self,
        channel_id: u64,
        name: &str,
        date: &str,
        now: NaiveDateTime,
    ) -> Result<String> {
        let release = Release::new(name, date);

        if let Some(parsed) = release.parsed_date {
            if parsed.and_hms_opt(0, 0, 0).map_or(true, |midnight| midnight <= now) {
                return Ok(format!("Error: Specified date \"{date}\" is in the past!"));
            }
        }

        let mut channels = self.channels.lock().await;
        let channel = channels
            .entry(channel_id)
            .or_insert_with(|| ChannelReleases::new(channel_id));
        channel.releases.push(release);
        sort_releases(&mut channel.releases);
        self.update_pin(channel).await;
        self.save(&channels).await?;

        info!("➕ Tracking {name} ({date}) in channel {channel_id}");
        Ok(format!("Added {name} to releases, releasing {date}"))
    }

    pub async fn edit(&self, channel_id: u64, index: i64, date: &str) -> Result<String> {
        let mut channels = self.channels.lock().await;
        let channel = match channels.get_mut(&channel_id) {
            Some(channel) if !channel.releases.is_empty() => channel,
            _ => return Ok("No releases currently available to edit".to_string()),
        };

        let Some(release) = usize::try_from(index)
            .ok()
            .and_then(|i| channel.releases.get_mut(i))
        else {
            return Ok("Invalid ID specified".to_string());
        };

        let name = release.name.clone();
        release.release_date = date.to_string();
        release.reparse();
        sort_releases(&mut channel.releases);
        self.update_pin(channel).await;
        self.save(&channels).await?;

        Ok(format!("Successfully updated release date for {name}"))
    }

    pub async fn delete(&self, channel_id: u64, index: i64) -> Result<String> {
        let mut channels = self.channels.lock().await;
        let channel = match channels.get_mut(&channel_id) {
            Some(channel) if !channel.releases.is_empty() => channel,
            _ => return Ok("Error: Channel does not have any releases to delete!".to_string()),
        };

        let index = match usize::try_from(index) {
            Ok(i) if i < channel.releases.len() => i,
            _ => return Ok("Error: Invalid ID specified".to_string()),
        };

        let removed = channel.releases.remove(index);
        info!(
            "➖ Removing {} ({}) from releases in channel {channel_id}",
            removed.name, removed.release_date
        );
        self.update_pin(channel).await;
        self.save(&channels).await?;

        Ok(format!("Removed {} from releases", removed.name))
    }

    /// Announce releases at the notify hour and drop the ones released today
    pub async fn notify(&self, now: NaiveDateTime) -> Result<()> {
        if now.hour() != self.notify_hour || now.minute() != 0 {
            return Ok(());
        }

        let today = now.date();
        let tomorrow = today + Duration::days(1);
        let next_week = today + Duration::days(7);

        let mut channels = self.channels.lock().await;
        let mut changed = false;

        for channel in channels.values_mut() {
            let before = channel.releases.len();
            let mut kept = Vec::with_capacity(before);

            for release in std::mem::take(&mut channel.releases) {
                let notice = match release.parsed_date {
                    Some(date) if date == today => Some("released today!"),
                    Some(date) if date == next_week => Some("is releasing next week!"),
                    Some(date) if date == tomorrow => Some("is releasing tomorrow!"),
                    _ => None,
                };

                if let Some(notice) = notice {
                    let text = format!("{} {notice}", release.name);
                    if let Err(e) = self.messenger.send_message(channel.channel_id, &text).await {
                        warn!("Failed to announce {}: {e}", release.name);
                    }
                }

                if release.parsed_date != Some(today) {
                    kept.push(release);
                }
            }

            channel.releases = kept;
            if channel.releases.len() != before {
                self.update_pin(channel).await;
                changed = true;
            }
        }

        if changed {
            self.save(&channels).await?;
        }
        Ok(())
    }

    /// Bring the channel's pinned list up to date.
    ///
    /// Edits the known pin when there is one. Otherwise (or when the edit fails) a
    /// new list is sent and pinned, and its id kept only once the pin succeeded.
    async fn update_pin(&self, channel: &mut ChannelReleases) {
        let content = truncate_for_message(&format_release_list(&channel.releases));

        if let Some(message_id) = channel.pinned_message_id {
            match self
                .messenger
                .edit_message(channel.channel_id, message_id, &content)
                .await
            {
                Ok(()) => return,
                Err(e) => {
                    warn!("Pinned release list {message_id} could not be edited, re-posting: {e}");
                    channel.pinned_message_id = None;
                }
            }
        }

        let message_id = match self.messenger.send_message(channel.channel_id, &content).await {
            Ok(id) => id,
            Err(e) => {
                error!("Error sending release list: {e}");
                return;
            }
        };

        if self
            .messenger
            .pin_message(channel.channel_id, message_id)
            .await
            .is_ok()
        {
            channel.pinned_message_id = Some(message_id);
        }
    }

    async fn save(&self, channels: &BTreeMap<u64, ChannelReleases>) -> Result<()> {
        let data: Vec<&ChannelReleases> = channels.values().collect();
        self.store.save(&data).await
    }
}

#[async_trait]
impl FeatureHandler for ReleaseHandler {
    fn name(&self) -> &'static str {
        "releases"
    }

    fn command_names(&self) -> &'static [&'static str] {
        &["release-watch"]
    }

    fn create_commands(&self) -> Vec<CreateApplicationCommand> {
        slash::releases::create_commands()
    }

    async fn handle_command(&self, request: &CommandRequest) -> Result<String> {
        match request.subcommand.as_deref() {
            Some("list") => Ok(self.list(request.channel_id).await),
            Some("track") => {
                let name = request.require_string("name")?;
                let date = request.require_string("date")?;
                let now = Local::now().naive_local();
                self.track(request.channel_id, &name, &date, now).await
            }
            Some("edit") => {
                let index = request.require_integer("index")?;
                let date = request.require_string("date")?;
                self.edit(request.channel_id, index, &date).await
            }
            Some("delete") => {
                let index = request.require_integer("index")?;
                self.delete(request.channel_id, index).await
            }
            other => bail!("Unknown release-watch subcommand: {other:?}"),
        }
    }

    async fn scheduled_task(&self, now: NaiveDateTime) -> Result<()> {
        self.notify(now).await
    }
}
