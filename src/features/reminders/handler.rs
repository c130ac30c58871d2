//! Reminder handler: commands and the per-minute check

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDateTime, Timelike};
use log::{info, warn};
use serenity::builder::CreateApplicationCommand;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{format_reminder_table, parse_days, user_mention, ChannelReminders, Reminder};
use crate::commands::slash;
use crate::commands::{CommandRequest, FeatureHandler};
use crate::core::{truncate_for_message, JsonStore};
use crate::messenger::Messenger;

pub struct ReminderHandler {
    messenger: Arc<dyn Messenger>,
    store: JsonStore,
    channels: Mutex<BTreeMap<u64, ChannelReminders>>,
}

impl ReminderHandler {
    pub async fn load(store: JsonStore, messenger: Arc<dyn Messenger>) -> Result<Self> {
        let saved: Vec<ChannelReminders> = store.load().await?;
        let channels: BTreeMap<u64, ChannelReminders> = saved
            .into_iter()
            .map(|channel| (channel.channel_id, channel))
            .collect();
        info!("⏰ Loaded reminders for {} channel(s)", channels.len());

        Ok(Self {
            messenger,
            store,
            channels: Mutex::new(channels),
        })
    }

    pub async fn list(&self, channel_id: u64) -> String {
        let channels = self.channels.lock().await;
        let reminders = channels
            .get(&channel_id)
            .map(|c| c.reminders.as_slice())
            .unwrap_or_default();
        format_reminder_table(reminders)
    }

    pub async fn create(
        &self,
        channel_id: u64,
        user_id: u64,
        name: &str,
        days: &str,
        hour: i64,
        minute: i64,
    ) -> Result<String> {
        let Some(hour) = u32::try_from(hour).ok().filter(|h| *h <= 23) else {
            return Ok("Hour must be between 0 and 23".to_string());
        };
        let Some(minute) = u32::try_from(minute).ok().filter(|m| *m <= 59) else {
            return Ok("Minutes must be between 0 and 59".to_string());
        };

        let days = parse_days(days);
        if days.is_empty() {
            return Ok("No valid days specified! Use any combination of UMTWRFS日月火水木金土".to_string());
        }

        let reminder = Reminder {
            name: name.to_string(),
            hour,
            minute,
            days,
            notifyees: vec![user_id],
        };

        let mut channels = self.channels.lock().await;
        channels
            .entry(channel_id)
            .or_insert_with(|| ChannelReminders {
                channel_id,
                reminders: Vec::new(),
            })
            .reminders
            .push(reminder);
        self.save(&channels).await?;

        info!("➕ Reminder {name} created in channel {channel_id}");
        Ok(format!("{} added {name} reminder", user_mention(user_id)))
    }

    pub async fn subscribe(&self, channel_id: u64, user_id: u64, index: i64) -> Result<String> {
        let mut channels = self.channels.lock().await;
        let Some(channel) = channels.get_mut(&channel_id) else {
            return Ok("No reminders for this channel!".to_string());
        };
        let Some(reminder) = usize::try_from(index)
            .ok()
            .and_then(|i| channel.reminders.get_mut(i))
        else {
            return Ok("That's not a valid reminder!".to_string());
        };

        if reminder.notifyees.contains(&user_id) {
            return Ok("You're already subscribed to this reminder!".to_string());
        }
        reminder.notifyees.push(user_id);
        self.save(&channels).await?;

        Ok(format!("Subscribed user {} to reminder", user_mention(user_id)))
    }

    pub async fn unsubscribe(&self, channel_id: u64, user_id: u64, index: i64) -> Result<String> {
        let mut channels = self.channels.lock().await;
        let Some(channel) = channels.get_mut(&channel_id) else {
            return Ok("This channel does not have reminders!".to_string());
        };
        let Some(reminder) = usize::try_from(index)
            .ok()
            .and_then(|i| channel.reminders.get_mut(i))
        else {
            return Ok("Invalid reminder specified!".to_string());
        };

        let Some(position) = reminder.notifyees.iter().position(|u| *u == user_id) else {
            return Ok("You're not registered as a subscriber of this reminder!".to_string());
        };
        reminder.notifyees.swap_remove(position);
        self.save(&channels).await?;

        Ok(format!(
            "Unsubscribed {} from notification list",
            user_mention(user_id)
        ))
    }

    /// Post every reminder due at `now`
    pub async fn fire_due(&self, now: NaiveDateTime) {
        let weekday = now.weekday().num_days_from_sunday();
        let channels = self.channels.lock().await;

        for channel in channels.values() {
            for reminder in &channel.reminders {
                if !reminder.is_due(now.hour(), now.minute(), weekday) {
                    continue;
                }
                let text = truncate_for_message(&reminder.announcement());
                if let Err(e) = self.messenger.send_message(channel.channel_id, &text).await {
                    warn!("Could not send reminder {}: {e}", reminder.name);
                }
            }
        }
    }

    async fn save(&self, channels: &BTreeMap<u64, ChannelReminders>) -> Result<()> {
        let data: Vec<&ChannelReminders> = channels.values().collect();
        self.store.save(&data).await
    }
}

#[async_trait]
impl FeatureHandler for ReminderHandler {
    fn name(&self) -> &'static str {
        "reminders"
    }

    fn command_names(&self) -> &'static [&'static str] {
        &["reminder"]
    }

    fn create_commands(&self) -> Vec<CreateApplicationCommand> {
        slash::reminders::create_commands()
    }

    async fn handle_command(&self, request: &CommandRequest) -> Result<String> {
        let channel_id = request.channel_id;
        let user_id = request.user_id;

        match request.subcommand.as_deref() {
            Some("list") => Ok(self.list(channel_id).await),
            Some("create") => {
                let name = request.require_string("name")?;
                let days = request.require_string("days")?;
                let hour = request.require_integer("hour")?;
                let minute = request.require_integer("minute")?;
                self.create(channel_id, user_id, &name, &days, hour, minute)
                    .await
            }
            Some("subscribe") => {
                let index = request.require_integer("index")?;
                self.subscribe(channel_id, user_id, index).await
            }
            Some("unsubscribe") => {
                let index = request.require_integer("index")?;
                self.unsubscribe(channel_id, user_id, index).await
            }
            other => bail!("Unknown reminder subcommand: {other:?}"),
        }
    }

    async fn scheduled_task(&self, now: NaiveDateTime) -> Result<()> {
        self.fire_due(now).await;
        Ok(())
    }
}
