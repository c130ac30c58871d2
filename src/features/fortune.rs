//! # Fortune Feature
//!
//! Posts the output of the `fortune` program on `/fortune` and every morning at 09:00
//! to the channels listed in `fortuneData.json`. Off unless `FORTUNE_ENABLED` is set.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.1.0: Configurable fortune database
//! - 1.0.0: Initial implementation

use anyhow::{anyhow, Context as _, Result};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Timelike};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::process::Command;

use crate::commands::{FeatureHandler, IncomingMessage};
use crate::core::{snowflake, truncate_for_message, JsonStore};
use crate::messenger::Messenger;

/// Data file name under the data directory
pub const DATA_FILE: &str = "fortuneData.json";

const FORTUNE_PROGRAM: &str = "fortune";
const MESSAGE_TRIGGER: &str = "/fortune";
const DAILY_HOUR: u32 = 9;

/// Channels that get the daily fortune
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FortuneChannels(#[serde(with = "snowflake::vec")] pub Vec<u64>);

pub struct FortuneHandler {
    messenger: Arc<dyn Messenger>,
    program: String,
    database: Option<String>,
    channels: Vec<u64>,
    active: bool,
}

impl FortuneHandler {
    pub async fn load(
        store: &JsonStore,
        messenger: Arc<dyn Messenger>,
        database: Option<String>,
    ) -> Result<Self> {
        let FortuneChannels(channels): FortuneChannels = store.load().await?;
        Ok(Self::with_program(FORTUNE_PROGRAM, database, channels, messenger).await)
    }

    /// Build a handler around `program`, disabling it if the program does not run
    pub async fn with_program(
        program: &str,
        database: Option<String>,
        channels: Vec<u64>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        let active = match Command::new(program).output().await {
            Ok(output) if output.status.success() => {
                info!("🔮 Fortune active for {} channel(s)", channels.len());
                true
            }
            Ok(output) => {
                warn!("{program} exited with {}; disabling fortunes", output.status);
                false
            }
            Err(e) => {
                warn!("{program} is not accessible; disabling fortunes: {e}");
                false
            }
        };

        Self {
            messenger,
            program: program.to_string(),
            database,
            channels,
            active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Run the fortune program once
    pub async fn fortune(&self) -> Result<String> {
        let mut command = Command::new(&self.program);
        if let Some(database) = &self.database {
            command.arg(database);
        }

        let output = command
            .output()
            .await
            .with_context(|| format!("Failed to run {}", self.program))?;
        if !output.status.success() {
            return Err(anyhow!("{} exited with {}", self.program, output.status));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }

    async fn post(&self, channels: &[u64]) -> Result<()> {
        let text = self.fortune().await?;
        if text.is_empty() {
            return Ok(());
        }

        let text = truncate_for_message(&text);
        for &channel_id in channels {
            if let Err(e) = self.messenger.send_message(channel_id, &text).await {
                warn!("Could not post fortune to {channel_id}: {e}");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl FeatureHandler for FortuneHandler {
    fn name(&self) -> &'static str {
        "fortune"
    }

    async fn handle_message(&self, message: &IncomingMessage) -> Result<()> {
        if !self.active || message.content != MESSAGE_TRIGGER {
            return Ok(());
        }
        self.post(&[message.channel_id]).await
    }

    async fn scheduled_task(&self, now: NaiveDateTime) -> Result<()> {
        if !self.active || now.hour() != DAILY_HOUR || now.minute() != 0 {
            return Ok(());
        }
        self.post(&self.channels).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messenger::testing::RecordingMessenger;
    use chrono::NaiveDate;

    fn message(content: &str) -> IncomingMessage {
        IncomingMessage {
            channel_id: 5,
            content: content.to_string(),
            ..Default::default()
        }
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_program_disables_handler() {
        let messenger = RecordingMessenger::new();
        let handler = FortuneHandler::with_program(
            "surely-not-an-installed-program",
            None,
            vec![1],
            messenger.clone(),
        )
        .await;

        assert!(!handler.is_active());
        handler.handle_message(&message("/fortune")).await.unwrap();
        handler.scheduled_task(at(9, 0)).await.unwrap();
        assert!(messenger.sent().is_empty());
    }

    #[tokio::test]
    async fn test_message_trigger_uses_database_argument() {
        let messenger = RecordingMessenger::new();
        let handler = FortuneHandler::with_program(
            "echo",
            Some("startrek".to_string()),
            Vec::new(),
            messenger.clone(),
        )
        .await;
        assert!(handler.is_active());

        handler.handle_message(&message("/fortune please")).await.unwrap();
        assert!(messenger.sent().is_empty());

        handler.handle_message(&message("/fortune")).await.unwrap();
        assert_eq!(messenger.messages(), vec!["startrek".to_string()]);
    }

    #[tokio::test]
    async fn test_daily_fortune_goes_to_every_channel() {
        let messenger = RecordingMessenger::new();
        let handler = FortuneHandler::with_program(
            "echo",
            Some("hi".to_string()),
            vec![10, 20],
            messenger.clone(),
        )
        .await;

        handler.scheduled_task(at(9, 1)).await.unwrap();
        handler.scheduled_task(at(10, 0)).await.unwrap();
        assert!(messenger.sent().is_empty());

        handler.scheduled_task(at(9, 0)).await.unwrap();
        assert_eq!(messenger.messages().len(), 2);
    }

    #[test]
    fn test_channel_file_is_list_of_strings() {
        let channels: FortuneChannels = serde_json::from_str(r#"["123", "456"]"#).unwrap();
        assert_eq!(channels.0, vec![123, 456]);
    }
}
