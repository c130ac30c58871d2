//! # Keyword Reactions Feature
//!
//! Reacts to any message matching a configured trigger pattern.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

use anyhow::Result;
use async_trait::async_trait;
use log::{info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::commands::{FeatureHandler, IncomingMessage};
use crate::core::JsonStore;
use crate::messenger::Messenger;

/// Data file name under the data directory
pub const DATA_FILE: &str = "reactionData.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReactionRule {
    #[serde(rename = "TriggerWord")]
    pub trigger_word: String,
    #[serde(rename = "Reaction")]
    pub reaction: String,
}

pub struct ReactionHandler {
    messenger: Arc<dyn Messenger>,
    rules: Vec<(Regex, String)>,
}

impl ReactionHandler {
    /// Compile the rules, skipping any trigger that is not a valid pattern.
    ///
    /// Triggers are searched for anywhere in the message, on any line. An
    /// alternation like `cat|dog` matches either word anywhere.
    pub fn new(rules: Vec<ReactionRule>, messenger: Arc<dyn Messenger>) -> Self {
        let rules = rules
            .into_iter()
            .filter_map(|rule| match Regex::new(&rule.trigger_word) {
                Ok(pattern) => Some((pattern, rule.reaction)),
                Err(e) => {
                    warn!("Skipping reaction trigger {:?}: {e}", rule.trigger_word);
                    None
                }
            })
            .collect();

        Self { messenger, rules }
    }

    pub async fn load(store: &JsonStore, messenger: Arc<dyn Messenger>) -> Result<Self> {
        let rules: Vec<ReactionRule> = store.load().await?;
        let handler = Self::new(rules, messenger);
        info!("😀 Loaded {} reaction trigger(s)", handler.rules.len());
        Ok(handler)
    }
}

#[async_trait]
impl FeatureHandler for ReactionHandler {
    fn name(&self) -> &'static str {
        "reactions"
    }

    async fn handle_message(&self, message: &IncomingMessage) -> Result<()> {
        for (pattern, reaction) in &self.rules {
            if !pattern.is_match(&message.content) {
                continue;
            }
            if let Err(e) = self
                .messenger
                .react(message.channel_id, message.message_id, reaction)
                .await
            {
                warn!("Could not react with {reaction}: {e}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messenger::testing::{RecordingMessenger, Sent};

    fn rule(trigger: &str, reaction: &str) -> ReactionRule {
        ReactionRule {
            trigger_word: trigger.to_string(),
            reaction: reaction.to_string(),
        }
    }

    fn message(content: &str) -> IncomingMessage {
        IncomingMessage {
            channel_id: 1,
            message_id: 2,
            author_id: 3,
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_reacts_once_per_matching_rule() {
        let messenger = RecordingMessenger::new();
        let handler = ReactionHandler::new(
            vec![
                rule("pizza", "🍕"),
                rule("(?i)party", "🎉"),
                rule("tacos", "🌮"),
            ],
            messenger.clone(),
        );

        handler
            .handle_message(&message("Pizza party with pizza"))
            .await
            .unwrap();

        let reactions: Vec<String> = messenger
            .sent()
            .into_iter()
            .map(|s| match s {
                Sent::Reaction {
                    message_id,
                    reaction,
                    ..
                } => {
                    assert_eq!(message_id, 2);
                    reaction
                }
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(reactions, vec!["🍕".to_string(), "🎉".to_string()]);
    }

    #[tokio::test]
    async fn test_triggers_match_on_any_line() {
        let messenger = RecordingMessenger::new();
        let handler = ReactionHandler::new(
            vec![rule("pizza", "🍕"), rule("cat|dog", "🐾")],
            messenger.clone(),
        );

        handler
            .handle_message(&message("first line\nwho wants pizza?\nlast line"))
            .await
            .unwrap();
        handler
            .handle_message(&message("grab a hotdog\nplease"))
            .await
            .unwrap();
        handler
            .handle_message(&message("nothing\nhere"))
            .await
            .unwrap();

        let reactions: Vec<Sent> = messenger.sent();
        assert_eq!(reactions.len(), 2);
        assert!(matches!(&reactions[0], Sent::Reaction { reaction, .. } if reaction == "🍕"));
        assert!(matches!(&reactions[1], Sent::Reaction { reaction, .. } if reaction == "🐾"));
    }

    #[tokio::test]
    async fn test_invalid_trigger_is_skipped() {
        let messenger = RecordingMessenger::new();
        let handler = ReactionHandler::new(
            vec![rule("(unclosed", "❌"), rule("ok", "👍")],
            messenger.clone(),
        );
        assert_eq!(handler.rules.len(), 1);

        handler.handle_message(&message("(unclosed ok")).await.unwrap();
        assert_eq!(messenger.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_load_from_legacy_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DATA_FILE);
        std::fs::write(
            &path,
            r#"[{"TriggerWord":"kappa","Reaction":"kappa:123456"}]"#,
        )
        .unwrap();

        let messenger = RecordingMessenger::new();
        let handler = ReactionHandler::load(&JsonStore::new(&path), messenger.clone())
            .await
            .unwrap();
        handler.handle_message(&message("kappa")).await.unwrap();

        assert_eq!(
            messenger.sent(),
            vec![Sent::Reaction {
                channel_id: 1,
                message_id: 2,
                reaction: "kappa:123456".to_string(),
            }]
        );
    }
}
