//! # Reminders Feature
//!
//! Weekly recurring reminders per channel. Users subscribe to a reminder and get
//! mentioned whenever it fires.
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Slash command subcommands, day letters de-duplicated
//! - 1.0.0: Initial `/remind` message command

pub mod handler;
pub mod table;

use serde::{Deserialize, Serialize};

use crate::core::snowflake;
use crate::core::store::null_default;

pub use handler::ReminderHandler;
pub use table::format_reminder_table;

/// Data file name under the data directory
pub const DATA_FILE: &str = "ReminderData.json";

/// Day letters accepted by `create`, as `(letter, weekday)` with Sunday = 0
pub const DAY_LETTERS: [(char, u32); 14] = [
    ('U', 0),
    ('日', 0),
    ('M', 1),
    ('月', 1),
    ('T', 2),
    ('火', 2),
    ('W', 3),
    ('水', 3),
    ('R', 4),
    ('木', 4),
    ('F', 5),
    ('金', 5),
    ('S', 6),
    ('土', 6),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "h")]
    pub hour: u32,
    #[serde(rename = "m")]
    pub minute: u32,
    /// Weekdays, Sunday = 0
    #[serde(rename = "d", deserialize_with = "null_default", default)]
    pub days: Vec<u32>,
    #[serde(with = "snowflake::vec", default)]
    pub notifyees: Vec<u64>,
}

impl Reminder {
    pub fn is_due(&self, hour: u32, minute: u32, weekday: u32) -> bool {
        self.hour == hour && self.minute == minute && self.days.contains(&weekday)
    }

    /// Reminder text followed by a mention of every subscriber
    pub fn announcement(&self) -> String {
        let mut message = self.name.clone();
        for user in &self.notifyees {
            message.push(' ');
            message.push_str(&user_mention(*user));
        }
        message
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelReminders {
    #[serde(rename = "ChannelID", with = "snowflake")]
    pub channel_id: u64,
    #[serde(rename = "Reminders", deserialize_with = "null_default", default)]
    pub reminders: Vec<Reminder>,
}

/// Weekdays named in `text`, sorted and without repeats; unknown characters are ignored
pub fn parse_days(text: &str) -> Vec<u32> {
    let mut days: Vec<u32> = text
        .chars()
        .filter_map(|c| {
            DAY_LETTERS
                .iter()
                .find(|(letter, _)| *letter == c)
                .map(|(_, day)| *day)
        })
        .collect();
    days.sort_unstable();
    days.dedup();
    days
}

pub fn user_mention(user_id: u64) -> String {
    format!("<@!{user_id}>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_days() {
        assert_eq!(parse_days("MWF"), vec![1, 3, 5]);
        assert_eq!(parse_days("月水金"), vec![1, 3, 5]);
        assert_eq!(parse_days("SU"), vec![0, 6]);
        assert_eq!(parse_days("MMm x月"), vec![1]);
        assert!(parse_days("xyz").is_empty());
    }

    #[test]
    fn test_announcement_mentions_subscribers() {
        let reminder = Reminder {
            name: "Anime Time".to_string(),
            notifyees: vec![1, 2],
            ..Default::default()
        };
        assert_eq!(reminder.announcement(), "Anime Time <@!1> <@!2>");
    }

    #[test]
    fn test_is_due() {
        let reminder = Reminder {
            hour: 20,
            minute: 45,
            days: vec![2, 4],
            ..Default::default()
        };
        assert!(reminder.is_due(20, 45, 2));
        assert!(!reminder.is_due(20, 45, 3));
        assert!(!reminder.is_due(20, 46, 2));
    }

    #[test]
    fn test_legacy_file_shape() {
        let json = r#"[{"ChannelID":"99","Reminders":[
            {"n":"Standup","h":9,"m":30,"d":[1,2,3,4,5],"notifyees":["11","22"]}
        ]},{"ChannelID":"100","Reminders":null}]"#;

        let channels: Vec<ChannelReminders> = serde_json::from_str(json).unwrap();
        assert_eq!(channels[0].channel_id, 99);
        assert_eq!(channels[0].reminders[0].notifyees, vec![11, 22]);
        assert!(channels[1].reminders.is_empty());

        let written = serde_json::to_value(&channels[0]).unwrap();
        assert_eq!(written["Reminders"][0]["notifyees"][0], "11");
        assert_eq!(written["Reminders"][0]["d"][4], 5);
    }
}
