//! # Release Watch Feature
//!
//! Per-channel list of upcoming releases, kept in a pinned message and announced a
//! week ahead, a day ahead and on the day.
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Slash command subcommands, pinned message id saved with each change
//! - 1.0.0: Initial `/rw` message command

pub mod date;
pub mod tracker;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::snowflake;
use crate::core::store::null_default;

pub use date::{compare_releases, parse_quarter, parse_release_date, sort_releases};
pub use tracker::ReleaseHandler;

/// Data file name under the data directory
pub const DATA_FILE: &str = "releaseData.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Release {
    pub name: String,
    /// Date exactly as the user typed it
    #[serde(rename = "releasedate")]
    pub release_date: String,
    #[serde(skip)]
    pub parsed_date: Option<NaiveDate>,
}

impl Release {
    pub fn new(name: impl Into<String>, release_date: impl Into<String>) -> Self {
        let mut release = Release {
            name: name.into(),
            release_date: release_date.into(),
            parsed_date: None,
        };
        release.reparse();
        release
    }

    /// Refresh `parsed_date` from the stored date text
    pub fn reparse(&mut self) {
        self.parsed_date = parse_release_date(&self.release_date);
    }

    /// Date as shown in the list: `MM-DD-YYYY`, or the raw text when freeform
    pub fn display_date(&self) -> String {
        match self.parsed_date {
            Some(date) => date.format("%m-%d-%Y").to_string(),
            None => self.release_date.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelReleases {
    #[serde(rename = "channelID", with = "snowflake")]
    pub channel_id: u64,
    #[serde(rename = "pinnedMessageID", with = "snowflake::option", default)]
    pub pinned_message_id: Option<u64>,
    #[serde(rename = "releaseData", deserialize_with = "null_default", default)]
    pub releases: Vec<Release>,
}

impl ChannelReleases {
    pub fn new(channel_id: u64) -> Self {
        Self {
            channel_id,
            ..Default::default()
        }
    }
}

/// Body of the list reply and of the pinned message
pub fn format_release_list(releases: &[Release]) -> String {
    let mut list = String::from("Here are my currently tracked releases:\n");

    if releases.is_empty() {
        list.push_str("<No tracked releases>");
    }
    for (index, release) in releases.iter().enumerate() {
        list.push_str(&format!(
            "{} {} [{index}]\n",
            release.display_date(),
            release.name
        ));
    }

    list
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_empty_list() {
        assert_eq!(
            format_release_list(&[]),
            "Here are my currently tracked releases:\n<No tracked releases>"
        );
    }

    #[test]
    fn test_format_list_lines() {
        let releases = vec![
            Release::new("Game", "3/4/30"),
            Release::new("Movie", "Q12031"),
        ];
        assert_eq!(
            format_release_list(&releases),
            "Here are my currently tracked releases:\n03-04-2030 Game [0]\nQ12031 Movie [1]\n"
        );
    }

    #[test]
    fn test_legacy_file_shape() {
        let json = r#"[{"channelID":"123","pinnedMessageID":"","releaseData":[
            {"name":"Game","releasedate":"12/25/2030","ParsedDate":"2030-12-25T00:00:00Z"}
        ]},{"channelID":"456","pinnedMessageID":"789","releaseData":null}]"#;

        let channels: Vec<ChannelReleases> = serde_json::from_str(json).unwrap();
        assert_eq!(channels[0].channel_id, 123);
        assert_eq!(channels[0].pinned_message_id, None);
        assert_eq!(channels[0].releases[0].release_date, "12/25/2030");
        assert_eq!(channels[1].pinned_message_id, Some(789));
        assert!(channels[1].releases.is_empty());

        let written = serde_json::to_value(&channels[1]).unwrap();
        assert_eq!(written["channelID"], "456");
        assert_eq!(written["pinnedMessageID"], "789");
    }
}
