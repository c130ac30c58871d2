//! # Image Rotation Feature
//!
//! Posts the files of a directory a few at a time, on a weekly or daily schedule or
//! on demand, remembering where each channel's rotation left off.
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Slash command subcommands, Sunday schedules, directory sandboxing
//! - 1.0.0: Initial `/i` message command

pub mod files;
pub mod rotation;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::snowflake;
use crate::core::store::null_default;

pub use files::{list_block_files, resolve_block_dir};
pub use rotation::ImageHandler;

/// Data file name under the data directory
pub const DATA_FILE: &str = "imageData.json";

/// Choices offered by `/image schedule frequency`
pub const FREQUENCY_NAMES: [&str; 9] = [
    "manual",
    "daily",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

const WEEKDAY_NAMES: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// When a block posts on its own.
///
/// Stored as a number: -1 manual, 0-6 a weekday (Sunday = 0), 7 daily.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Frequency {
    Manual,
    Weekly(u32),
    Daily,
}

impl Frequency {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "manual" => Some(Frequency::Manual),
            "daily" => Some(Frequency::Daily),
            _ => WEEKDAY_NAMES
                .iter()
                .position(|day| *day == name)
                .map(|day| Frequency::Weekly(day as u32)),
        }
    }

    /// Whether a scheduled post is due on `weekday` (Sunday = 0)
    pub fn runs_on(&self, weekday: u32) -> bool {
        match self {
            Frequency::Manual => false,
            Frequency::Daily => true,
            Frequency::Weekly(day) => *day == weekday,
        }
    }
}

impl TryFrom<i32> for Frequency {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Frequency::Manual),
            0..=6 => Ok(Frequency::Weekly(value as u32)),
            7 => Ok(Frequency::Daily),
            other => Err(format!("invalid image schedule {other}")),
        }
    }
}

impl From<Frequency> for i32 {
    fn from(frequency: Frequency) -> Self {
        match frequency {
            Frequency::Manual => -1,
            Frequency::Weekly(day) => day as i32,
            Frequency::Daily => 7,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Manual => write!(f, "manual"),
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekly(day) => {
                write!(f, "{}", WEEKDAY_NAMES.get(*day as usize).unwrap_or(&"?"))
            }
        }
    }
}

/// One rotating directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub dir: String,
    /// Index of the next file to post
    pub current: usize,
    #[serde(rename = "Schedule")]
    pub schedule: Frequency,
    #[serde(rename = "Repeat")]
    pub repeat: bool,
    #[serde(rename = "Hour")]
    pub hour: u32,
    /// Files posted per showing
    #[serde(rename = "Multiplier")]
    pub count: usize,
}

impl ImageBlock {
    /// Range of files making up the next page, moving the cursor past them
    pub fn advance(&mut self, total: usize) -> std::ops::Range<usize> {
        let start = self.current.min(total);
        let end = start + self.count.min(total - start);
        self.current = end;
        start..end
    }

    /// Rewind a finished repeating block. Returns true when a non-repeating block is done.
    pub fn wrap(&mut self, total: usize) -> bool {
        if self.current < total {
            return false;
        }
        if self.repeat {
            self.current = 0;
            false
        } else {
            true
        }
    }

    pub fn describe(&self, total: usize) -> String {
        let schedule = match self.schedule {
            Frequency::Manual => "manual".to_string(),
            other => format!("{other} at {:02}:00", self.hour),
        };
        format!(
            "{} Page: {} / {total} ({schedule})",
            self.dir,
            self.current + 1
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelImages {
    #[serde(rename = "channelID", with = "snowflake")]
    pub channel_id: u64,
    #[serde(rename = "imageData", deserialize_with = "null_default", default)]
    pub blocks: Vec<ImageBlock>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(count: usize, repeat: bool) -> ImageBlock {
        ImageBlock {
            dir: "comic".to_string(),
            current: 0,
            schedule: Frequency::Daily,
            repeat,
            hour: 9,
            count,
        }
    }

    #[test]
    fn test_frequency_names() {
        assert_eq!(Frequency::from_name("manual"), Some(Frequency::Manual));
        assert_eq!(Frequency::from_name("daily"), Some(Frequency::Daily));
        assert_eq!(Frequency::from_name("sunday"), Some(Frequency::Weekly(0)));
        assert_eq!(Frequency::from_name("saturday"), Some(Frequency::Weekly(6)));
        assert_eq!(Frequency::from_name("someday"), None);
        assert!(FREQUENCY_NAMES
            .iter()
            .all(|name| Frequency::from_name(name).is_some()));
    }

    #[test]
    fn test_frequency_runs_on() {
        assert!(Frequency::Weekly(0).runs_on(0));
        assert!(!Frequency::Weekly(0).runs_on(1));
        assert!(Frequency::Daily.runs_on(4));
        assert!(!Frequency::Manual.runs_on(4));
    }

    #[test]
    fn test_frequency_stored_as_number() {
        assert_eq!(serde_json::to_string(&Frequency::Manual).unwrap(), "-1");
        assert_eq!(serde_json::to_string(&Frequency::Daily).unwrap(), "7");
        assert_eq!(
            serde_json::from_str::<Frequency>("3").unwrap(),
            Frequency::Weekly(3)
        );
        assert!(serde_json::from_str::<Frequency>("8").is_err());
    }

    #[test]
    fn test_advance_and_wrap() {
        let mut repeating = block(2, true);
        assert_eq!(repeating.advance(5), 0..2);
        assert_eq!(repeating.advance(5), 2..4);
        assert!(!repeating.wrap(5));
        assert_eq!(repeating.advance(5), 4..5);
        assert!(!repeating.wrap(5));
        assert_eq!(repeating.current, 0);

        let mut once = block(3, false);
        assert_eq!(once.advance(3), 0..3);
        assert!(once.wrap(3));
        assert_eq!(once.advance(3), 3..3);
    }

    #[test]
    fn test_legacy_file_shape() {
        let json = r#"[{"channelID":"77","imageData":[
            {"dir":"comic","current":4,"Schedule":1,"Repeat":false,"Hour":9,"Multiplier":2}
        ]}]"#;
        let channels: Vec<ChannelImages> = serde_json::from_str(json).unwrap();
        let block = &channels[0].blocks[0];
        assert_eq!(block.schedule, Frequency::Weekly(1));
        assert_eq!(block.count, 2);
        assert_eq!(block.describe(10), "comic Page: 5 / 10 (monday at 09:00)");
    }
}
