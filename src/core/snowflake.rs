//! Serde helpers for Discord snowflake ids.
//!
//! The data files store ids as decimal strings. Numbers are accepted on input.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

fn parse_raw<E: de::Error>(raw: RawId) -> Result<Option<u64>, E> {
    match raw {
        RawId::Number(id) => Ok(Some(id)),
        RawId::Text(text) if text.trim().is_empty() => Ok(None),
        RawId::Text(text) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| E::custom(format!("invalid snowflake id: {text}"))),
    }
}

pub fn serialize<S: Serializer>(id: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(id)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    parse_raw(RawId::deserialize(deserializer)?)?
        .ok_or_else(|| de::Error::custom("empty snowflake id"))
}

/// `Option<u64>` stored as a string, with `""` meaning none
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(id: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => serializer.collect_str(id),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u64>, D::Error> {
        match Option::<RawId>::deserialize(deserializer)? {
            Some(raw) => parse_raw(raw),
            None => Ok(None),
        }
    }
}

/// `Vec<u64>` stored as a list of strings
pub mod vec {
    use super::*;
    use serde::ser::SerializeSeq;

    pub fn serialize<S: Serializer>(ids: &[u64], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(ids.len()))?;
        for id in ids {
            seq.serialize_element(&id.to_string())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u64>, D::Error> {
        let raw = Option::<Vec<RawId>>::deserialize(deserializer)?.unwrap_or_default();
        let mut ids = Vec::with_capacity(raw.len());
        for item in raw {
            if let Some(id) = parse_raw(item)? {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}
