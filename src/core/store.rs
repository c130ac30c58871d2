//! JSON file persistence for handler state
//!
//! Every handler keeps its whole state in memory and rewrites its file after each
//! mutation. A missing file means "no state yet"; an unreadable one is logged and
//! treated the same way so a corrupt file never keeps the bot from starting.
//!
//! - **Version**: 1.0.0
//! - **Since**: 2.0.0

use anyhow::{Context as _, Result};
use log::{debug, info, warn};
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored value, falling back to `T::default()` when there is nothing usable
    pub async fn load<T>(&self) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("📄 No saved data at {} - starting empty", self.path.display());
                return Ok(T::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                info!("📄 Read saved data from {}", self.path.display());
                Ok(value)
            }
            Err(e) => {
                warn!(
                    "⚠️ Ignoring unreadable data file {}: {e}",
                    self.path.display()
                );
                Ok(T::default())
            }
        }
    }

    /// Serialize `value` and replace the file contents
    pub async fn save<T>(&self, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec(value)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        debug!("💾 Saved {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }
}

/// Field deserializer that reads `null` as the default value
///
/// Older data files wrote empty lists as `null`.
pub fn null_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
