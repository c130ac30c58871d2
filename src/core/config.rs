//! Bot configuration
//!
//! Values come from the environment (optionally via `.env`). The Discord token may
//! instead live in the legacy `diskhard.json` file (`{"Token": "...", "Name": "..."}`).
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Environment-first configuration with legacy JSON token fallback
//! - 1.0.0: JSON file only

use anyhow::{anyhow, Context as _, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const DEFAULT_STATUS: &str = "可笑しいな";
const DEFAULT_LEGACY_CONFIG: &str = "./diskhard.json";
const DEFAULT_IP_LOOKUP_URL: &str = "https://ipinfo.io/json";
const DEFAULT_RELEASE_NOTIFY_HOUR: u32 = 11;

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub bot_name: String,
    pub log_level: String,
    /// "Playing" status shown once the gateway is ready
    pub status_text: String,
    /// Directory holding the per-handler JSON files
    pub data_dir: PathBuf,
    /// Root under which image block directories are resolved
    pub image_root: PathBuf,
    pub ip_lookup_url: String,
    /// Local hour (0-23) at which release notifications go out
    pub release_notify_hour: u32,
    pub echo_enabled: bool,
    pub fortune_enabled: bool,
    pub fortune_database: Option<String>,
}

/// Shape of the legacy `diskhard.json` file
#[derive(Debug, Default, Deserialize)]
struct LegacyConfig {
    #[serde(rename = "Token", default)]
    token: String,
    #[serde(rename = "Name", default)]
    name: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);
        let legacy_path = vars
            .non_empty("DISKHARD_CONFIG")
            .unwrap_or_else(|| DEFAULT_LEGACY_CONFIG.to_string());

        let (discord_token, legacy_name) = match vars.non_empty("DISCORD_TOKEN") {
            Some(token) => (token, None),
            None => {
                let legacy = load_legacy(Path::new(&legacy_path))?;
                if legacy.token.is_empty() {
                    return Err(anyhow!(
                        "DISCORD_TOKEN is not set and {legacy_path} has no Token"
                    ));
                }
                (legacy.token, Some(legacy.name).filter(|n| !n.is_empty()))
            }
        };

        let bot_name = vars
            .non_empty("BOT_NAME")
            .or(legacy_name)
            .unwrap_or_else(|| "DisKhard".to_string());

        let release_notify_hour = vars.parse("RELEASE_NOTIFY_HOUR", DEFAULT_RELEASE_NOTIFY_HOUR)?;
        if release_notify_hour > 23 {
            return Err(anyhow!(
                "RELEASE_NOTIFY_HOUR must be between 0 and 23, got {release_notify_hour}"
            ));
        }

        Ok(Config {
            discord_token,
            bot_name,
            log_level: vars.or("LOG_LEVEL", "info"),
            status_text: vars.or("BOT_STATUS", DEFAULT_STATUS),
            data_dir: PathBuf::from(vars.or("DATA_DIR", ".")),
            image_root: PathBuf::from(vars.or("IMAGE_ROOT", "./reader")),
            ip_lookup_url: vars.or("IP_LOOKUP_URL", DEFAULT_IP_LOOKUP_URL),
            release_notify_hour,
            echo_enabled: vars.parse("ECHO_ENABLED", false)?,
            fortune_enabled: vars.parse("FORTUNE_ENABLED", false)?,
            fortune_database: vars.non_empty("FORTUNE_DATABASE"),
        })
    }

    /// Path of a handler data file inside the data directory
    pub fn data_file(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn non_empty(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|v| !v.trim().is_empty())
    }

    fn or(&self, name: &str, default: &str) -> String {
        (self.0)(name).unwrap_or_else(|| default.to_string())
    }

    fn parse<T>(&self, name: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.non_empty(name) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| anyhow!("Invalid value for {name} ({raw}): {e}")),
            None => Ok(default),
        }
    }
}

fn load_legacy(path: &Path) -> Result<LegacyConfig> {
    if !path.exists() {
        return Ok(LegacyConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}
