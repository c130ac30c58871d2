//! # Public IP Feature
//!
//! `/whats-my-ip` asks an ipinfo-style endpoint which address the bot is reachable at.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Configurable lookup URL, explicit failure reply
//! - 1.0.0: Initial implementation

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{info, warn};
use serde::Deserialize;
use serenity::builder::CreateApplicationCommand;
use std::time::Duration;

use crate::commands::slash;
use crate::commands::{CommandRequest, FeatureHandler};

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(1);
const LOOKUP_FAILED: &str = "I couldn't work out my public IP right now.";

/// The part of the ipinfo response we use
#[derive(Debug, Deserialize)]
struct IpInfo {
    ip: String,
}

pub struct PublicIpHandler {
    client: reqwest::Client,
    lookup_url: String,
}

impl PublicIpHandler {
    pub fn new(lookup_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            lookup_url: lookup_url.into(),
        })
    }

    /// Ask the lookup service for our public address
    pub async fn lookup(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.lookup_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow!("IP lookup timed out after {LOOKUP_TIMEOUT:?}")
                } else {
                    anyhow!("IP lookup failed: {e}")
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("IP lookup returned HTTP {status}"));
        }

        let info: IpInfo = response.json().await?;
        if info.ip.is_empty() {
            return Err(anyhow!("IP lookup response had no address"));
        }
        Ok(info.ip)
    }
}

#[async_trait]
impl FeatureHandler for PublicIpHandler {
    fn name(&self) -> &'static str {
        "public_ip"
    }

    fn command_names(&self) -> &'static [&'static str] {
        &["whats-my-ip"]
    }

    fn create_commands(&self) -> Vec<CreateApplicationCommand> {
        slash::text::create_public_ip_commands()
    }

    async fn handle_command(&self, request: &CommandRequest) -> Result<String> {
        match self.lookup().await {
            Ok(ip) => {
                info!("🌐 Public IP requested by {}", request.user_id);
                Ok(format!("My publicly accessible IP is: {ip}"))
            }
            Err(e) => {
                warn!("{e:#}");
                Ok(LOOKUP_FAILED.to_string())
            }
        }
    }
}
