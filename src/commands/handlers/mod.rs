//! Construction of every feature handler
//!
//! - **Version**: 3.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 3.0.0: Handlers load their own JSON state; optional echo and fortune handlers
//! - 1.0.0: Initial extraction from monolithic command_handler.rs

use anyhow::Result;
use log::info;
use std::sync::Arc;

use super::handler::FeatureHandler;
use super::registry::HandlerRegistry;
use crate::core::{Config, JsonStore};
use crate::features::{
    fortune, images, reactions, releases, reminders, AlternatingCaseHandler, EchoHandler,
    FortuneHandler, ImageHandler, PublicIpHandler, ReactionHandler, ReleaseHandler,
    ReminderHandler,
};
use crate::messenger::Messenger;

/// Create all configured handlers, loading their saved state
///
/// Order matters: messages and minute ticks reach handlers in this order.
pub async fn create_all_handlers(
    config: &Config,
    messenger: Arc<dyn Messenger>,
) -> Result<Vec<Arc<dyn FeatureHandler>>> {
    let mut handlers: Vec<Arc<dyn FeatureHandler>> = Vec::new();

    if config.echo_enabled {
        handlers.push(Arc::new(EchoHandler));
    }

    handlers.push(Arc::new(AlternatingCaseHandler::new(messenger.clone())));

    handlers.push(Arc::new(
        ReleaseHandler::load(
            JsonStore::new(config.data_file(releases::DATA_FILE)),
            messenger.clone(),
            config.release_notify_hour,
        )
        .await?,
    ));

    handlers.push(Arc::new(
        ReactionHandler::load(
            &JsonStore::new(config.data_file(reactions::DATA_FILE)),
            messenger.clone(),
        )
        .await?,
    ));

    handlers.push(Arc::new(
        ImageHandler::load(
            JsonStore::new(config.data_file(images::DATA_FILE)),
            messenger.clone(),
            config.image_root.clone(),
        )
        .await?,
    ));

    handlers.push(Arc::new(
        ReminderHandler::load(
            JsonStore::new(config.data_file(reminders::DATA_FILE)),
            messenger.clone(),
        )
        .await?,
    ));

    if config.fortune_enabled {
        handlers.push(Arc::new(
            FortuneHandler::load(
                &JsonStore::new(config.data_file(fortune::DATA_FILE)),
                messenger.clone(),
                config.fortune_database.clone(),
            )
            .await?,
        ));
    }

    handlers.push(Arc::new(PublicIpHandler::new(config.ip_lookup_url.clone())?));

    info!("🧩 Created {} feature handlers", handlers.len());
    Ok(handlers)
}

/// Build a registry holding every configured handler
pub async fn create_registry(
    config: &Config,
    messenger: Arc<dyn Messenger>,
) -> Result<HandlerRegistry> {
    let mut registry = HandlerRegistry::new();
    for handler in create_all_handlers(config, messenger).await? {
        registry.register(handler);
    }
    Ok(registry)
}
