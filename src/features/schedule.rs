//! # Minute Scheduler
//!
//! Wall-clock minute ticks for every handler's `scheduled_task`. Each handler runs on
//! its own task, so a slow handler delays only itself. Minutes a handler overran are
//! replayed once it catches up.
//!
//! - **Version**: 1.1.0
//! - **Since**: 2.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: One ticker per handler, replay of overrun minutes
//! - 1.0.0: Shared ticker

use chrono::{Duration as ChronoDuration, Local, NaiveDateTime, Timelike};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

use crate::commands::{FeatureHandler, HandlerRegistry};

/// Most minutes replayed after one overrun or clock jump
pub const MAX_CATCH_UP_MINUTES: i64 = 60;

pub struct MinuteScheduler {
    registry: HandlerRegistry,
}

impl MinuteScheduler {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self { registry }
    }

    /// Start one ticker per handler and run until they all stop
    pub async fn run(self) {
        info!(
            "⏰ Minute scheduler started for {} handler(s)",
            self.registry.len()
        );

        let mut tickers = JoinSet::new();
        for handler in self.registry.handlers() {
            tickers.spawn(HandlerTicker::new(Arc::clone(handler)).run());
        }

        while let Some(result) = tickers.join_next().await {
            if let Err(e) = result {
                error!("Handler ticker stopped: {e}");
            }
        }
    }
}

/// Minute ticks for a single handler
pub struct HandlerTicker {
    handler: Arc<dyn FeatureHandler>,
    last_tick: Option<NaiveDateTime>,
}

impl HandlerTicker {
    pub fn new(handler: Arc<dyn FeatureHandler>) -> Self {
        Self {
            handler,
            last_tick: None,
        }
    }

    pub fn last_tick(&self) -> Option<NaiveDateTime> {
        self.last_tick
    }

    async fn run(mut self) {
        loop {
            tokio::time::sleep(until_next_minute(Local::now().naive_local())).await;
            self.advance(truncate_to_minute(Local::now().naive_local()))
                .await;
        }
    }

    /// Run the handler for every minute since the last tick, up to and including `now`
    pub async fn advance(&mut self, now: NaiveDateTime) {
        let due = due_minutes(self.last_tick, now);
        if let (Some(last), Some(first)) = (self.last_tick, due.first()) {
            if *first - last > ChronoDuration::minutes(1) {
                warn!(
                    "⏰ {} skipped ticks between {last} and {first}",
                    self.handler.name()
                );
            }
        }

        for minute in due {
            debug!("⏰ Tick {minute} for {}", self.handler.name());
            if let Err(e) = self.handler.scheduled_task(minute).await {
                error!("Scheduled task for {} failed: {e:#}", self.handler.name());
            }
            self.last_tick = Some(minute);
        }
    }
}

/// Minutes still owed after `last`, ending at `now`.
///
/// The first tick is just `now`. Nothing is due when `now` is not past `last`, which
/// covers early wakeups and clocks stepping back. At most [`MAX_CATCH_UP_MINUTES`]
/// minutes are returned; older ones are dropped.
pub fn due_minutes(last: Option<NaiveDateTime>, now: NaiveDateTime) -> Vec<NaiveDateTime> {
    let now = truncate_to_minute(now);
    let Some(last) = last else {
        return vec![now];
    };
    if now <= last {
        return Vec::new();
    }

    let earliest = now - ChronoDuration::minutes(MAX_CATCH_UP_MINUTES - 1);
    let mut minute = (last + ChronoDuration::minutes(1)).max(earliest);
    let mut due = Vec::new();
    while minute <= now {
        due.push(minute);
        minute += ChronoDuration::minutes(1);
    }
    due
}

pub fn truncate_to_minute(time: NaiveDateTime) -> NaiveDateTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

/// Time left until the next minute boundary
pub fn until_next_minute(now: NaiveDateTime) -> Duration {
    let into_minute =
        Duration::from_secs(u64::from(now.second())) + Duration::from_nanos(u64::from(now.nanosecond()));
    Duration::from_secs(60).saturating_sub(into_minute).max(Duration::from_millis(1))
}
