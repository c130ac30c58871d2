//! Image rotation handler: commands and the on-the-hour posting

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDateTime, Timelike};
use log::{error, info, warn};
use serenity::builder::CreateApplicationCommand;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{list_block_files, ChannelImages, Frequency, ImageBlock};
use crate::commands::slash;
use crate::commands::{CommandRequest, FeatureHandler};
use crate::core::JsonStore;
use crate::messenger::Messenger;

const LIST_FAILED: &str = "Could not list out files for image block";

/// Cheap to clone; clones share state so `next` can finish in a background task
#[derive(Clone)]
pub struct ImageHandler {
    inner: Arc<Inner>,
}

struct Inner {
    messenger: Arc<dyn Messenger>,
    store: JsonStore,
    image_root: PathBuf,
    channels: Mutex<BTreeMap<u64, ChannelImages>>,
}

/// Work left over once the state lock is released
enum Outgoing {
    Page { channel_id: u64, files: Vec<PathBuf> },
    ListFailed { channel_id: u64 },
}

/// Move the block past its next page. Returns the page and whether a
/// non-repeating block is now finished.
fn claim_page(block: &mut ImageBlock, files: &[PathBuf]) -> (Vec<PathBuf>, bool) {
    let page = files[block.advance(files.len())].to_vec();
    let finished = block.wrap(files.len());
    (page, finished)
}

impl ImageHandler {
    pub async fn load(
        store: JsonStore,
        messenger: Arc<dyn Messenger>,
        image_root: impl Into<PathBuf>,
    ) -> Result<Self> {
        let saved: Vec<ChannelImages> = store.load().await?;
        let channels: BTreeMap<u64, ChannelImages> = saved
            .into_iter()
            .map(|channel| (channel.channel_id, channel))
            .collect();
        info!("🖼️ Loaded image blocks for {} channel(s)", channels.len());

        Ok(Self {
            inner: Arc::new(Inner {
                messenger,
                store,
                image_root: image_root.into(),
                channels: Mutex::new(channels),
            }),
        })
    }

    fn image_root(&self) -> &Path {
        &self.inner.image_root
    }

    pub async fn list(&self, channel_id: u64) -> String {
        let channels = self.inner.channels.lock().await;
        let Some(channel) = channels.get(&channel_id).filter(|c| !c.blocks.is_empty()) else {
            return "No image block data exists for this channel!".to_string();
        };

        let mut message = String::from("Image Block Data\n");
        for block in &channel.blocks {
            match list_block_files(self.image_root(), &block.dir) {
                Ok(files) => {
                    message.push_str(&block.describe(files.len()));
                    message.push('\n');
                }
                Err(e) => warn!("Skipping image block {} in list: {e:#}", block.dir),
            }
        }
        message
    }

    pub async fn schedule(
        &self,
        channel_id: u64,
        dir: &str,
        frequency: &str,
        hour: i64,
        count: i64,
        repeat: bool,
    ) -> Result<String> {
        let Some(schedule) = Frequency::from_name(frequency) else {
            return Ok(format!("{frequency} is not a valid schedule"));
        };
        if list_block_files(self.image_root(), dir).is_err() {
            return Ok(format!("{dir} is not a valid image directory"));
        }
        let Some(hour) = u32::try_from(hour).ok().filter(|h| *h <= 23) else {
            return Ok("Hour must be between 0 and 23".to_string());
        };
        let Some(count) = usize::try_from(count).ok().filter(|c| *c >= 1) else {
            return Ok("Count must be at least 1".to_string());
        };

        let block = ImageBlock {
            dir: dir.to_string(),
            current: 0,
            schedule,
            repeat,
            hour,
            count,
        };

        let mut channels = self.inner.channels.lock().await;
        channels
            .entry(channel_id)
            .or_insert_with(|| ChannelImages {
                channel_id,
                blocks: Vec::new(),
            })
            .blocks
            .push(block);
        self.save(&channels).await?;

        info!("🖼️ Scheduled {dir} ({schedule}) in channel {channel_id}");
        Ok("Scheduled image rotation".to_string())
    }

    /// Check the block exists and post its next page in the background
    pub async fn next(&self, channel_id: u64, name: &str) -> String {
        {
            let channels = self.inner.channels.lock().await;
            let Some(channel) = channels.get(&channel_id) else {
                return "No image groups on this channel!".to_string();
            };
            if !channel.blocks.iter().any(|b| b.dir == name) {
                return "Specified image group does not exist!".to_string();
            }
        }

        let handler = self.clone();
        let dir = name.to_string();
        tokio::spawn(async move {
            if let Err(e) = handler.show_next(channel_id, &dir).await {
                error!("Failed to show next images for {dir}: {e:#}");
            }
        });

        format!("Displaying next image(s) for {name}")
    }

    /// Post the next page of a block now
    pub async fn show_next(&self, channel_id: u64, name: &str) -> Result<()> {
        let page = {
            let mut channels = self.inner.channels.lock().await;
            let Some(block) = channels
                .get_mut(&channel_id)
                .and_then(|c| c.blocks.iter_mut().find(|b| b.dir == name))
            else {
                return Ok(());
            };

            let files = list_block_files(self.image_root(), &block.dir)?;
            let (page, _finished) = claim_page(block, &files);
            self.save(&channels).await?;
            page
        };

        self.upload(channel_id, &page).await;
        Ok(())
    }

    /// Post every block scheduled for this hour. Runs only on the hour.
    ///
    /// Pages are claimed and saved under the lock; uploads happen after it is released.
    pub async fn run_schedule(&self, now: NaiveDateTime) -> Result<()> {
        if now.minute() != 0 {
            return Ok(());
        }
        let weekday = now.weekday().num_days_from_sunday();

        let (outgoing, saved) = {
            let mut channels = self.inner.channels.lock().await;
            let mut outgoing = Vec::new();
            let mut shown = false;

            for channel in channels.values_mut() {
                let channel_id = channel.channel_id;
                let mut kept = Vec::with_capacity(channel.blocks.len());

                for mut block in std::mem::take(&mut channel.blocks) {
                    if !block.schedule.runs_on(weekday) || block.hour != now.hour() {
                        kept.push(block);
                        continue;
                    }

                    match list_block_files(self.image_root(), &block.dir) {
                        Ok(files) => {
                            let (page, finished) = claim_page(&mut block, &files);
                            outgoing.push(Outgoing::Page {
                                channel_id,
                                files: page,
                            });
                            shown = true;
                            if finished {
                                info!("🖼️ Finished image block {} in channel {channel_id}", block.dir);
                                continue;
                            }
                        }
                        Err(e) => {
                            warn!("Could not list image block {}: {e:#}", block.dir);
                            outgoing.push(Outgoing::ListFailed { channel_id });
                        }
                    }
                    kept.push(block);
                }

                channel.blocks = kept;
            }

            let saved = if shown {
                self.save(&channels).await
            } else {
                Ok(())
            };
            (outgoing, saved)
        };

        for item in outgoing {
            match item {
                Outgoing::Page { channel_id, files } => self.upload(channel_id, &files).await,
                Outgoing::ListFailed { channel_id } => {
                    if let Err(e) = self.inner.messenger.send_message(channel_id, LIST_FAILED).await {
                        warn!("Could not report listing failure: {e}");
                    }
                }
            }
        }
        saved
    }

    async fn upload(&self, channel_id: u64, files: &[PathBuf]) {
        for path in files {
            if let Err(e) = self.inner.messenger.send_file(channel_id, path).await {
                warn!("Could not post {}: {e}", path.display());
            }
        }
    }

    async fn save(&self, channels: &BTreeMap<u64, ChannelImages>) -> Result<()> {
        let data: Vec<&ChannelImages> = channels.values().collect();
        self.inner.store.save(&data).await
    }
}

#[async_trait]
impl FeatureHandler for ImageHandler {
    fn name(&self) -> &'static str {
        "images"
    }

    fn command_names(&self) -> &'static [&'static str] {
        &["image"]
    }

    fn create_commands(&self) -> Vec<CreateApplicationCommand> {
        slash::images::create_commands()
    }

    async fn handle_command(&self, request: &CommandRequest) -> Result<String> {
        let channel_id = request.channel_id;

        match request.subcommand.as_deref() {
            Some("list") => Ok(self.list(channel_id).await),
            Some("schedule") => {
                let dir = request.require_string("directory")?;
                let frequency = request.require_string("frequency")?;
                let hour = request.require_integer("hour")?;
                let count = request.require_integer("count")?;
                let repeat = request.require_boolean("repeat")?;
                self.schedule(channel_id, &dir, &frequency, hour, count, repeat)
                    .await
            }
            Some("next") => {
                let name = request.require_string("name")?;
                Ok(self.next(channel_id, &name).await)
            }
            other => bail!("Unknown image subcommand: {other:?}"),
        }
    }

    async fn scheduled_task(&self, now: NaiveDateTime) -> Result<()> {
        self.run_schedule(now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messenger::testing::RecordingMessenger;
    use chrono::NaiveDate;
    use std::fs;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    const CHANNEL: u64 = 900;

    struct Fixture {
        data: tempfile::TempDir,
        root: tempfile::TempDir,
        handler: ImageHandler,
        messenger: Arc<RecordingMessenger>,
    }

    async fn fixture(files: &[&str]) -> Fixture {
        let data = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let comic = root.path().join("comic");
        fs::create_dir_all(&comic).unwrap();
        for name in files {
            fs::write(comic.join(name), name.as_bytes()).unwrap();
        }

        let messenger = RecordingMessenger::new();
        let handler = ImageHandler::load(
            JsonStore::new(data.path().join("imageData.json")),
            messenger.clone(),
            root.path(),
        )
        .await
        .unwrap();

        Fixture {
            data,
            root,
            handler,
            messenger,
        }
    }

    // 2030-03-10 is a Sunday
    fn sunday_at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 3, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_schedule_validation() {
        let f = fixture(&["1.png"]).await;

        assert_eq!(
            f.handler.schedule(CHANNEL, "comic", "someday", 9, 1, true).await.unwrap(),
            "someday is not a valid schedule"
        );
        assert_eq!(
            f.handler.schedule(CHANNEL, "missing", "daily", 9, 1, true).await.unwrap(),
            "missing is not a valid image directory"
        );
        assert_eq!(
            f.handler.schedule(CHANNEL, "../comic", "daily", 9, 1, true).await.unwrap(),
            "../comic is not a valid image directory"
        );
        assert_eq!(
            f.handler.schedule(CHANNEL, "comic", "daily", 24, 1, true).await.unwrap(),
            "Hour must be between 0 and 23"
        );
        assert_eq!(
            f.handler.schedule(CHANNEL, "comic", "daily", 9, 0, true).await.unwrap(),
            "Count must be at least 1"
        );
        assert_eq!(
            f.handler.list(CHANNEL).await,
            "No image block data exists for this channel!"
        );

        assert_eq!(
            f.handler.schedule(CHANNEL, "comic", "daily", 9, 1, true).await.unwrap(),
            "Scheduled image rotation"
        );
        assert_eq!(
            f.handler.list(CHANNEL).await,
            "Image Block Data\ncomic Page: 1 / 1 (daily at 09:00)\n"
        );
    }

    #[tokio::test]
    async fn test_sunday_schedule_posts_and_repeats() {
        let f = fixture(&["1.png", "2.png", "3.png"]).await;
        f.handler
            .schedule(CHANNEL, "comic", "sunday", 9, 2, true)
            .await
            .unwrap();

        f.handler.run_schedule(sunday_at(8, 0)).await.unwrap();
        f.handler.run_schedule(sunday_at(9, 1)).await.unwrap();
        assert!(f.messenger.sent().is_empty());

        f.handler.run_schedule(sunday_at(9, 0)).await.unwrap();
        assert_eq!(f.messenger.files(), vec!["1.png", "2.png"]);

        f.messenger.clear();
        f.handler.run_schedule(sunday_at(9, 0)).await.unwrap();
        assert_eq!(f.messenger.files(), vec!["3.png"]);

        // Wrapped back to the start
        f.messenger.clear();
        f.handler.run_schedule(sunday_at(9, 0)).await.unwrap();
        assert_eq!(f.messenger.files(), vec!["1.png", "2.png"]);
    }

    #[tokio::test]
    async fn test_finished_block_is_removed() {
        let f = fixture(&["1.png", "2.png"]).await;
        f.handler
            .schedule(CHANNEL, "comic", "daily", 9, 5, false)
            .await
            .unwrap();

        f.handler.run_schedule(sunday_at(9, 0)).await.unwrap();
        assert_eq!(f.messenger.files().len(), 2);
        assert_eq!(
            f.handler.list(CHANNEL).await,
            "No image block data exists for this channel!"
        );

        let saved = fs::read_to_string(f.data.path().join("imageData.json")).unwrap();
        assert!(!saved.contains("comic"));
    }

    #[tokio::test]
    async fn test_missing_directory_is_reported() {
        let f = fixture(&["1.png"]).await;
        f.handler
            .schedule(CHANNEL, "comic", "daily", 9, 1, true)
            .await
            .unwrap();
        fs::remove_dir_all(f.root.path().join("comic")).unwrap();

        f.handler.run_schedule(sunday_at(9, 0)).await.unwrap();
        assert_eq!(f.messenger.messages(), vec![LIST_FAILED.to_string()]);
    }

    #[tokio::test]
    async fn test_manual_block_only_moves_on_request() {
        let f = fixture(&["1.png", "2.png"]).await;
        f.handler
            .schedule(CHANNEL, "comic", "manual", 9, 1, false)
            .await
            .unwrap();

        f.handler.run_schedule(sunday_at(9, 0)).await.unwrap();
        assert!(f.messenger.sent().is_empty());

        f.handler.show_next(CHANNEL, "comic").await.unwrap();
        f.handler.show_next(CHANNEL, "comic").await.unwrap();
        f.handler.show_next(CHANNEL, "comic").await.unwrap();
        assert_eq!(f.messenger.files(), vec!["1.png", "2.png"]);
    }

    #[tokio::test]
    async fn test_next_replies() {
        let f = fixture(&["1.png"]).await;
        assert_eq!(
            f.handler.next(CHANNEL, "comic").await,
            "No image groups on this channel!"
        );

        f.handler
            .schedule(CHANNEL, "comic", "manual", 0, 1, true)
            .await
            .unwrap();
        assert_eq!(
            f.handler.next(CHANNEL, "other").await,
            "Specified image group does not exist!"
        );
        assert_eq!(
            f.handler.next(CHANNEL, "comic").await,
            "Displaying next image(s) for comic"
        );
    }

    #[tokio::test]
    async fn test_commands_answer_while_uploads_run() {
        let f = fixture(&["1.png", "2.png", "3.png", "4.png"]).await;
        f.handler
            .schedule(CHANNEL, "comic", "daily", 9, 3, true)
            .await
            .unwrap();
        f.messenger.upload_delay_ms.store(1000, Ordering::SeqCst);

        let handler = f.handler.clone();
        let posting = tokio::spawn(async move { handler.run_schedule(sunday_at(9, 0)).await });

        // Wait for the first upload to start
        let started = tokio::time::timeout(Duration::from_secs(2), async {
            while f.messenger.files().is_empty() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(started.is_ok());

        let listing = tokio::time::timeout(Duration::from_millis(200), f.handler.list(CHANNEL))
            .await
            .expect("list blocked behind uploads");
        assert_eq!(listing, "Image Block Data\ncomic Page: 4 / 4 (daily at 09:00)\n");
        assert_eq!(f.messenger.files(), vec!["1.png"]);

        posting.abort();
    }
}
