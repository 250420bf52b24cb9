// this_file: src/pipeline.rs

//! One end-to-end posting cycle.
//!
//! Fetch an image and an acceptable comment from their feeds, fit the
//! comment onto the image, draw it (shadow copy first, then the main
//! text), save the composite, upload it, and publish the post with credit
//! links. Uploading is the one network call guarded by a retry loop; all
//! other capabilities are invoked once and their errors propagate.

use crate::config::BotConfig;
use crate::error::{Error, Result};
use crate::feed::{find_comment, find_image, Feed, MediaFetcher};
use crate::filter::FilterCriteria;
use crate::layout::{shrink_to_fit, CanvasBounds, CaptionLayout};
use crate::metrics::MetricsSource;
use camino::{Utf8Path, Utf8PathBuf};
use image::{GenericImageView, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Draws caption lines onto a pixel surface. Implementations own their
/// font resource; the layout carries the lines, origin, and point size.
pub trait CaptionDrawer {
    fn draw(
        &self,
        canvas: &mut RgbaImage,
        layout: &CaptionLayout,
        x: u32,
        y: u32,
        color: Rgba<u8>,
    ) -> Result<()>;
}

/// Uploads a local file to the hosting service, returning its remote URL.
pub trait Uploader {
    fn upload(&self, path: &Utf8Path) -> Result<String>;
}

/// Handle to a published post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostHandle {
    pub id: String,
    pub url: String,
}

/// Publishes posts and replies to the destination feed.
pub trait Publisher {
    fn submit(&self, title: &str, url: &str) -> Result<PostHandle>;
    fn reply(&self, post: &PostHandle, body: &str) -> Result<String>;
}

/// Fixed-count, fixed-interval retry policy. The interval is uniform,
/// not exponential.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            delay_secs: 30,
        }
    }
}

impl RetryPolicy {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

/// Run `op` up to `policy.attempts` times, sleeping `policy.delay()`
/// between attempts. Exhaustion yields [`Error::RetriesExhausted`]
/// carrying the last failure.
pub fn retry<T>(
    policy: &RetryPolicy,
    operation: &str,
    mut op: impl FnMut() -> Result<T>,
) -> Result<T> {
    let mut last_error = String::new();
    for attempt in 1..=policy.attempts {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) => {
                log::warn!(
                    "{} attempt {}/{} failed: {}",
                    operation,
                    attempt,
                    policy.attempts,
                    e
                );
                last_error = e.to_string();
                if attempt < policy.attempts {
                    std::thread::sleep(policy.delay());
                }
            }
        }
    }
    Err(Error::RetriesExhausted {
        operation: operation.to_string(),
        attempts: policy.attempts,
        last_error,
    })
}

/// What a completed cycle produced.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub post: PostHandle,
    pub composite_path: Utf8PathBuf,
    pub caption: CaptionLayout,
}

/// Execute one posting cycle.
///
/// On upload exhaustion the composite file is deliberately left on disk
/// for inspection; nothing is cleaned up.
#[allow(clippy::too_many_arguments)]
pub fn run_cycle(
    config: &BotConfig,
    criteria: &FilterCriteria,
    images: &mut dyn Feed,
    comments: &mut dyn Feed,
    fetcher: &dyn MediaFetcher,
    fonts: &dyn MetricsSource,
    drawer: &dyn CaptionDrawer,
    uploader: &dyn Uploader,
    publisher: &dyn Publisher,
) -> Result<CycleOutcome> {
    config.validate()?;

    let image = find_image(images, fetcher, &config.image_criteria, config.max_scan)?;
    let comment = find_comment(comments, criteria, config.max_scan)?;

    let (width, height) = image.image.dimensions();
    let canvas = CanvasBounds { width, height };
    let caption = shrink_to_fit(
        &comment.body,
        canvas,
        fonts,
        &config.layout,
        config.start_point_size,
    )?;

    let mut composite = image.image.to_rgba8();
    // Shadow copy first so the main text paints over it.
    drawer.draw(
        &mut composite,
        &caption,
        caption.origin_x + caption.shadow_offset,
        caption.origin_y + caption.shadow_offset,
        Rgba(config.shadow_color),
    )?;
    drawer.draw(
        &mut composite,
        &caption,
        caption.origin_x,
        caption.origin_y,
        Rgba(config.text_color),
    )?;

    composite.save(config.output_path.as_std_path())?;
    log::info!("Saved composite to {}", config.output_path);

    let hosted_url = retry(&config.retry, "upload", || {
        uploader.upload(&config.output_path)
    })?;
    log::info!("Uploaded composite to {}", hosted_url);

    let post = publisher.submit(&comment.body, &hosted_url)?;
    let credit = format!(
        "[Original image]({}) | [Original comment]({})",
        image.permalink, comment.permalink
    );
    publisher.reply(&post, &credit)?;
    log::info!("Published {} ({})", post.id, post.url);

    Ok(CycleOutcome {
        post,
        composite_path: config.output_path.clone(),
        caption,
    })
}
