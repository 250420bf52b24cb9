// this_file: src/feed.rs

//! Feed scanning: finding a usable image and an acceptable comment.
//!
//! Feeds, and the fetching of the resources they link, are external
//! capabilities supplied by the caller; this module only walks them. Both
//! scans are bounded by an explicit item limit so an exhausted or hostile
//! feed terminates with a defined error instead of looping forever.

use crate::error::{Error, Result};
use crate::filter::{accepts, FilterCriteria};
use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};

/// Extensions the image host is known to serve directly.
const IMAGE_EXTENSIONS: [&str; 6] = ["gif", "jpg", "jpeg", "png", "tiff", "webp"];

/// One item from a feed: a submission title or comment body, the linked
/// resource, and a permalink for crediting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub body: String,
    pub url: String,
    pub permalink: String,
}

/// An ordered, lazily produced sequence of feed items. Each call to
/// `items` restarts from the head of the feed.
pub trait Feed {
    fn items(&mut self) -> Box<dyn Iterator<Item = FeedItem> + '_>;
}

/// Fetches the bytes behind a feed item's URL.
pub trait MediaFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Constraints on the image side of the scan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImageCriteria {
    /// Reject portrait images; captions lay out poorly on them.
    pub require_landscape: bool,
}

impl Default for ImageCriteria {
    fn default() -> Self {
        Self {
            require_landscape: true,
        }
    }
}

/// An image selected from the feed, decoded and ready for compositing.
#[derive(Debug)]
pub struct ImageCandidate {
    pub image: DynamicImage,
    pub title: String,
    pub permalink: String,
}

/// Rewrite URLs that do not end in a known image extension.
///
/// Image hosts often link a landing page rather than the file; appending
/// a `.jpg` extension usually resolves to the image itself.
pub fn normalize_image_url(url: &str) -> String {
    let extension = url.rsplit('.').next().unwrap_or("");
    if IMAGE_EXTENSIONS.contains(&extension.to_lowercase().as_str()) {
        url.to_string()
    } else {
        format!("{}.jpg", url)
    }
}

/// Walk the image feed and return the first item whose linked resource
/// fetches, decodes, and satisfies `criteria`.
///
/// Fetch and decode failures are transient: the item is skipped and the
/// scan continues. Scanning more than `max_scan` items without success is
/// [`Error::NoImageFound`].
pub fn find_image(
    feed: &mut dyn Feed,
    fetcher: &dyn MediaFetcher,
    criteria: &ImageCriteria,
    max_scan: usize,
) -> Result<ImageCandidate> {
    let mut scanned = 0;
    for item in feed.items().take(max_scan) {
        scanned += 1;
        let url = normalize_image_url(&item.url);

        log::debug!("Opening {:?}", url);
        let bytes = match fetcher.fetch(&url) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Unable to open {:?}: {}", url, e);
                continue;
            }
        };

        let image = match image::load_from_memory(&bytes) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Unable to decode {:?}: {}", url, e);
                continue;
            }
        };

        let (width, height) = image.dimensions();
        if criteria.require_landscape && height > width {
            log::debug!("Skipping portrait image {:?} ({}x{})", url, width, height);
            continue;
        }

        log::info!("Selecting {:?} as image", url);
        return Ok(ImageCandidate {
            image,
            title: item.body,
            permalink: item.permalink,
        });
    }
    Err(Error::NoImageFound { scanned })
}

/// Walk the comment feed and return the first item whose body passes the
/// candidate filter, scanning at most `max_scan` items.
pub fn find_comment(
    feed: &mut dyn Feed,
    criteria: &FilterCriteria,
    max_scan: usize,
) -> Result<FeedItem> {
    let mut scanned = 0;
    for item in feed.items().take(max_scan) {
        scanned += 1;
        if accepts(&item.body, criteria) {
            log::info!("Selecting comment {:?}", item.permalink);
            return Ok(item);
        }
    }
    Err(Error::NoCandidateFound { scanned })
}

/// In-memory feed over a fixed list of items.
pub struct StaticFeed {
    items: Vec<FeedItem>,
}

impl StaticFeed {
    pub fn new(items: Vec<FeedItem>) -> Self {
        Self { items }
    }
}

impl Feed for StaticFeed {
    fn items(&mut self) -> Box<dyn Iterator<Item = FeedItem> + '_> {
        Box::new(self.items.iter().cloned())
    }
}
