// this_file: src/lib.rs

//! Capfit: caption layout engine and posting pipeline.
//!
//! Capfit fits a piece of feed text onto an image: it filters candidate
//! comments, wraps the chosen one into lines, shrinks the line budget and
//! then the point size until the rendered block fits inside the canvas,
//! and hands the placed caption to the surrounding posting pipeline.
//!
//! ## Architecture
//!
//! - **filter**: candidate acceptance rules (word counts, vocabulary,
//!   forbidden characters)
//! - **wrap**: greedy word wrapping
//! - **layout**: shrink-to-fit searches over line budget and point size
//! - **metrics**: font measurement capabilities the engine consumes
//! - **fonts**: ttf-parser measurement backend, caching, font selection
//! - **feed**: bounded scans for a usable image and an acceptable comment
//! - **pipeline**: one posting cycle (compose, upload, publish)
//! - **config**: environment credentials, tuning knobs, word list
//! - **error**: error types and handling
//!
//! ## Example
//!
//! ```rust,no_run
//! use capfit::{layout, CanvasBounds, FontFace, LayoutParams, MetricsSource};
//! use camino::Utf8Path;
//!
//! let face = FontFace::open(Utf8Path::new("fonts/caption.ttf"))?;
//! let metrics = face.at_size(36.0)?;
//! let canvas = CanvasBounds { width: 1920, height: 1080 };
//! let outcome = layout(
//!     "what a beautiful view of the valley",
//!     canvas,
//!     metrics.as_ref(),
//!     &LayoutParams::default(),
//! );
//! # Ok::<(), capfit::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod feed;
pub mod filter;
pub mod fonts;
pub mod layout;
pub mod metrics;
pub mod pipeline;
pub mod wrap;

// Re-export main types
pub use config::{load_wordlist, BotConfig, Credentials};
pub use error::{Error, Result};
pub use feed::{
    find_comment, find_image, normalize_image_url, Feed, FeedItem, ImageCandidate, ImageCriteria,
    MediaFetcher, StaticFeed,
};
pub use filter::{accepts, FilterCriteria, WordMatch};
pub use fonts::{
    FaceMetrics, FixedPicker, FontFace, FontLibrary, FontPicker, MeasuredFace, TimeSeededPicker,
};
pub use layout::{layout, shrink_to_fit, CanvasBounds, CaptionLayout, LayoutOutcome, LayoutParams};
pub use metrics::{FontMetrics, MetricsSource, TextSize};
pub use pipeline::{
    retry, run_cycle, CaptionDrawer, CycleOutcome, PostHandle, Publisher, RetryPolicy, Uploader,
};
pub use wrap::wrap;
