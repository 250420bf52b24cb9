// this_file: src/error.rs

//! Error types for capfit.
//!
//! This module defines all error types used throughout the codebase,
//! with descriptive messages and context for debugging.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Main error type for capfit operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Font file not found at specified path
    #[error("Font file not found: {path}")]
    FontNotFound { path: Utf8PathBuf },

    /// Invalid font format or corrupted font file
    #[error("Invalid font file at {path}: {reason}")]
    InvalidFont { path: Utf8PathBuf, reason: String },

    /// Font directory contains no usable font files
    #[error("No font files found in {path}")]
    EmptyFontDir { path: Utf8PathBuf },

    /// Memory mapping error
    #[error("Failed to memory-map font file {path}: {source}")]
    Mmap {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    /// No layout fits within canvas bounds at any explored point size
    #[error("Text cannot be fitted: point size floor {point_size}pt reached")]
    NoFit { point_size: f32 },

    /// Image feed exhausted without a usable image
    #[error("No usable image found after scanning {scanned} feed items")]
    NoImageFound { scanned: usize },

    /// Comment feed exhausted without an acceptable candidate
    #[error("No acceptable candidate found after scanning {scanned} feed items")]
    NoCandidateFound { scanned: usize },

    /// A single feed item's linked resource could not be fetched
    #[error("Failed to fetch {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    /// A retried operation ran out of attempts
    #[error("{operation} failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        operation: String,
        attempts: u32,
        last_error: String,
    },

    /// Posting or replying to the destination feed failed
    #[error("Publish failed: {reason}")]
    PublishFailed { reason: String },

    /// Required environment variable is not set
    #[error("Missing environment variable: {name}")]
    MissingEnv { name: String },

    /// Invalid configuration value
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Image decode/encode error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Specialized Result type for capfit operations.
pub type Result<T> = std::result::Result<T, Error>;
