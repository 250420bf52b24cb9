// this_file: src/config.rs

//! Process configuration.
//!
//! All process-wide state is held as explicit values constructed at
//! startup: API credentials from the environment, tuning knobs in
//! [`BotConfig`], and the required-vocabulary word list loaded from a
//! plain text file.

use crate::error::{Error, Result};
use crate::feed::ImageCriteria;
use crate::layout::LayoutParams;
use crate::pipeline::RetryPolicy;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// User agent sent to the feed APIs.
pub const USER_AGENT: &str = "capfit image captioning bot";

/// API credentials, read from the environment at process start.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub user_agent: String,
}

impl Credentials {
    /// Read credentials from `CAPFIT_CLIENT_ID`, `CAPFIT_CLIENT_SECRET`,
    /// `CAPFIT_USERNAME`, and `CAPFIT_PASSWORD`.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client_id: require_env("CAPFIT_CLIENT_ID")?,
            client_secret: require_env("CAPFIT_CLIENT_SECRET")?,
            username: require_env("CAPFIT_USERNAME")?,
            password: require_env("CAPFIT_PASSWORD")?,
            user_agent: USER_AGENT.to_string(),
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| Error::MissingEnv {
        name: name.to_string(),
    })
}

/// Tuning knobs for one posting cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Plain text file of whitespace-separated required-vocabulary words
    pub wordlist_path: Utf8PathBuf,
    /// Directory of candidate caption fonts
    pub fonts_dir: Utf8PathBuf,
    /// Where the composite image is written before upload
    pub output_path: Utf8PathBuf,
    /// Upper bound on feed items examined per scan
    pub max_scan: usize,
    /// Point size the shrink search starts from
    pub start_point_size: f32,
    /// Caption text color (RGBA)
    pub text_color: [u8; 4],
    /// Drop-shadow color (RGBA)
    pub shadow_color: [u8; 4],
    pub layout: LayoutParams,
    pub image_criteria: ImageCriteria,
    pub retry: RetryPolicy,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            wordlist_path: Utf8PathBuf::from("words.txt"),
            fonts_dir: Utf8PathBuf::from("fonts"),
            output_path: Utf8PathBuf::from("composite.png"),
            max_scan: 250,
            start_point_size: 48.0,
            text_color: [255, 255, 255, 255],
            shadow_color: [0, 0, 0, 255],
            layout: LayoutParams::default(),
            image_criteria: ImageCriteria::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl BotConfig {
    /// Validate tuning knobs before a cycle runs.
    pub fn validate(&self) -> Result<()> {
        if self.max_scan == 0 {
            return Err(Error::InvalidConfig {
                reason: "max_scan must be at least 1".to_string(),
            });
        }
        if self.start_point_size < self.layout.min_point_size {
            return Err(Error::InvalidConfig {
                reason: format!(
                    "start_point_size {} is below min_point_size {}",
                    self.start_point_size, self.layout.min_point_size
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.layout.max_area_fraction)
            || self.layout.max_area_fraction == 0.0
        {
            return Err(Error::InvalidConfig {
                reason: format!(
                    "max_area_fraction {} outside (0, 1]",
                    self.layout.max_area_fraction
                ),
            });
        }
        if self.layout.start_chars_per_line < self.layout.min_chars_per_line {
            return Err(Error::InvalidConfig {
                reason: format!(
                    "start_chars_per_line {} is below min_chars_per_line {}",
                    self.layout.start_chars_per_line, self.layout.min_chars_per_line
                ),
            });
        }
        Ok(())
    }
}

/// Load a word list: whitespace-separated tokens, one set.
pub fn load_wordlist(path: &Utf8Path) -> Result<HashSet<String>> {
    let contents = std::fs::read_to_string(path.as_std_path())?;
    let words: HashSet<String> = contents.split_whitespace().map(str::to_string).collect();
    log::debug!("Loaded {} words from {}", words.len(), path);
    Ok(words)
}
