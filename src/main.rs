// this_file: src/main.rs

//! Capfit CLI: caption fitting and candidate filtering.
//!
//! `fit` lays out text against a font and canvas and prints the outcome as
//! JSON; `check` filters candidate lines from stdin against a word list and
//! prints JSONL verdicts.

use camino::Utf8PathBuf;
use capfit::{
    accepts, load_wordlist, shrink_to_fit, CanvasBounds, Error, FilterCriteria, FontFace,
    LayoutParams, WordMatch,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, BufRead, Read, Write};

/// Capfit: caption layout engine
#[derive(Parser)]
#[command(name = "capfit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit text onto a canvas and print the layout as JSON
    Fit {
        /// Font file to measure with
        #[arg(long)]
        font: Utf8PathBuf,

        /// Canvas width in pixels
        #[arg(long)]
        width: u32,

        /// Canvas height in pixels
        #[arg(long)]
        height: u32,

        /// Starting point size for the shrink search
        #[arg(long, default_value = "48.0")]
        size: f32,

        /// Smallest point size to try
        #[arg(long, default_value = "12.0")]
        min_size: f32,

        /// Starting chars-per-line budget
        #[arg(long, default_value = "60")]
        start_chars: usize,

        /// Smallest chars-per-line budget
        #[arg(long, default_value = "15")]
        min_chars: usize,

        /// Fraction of each canvas dimension the caption may occupy
        #[arg(long, default_value = "0.8")]
        fraction: f32,

        /// Text to fit (reads stdin if not provided)
        #[arg(long)]
        text: Option<String>,
    },

    /// Filter candidate lines from stdin, printing a JSONL verdict per line
    Check {
        /// Word list file (whitespace-separated required vocabulary)
        #[arg(long)]
        wordlist: Utf8PathBuf,

        /// Minimum word count
        #[arg(long, default_value = "3")]
        min_words: usize,

        /// Maximum word count
        #[arg(long, default_value = "30")]
        max_words: usize,

        /// Maximum length of any single word
        #[arg(long, default_value = "20")]
        max_word_length: usize,

        /// Lower-case candidate words before vocabulary lookup
        #[arg(long)]
        lowercase: bool,
    },

    /// Print version information
    Version,
}

/// JSON report for the `fit` subcommand.
#[derive(Serialize)]
struct FitReport {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    layout: Option<capfit::CaptionLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// JSONL verdict for the `check` subcommand.
#[derive(Serialize)]
struct CheckVerdict<'a> {
    text: &'a str,
    accepted: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Fit {
            font,
            width,
            height,
            size,
            min_size,
            start_chars,
            min_chars,
            fraction,
            text,
        } => {
            let params = LayoutParams {
                start_chars_per_line: start_chars,
                min_chars_per_line: min_chars,
                max_area_fraction: fraction,
                min_point_size: min_size,
            };
            run_fit(&font, CanvasBounds { width, height }, size, &params, text)?;
        }
        Commands::Check {
            wordlist,
            min_words,
            max_words,
            max_word_length,
            lowercase,
        } => {
            let criteria = FilterCriteria {
                min_words,
                max_words,
                max_word_length,
                required_vocabulary: load_wordlist(&wordlist)?,
                forbidden_characters: Default::default(),
                word_match: if lowercase {
                    WordMatch::Lowercase
                } else {
                    WordMatch::Exact
                },
            };
            run_check(&criteria)?;
        }
        Commands::Version => {
            println!("capfit {}", env!("CARGO_PKG_VERSION"));
            println!("Caption layout engine and posting pipeline");
        }
    }

    Ok(())
}

/// Initialize logging based on verbosity.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

/// Fit text from the flag or stdin and print a JSON report.
fn run_fit(
    font: &Utf8PathBuf,
    canvas: CanvasBounds,
    size: f32,
    params: &LayoutParams,
    text: Option<String>,
) -> anyhow::Result<()> {
    let text = match text {
        Some(t) => t,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf.trim().to_string()
        }
    };

    let face = FontFace::open(font)?;
    let report = match shrink_to_fit(&text, canvas, &face, params, size) {
        Ok(layout) => FitReport {
            status: "fitted".to_string(),
            layout: Some(layout),
            error: None,
        },
        Err(e @ Error::NoFit { .. }) => FitReport {
            status: "rejected".to_string(),
            layout: None,
            error: Some(e.to_string()),
        },
        Err(e) => return Err(e.into()),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Check each stdin line against the criteria and print JSONL verdicts.
fn run_check(criteria: &FilterCriteria) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let verdict = CheckVerdict {
            text: &line,
            accepted: accepts(&line, criteria),
        };
        writeln!(out, "{}", serde_json::to_string(&verdict)?)?;
    }
    out.flush()?;

    Ok(())
}
