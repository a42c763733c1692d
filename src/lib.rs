//! get-transcript - A Rust CLI tool for downloading YouTube caption transcripts
//!
//! This library resolves a watch URL to its video id, asks a transcript source for the
//! captions in the requested languages and stores them as a JSON array on disk. Output
//! that already exists is left alone unless an overwrite is requested.

pub mod cli;
pub mod config;
pub mod extractors;
pub mod logging;
pub mod output;
pub mod transcribe;
pub mod utils;

pub use cli::{Cli, Language, RunConfig};
pub use config::Config;
pub use extractors::extract_video_id;
pub use transcribe::{FetchOutcome, TranscriptFetcher, TranscriptPipeline, TranscriptSegment};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to the transcript tool
#[derive(thiserror::Error, Debug)]
pub enum TranscriptorError {
    #[error("Invalid video URL: {0}")]
    InvalidInput(String),

    #[error("No transcript available for {video_id} in [{languages}]: {reason}")]
    TranscriptUnavailable {
        video_id: String,
        languages: String,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File operation failed: {0}")]
    File(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
