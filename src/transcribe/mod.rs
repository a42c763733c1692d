use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::{Language, RunConfig};
use crate::config::Config;
use crate::extractors::extract_video_id;
use crate::output;
use crate::Result;

pub mod youtube;

pub use youtube::YoutubeTranscriptFetcher;

/// Individual caption segment, stored exactly as the transcript source returns it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Caption text
    pub text: String,

    /// Offset from the start of the video in seconds
    pub start: f64,

    /// How long the caption is shown, in seconds
    pub duration: f64,
}

/// Source of caption transcripts
#[cfg_attr(test, mockall::automock)]
#[async_trait(?Send)]
pub trait TranscriptFetcher {
    /// Fetch the transcript of `video_id` in the first available language of
    /// `languages`. Fails with `TranscriptorError::TranscriptUnavailable` when none
    /// of them has a transcript.
    async fn fetch(&self, video_id: &str, languages: &[Language])
        -> Result<Vec<TranscriptSegment>>;
}

/// Result of a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// A transcript for the video was already stored; nothing was fetched
    Skipped { path: PathBuf },

    /// The transcript was fetched and written to `path`
    Saved {
        path: PathBuf,
        segments: usize,
        bytes: u64,
        /// End of the last caption in seconds
        covered_seconds: f64,
    },
}

/// Downloads a transcript and stores it under the raw data directory
pub struct TranscriptPipeline {
    fetcher: Box<dyn TranscriptFetcher>,
    raw_dir: PathBuf,
    show_progress: bool,
}

impl TranscriptPipeline {
    pub fn new(config: &Config, fetcher: Box<dyn TranscriptFetcher>) -> Self {
        Self {
            fetcher,
            raw_dir: config.raw_dir(),
            show_progress: false,
        }
    }

    /// Show a spinner while the transcript is being fetched
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Resolve the video id, skip if its transcript is already stored, otherwise
    /// fetch it and write it to `<raw_dir>/<video_id>.json`.
    pub async fn fetch_and_save(&self, run: &RunConfig) -> Result<FetchOutcome> {
        let video_id = extract_video_id(&run.video_url)?;
        tracing::info!("video_id: {}", video_id);

        let path = output::transcript_path(&self.raw_dir, &video_id);
        if path.exists() {
            if !run.overwrite {
                tracing::info!("Skip downloading transcript: {}", path.display());
                return Ok(FetchOutcome::Skipped { path });
            }
            tracing::warn!("Overwriting existing transcript: {}", path.display());
        }

        tracing::debug!(
            "Requesting transcript for {} in languages {:?}",
            video_id,
            run.languages
        );

        let progress = self.spinner(format!("Fetching transcript for {}...", video_id));
        let fetched = self.fetcher.fetch(&video_id, &run.languages).await;
        if let Some(progress) = progress {
            progress.finish_and_clear();
        }
        let segments = fetched?;

        tracing::info!("Fetched {} segments for {}", segments.len(), video_id);

        let bytes = output::save_to_file(&segments, &path)?;
        tracing::info!("Saved transcript: {}", path.display());

        Ok(FetchOutcome::Saved {
            path,
            segments: segments.len(),
            bytes,
            covered_seconds: covered_seconds(&segments),
        })
    }

    fn spinner(&self, message: String) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let progress = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")
        {
            progress.set_style(style);
        }
        progress.set_message(message);
        progress.enable_steady_tick(Duration::from_millis(100));
        Some(progress)
    }
}

fn covered_seconds(segments: &[TranscriptSegment]) -> f64 {
    segments
        .iter()
        .map(|segment| segment.start + segment.duration)
        .fold(0.0, f64::max)
}
