use anyhow::Context;
use async_trait::async_trait;
use yt_transcript_rs::api::YouTubeTranscriptApi;

use super::{TranscriptFetcher, TranscriptSegment};
use crate::cli::Language;
use crate::{Result, TranscriptorError};

/// Transcript source backed by YouTube's caption tracks
pub struct YoutubeTranscriptFetcher {
    api: YouTubeTranscriptApi,
}

impl YoutubeTranscriptFetcher {
    pub fn new() -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .context("Failed to create YouTube transcript client")?;

        Ok(Self { api })
    }
}

#[async_trait(?Send)]
impl TranscriptFetcher for YoutubeTranscriptFetcher {
    async fn fetch(&self, video_id: &str, languages: &[Language]) -> Result<Vec<TranscriptSegment>> {
        let codes = language_codes(languages);

        let transcript = self
            .api
            .fetch_transcript(video_id, &codes, false)
            .await
            .map_err(|e| TranscriptorError::TranscriptUnavailable {
                video_id: video_id.to_string(),
                languages: codes.join(", "),
                reason: e.to_string(),
            })?;

        tracing::debug!(
            "Received {} snippets for {}",
            transcript.snippets.len(),
            video_id
        );

        Ok(transcript
            .snippets
            .into_iter()
            .map(|snippet| TranscriptSegment {
                text: snippet.text,
                start: snippet.start,
                duration: snippet.duration,
            })
            .collect())
    }
}

/// Language codes in order of preference, as the caption API expects them
fn language_codes(languages: &[Language]) -> Vec<&'static str> {
    languages.iter().map(Language::as_code).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes_keep_order() {
        assert_eq!(language_codes(&[Language::Ja, Language::En]), vec!["ja", "en"]);
        assert!(language_codes(&[]).is_empty());
    }
}
