use url::{ParseError, Url};

use crate::TranscriptorError;

/// Query parameter carrying the video id in a watch URL
const VIDEO_ID_PARAM: &str = "v";

/// Base for URLs typed without a scheme, e.g. `youtube.com/watch?v=<id>`
const SCHEMELESS_BASE: &str = "https://www.youtube.com/";

/// Extract the video id from a watch URL such as `https://www.youtube.com/watch?v=<id>`.
///
/// The query string must carry exactly one non-empty `v` parameter. The id is returned
/// percent-decoded and otherwise untouched. Input without a scheme is read relative to
/// the YouTube origin, only its query string matters.
pub fn extract_video_id(video_url: &str) -> Result<String, TranscriptorError> {
    let parsed = match Url::parse(video_url) {
        Err(ParseError::RelativeUrlWithoutBase) => {
            Url::parse(SCHEMELESS_BASE).and_then(|base| base.join(video_url))
        }
        parsed => parsed,
    }
    .map_err(|e| TranscriptorError::InvalidInput(format!("{} ({})", video_url, e)))?;

    let mut ids = parsed
        .query_pairs()
        .filter(|(key, value)| key == VIDEO_ID_PARAM && !value.is_empty())
        .map(|(_, value)| value.into_owned());

    match (ids.next(), ids.next()) {
        (Some(id), None) => Ok(id),
        (None, _) => Err(TranscriptorError::InvalidInput(format!(
            "{} (no `{}` parameter)",
            video_url, VIDEO_ID_PARAM
        ))),
        (Some(_), Some(_)) => Err(TranscriptorError::InvalidInput(format!(
            "{} (more than one `{}` parameter)",
            video_url, VIDEO_ID_PARAM
        ))),
    }
}
