use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::transcribe::TranscriptSegment;

/// Path of the stored transcript for `video_id` inside `raw_dir`
pub fn transcript_path(raw_dir: &Path, video_id: &str) -> PathBuf {
    raw_dir.join(format!("{}.json", video_id))
}

/// Render segments as an indented JSON array. Non-ASCII text is kept as is.
pub fn format_as_json(segments: &[TranscriptSegment]) -> Result<String> {
    let mut content =
        serde_json::to_string_pretty(segments).context("Failed to serialize transcript")?;
    content.push('\n');
    Ok(content)
}

/// Save transcript segments to `path`, creating missing parent directories.
/// Returns the number of bytes written.
pub fn save_to_file(segments: &[TranscriptSegment], path: &Path) -> Result<u64> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }

    let content = format_as_json(segments)?;
    fs_err::write(path, &content)?;

    Ok(content.len() as u64)
}

/// Read back a stored transcript
pub fn load_from_file(path: &Path) -> Result<Vec<TranscriptSegment>> {
    let content = fs_err::read_to_string(path)?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse transcript {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str, start: f64, duration: f64) -> TranscriptSegment {
        TranscriptSegment {
            text: text.to_string(),
            start,
            duration,
        }
    }

    #[test]
    fn test_transcript_path() {
        assert_eq!(
            transcript_path(Path::new("data/raw"), "dQw4w9WgXcQ"),
            PathBuf::from("data/raw/dQw4w9WgXcQ.json")
        );
    }

    #[test]
    fn test_json_layout() {
        let json = format_as_json(&[segment("こんにちは", 0.0, 1.5)]).unwrap();
        assert_eq!(
            json,
            "[\n  {\n    \"text\": \"こんにちは\",\n    \"start\": 0.0,\n    \"duration\": 1.5\n  }\n]\n"
        );
    }

    #[test]
    fn test_save_creates_directories_and_preserves_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = transcript_path(&dir.path().join("data").join("raw"), "abc");
        let segments = vec![
            segment("日本語のテキスト", 0.0, 2.0),
            segment("Ünïcödé & \"quotes\"", 2.0, 3.25),
            segment("plain", 5.25, 0.5),
        ];

        let written = save_to_file(&segments, &path).unwrap();
        assert_eq!(written, fs_err::metadata(&path).unwrap().len());

        let raw = fs_err::read_to_string(&path).unwrap();
        assert!(raw.contains("日本語のテキスト"));
        assert!(!raw.contains("\\u"));

        assert_eq!(load_from_file(&path).unwrap(), segments);
    }

    #[test]
    fn test_empty_transcript() {
        assert_eq!(format_as_json(&[]).unwrap(), "[]\n");
    }
}
