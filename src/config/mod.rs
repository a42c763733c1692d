use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::Language;
use crate::TranscriptorError;

/// Name of the configuration file looked up in the working directory
const LOCAL_CONFIG_FILE: &str = "get-transcript.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the data directory
    pub data_dir: PathBuf,

    /// Subdirectory of `data_dir` receiving `<video_id>.json` transcripts
    pub raw_subdir: PathBuf,

    /// Subdirectory of `data_dir` receiving the log file
    pub interim_subdir: PathBuf,

    /// Languages requested when none are given on the command line
    pub default_languages: Vec<Language>,

    /// Log file settings
    pub log: LogFileConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogFileConfig {
    /// Write logs to a file in addition to the console
    pub enabled: bool,

    /// File name inside the interim directory
    pub file_name: String,

    /// Size at which the log file is rotated
    pub max_bytes: u64,

    /// Number of rotated files to keep
    pub backups: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            raw_subdir: PathBuf::from("raw"),
            interim_subdir: PathBuf::from("interim"),
            default_languages: vec![Language::En],
            log: LogFileConfig::default(),
        }
    }
}

impl Default for LogFileConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file_name: "get_transcript.log".to_string(),
            max_bytes: 10 * 1024 * 1024,
            backups: 1,
        }
    }
}

impl Config {
    /// Load configuration from `explicit`, the working directory or the user config
    /// directory, in that order. Falls back to defaults when no file is found.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Read and validate a YAML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path).context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Get configuration file path
    fn config_path() -> Option<PathBuf> {
        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir().map(|dir| dir.join("get-transcript").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), TranscriptorError> {
        if self.default_languages.is_empty() {
            return Err(TranscriptorError::Config(
                "default_languages must name at least one language".to_string(),
            ));
        }

        if self.log.max_bytes == 0 {
            return Err(TranscriptorError::Config(
                "log.max_bytes must be greater than zero".to_string(),
            ));
        }

        if self.log.file_name.trim().is_empty() {
            return Err(TranscriptorError::Config(
                "log.file_name must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Replace the data directory, e.g. from the command line
    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }

    /// Directory holding downloaded transcripts
    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join(&self.raw_subdir)
    }

    /// Directory holding the log file
    pub fn interim_dir(&self) -> PathBuf {
        self.data_dir.join(&self.interim_subdir)
    }

    /// Location of the log file, if file logging is enabled
    pub fn log_file(&self) -> Option<PathBuf> {
        self.log
            .enabled
            .then(|| self.interim_dir().join(&self.log.file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.raw_dir(), PathBuf::from("data/raw"));
        assert_eq!(
            config.log_file(),
            Some(PathBuf::from("data/interim/get_transcript.log"))
        );
        assert_eq!(config.log.max_bytes, 10 * 1024 * 1024);
        assert_eq!(config.log.backups, 1);
        assert_eq!(config.default_languages, vec![Language::En]);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs_err::write(&path, "data_dir: /srv/captions\ndefault_languages: [ja]\nlog:\n  backups: 3\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.raw_dir(), PathBuf::from("/srv/captions/raw"));
        assert_eq!(config.default_languages, vec![Language::Ja]);
        assert_eq!(config.log.backups, 3);
        assert_eq!(config.log.file_name, "get_transcript.log");
    }

    #[test]
    fn test_rejects_unknown_language() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs_err::write(&path, "default_languages: [xx]\n").unwrap();

        assert!(Config::load(Some(path.as_path())).is_err());
    }

    #[test]
    fn test_rejects_empty_languages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs_err::write(&path, "default_languages: []\n").unwrap();

        let err = Config::load(Some(path.as_path())).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TranscriptorError>(),
            Some(TranscriptorError::Config(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(dir.path().join("absent.yaml").as_path())).is_err());
    }

    #[test]
    fn test_data_dir_override_and_disabled_log() {
        let mut config = Config::default().with_data_dir(Some(PathBuf::from("/tmp/x")));
        config.log.enabled = false;
        assert_eq!(config.interim_dir(), PathBuf::from("/tmp/x/interim"));
        assert_eq!(config.log_file(), None);
    }
}
