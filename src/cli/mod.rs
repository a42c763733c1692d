use clap::{ArgAction, Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "get-transcript",
    about = "Download the caption transcript of a YouTube video and save it as JSON",
    version,
    long_about = "Downloads the caption transcript of a YouTube video in the requested languages and stores it as <data_dir>/raw/<video_id>.json. Videos that already have a stored transcript are skipped unless --force is given.\n\nExample:\n  get-transcript https://www.youtube.com/watch?v=XXXXXXXXXXX -l ja"
)]
pub struct Cli {
    /// YouTube watch URL (must carry exactly one `v` query parameter)
    #[arg(value_name = "VIDEO_URL")]
    pub video_url: String,

    /// Transcript languages to request, in order of preference
    #[arg(short, long, value_enum, num_args = 1.., value_name = "LANG")]
    pub languages: Vec<Language>,

    /// Increase log verbosity (-v warn, -vv info, -vvv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Data directory holding raw/ transcripts and interim/ logs
    #[arg(short, long, value_name = "DIR", env = "GET_TRANSCRIPT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Configuration file (YAML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Overwrite a transcript that was already downloaded
    #[arg(short, long)]
    pub force: bool,

    /// Disable progress indicators
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Resolve the options of this invocation, falling back to `default_languages`
    /// when none were given on the command line.
    pub fn run_config(&self, default_languages: &[Language]) -> RunConfig {
        let requested = if self.languages.is_empty() {
            default_languages
        } else {
            &self.languages
        };

        RunConfig {
            video_url: self.video_url.clone(),
            languages: unique_languages(requested),
            verbosity: self.verbose,
            overwrite: self.force,
        }
    }
}

/// Options for a single run, fixed once the command line has been read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunConfig {
    pub video_url: String,

    /// Requested languages, most preferred first, without duplicates
    pub languages: Vec<Language>,

    pub verbosity: u8,

    /// Replace an existing transcript file instead of skipping the download
    pub overwrite: bool,
}

/// Transcript languages that can be requested
#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Japanese
    Ja,
    /// English
    En,
}

impl Language {
    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Ja => "ja",
            Language::En => "en",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Drop repeated languages, keeping the first occurrence of each
fn unique_languages(languages: &[Language]) -> Vec<Language> {
    let mut unique = Vec::with_capacity(languages.len());
    for language in languages {
        if !unique.contains(language) {
            unique.push(*language);
        }
    }
    unique
}
