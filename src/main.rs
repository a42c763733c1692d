use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing::Level;

use get_transcript::logging::{self, LogSettings};
use get_transcript::transcribe::YoutubeTranscriptFetcher;
use get_transcript::{utils, Cli, Config, FetchOutcome, RunConfig, TranscriptPipeline};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config.with_data_dir(cli.data_dir.clone()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    let run = cli.run_config(&config.default_languages);

    // Held until exit so buffered log lines reach the file
    let _log_guard = match logging::init(&LogSettings::new(run.verbosity, &config)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("{:?}", run);

    match download(&config, &run, !cli.quiet).await {
        Ok(outcome) => {
            report(&outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            // RUST_LOG may filter out this crate's errors; stderr still gets the failure
            if tracing::enabled!(Level::ERROR) {
                tracing::error!("Unhandled error: {:?}", e);
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn download(config: &Config, run: &RunConfig, progress: bool) -> anyhow::Result<FetchOutcome> {
    let fetcher = YoutubeTranscriptFetcher::new()?;
    let pipeline = TranscriptPipeline::new(config, Box::new(fetcher))
        .with_progress(progress && utils::stderr_is_attended());

    pipeline.fetch_and_save(run).await
}

fn report(outcome: &FetchOutcome) {
    match outcome {
        FetchOutcome::Saved {
            path,
            segments,
            bytes,
            covered_seconds,
        } => {
            println!(
                "{} Transcript saved to: {} ({} segments, {}, {})",
                style("✓").green(),
                path.display(),
                segments,
                utils::format_clock(*covered_seconds),
                utils::format_file_size(*bytes)
            );
        }
        FetchOutcome::Skipped { path } => {
            println!(
                "{} Transcript already present: {}",
                style("•").yellow(),
                path.display()
            );
        }
    }
}
