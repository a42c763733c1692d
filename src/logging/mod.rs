//! Console and file logging.
//!
//! Everything is driven by one [`LogSettings`] value handed to [`init`] at startup.
//! Lines look like `[   INFO] 2024-05-01 12:00:00,123 (get_transcript::transcribe) message`
//! on both sinks. The file sink is size capped and rotated, see [`RotatingFile`].

use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{ChronoLocal, FormatTime};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

mod rotating;

pub use rotating::RotatingFile;

/// Log target shared by the library and the binary
const CRATE_TARGET: &str = "get_transcript";

/// Everything needed to set up logging for one process
#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    /// Most verbose level that is emitted
    pub level: LevelFilter,

    /// Log file, `None` for console only
    pub file: Option<PathBuf>,

    /// Size at which the log file is rotated
    pub max_bytes: u64,

    /// Number of rotated files kept next to the log file
    pub backups: usize,
}

impl LogSettings {
    pub fn new(verbosity: u8, config: &Config) -> Self {
        Self {
            level: level_for_verbosity(verbosity),
            file: config.log_file(),
            max_bytes: config.log.max_bytes,
            backups: config.log.backups,
        }
    }
}

/// Map the number of `-v` flags to a level: errors only by default, then
/// warnings, info and finally debug for three or more.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    }
}

/// Install the global subscriber. `RUST_LOG`, when set, replaces the level filter.
///
/// The returned guard flushes the log file when dropped and must be kept alive
/// until the process exits.
pub fn init(settings: &LogSettings) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", CRATE_TARGET, settings.level)));

    let console_layer = tracing_subscriber::fmt::layer()
        .event_format(LineFormat::new())
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match &settings.file {
        Some(path) => {
            let file = RotatingFile::open(path, settings.max_bytes, settings.backups)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let (writer, guard) = NonBlockingBuilder::default().lossy(false).finish(file);
            let layer = tracing_subscriber::fmt::layer()
                .event_format(LineFormat::new())
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(guard)
}

/// `[LEVEL] timestamp (target) message`
struct LineFormat {
    timer: ChronoLocal,
}

impl LineFormat {
    fn new() -> Self {
        Self {
            timer: ChronoLocal::new("%Y-%m-%d %H:%M:%S,%3f".to_string()),
        }
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        write!(writer, "[{:>7}] ", metadata.level().to_string())?;
        self.timer.format_time(&mut writer)?;
        write!(writer, " ({}) ", metadata.target())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity(0), LevelFilter::ERROR);
        assert_eq!(level_for_verbosity(1), LevelFilter::WARN);
        assert_eq!(level_for_verbosity(2), LevelFilter::INFO);
        assert_eq!(level_for_verbosity(3), LevelFilter::DEBUG);
        assert_eq!(level_for_verbosity(42), LevelFilter::DEBUG);
    }

    #[test]
    fn test_settings_from_config() {
        let config = Config::default();
        let settings = LogSettings::new(2, &config);
        assert_eq!(settings.level, LevelFilter::INFO);
        assert_eq!(
            settings.file,
            Some(PathBuf::from("data/interim/get_transcript.log"))
        );
        assert_eq!(settings.max_bytes, 10 * 1024 * 1024);
        assert_eq!(settings.backups, 1);
    }

    #[derive(Clone, Default)]
    struct Buffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Buffer {
        type Writer = Buffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_line_format_pads_level() {
        let buffer = Buffer::default();
        let subscriber = tracing_subscriber::fmt()
            .event_format(LineFormat::new())
            .with_writer(buffer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("disk almost full");
            tracing::error!("gave up");
        });

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[   WARN] "));
        assert!(lines[0].ends_with(" (get_transcript::logging::tests) disk almost full"));
        assert!(lines[1].starts_with("[  ERROR] "));
    }

    #[test]
    fn test_directive_parses() {
        for verbosity in 0..4 {
            let level = level_for_verbosity(verbosity);
            assert!(EnvFilter::try_new(format!("{}={}", CRATE_TARGET, level)).is_ok());
        }
    }
}
