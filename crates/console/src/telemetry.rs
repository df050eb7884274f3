//! Logging setup
//!
//! Every event is written as `[YYYY-mm-dd HH:MM:SS] [LEVEL] message` to the
//! append-only log file and mirrored to stderr.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: overrides `--log-level` (e.g. `toolkit_core=debug,info`)
//! - `SERVER_TOOLKIT_LOG_FORMAT`: `json` writes the log file as JSON lines

use anyhow::{Context, Result};
use chrono::Local;
use clap::ValueEnum;
use std::fmt;
use std::path::Path;
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Minimum level written to the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    #[value(name = "DEBUG", alias = "debug")]
    Debug,
    #[value(name = "INFO", alias = "info")]
    Info,
    #[value(name = "WARNING", alias = "warning", alias = "WARN", alias = "warn")]
    Warning,
    #[value(name = "ERROR", alias = "error")]
    Error,
}

impl LogLevel {
    /// `EnvFilter` directive for this level
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log file layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// `[timestamp] [LEVEL] message` lines
    Text,
    /// One JSON object per event
    Json,
}

/// Label printed for a level; `WARN` is spelled out
fn level_label(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "TRACE",
        Level::DEBUG => "DEBUG",
        Level::INFO => "INFO",
        Level::WARN => "WARNING",
        Level::ERROR => "ERROR",
    }
}

/// `[YYYY-mm-dd HH:MM:SS] [LEVEL] message key=value ...`
pub struct LineFormat;

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
        write!(
            writer,
            "[{}] [{}] ",
            Local::now().format(TIMESTAMP_FORMAT),
            level_label(event.metadata().level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Plain-text or JSON layer for the log file, never colored
fn file_layer<S, W>(writer: W, format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .event_format(LineFormat)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .with_ansi(false)
            .boxed(),
    }
}

/// Install the global subscriber
///
/// # Returns
/// Guard that flushes the file writer; keep it alive for the whole run
///
/// # Errors
/// - the log file directory cannot be created
/// - a global subscriber is already installed
pub fn init_logging(log_file: &Path, level: LogLevel, format: LogFormat) -> Result<WorkerGuard> {
    let directory = match log_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = log_file
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", log_file.display()))?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    // Appends; never rotates
    let appender = tracing_appender::rolling::never(directory, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive()));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .event_format(LineFormat);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer(file_writer, format))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .event_format(LineFormat)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        buf.contents()
    }

    #[test]
    fn test_directive_mapping() {
        assert_eq!(LogLevel::Debug.directive(), "debug");
        assert_eq!(LogLevel::Info.directive(), "info");
        assert_eq!(LogLevel::Warning.directive(), "warn");
        assert_eq!(LogLevel::Error.directive(), "error");
    }

    #[test]
    fn test_level_parsing_accepts_both_cases() {
        assert_eq!(LogLevel::from_str("WARNING", false).unwrap(), LogLevel::Warning);
        assert_eq!(LogLevel::from_str("debug", false).unwrap(), LogLevel::Debug);
        assert!(LogLevel::from_str("LOUD", false).is_err());
    }

    #[test]
    fn test_line_format() {
        let output = capture(|| tracing::warn!("disk almost full"));

        // [2024-01-31 23:59:59] [WARNING] disk almost full
        assert!(output.starts_with('['));
        assert_eq!(&output[20..22], "] ");
        assert!(output.ends_with("] [WARNING] disk almost full\n"));
    }

    #[test]
    fn test_line_format_includes_fields() {
        let output = capture(|| tracing::info!(suite = "health_check", "Check suite saved"));

        assert!(output.contains("[INFO] Check suite saved suite=\"health_check\""));
    }

    #[test]
    fn test_file_layer_writes_plain_lines() {
        let dir = tempfile::tempdir().unwrap();
        let appender = tracing_appender::rolling::never(dir.path(), "toolkit.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let subscriber = tracing_subscriber::registry().with(file_layer(writer, LogFormat::Text));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(suite = "health_check", "Check suite saved");
            tracing::warn!(exit_status = 1, "Check failed");
        });
        drop(guard);

        let contents = std::fs::read_to_string(dir.path().join("toolkit.log")).unwrap();
        assert!(!contents.contains('\u{1b}'), "escape codes in {:?}", contents);

        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(&lines[0][20..22], "] ");
        assert!(lines[0].ends_with("] [INFO] Check suite saved suite=\"health_check\""));
        assert!(lines[1].ends_with("] [WARNING] Check failed exit_status=1"));
    }

    #[test]
    fn test_json_file_layer() {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::registry()
            .with(file_layer(move || writer.clone(), LogFormat::Json));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(suite = "health_check", "Check suite saved");
        });

        let line: serde_json::Value = serde_json::from_str(buf.contents().trim()).unwrap();
        assert_eq!(line["level"], "INFO");
        assert_eq!(line["fields"]["message"], "Check suite saved");
        assert_eq!(line["fields"]["suite"], "health_check");
    }
}
