//! Tracing subscriber setup for the operator tools.
//!
//! | Variable     | Meaning                                                |
//! |--------------|--------------------------------------------------------|
//! | `RUST_LOG`   | Standard env filter (default [`DEFAULT_FILTER`])       |
//! | `LOG_FORMAT` | `json` or `text` (default `text`)                      |
//! | `LOG_FILE`   | Write logs to this file (daily rotation) not stderr    |
//! | `LOG_ANSI`   | `true`/`false` override for ANSI colours               |
//!
//! Console logs go to stderr so stdout carries only the tool's own output.

use std::path::{Path, PathBuf};

use atelier_core::{Error, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or unparseable.
pub const DEFAULT_FILTER: &str = "atelier_cli=info,atelier_db=info,atelier_core=info";

const DEFAULT_LOG_FILE_NAME: &str = "atelier.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub filter: Option<String>,
    pub format: LogFormat,
    pub file: Option<PathBuf>,
    pub ansi: Option<bool>,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };
        Self {
            filter: lookup("RUST_LOG").filter(|v| !v.trim().is_empty()),
            format,
            file: lookup("LOG_FILE")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            ansi: lookup("LOG_ANSI").map(|v| v == "true" || v == "1"),
        }
    }

    fn env_filter(&self) -> EnvFilter {
        self.filter
            .as_deref()
            .and_then(|f| EnvFilter::try_new(f).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber.
///
/// Returns the appender guard when logging to a file; keep it alive until
/// exit so buffered lines are flushed. An unusable `LOG_FILE` is an
/// `Error::Config` and leaves no subscriber installed.
pub fn init_tracing(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let file_appender = config.file.as_deref().map(file_appender).transpose()?;
    let registry = tracing_subscriber::registry().with(config.env_filter());

    if let Some(file_appender) = file_appender {
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        match config.format {
            LogFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init(),
            LogFormat::Text => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        // no ANSI in files unless asked
                        .with_ansi(config.ansi.unwrap_or(false)),
                )
                .init(),
        }
        Ok(Some(guard))
    } else {
        match config.format {
            LogFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init(),
            LogFormat::Text => {
                let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
                if let Some(ansi) = config.ansi {
                    layer = layer.with_ansi(ansi);
                }
                registry.with(layer).init();
            }
        }
        Ok(None)
    }
}

/// Daily-rolling appender for `path`, creating its directory if needed.
fn file_appender(path: &Path) -> Result<RollingFileAppender> {
    let (dir, name) = split_log_path(path);
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(name)
        .build(dir)
        .map_err(|e| Error::Config(format!("LOG_FILE {}: {}", path.display(), e)))
}

fn split_log_path(path: &Path) -> (&Path, &str) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or(DEFAULT_LOG_FILE_NAME);
    (dir, name)
}
