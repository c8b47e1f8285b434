//! # atelier-cli
//!
//! Shared plumbing for the `migrate` and `create-admin` binaries: logging
//! setup, pool sizing from [`Config`], the overall deadline, and the
//! failure path every command ends in.

pub mod telemetry;

use std::future::Future;
use std::process::ExitCode;
use std::time::Duration;

use atelier_core::{logging, Config, Error, Result};
use atelier_db::PoolConfig;
use tracing::debug;

pub use telemetry::{init_tracing, LogConfig, LogFormat};

/// Pool settings for a one-shot tool whose connect attempt must fit in `deadline`.
pub fn pool_config(config: &Config, deadline: Duration) -> PoolConfig {
    PoolConfig::new()
        .max_connections(config.max_connections)
        .min_connections(0)
        .connect_timeout(deadline)
}

/// Run `work` to completion or fail with [`Error::Timeout`] once `deadline` passes.
///
/// Expiry drops `work` mid-flight; nothing is retried.
pub async fn with_deadline<T, F>(deadline: Duration, work: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(deadline, work).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout(deadline)),
    }
}

/// Print the single diagnostic line for `err` and map it to a failing exit code.
pub fn fail(err: &Error) -> ExitCode {
    let message = err.to_string();
    debug!(
        { logging::SUBSYSTEM } = "cli",
        { logging::ERROR_MSG } = message.as_str(),
        "Command failed"
    );
    eprintln!("Error: {}", err);
    ExitCode::FAILURE
}
