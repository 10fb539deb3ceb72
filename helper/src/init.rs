use anyhow::{Context, Result};
use std::env::var;
use std::path::PathBuf;
use tracing::subscriber::set_global_default;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_forest::ForestLayer;
use tracing_log::LogTracer;
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Where the diagnostic log of the binary `name` goes.
///
/// Env variable LOG_CONFIG_PATH points at the directory where
/// LOG_CONFIG_FILENAME is located; the file defaults to `<name>.log` in the
/// working directory.
pub fn log_file_location(
    name: &str,
    path: Option<String>,
    filename: Option<String>,
) -> (PathBuf, String) {
    (
        PathBuf::from(path.unwrap_or_else(|| "./".to_string())),
        filename.unwrap_or_else(|| format!("{name}.log")),
    )
}

/// Compose multiple layers into a `tracing`'s subscriber.
///
/// The returned guard flushes the file writer when dropped, keep it alive
/// for as long as the process logs.
pub fn get_subscriber(
    name: &str,
    env_filter: &str,
) -> (impl Subscriber + Send + Sync, WorkerGuard) {
    let (log_config_path, log_config_filename) = log_file_location(
        name,
        var("LOG_CONFIG_PATH").ok(),
        var("LOG_CONFIG_FILENAME").ok(),
    );

    let file_appender =
        tracing_appender::rolling::never(log_config_path, log_config_filename);
    let (non_blocking_file, guard) =
        tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(env_filter));

    let reg = Registry::default().with(env_filter).with(
        fmt::Layer::default().with_ansi(false).with_writer(non_blocking_file),
    );

    (reg.with(ForestLayer::default()), guard)
}

/// Register a subscriber as global default to process span data.
///
/// It should only be called once!
pub fn init_subscriber(
    subscriber: impl Subscriber + Send + Sync,
) -> Result<()> {
    LogTracer::init().context("Failed to set logger")?;
    set_global_default(subscriber).context("Failed to set subscriber")?;
    Ok(())
}
