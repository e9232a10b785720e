use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log filename prefix; the appender adds the date
pub const LOG_FILENAME: &str = "pcat.log";

/// Directory log files are written to
pub fn default_log_dir() -> Result<PathBuf> {
  let data_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?;

  Ok(data_dir.join("pcat").join("logs"))
}

/// Initialize file logging.
///
/// The terminal belongs to the UI, so output only goes to a daily rolling
/// file. RUST_LOG overrides `level`.
pub fn init_logging(level: &str) -> Result<PathBuf> {
  let log_dir = default_log_dir()?;
  std::fs::create_dir_all(&log_dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", log_dir.display(), e))?;

  let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILENAME);
  let env_filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(format!("pcat={}", level)));

  let file_layer = fmt::layer()
    .with_writer(file_appender)
    .with_target(true)
    .with_ansi(false);

  tracing_subscriber::registry()
    .with(env_filter)
    .with(file_layer)
    .try_init()
    .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

  Ok(log_dir)
}
