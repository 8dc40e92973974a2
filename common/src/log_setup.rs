use std::path::PathBuf;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Logging setup for binaries and benchmarks embedding the prefilter.
///
/// `RUST_LOG` overrides `level` when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    /// Directory for rolling log files. `None` logs to the console only.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
    pub max_log_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: Some(PathBuf::from("logs")),
            file_prefix: "prefilter".to_string(),
            max_log_files: 5,
        }
    }
}

impl LogConfig {
    pub fn console_only(level: &str) -> Self {
        Self {
            level: level.to_string(),
            directory: None,
            ..Default::default()
        }
    }
}

pub fn setup_logging(config: &LogConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|e| panic!("Invalid log filter: {}", e));

    let console_writer = std::io::stdout.and(std::io::stderr.with_min_level(Level::WARN));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true)
        .with_writer(console_writer);

    let file_layer = config.directory.as_ref().map(|dir| {
        std::fs::create_dir_all(dir)
            .unwrap_or_else(|e| panic!("Failed to create log directory {:?}: {}", dir, e));

        let file_appender = tracing_appender::rolling::Builder::new()
            .rotation(tracing_appender::rolling::Rotation::DAILY)
            .filename_prefix(&config.file_prefix)
            .filename_suffix("log")
            .max_log_files(config.max_log_files)
            .build(dir)
            .unwrap_or_else(|e| panic!("Failed to create log file appender: {}", e));

        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        LOG_GUARD.set(guard).expect("Logging already initialized");

        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false)
            .with_writer(file_writer)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .unwrap_or_else(|e| panic!("Logger initialization failed: {}", e));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_logs_to_files() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.directory, Some(PathBuf::from("logs")));
        assert_eq!(config.file_prefix, "prefilter");
    }

    #[test]
    fn console_only_has_no_directory() {
        let config = LogConfig::console_only("debug");
        assert_eq!(config.level, "debug");
        assert!(config.directory.is_none());
        assert_eq!(config.max_log_files, 5);
    }
}
