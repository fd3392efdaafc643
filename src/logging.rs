//! Tracing setup: human readable stderr output plus an optional JSON log file

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

pub const LOG_LEVEL_ENV: &str = "GH_ACTIVITY_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "GH_ACTIVITY_LOG_DIR";
const LOG_FILE_PREFIX: &str = "gh-activity.log";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default stderr level, overridden by `RUST_LOG`
    pub stderr_level: Level,
    pub file_level: Level,
    /// Daily rolling JSON logs are written here when set
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stderr_level: Level::WARN,
            file_level: Level::DEBUG,
            log_dir: None,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(level) = std::env::var(LOG_LEVEL_ENV)
            .ok()
            .and_then(|l| l.parse().ok())
        {
            config.file_level = level;
        }

        config.log_dir = std::env::var_os(LOG_DIR_ENV)
            .filter(|d| !d.is_empty())
            .map(PathBuf::from);

        config
    }
}

pub fn init_logging(config: LoggingConfig) -> Result<Option<WorkerGuard>, String> {
    let stderr_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(config.stderr_level).into())
        .from_env_lossy();
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(stderr_filter);

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(LevelFilter::from_level(config.file_level));
            (Some(layer), Some(guard))
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| e.to_string())?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_stderr_quiet_and_skip_file() {
        let config = LoggingConfig::default();

        assert_eq!(config.stderr_level, Level::WARN);
        assert_eq!(config.file_level, Level::DEBUG);
        assert!(config.log_dir.is_none());
    }
}
