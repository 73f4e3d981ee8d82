//! Subscriber setup
//!
//! Console output is always on. With `logging.local_enabled` a second layer
//! writes JSON lines to `<local_path>/harvest.log.<period>`.

use crate::config::LoggingConfig;
use crate::domain::{HarvestError, Result};
use std::str::FromStr;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "harvest.log";

/// HTTP internals are only interesting when something is broken.
const QUIET_DEPENDENCIES: &[&str] = &["hyper=warn", "reqwest=warn", "rustls=warn"];

/// Keeps the background file writer alive; drop it last
#[must_use]
pub struct LoggingGuard {
    _file_writer: Option<WorkerGuard>,
}

/// Install the global subscriber
///
/// `RUST_LOG`, when set, replaces the filter built from `level`.
pub fn init_logging(level: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let level = parse_log_level(level)?;
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(level)))
    };

    let console = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_filter(filter())
        .boxed();

    let (file, file_writer) = if config.local_enabled {
        std::fs::create_dir_all(&config.local_path).map_err(|e| {
            HarvestError::Configuration(format!(
                "Failed to create log directory {}: {e}",
                config.local_path
            ))
        })?;

        let appender = RollingFileAppender::new(
            rotation(&config.local_rotation),
            &config.local_path,
            LOG_FILE_PREFIX,
        );
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(writer)
            .with_filter(filter())
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| HarvestError::Configuration(format!("Logging already initialized: {e}")))?;

    tracing::debug!(
        %level,
        file = config.local_enabled,
        path = %config.local_path,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _file_writer: file_writer,
    })
}

fn parse_log_level(level: &str) -> Result<Level> {
    Level::from_str(level.trim()).map_err(|_| {
        HarvestError::Configuration(format!(
            "Invalid log level: {level}. Must be one of: trace, debug, info, warn, error"
        ))
    })
}

fn directives(level: Level) -> String {
    std::iter::once(format!("harvest={level}"))
        .chain(QUIET_DEPENDENCIES.iter().map(|d| d.to_string()))
        .collect::<Vec<_>>()
        .join(",")
}

fn rotation(name: &str) -> Rotation {
    match name {
        "hourly" => Rotation::HOURLY,
        _ => Rotation::DAILY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("trace", Level::TRACE)]
    #[test_case("Debug", Level::DEBUG)]
    #[test_case(" info ", Level::INFO)]
    #[test_case("WARN", Level::WARN)]
    #[test_case("error", Level::ERROR)]
    fn test_parse_log_level(input: &str, expected: Level) {
        assert_eq!(parse_log_level(input).unwrap(), expected);
    }

    #[test]
    fn test_unknown_log_level_is_configuration_error() {
        let err = parse_log_level("verbose").unwrap_err();
        assert!(matches!(err, HarvestError::Configuration(msg) if msg.contains("verbose")));
    }

    #[test]
    fn test_directives_scope_level_to_crate() {
        let d = directives(Level::DEBUG);
        assert!(d.starts_with("harvest=DEBUG"));
        assert!(d.contains("reqwest=warn"));
        assert!(EnvFilter::try_new(&d).is_ok());
    }

    #[test]
    fn test_rotation_defaults_to_daily() {
        assert_eq!(rotation("hourly"), Rotation::HOURLY);
        assert_eq!(rotation("daily"), Rotation::DAILY);
        assert_eq!(rotation("weekly"), Rotation::DAILY);
    }
}
