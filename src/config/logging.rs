//! Logging configuration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Log severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Increase verbosity by `steps`, saturating at `Trace`
    pub fn raised(self, steps: u8) -> Self {
        const ORDER: [LogLevel; 5] = [
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ];
        let current = ORDER.iter().position(|l| *l == self).unwrap_or(2);
        ORDER[(current + steps as usize).min(ORDER.len() - 1)]
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log format
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: LogLevel,
}

fn default_log_format() -> LogFormat {
    LogFormat::Text
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

impl LoggingConfig {
    /// `EnvFilter` directive for this config, raised by `-v` flags
    pub fn filter_directive(&self, verbose: u8) -> String {
        let level = self.level.raised(verbose);
        format!("{level},tower_http={level}")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raised_saturates_at_trace() {
        assert_eq!(LogLevel::Info.raised(0), LogLevel::Info);
        assert_eq!(LogLevel::Info.raised(1), LogLevel::Debug);
        assert_eq!(LogLevel::Info.raised(2), LogLevel::Trace);
        assert_eq!(LogLevel::Info.raised(9), LogLevel::Trace);
        assert_eq!(LogLevel::Error.raised(1), LogLevel::Warn);
    }

    #[test]
    fn filter_directive_includes_http_tracing() {
        let cfg = LoggingConfig::default();
        assert_eq!(cfg.filter_directive(0), "info,tower_http=info");
        assert_eq!(cfg.filter_directive(1), "debug,tower_http=debug");
    }

    #[test]
    fn parses_lowercase_names() {
        let cfg: LoggingConfig = toml::from_str("format = \"json\"\nlevel = \"warn\"").unwrap();
        assert_eq!(cfg.format, LogFormat::Json);
        assert_eq!(cfg.level, LogLevel::Warn);
    }
}
