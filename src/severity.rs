use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Importance of a log record, ordered from least to most severe.
///
/// The ordering is total (`Debug < Info < Warning < Error`) and is what
/// [`LevelFilteredLogger`](crate::LevelFilteredLogger) compares against its
/// minimum-severity threshold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Detailed diagnostics, usually suppressed in production.
    Debug,
    /// Routine operational messages. The default threshold.
    Info,
    /// Something unexpected that the host recovered from.
    Warning,
    /// A failure that needs attention.
    Error,
}

impl Severity {
    /// Uppercase label used in formatted log lines, e.g. `WARNING`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    /// Parse a severity name from a configuration value. Matching is
    /// case-insensitive; unknown names produce [`Error::UnknownSeverity`].
    fn from_str(name: &str) -> Result<Severity> {
        match name.to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            _ => Err(Error::UnknownSeverity(name.to_owned())),
        }
    }
}

impl From<Severity> for log::Level {
    fn from(severity: Severity) -> log::Level {
        match severity {
            Severity::Debug => log::Level::Debug,
            Severity::Info => log::Level::Info,
            Severity::Warning => log::Level::Warn,
            Severity::Error => log::Level::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Severity;
    use crate::Error;

    #[test]
    fn severities_are_totally_ordered() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn labels_are_uppercase() {
        assert_eq!(Severity::Debug.as_str(), "DEBUG");
        assert_eq!(Severity::Warning.to_string(), "WARNING");
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("debug".parse(), Ok(Severity::Debug));
        assert_eq!("Info".parse(), Ok(Severity::Info));
        assert_eq!("WARNING".parse(), Ok(Severity::Warning));
        assert_eq!("error".parse(), Ok(Severity::Error));
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(
            "verbose".parse::<Severity>(),
            Err(Error::UnknownSeverity("verbose".to_owned()))
        );
    }

    #[test]
    fn converts_to_log_level() {
        assert_eq!(log::Level::from(Severity::Warning), log::Level::Warn);
        assert_eq!(log::Level::from(Severity::Error), log::Level::Error);
    }
}
