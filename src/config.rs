use crate::{
    logger::{ConsoleSink, LogSink},
    LevelFilteredLogger, Result, Severity,
};

/// Configuration for [`LevelFilteredLogger`].
///
/// Hosts build one of these once at startup, usually from an external
/// configuration value naming the minimum severity, and then hand the
/// resulting logger to everything that emits diagnostics.
pub struct LoggerConfig {
    pub(crate) min_severity: Severity,
    pub(crate) sink: Box<dyn LogSink>,
}

impl LoggerConfig {
    /// Create the default logger configuration: `Info` threshold, console
    /// sink.
    ///
    /// ```
    /// # use relay_core::LoggerConfig;
    /// LoggerConfig::new();
    /// ```
    pub fn new() -> Self {
        LoggerConfig {
            min_severity: Severity::Info,
            sink: Box::new(ConsoleSink),
        }
    }

    /// Set the initial severity threshold.
    pub fn min_severity(&mut self, level: Severity) -> &mut Self {
        self.min_severity = level;
        self
    }

    /// Set the initial severity threshold from a configuration value, e.g. a
    /// level name read from an environment variable or a config file.
    ///
    /// ```
    /// # use relay_core::LoggerConfig;
    /// let mut config = LoggerConfig::new();
    /// config.min_severity_name("warning").unwrap();
    /// ```
    pub fn min_severity_name(&mut self, name: &str) -> Result<&mut Self> {
        self.min_severity = name.parse()?;
        Ok(self)
    }

    /// Replace the output sink.
    ///
    /// ```
    /// # use relay_core::LoggerConfig;
    /// let mut config = LoggerConfig::new();
    /// config.sink(|line: &str| println!("{}", line));
    /// ```
    pub fn sink(&mut self, sink: impl LogSink + 'static) -> &mut Self {
        self.sink = Box::new(sink);
        self
    }

    /// Create a new [`LevelFilteredLogger`] using this configuration.
    ///
    /// ```
    /// # use relay_core::{LoggerConfig, LevelFilteredLogger};
    /// let logger: LevelFilteredLogger = LoggerConfig::new().to_logger();
    /// ```
    pub fn to_logger(self) -> LevelFilteredLogger {
        LevelFilteredLogger::from_parts(self.min_severity, self.sink)
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig::new()
    }
}

impl std::fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerConfig")
            .field("min_severity", &self.min_severity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::LoggerConfig;
    use crate::{Error, Severity};

    #[test]
    fn parses_threshold_from_configuration_name() {
        let mut config = LoggerConfig::new();
        config.min_severity_name("Error").unwrap();

        let logger = config.to_logger();
        assert_eq!(logger.min_severity(), Severity::Error);
    }

    #[test]
    fn rejects_unknown_threshold_names() {
        let mut config = LoggerConfig::new();

        let err = config.min_severity_name("loud").unwrap_err();
        assert_eq!(err, Error::UnknownSeverity("loud".to_owned()));
    }

    #[test]
    fn defaults_to_info() {
        assert_eq!(LoggerConfig::new().to_logger().min_severity(), Severity::Info);
    }
}
