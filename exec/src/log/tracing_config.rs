// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::PathBuf;

use tracing_core::LevelFilter;

/// The default log file, relative to the current working directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "r3bl_exec_log.txt";

/// Configure the tracing logging to suit your needs. You can send the logs to:
/// 1. a file,
/// 2. stdout or stderr,
/// 3. both.
///
/// This configuration also sets the log level. Use [`crate::try_initialize_logging_global()`]
/// to install it.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub writer_config: WriterConfig,
    pub level_filter: LevelFilter,
}

/// Where the log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriterConfig {
    None,
    Display(DisplayPreference),
    File(PathBuf /* tracing_log_file_path */),
    DisplayAndFile(DisplayPreference, PathBuf /* tracing_log_file_path */),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPreference {
    Stdout,
    Stderr,
}

impl Default for TracingConfig {
    /// Logging is off by default.
    fn default() -> Self {
        Self {
            writer_config: WriterConfig::None,
            level_filter: LevelFilter::OFF,
        }
    }
}

impl TracingConfig {
    /// Log to a file. This is the right choice for a host that hands its terminal off.
    /// When `maybe_path` is `None`, [`DEFAULT_LOG_FILE_NAME`] is used.
    #[must_use]
    pub fn new_file(maybe_path: Option<PathBuf>, level_filter: LevelFilter) -> Self {
        Self {
            writer_config: WriterConfig::File(
                maybe_path.unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE_NAME)),
            ),
            level_filter,
        }
    }

    #[must_use]
    pub fn new_display(
        display_preference: DisplayPreference,
        level_filter: LevelFilter,
    ) -> Self {
        Self {
            writer_config: WriterConfig::Display(display_preference),
            level_filter,
        }
    }

    #[must_use]
    pub fn get_writer_config(&self) -> WriterConfig { self.writer_config.clone() }

    #[must_use]
    pub fn get_level_filter(&self) -> LevelFilter { self.level_filter }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_is_off() {
        let it = TracingConfig::default();
        assert_eq!(it.get_level_filter(), LevelFilter::OFF);
        assert_eq!(it.get_writer_config(), WriterConfig::None);
    }

    #[test]
    fn test_new_file_falls_back_to_the_default_file_name() {
        let it = TracingConfig::new_file(None, LevelFilter::DEBUG);
        assert_eq!(
            it.get_writer_config(),
            WriterConfig::File(PathBuf::from(DEFAULT_LOG_FILE_NAME))
        );
        assert_eq!(it.get_level_filter(), LevelFilter::DEBUG);
    }
}
