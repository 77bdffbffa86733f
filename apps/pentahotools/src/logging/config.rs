//! Logging configuration resolved from CLI flags and environment

use super::LogLevel;
use std::path::PathBuf;

/// Resolved logging configuration
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Verbosity level
    pub level: LogLevel,
    /// Suppress everything on the terminal except command output
    pub quiet: bool,
    /// Optional file receiving every entry regardless of level
    pub log_file: Option<PathBuf>,
    /// Use ANSI colors on the terminal
    pub color: bool,
}

impl LogConfig {
    /// Combine CLI flags with PENTAHOTOOLS_* environment variables
    ///
    /// Flags and environment variables are OR-ed; `--log-file` wins over
    /// PENTAHOTOOLS_LOG_FILE. Color is disabled by NO_COLOR.
    pub fn from_args_and_env(
        verbose: bool,
        debug: bool,
        trace: bool,
        quiet: bool,
        log_file: Option<PathBuf>,
    ) -> Self {
        let verbose = verbose || env_flag("PENTAHOTOOLS_VERBOSE");
        let debug = debug || env_flag("PENTAHOTOOLS_DEBUG");
        let trace = trace || env_flag("PENTAHOTOOLS_TRACE");
        let log_file = log_file.or_else(|| {
            std::env::var("PENTAHOTOOLS_LOG_FILE")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        });

        Self {
            level: LogLevel::from_flags(verbose, debug, trace),
            quiet,
            log_file,
            color: std::env::var("NO_COLOR").is_err(),
        }
    }

    /// Check if verbose terminal output is enabled
    pub fn is_verbose(&self) -> bool {
        !self.quiet && self.level.is_verbose()
    }

    /// Check if debug terminal output is enabled
    pub fn is_debug(&self) -> bool {
        !self.quiet && self.level.is_debug()
    }

    /// Check if trace terminal output is enabled
    pub fn is_trace(&self) -> bool {
        !self.quiet && self.level.is_trace()
    }
}

fn env_flag(name: &str) -> bool {
    matches!(
        std::env::var(name).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes")
    )
}
