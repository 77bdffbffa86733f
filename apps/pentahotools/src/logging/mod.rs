//! Logging for the pentahotools CLI
//!
//! - Verbosity levels (Normal, Verbose, Debug, Trace)
//! - Environment variables (PENTAHOTOOLS_VERBOSE, PENTAHOTOOLS_DEBUG, PENTAHOTOOLS_TRACE)
//! - Optional log file receiving every entry with a timestamp
//! - Password redaction
//!
//! There is no global logger: `main` builds one `Logger` and hands an
//! `Arc<Logger>` to the HTTP client and to the batch engine.
//!
//! ```rust,ignore
//! let config = LogConfig::from_args_and_env(verbose, debug, trace, quiet, log_file);
//! let logger = Arc::new(Logger::new(config)?);
//! logger.warn("Skipping user", &[("user", "admin")]);
//! ```

pub mod config;
pub mod level;
pub mod output;
pub mod redaction;

pub use config::LogConfig;
pub use level::{LogLevel, Severity};
pub use output::{FileWriter, HttpDirection, HttpLogEntry, LogEntry, LogOutput, TerminalWriter};
pub use redaction::{Redactor, REDACTED};

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Logger writing to the terminal and optionally to a file
pub struct Logger {
    config: LogConfig,
    terminal: Option<TerminalWriter>,
    file: Option<FileWriter>,
    trace_warned: Arc<AtomicBool>,
}

impl Logger {
    /// Create a logger, opening the log file in append mode if one is configured
    pub fn new(config: LogConfig) -> io::Result<Self> {
        let terminal = Some(TerminalWriter::new(config.color));
        let file = config
            .log_file
            .as_ref()
            .map(|path| FileWriter::new(path))
            .transpose()?;

        Ok(Self {
            config,
            terminal,
            file,
            trace_warned: Arc::new(AtomicBool::new(false)),
        })
    }

    /// A logger that writes nothing anywhere
    pub fn disabled() -> Self {
        Self {
            config: LogConfig {
                quiet: true,
                ..LogConfig::default()
            },
            terminal: None,
            file: None,
            trace_warned: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    pub fn is_verbose(&self) -> bool {
        self.config.is_verbose()
    }

    pub fn is_debug(&self) -> bool {
        self.config.is_debug()
    }

    pub fn is_trace(&self) -> bool {
        self.config.is_trace()
    }

    /// Log an error; shown on the terminal unless quiet
    pub fn error(&self, message: impl Into<String>, fields: &[(&str, &str)]) {
        let entry = LogEntry::new(LogLevel::Normal, message)
            .with_severity(Severity::Error)
            .with_fields(fields);
        self.emit(&entry, !self.config.quiet);
    }

    /// Log a warning; shown on the terminal unless quiet
    pub fn warn(&self, message: impl Into<String>, fields: &[(&str, &str)]) {
        let entry = LogEntry::new(LogLevel::Normal, message)
            .with_severity(Severity::Warn)
            .with_fields(fields);
        self.emit(&entry, !self.config.quiet);
    }

    /// Log a progress message at verbose level
    pub fn verbose(&self, message: impl Into<String>) {
        let entry = LogEntry::new(LogLevel::Verbose, message).with_context("verbose");
        self.emit(&entry, self.config.is_verbose());
    }

    /// Log a verbose message under a custom context with fields
    pub fn verbose_with_context(
        &self,
        context: impl Into<String>,
        message: impl Into<String>,
        fields: &[(&str, &str)],
    ) {
        let entry = LogEntry::new(LogLevel::Verbose, message)
            .with_context(context)
            .with_fields(fields);
        self.emit(&entry, self.config.is_verbose());
    }

    /// The file receives every entry; the terminal only what the level allows
    fn emit(&self, entry: &LogEntry, to_terminal: bool) {
        if to_terminal {
            if let Some(ref terminal) = self.terminal {
                let _ = terminal.write(entry);
            }
        }
        if let Some(ref file) = self.file {
            let _ = file.write(entry);
        }
    }

    fn maybe_show_trace_warning(&self) {
        if self.config.is_trace() && !self.trace_warned.swap(true, Ordering::SeqCst) {
            if let Some(ref terminal) = self.terminal {
                eprintln!("{}", terminal.format_trace_warning());
            }
        }
    }

    fn emit_http(&self, entry: &HttpLogEntry, trace: bool) {
        if let Some(ref terminal) = self.terminal {
            eprintln!("{}", terminal.format_http(entry, trace));
        }
        if let Some(ref file) = self.file {
            let _ = file.write_http(entry);
        }
    }

    /// Log an HTTP request at debug level
    pub fn debug_request(&self, method: &str, url: &str) {
        if !self.config.is_debug() {
            return;
        }
        self.emit_http(&HttpLogEntry::request(method, url), false);
    }

    /// Log an HTTP response at debug level
    pub fn debug_response(&self, status: u16, timing_ms: u64) {
        if !self.config.is_debug() {
            return;
        }
        self.emit_http(&HttpLogEntry::response(status, timing_ms), false);
    }

    /// Log an HTTP request body at trace level
    pub fn trace_request_body(&self, method: &str, url: &str, body: &str) {
        if !self.config.is_trace() {
            return;
        }
        self.maybe_show_trace_warning();
        self.emit_http(&HttpLogEntry::request(method, url).with_body(body), true);
    }

    /// Log an HTTP response body at trace level
    pub fn trace_response_body(&self, status: u16, timing_ms: u64, body: &str) {
        if !self.config.is_trace() {
            return;
        }
        self.maybe_show_trace_warning();
        self.emit_http(&HttpLogEntry::response(status, timing_ms).with_body(body), true);
    }
}
