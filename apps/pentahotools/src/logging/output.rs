//! Terminal and file writers for log entries

use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use super::level::{LogLevel, Severity};
use super::redaction::Redactor;

/// A destination for log entries
pub trait LogOutput: Send + Sync {
    fn write(&self, entry: &LogEntry) -> io::Result<()>;

    fn flush(&self) -> io::Result<()>;
}

/// A single log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    /// Verbosity level the entry was emitted at
    pub level: LogLevel,
    pub severity: Severity,
    pub message: String,
    /// Operation or component name shown as a prefix
    pub context: Option<String>,
    /// Structured key/value pairs, e.g. `user=bob`
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            severity: Severity::Info,
            message: message.into(),
            context: None,
            fields: Vec::new(),
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_fields(mut self, fields: &[(&str, &str)]) -> Self {
        self.fields = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self
    }

    /// Label printed between brackets: ERROR / WARN or the level name
    pub fn label(&self) -> &'static str {
        match self.severity {
            Severity::Error => "ERROR",
            Severity::Warn => "WARN",
            Severity::Info => self.level.name(),
        }
    }

    /// Message followed by `key=value` pairs, redacted
    fn body(&self, redactor: &Redactor) -> String {
        let mut text = redactor.redact_string(&self.message);
        for (key, value) in &self.fields {
            text.push_str(&format!(" {}={}", key, redactor.redact(value)));
        }
        text
    }
}

/// HTTP request or response summary
#[derive(Debug, Clone)]
pub struct HttpLogEntry {
    pub direction: HttpDirection,
    pub method: Option<String>,
    pub url: Option<String>,
    pub status: Option<u16>,
    pub timing_ms: Option<u64>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpDirection {
    Request,
    Response,
}

impl HttpLogEntry {
    pub fn request(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            direction: HttpDirection::Request,
            method: Some(method.into()),
            url: Some(url.into()),
            status: None,
            timing_ms: None,
            body: None,
        }
    }

    pub fn response(status: u16, timing_ms: u64) -> Self {
        Self {
            direction: HttpDirection::Response,
            method: None,
            url: None,
            status: Some(status),
            timing_ms: Some(timing_ms),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// One-line summary: method and URL, or status and timing
    pub fn format_debug(&self, redactor: &Redactor) -> String {
        match self.direction {
            HttpDirection::Request => format!(
                "→ {} {}",
                self.method.as_deref().unwrap_or("?"),
                redactor.redact(self.url.as_deref().unwrap_or("?"))
            ),
            HttpDirection::Response => {
                let status = self.status.unwrap_or(0);
                let reason = reqwest::StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("?");
                format!(
                    "← {} {} ({}ms)",
                    status,
                    reason,
                    self.timing_ms.unwrap_or(0)
                )
            }
        }
    }

    /// Summary plus the redacted body
    pub fn format_trace(&self, redactor: &Redactor) -> String {
        let mut output = self.format_debug(redactor);
        if let Some(ref body) = self.body {
            let redacted = redactor.redact(body);
            if redacted.is_empty() {
                output.push_str("\n  Body: (empty)");
            } else {
                output.push_str(&format!("\n  Body:\n    {}", redacted));
            }
        }
        output
    }
}

/// Writes entries to stderr
pub struct TerminalWriter {
    color: bool,
    redactor: Redactor,
}

impl TerminalWriter {
    pub fn new(color: bool) -> Self {
        Self {
            color,
            redactor: Redactor::new(),
        }
    }

    fn format_entry(&self, entry: &LogEntry) -> String {
        let body = entry.body(&self.redactor);
        let prefix = match entry.severity {
            Severity::Error => "error".to_string(),
            Severity::Warn => "warning".to_string(),
            Severity::Info => entry
                .context
                .clone()
                .unwrap_or_else(|| "verbose".to_string()),
        };

        if !self.color {
            return format!("[{}] {}", prefix, body);
        }
        let code = match entry.severity {
            Severity::Error => "31",
            Severity::Warn => "33",
            Severity::Info => "36",
        };
        format!("\x1b[{}m[{}]\x1b[0m {}", code, prefix, body)
    }

    pub fn format_http(&self, entry: &HttpLogEntry, trace: bool) -> String {
        let text = if trace {
            entry.format_trace(&self.redactor)
        } else {
            entry.format_debug(&self.redactor)
        };
        if !self.color {
            return text;
        }
        let code = match (entry.direction, entry.status.unwrap_or(0)) {
            (HttpDirection::Request, _) => "33",
            (HttpDirection::Response, 200..=299) => "32",
            (HttpDirection::Response, s) if s >= 400 => "31",
            _ => "33",
        };
        format!("\x1b[{}m{}\x1b[0m", code, text)
    }

    pub fn format_trace_warning(&self) -> String {
        if self.color {
            "\x1b[33m⚠️  TRACE MODE: Output may contain sensitive information\x1b[0m".to_string()
        } else {
            "WARNING: TRACE MODE - Output may contain sensitive information".to_string()
        }
    }
}

impl LogOutput for TerminalWriter {
    fn write(&self, entry: &LogEntry) -> io::Result<()> {
        eprintln!("{}", self.format_entry(entry));
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// Appends timestamped entries to a file
pub struct FileWriter {
    file: Mutex<File>,
    redactor: Redactor,
}

impl FileWriter {
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
            redactor: Redactor::new(),
        })
    }

    fn format_entry(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%dT%H:%M:%S");
        let context = entry
            .context
            .as_deref()
            .map(|c| format!(" [{}]", c))
            .unwrap_or_default();
        format!(
            "[{}] [{}]{} {}",
            timestamp,
            entry.label(),
            context,
            entry.body(&self.redactor)
        )
    }

    pub fn write_http(&self, entry: &HttpLogEntry) -> io::Result<()> {
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S");
        let formatted = entry.format_trace(&self.redactor);
        self.write_line(&format!("[{}] [HTTP] {}", timestamp, formatted))
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("Failed to lock log file"))?;
        writeln!(file, "{}", line)?;
        file.flush()
    }
}

impl LogOutput for FileWriter {
    fn write(&self, entry: &LogEntry) -> io::Result<()> {
        let formatted = self.format_entry(entry);
        self.write_line(&formatted)
    }

    fn flush(&self) -> io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("Failed to lock log file"))?;
        file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_entry_label_follows_severity() {
        let entry = LogEntry::new(LogLevel::Normal, "x").with_severity(Severity::Error);
        assert_eq!(entry.label(), "ERROR");
        let entry = LogEntry::new(LogLevel::Normal, "x").with_severity(Severity::Warn);
        assert_eq!(entry.label(), "WARN");
        let entry = LogEntry::new(LogLevel::Verbose, "x");
        assert_eq!(entry.label(), "VERBOSE");
    }

    #[test]
    fn test_terminal_format_with_fields() {
        let writer = TerminalWriter::new(false);
        let entry = LogEntry::new(LogLevel::Normal, "Failed to import user")
            .with_severity(Severity::Error)
            .with_fields(&[("user", "bob"), ("roles", "Editor")]);
        assert_eq!(
            writer.format_entry(&entry),
            "[error] Failed to import user user=bob roles=Editor"
        );
    }

    #[test]
    fn test_terminal_format_uses_context() {
        let writer = TerminalWriter::new(false);
        let entry = LogEntry::new(LogLevel::Verbose, "Created role").with_context("import");
        assert_eq!(writer.format_entry(&entry), "[import] Created role");
    }

    #[test]
    fn test_terminal_color_format() {
        let writer = TerminalWriter::new(true);
        let entry = LogEntry::new(LogLevel::Normal, "careful").with_severity(Severity::Warn);
        let formatted = writer.format_entry(&entry);
        assert!(formatted.contains("\x1b[33m"));
        assert!(formatted.contains("\x1b[0m"));
    }

    #[test]
    fn test_http_format_debug() {
        let redactor = Redactor::new();
        let request = HttpLogEntry::request("GET", "http://localhost/api/userrolelist/users");
        assert_eq!(
            request.format_debug(&redactor),
            "→ GET http://localhost/api/userrolelist/users"
        );
        let response = HttpLogEntry::response(200, 12);
        assert_eq!(response.format_debug(&redactor), "← 200 OK (12ms)");
    }

    #[test]
    fn test_http_format_trace_redacts_body() {
        let redactor = Redactor::new();
        let entry = HttpLogEntry::request("PUT", "http://localhost/api/userroledao/createUser")
            .with_body(r#"{"userName":"bob","password":"s3cr3t"}"#);
        let formatted = entry.format_trace(&redactor);
        assert!(formatted.contains("Body:"));
        assert!(!formatted.contains("s3cr3t"));
    }

    #[test]
    fn test_file_writer_appends_entries() {
        let temp_file = NamedTempFile::new().unwrap();
        let writer = FileWriter::new(temp_file.path()).unwrap();

        writer
            .write(&LogEntry::new(LogLevel::Verbose, "first").with_context("import"))
            .unwrap();
        writer
            .write(
                &LogEntry::new(LogLevel::Normal, "second")
                    .with_severity(Severity::Warn)
                    .with_fields(&[("user", "admin")]),
            )
            .unwrap();
        writer.flush().unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[VERBOSE] [import] first"));
        assert!(lines[1].contains("[WARN] second user=admin"));
    }
}
