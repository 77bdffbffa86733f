//! CLI error types and exit codes

use crate::batch::ImportError;
use thiserror::Error;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: General error
/// - 2: Authentication or authorization failure
/// - 3: Network error
/// - 4: Validation error
/// - 5: Server error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Connection failed: {0}\n\nTroubleshooting:\n  - Check that the Pentaho server is running\n  - Verify the endpoint URL (--url)")]
    ConnectionFailed(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Table error: {0}")]
    Table(String),

    #[error("Validation failed for user '{user}': {reason}\nNo changes were made.")]
    ValidationFailed { user: String, reason: String },

    #[error("Failed to import {failed} user(s)")]
    ImportFailed { failed: usize },

    #[error(transparent)]
    Import(#[from] ImportError),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Network(_) | CliError::ConnectionFailed(_) => 3,
            CliError::Validation(_) | CliError::ValidationFailed { .. } => 4,
            CliError::NotFound(_) => 4,
            CliError::Api { status, .. } => api_exit_code(*status),
            CliError::Import(e) => match e.directory_source() {
                Some(source) => source.exit_code(),
                None => 1,
            },
            CliError::Config(_)
            | CliError::Io(_)
            | CliError::Table(_)
            | CliError::ImportFailed { .. } => 1,
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    /// Get a suggested action for this error
    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::ConnectionFailed(_) => Some("Check your network connection and try again."),
            CliError::Api { status: 401, .. } => {
                Some("Check the user name and password (--user, --password).")
            }
            CliError::Api { status: 403, .. } => {
                Some("Run the command as a user holding the Administrator role.")
            }
            CliError::ValidationFailed { .. } => {
                Some("Fix the row in the users file and run the import again.")
            }
            _ => None,
        }
    }
}

fn api_exit_code(status: u16) -> i32 {
    if status >= 500 {
        5
    } else if status == 401 || status == 403 {
        2
    } else {
        4
    }
}

impl From<reqwest::Error> for CliError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            CliError::ConnectionFailed(e.to_string())
        } else if e.is_timeout() {
            CliError::Network("Request timed out".to_string())
        } else {
            CliError::Network(e.to_string())
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Config(format!("JSON error: {}", e))
    }
}

impl From<csv::Error> for CliError {
    fn from(e: csv::Error) -> Self {
        CliError::Table(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::DirectoryOperation;

    #[test]
    fn test_exit_code_network_error() {
        assert_eq!(CliError::Network("test".to_string()).exit_code(), 3);
    }

    #[test]
    fn test_exit_code_connection_failed() {
        assert_eq!(
            CliError::ConnectionFailed("test".to_string()).exit_code(),
            3
        );
    }

    #[test]
    fn test_exit_code_validation_failed() {
        let err = CliError::ValidationFailed {
            user: "bob".to_string(),
            reason: "No such role: Editor".to_string(),
        };
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_exit_code_api_error_5xx() {
        assert_eq!(
            CliError::Api {
                status: 500,
                message: "test".to_string()
            }
            .exit_code(),
            5
        );
    }

    #[test]
    fn test_exit_code_api_error_403() {
        assert_eq!(
            CliError::Api {
                status: 403,
                message: "test".to_string()
            }
            .exit_code(),
            2
        );
    }

    #[test]
    fn test_exit_code_import_failed() {
        assert_eq!(CliError::ImportFailed { failed: 3 }.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_follows_directory_failure() {
        let err = CliError::Import(ImportError::directory(
            DirectoryOperation::DeleteUsers,
            CliError::Api {
                status: 503,
                message: "unavailable".to_string(),
            },
        ));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_error_display_validation_failed() {
        let err = CliError::ValidationFailed {
            user: "carol".to_string(),
            reason: "case mismatch".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("carol"));
        assert!(text.contains("No changes were made"));
    }
}
