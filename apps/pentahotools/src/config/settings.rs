//! Persisted connection settings

use super::{ConfigPaths, DEFAULT_URL};
use crate::error::{CliError, CliResult};
use serde::{Deserialize, Serialize};

/// Connection settings for the Pentaho REST endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the Pentaho web application
    pub url: String,
    /// User name for basic authentication
    pub user: String,
    /// Password for basic authentication
    pub password: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            user: "admin".to_string(),
            password: "password".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults when it does not exist
    pub fn load(paths: &ConfigPaths) -> CliResult<Self> {
        if !paths.config_file.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&paths.config_file)?;
        let config: Config = serde_json::from_str(&content).map_err(|e| {
            CliError::Config(format!(
                "Failed to parse {}: {}",
                paths.config_file.display(),
                e
            ))
        })?;

        Ok(config.normalized())
    }

    /// Write the config file
    pub fn save(&self, paths: &ConfigPaths) -> CliResult<()> {
        paths.ensure_dir_exists()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&paths.config_file, content)?;

        // The file holds a password
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&paths.config_file, perms)?;
        }

        Ok(())
    }

    /// Apply command-line overrides on top of the loaded settings
    pub fn with_overrides(
        mut self,
        url: Option<String>,
        user: Option<String>,
        password: Option<String>,
    ) -> Self {
        if let Some(url) = url {
            self.url = url;
        }
        if let Some(user) = user {
            self.user = user;
        }
        if let Some(password) = password {
            self.password = password;
        }
        self.normalized()
    }

    /// Build an endpoint URL from a path relative to the web application
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn normalized(mut self) -> Self {
        let trimmed = self.url.trim_end_matches('/').len();
        self.url.truncate(trimmed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = TempDir::new().unwrap();
        let paths = ConfigPaths::with_dir(dir.path().to_path_buf());
        let config = Config::load(&paths).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.url, "http://localhost:8080/pentaho");
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let paths = ConfigPaths::with_dir(dir.path().join("nested"));
        let config = Config {
            url: "https://bi.example.com/pentaho".to_string(),
            user: "ops".to_string(),
            password: "hunter2".to_string(),
            timeout_secs: 5,
        };
        config.save(&paths).unwrap();
        assert_eq!(Config::load(&paths).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults_for_missing_fields() {
        let dir = TempDir::new().unwrap();
        let paths = ConfigPaths::with_dir(dir.path().to_path_buf());
        std::fs::write(&paths.config_file, r#"{"url": "http://bi:8080/pentaho/"}"#).unwrap();

        let config = Config::load(&paths).unwrap();
        assert_eq!(config.url, "http://bi:8080/pentaho");
        assert_eq!(config.user, "admin");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let paths = ConfigPaths::with_dir(dir.path().to_path_buf());
        std::fs::write(&paths.config_file, "not json").unwrap();

        assert!(matches!(Config::load(&paths), Err(CliError::Config(_))));
    }

    #[test]
    fn test_overrides_trim_trailing_slash() {
        let config = Config::default().with_overrides(
            Some("http://bi:8080/pentaho//".to_string()),
            None,
            Some("secret".to_string()),
        );
        assert_eq!(config.url, "http://bi:8080/pentaho");
        assert_eq!(config.user, "admin");
        assert_eq!(config.password, "secret");
    }

    #[test]
    fn test_endpoint_joins_path() {
        let config = Config::default();
        assert_eq!(
            config.endpoint("api/userrolelist/users"),
            "http://localhost:8080/pentaho/api/userrolelist/users"
        );
        assert_eq!(
            config.endpoint("/api/repo/files/delete"),
            "http://localhost:8080/pentaho/api/repo/files/delete"
        );
    }
}
