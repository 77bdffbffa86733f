//! Platform-specific configuration paths

use crate::error::{CliError, CliResult};
use std::path::PathBuf;

/// Configuration paths for the pentahotools CLI
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Base configuration directory
    pub config_dir: PathBuf,
    /// Path to config.json
    pub config_file: PathBuf,
}

impl ConfigPaths {
    /// Get configuration paths for the current platform
    ///
    /// Paths:
    /// - Linux: ~/.config/pentahotools/
    /// - macOS: ~/Library/Application Support/pentahotools/
    /// - Windows: %APPDATA%\pentahotools\
    pub fn new() -> CliResult<Self> {
        let config_dir = Self::get_config_dir()?;
        Ok(Self::with_dir(config_dir))
    }

    /// Build paths rooted at an explicit directory
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self {
            config_file: config_dir.join("config.json"),
            config_dir,
        }
    }

    /// Get the configuration directory, respecting PENTAHOTOOLS_CONFIG_DIR env var
    fn get_config_dir() -> CliResult<PathBuf> {
        if let Ok(dir) = std::env::var("PENTAHOTOOLS_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let base_dir = dirs::config_dir().ok_or_else(|| {
            CliError::Config("Could not determine configuration directory".to_string())
        })?;

        Ok(base_dir.join("pentahotools"))
    }

    /// Ensure the configuration directory exists
    pub fn ensure_dir_exists(&self) -> CliResult<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_dir_places_config_file() {
        let paths = ConfigPaths::with_dir(PathBuf::from("/tmp/pentahotools-test"));
        assert_eq!(
            paths.config_file,
            PathBuf::from("/tmp/pentahotools-test/config.json")
        );
    }

    #[test]
    fn test_config_dir_override() {
        std::env::set_var("PENTAHOTOOLS_CONFIG_DIR", "/tmp/pentahotools-override");
        let paths = ConfigPaths::new().unwrap();
        assert_eq!(
            paths.config_dir,
            PathBuf::from("/tmp/pentahotools-override")
        );
        std::env::remove_var("PENTAHOTOOLS_CONFIG_DIR");
    }
}
