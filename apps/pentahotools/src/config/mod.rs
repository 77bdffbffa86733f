//! Configuration management for the pentahotools CLI

mod paths;
mod settings;

pub use paths::ConfigPaths;
pub use settings::Config;

/// Default REST endpoint of a local Pentaho server
pub const DEFAULT_URL: &str = "http://localhost:8080/pentaho";
