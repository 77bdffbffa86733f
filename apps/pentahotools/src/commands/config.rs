//! Commands for the persisted connection settings

use crate::config::{Config, ConfigPaths};
use crate::error::{CliError, CliResult};
use crate::logging::REDACTED;
use crate::output::{print_key_value, print_success};
use clap::{Args, Subcommand, ValueEnum};

/// Connection settings commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the stored settings
    Show,
    /// Change one stored setting
    Set(SetArgs),
    /// Print the path of the config file
    Path,
}

/// Stored setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    Url,
    User,
    Password,
    Timeout,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    #[arg(value_enum)]
    pub key: ConfigKey,
    pub value: String,
}

/// Execute config commands
pub fn execute(args: ConfigArgs, paths: &ConfigPaths) -> CliResult<()> {
    match args.command {
        ConfigCommands::Show => {
            let config = Config::load(paths)?;
            print_key_value("url", &config.url);
            print_key_value("user", &config.user);
            print_key_value("password", REDACTED);
            print_key_value("timeout", &format!("{}s", config.timeout_secs));
            Ok(())
        }
        ConfigCommands::Set(a) => {
            let config = apply(Config::load(paths)?, a.key, &a.value)?;
            config.save(paths)?;
            print_success(&format!("Saved {}", paths.config_file.display()));
            Ok(())
        }
        ConfigCommands::Path => {
            println!("{}", paths.config_file.display());
            Ok(())
        }
    }
}

fn apply(config: Config, key: ConfigKey, value: &str) -> CliResult<Config> {
    Ok(match key {
        ConfigKey::Url => config.with_overrides(Some(value.to_string()), None, None),
        ConfigKey::User => config.with_overrides(None, Some(value.to_string()), None),
        ConfigKey::Password => config.with_overrides(None, None, Some(value.to_string())),
        ConfigKey::Timeout => {
            let timeout_secs = value
                .parse::<u64>()
                .ok()
                .filter(|t| *t > 0)
                .ok_or_else(|| {
                    CliError::Validation(format!(
                        "Timeout must be a positive number of seconds, got '{value}'"
                    ))
                })?;
            Config {
                timeout_secs,
                ..config
            }
        }
    })
}
