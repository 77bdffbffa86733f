//! pentahotools - Command-line tools for a Pentaho server
//!
//! - List, create and delete users and roles
//! - Assign and remove role memberships
//! - Import users and their roles from a CSV/TSV file
//! - Export users and their roles

use clap::{Parser, Subcommand};
use pentahotools::api::PentahoClient;
use pentahotools::commands;
use pentahotools::config::{Config, ConfigPaths};
use pentahotools::error::{CliError, CliResult};
use pentahotools::logging::{LogConfig, Logger};
use std::path::PathBuf;
use std::sync::Arc;

/// pentahotools - Pentaho user and role management
#[derive(Parser)]
#[command(name = "pentahotools")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Base URL of the Pentaho server
    #[arg(long, short = 'l', global = true, env = "PENTAHO_URL")]
    url: Option<String>,

    /// User for basic authentication
    #[arg(long, short = 'u', global = true, env = "PENTAHO_USER")]
    user: Option<String>,

    /// Password for basic authentication
    #[arg(
        long,
        short = 'p',
        global = true,
        env = "PENTAHO_PASSWORD",
        hide_env_values = true
    )]
    password: Option<String>,

    /// Show progress details
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Show HTTP requests and responses
    #[arg(long, global = true)]
    debug: bool,

    /// Show HTTP bodies (passwords are redacted)
    #[arg(long, global = true)]
    trace: bool,

    /// Only print command output and errors
    #[arg(long, short = 'q', global = true, conflicts_with_all = ["verbose", "debug", "trace"])]
    quiet: bool,

    /// Append every log entry to this file
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users and roles
    Userrole(commands::userrole::UserroleArgs),

    /// Manage the stored connection settings
    Config(commands::config::ConfigArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let paths = ConfigPaths::new()?;

    match cli.command {
        Commands::Config(args) => commands::config::execute(args, &paths),
        Commands::Userrole(args) => {
            let log_config = LogConfig::from_args_and_env(
                cli.verbose,
                cli.debug,
                cli.trace,
                cli.quiet,
                cli.log_file,
            );
            let logger = Logger::new(log_config)
                .map_err(|e| CliError::Config(format!("Failed to open the log file: {e}")))?;
            let config = Config::load(&paths)?.with_overrides(cli.url, cli.user, cli.password);
            let client = PentahoClient::new(config, Arc::new(logger))?;
            commands::userrole::execute(args, &client).await
        }
    }
}
