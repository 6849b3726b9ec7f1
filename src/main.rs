mod config;
mod database;
mod entities;
mod error;
mod filters;
mod http_server;
mod logging;
mod services;
#[cfg(test)]
mod test_utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};

use crate::{
    config::Config, database::Database, http_server::app::HttpServerConfig,
    logging::setup_logging,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "VENUE_BOOKING_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Console log level (default: info)
    #[arg(long, default_value = "info", global = true, env = "LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// Path to log file, overriding the configured one
    #[arg(long, env = "VENUE_BOOKING_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    /// Run in debug mode (no file logging)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the booking site
    Serve {
        /// The address to listen on
        #[arg(long, env = "VENUE_BOOKING_HOST")]
        host: Option<String>,

        /// The port to run the server on
        #[arg(short, long, env = "VENUE_BOOKING_PORT")]
        port: Option<u16>,
    },
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let mut config = {
        if let Some(config) = &args.config {
            Config::from_file(config)
        } else {
            Config::load()
        }
    }
    .with_context(|| "Failed to load venue-booking config")?;
    config.debug |= args.debug;

    let log_file = if config.debug {
        None
    } else {
        args.log_file.clone().or_else(|| config.log_file_path())
    };
    setup_logging(args.log_level, log_file.as_deref(), log::LevelFilter::Info)?;

    log::info!("Venue booking starting");

    match args.command {
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                log::debug!("Creating default config");
                let path = Config::create_default()?;
                log::info!("Default config written to {}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            log::debug!("Opening database at: {}", config.database_path().display());
            let database = Database::open(&config.database_path()).await?;

            log::info!(
                "Starting HTTP server on {}:{}",
                config.server.host,
                config.server.port
            );
            http_server::app::start(HttpServerConfig {
                host: config.server.host,
                port: config.server.port,
                database,
            })
            .await?;
        }
    }

    Ok(())
}
