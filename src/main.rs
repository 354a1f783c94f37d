//! Lanai RPC Server - Main entrypoint.
//!
//! Loads configuration, initializes logging, registers the built-in methods
//! and serves until interrupted.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lanai_rpc_lib::config::{ConfigLoader, LanaiConfig, LogConfig, ENV_PREFIX};
use lanai_rpc_lib::error::{LanaiError, LanaiResult};
use lanai_rpc_lib::protocol::jsonrpc::create_registry;
use lanai_rpc_lib::server::Server;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line arguments for the Lanai RPC server.
#[derive(Parser, Debug)]
#[clap(name = "Lanai RPC Server", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Option<Command>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Start the server
    Start,

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },
}

/// Initialize the logging system. `RUST_LOG` takes precedence over the configured level.
fn init_logging(log: &LogConfig) -> LanaiResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_line_number(log.source_location)
        .with_file(log.source_location);

    let result = if log.json {
        builder.json().try_init()
    } else {
        builder.pretty().try_init()
    };
    result.map_err(|e| LanaiError::Custom(format!("Failed to set global tracing subscriber: {e}")))
}

/// Serves until Ctrl-C, then stops the listener.
async fn serve(config: LanaiConfig) -> LanaiResult<()> {
    let mut server = Server::with_registry(config.server, create_registry());
    server.start().await?;

    tokio::signal::ctrl_c().await?;
    info!("Interrupt received");

    server.stop().await?;
    Ok(())
}

/// Main entry point for the application.
fn main() -> LanaiResult<()> {
    let args = Args::parse();
    let config_loader = ConfigLoader::new(args.config.as_deref(), ENV_PREFIX);

    match args.command.unwrap_or(Command::Start) {
        Command::Start => {
            let config = config_loader.load()?;
            init_logging(&config.log)?;
            info!(version = lanai_rpc_lib::VERSION, "Starting Lanai RPC server");

            // Single-threaded cooperative scheduling: all connections share one thread.
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(serve(config))
        }
        Command::Validate => {
            init_logging(&LogConfig::default())?;
            info!("Validating configuration");
            config_loader.load()?;
            info!("Configuration validated successfully");
            Ok(())
        }
        Command::GenConfig { output } => {
            init_logging(&LogConfig::default())?;
            info!("Generating default configuration");
            let default_config = LanaiConfig::default();

            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let toml = toml::to_string_pretty(&default_config)
                .map_err(|e| LanaiError::Custom(format!("Failed to serialize config: {e}")))?;
            std::fs::write(&output, toml)?;

            info!("Default configuration written to {:?}", output);
            Ok(())
        }
    }
}
