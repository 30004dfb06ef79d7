use clap::{Parser, Subcommand};
use tally_core::config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
use commands::{
    handle_config_command, handle_resolve_command, resolve::load_config, ConfigCommands,
    ResolveOptions,
};

#[derive(Parser)]
#[command(name = "tally-cli")]
#[command(about = "Tally CLI - Resolve keys by weighted vote across configured providers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a key across every configured provider
    Resolve {
        /// Key to look up
        key: String,

        /// Path to config file
        #[arg(short, long, env = "TALLY_CONFIG", default_value = "config/config.toml")]
        config: String,

        /// Print the resolution as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration Management
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| {
        let level = logging.level.as_str();
        EnvFilter::new(format!("warn,tally_core={level},cli={level}"))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format.as_str() == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr);
        registry.with(fmt_layer).init();
    } else {
        // "pretty" and any other format default to pretty logging
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .with_target(false)
            .with_writer(std::io::stderr);
        registry.with(fmt_layer).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve { key, config, json } => {
            let config = load_config(&config)?;
            init_logging(&config.logging);
            handle_resolve_command(&config, &ResolveOptions { key, json }).await?;
        }

        Commands::Config(config_command) => {
            handle_config_command(config_command)?;
        }
    }

    Ok(())
}
