//! Command-line interface for the Mindscape client.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{self, LoadOptions};

mod commands;
mod helpers;

#[derive(Parser)]
#[command(name = "mindscape", version, about = "Upload documents and explore generated memory palaces")]
pub struct Cli {
    /// Path to a mindscape.toml config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the service base URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Increase log verbosity (-v: debug, -vv: trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a PDF for processing and print the generated palace.
    Upload {
        /// Document to upload.
        file: PathBuf,
        /// Print the raw palace JSON instead of a summary.
        #[arg(long)]
        json: bool,
        /// Save the palace JSON to a file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a previously saved palace.
    Show {
        /// Palace JSON file.
        palace: PathBuf,
    },
    /// Chat about one concept of a saved palace.
    Chat {
        /// Palace JSON file.
        palace: PathBuf,
        /// Concept id to discuss.
        #[arg(long)]
        concept: String,
    },
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "mindscape=info",
        1 => "mindscape=debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse arguments and dispatch to the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = config::load_settings_with_options(LoadOptions {
        config_path: cli.config,
        base_url: cli.base_url,
    })
    .map_err(|e| anyhow::anyhow!(e))?;

    match cli.command {
        Commands::Upload { file, json, output } => {
            commands::upload::cmd_upload(&settings, &file, json, output.as_deref()).await
        }
        Commands::Show { palace } => commands::show::cmd_show(&palace),
        Commands::Chat { palace, concept } => {
            commands::chat::cmd_chat(&settings, &palace, &concept).await
        }
    }
}
