use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use relationship_spark::config::SparkConfig;
use relationship_spark::extraction::parse_reply;
use relationship_spark::server;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "spark",
    version,
    about = "Turn conversational descriptions of people into relationship cards"
)]
struct Cli {
    /// Config file (defaults to ~/.relationship-spark/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API
    Serve,
    /// Parse a label-line reply (file or stdin) and print the extracted profile as JSON
    Parse {
        /// Reply file; reads stdin when omitted
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SparkConfig::load_from(path)?,
        None => SparkConfig::load()?,
    };

    // Log to stderr so `parse` output on stdout stays clean JSON.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => {
            server::serve(config).await?;
        }
        Command::Parse { file } => {
            let reply = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read stdin")?;
                    buf
                }
            };
            let profile = parse_reply(&reply);
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
    }

    Ok(())
}
