use anyhow::Result;
use clap::{Parser, Subcommand};
use esagg_client::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod definition;

#[derive(Parser, Debug)]
#[command(name = "esagg")]
#[command(about = "Build and run aggregation requests from YAML definitions")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, default_value = "esagg.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the request body for a definition file
    Render {
        /// YAML or JSON aggregation definitions
        #[arg(short, long)]
        file: PathBuf,

        /// Index name used for the request
        #[arg(short, long, default_value = "_all")]
        index: String,

        /// Number of hits to request
        #[arg(short, long)]
        size: Option<usize>,

        /// Print on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Send the aggregations to an engine and print the response
    Search {
        /// YAML or JSON aggregation definitions
        #[arg(short, long)]
        file: PathBuf,

        /// Index to search
        #[arg(short, long)]
        index: String,

        /// Number of hits to request
        #[arg(short, long)]
        size: Option<usize>,

        /// Engine URL (overrides config)
        #[arg(long, env = "ESAGG_URL")]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load_or_default(&cli.config)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Render {
            file,
            index,
            size,
            compact,
        } => {
            commands::run_render(&file, &index, size, compact)?;
        }
        Commands::Search {
            file,
            index,
            size,
            url,
        } => {
            if let Some(url) = url {
                config.connection.url = url;
            }
            commands::run_search(&config.connection, &file, &index, size).await?;
        }
    }

    Ok(())
}
