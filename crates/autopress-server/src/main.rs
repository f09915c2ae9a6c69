//! autopress-server - Autopress backend service
//!
//! Keeps a standing inventory of generated articles and adds one every day.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod services;
mod state;

/// Autopress article service
#[derive(Parser, Debug)]
#[command(name = "autopress-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the scheduler until interrupted (default)
    Serve,

    /// Generate and store one article now
    Generate {
        /// Topic prompt; a random catalog topic is used when omitted
        #[arg(short, long)]
        topic: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before anything reads the environment
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("autopress_server=info".parse()?)
                .add_directive("autopress_core=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    info!("autopress-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = config::Config::load()?;
    info!(
        data_dir = %config.data_dir.display(),
        config_file = %config.config_path.display(),
        credential = if config.api_key.is_some() { "set" } else { "not set" },
        "Config loaded"
    );

    // The store is the one collaborator whose absence is fatal
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }
    let db = autopress_core::Database::open_path(&config.database_path)
        .with_context(|| format!("Failed to open database at {}", config.database_path.display()))?;
    db.ping().context("Database is not responding")?;

    let state = state::AppState::new(config, db)?;
    info!(
        path = %state.config.database_path.display(),
        articles = state.db.count_articles()?,
        live_generation = state.generator.is_configured(),
        "Database initialized"
    );

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            state.scheduler.clone().start().await;
            info!("Article scheduler started");

            tokio::signal::ctrl_c().await?;
            let trigger_active = state.scheduler.is_trigger_active().await;
            let replenish_finished = state.scheduler.is_replenish_finished().await;
            info!(
                uptime_secs = state.start_time.elapsed().as_secs(),
                trigger_active,
                replenish_finished,
                "Shutting down..."
            );
        }
        Commands::Generate { topic } => {
            let article = state.scheduler.generate_now(topic.as_deref()).await?;
            println!("{}\t{}", article.id, article.title);
        }
    }

    Ok(())
}
