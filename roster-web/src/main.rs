//! Roster Web Server
//!
//! Manager-only employee roster: directory login and CSV import.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use roster_web::server::RosterServerBuilder;
use roster_web::{init_logging, RosterConfig};

/// Roster Web Server - manager login and employee CSV import
#[derive(Parser)]
#[command(name = "roster-web")]
#[command(about = "Manager-only employee roster")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database URL
    #[arg(long)]
    database_url: Option<String>,

    /// Directory for uploaded files
    #[arg(long)]
    upload_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    let mut config = match &args.config {
        Some(path) => RosterConfig::from_file(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => RosterConfig::default(),
    };
    config.apply_env().context("Invalid environment configuration")?;

    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let mut builder = RosterServerBuilder::new(config);
    if let Some(host) = args.host {
        builder = builder.host(host);
    }
    if let Some(port) = args.port {
        builder = builder.port(port);
    }
    if let Some(url) = args.database_url {
        builder = builder.database_url(url);
    }
    if let Some(dir) = args.upload_dir {
        builder = builder.upload_dir(dir);
    }

    let server = builder.build().await.context("Failed to build server")?;
    server.start().await.context("Server failed")?;

    Ok(())
}
