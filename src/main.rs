use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use weather_dashboard::{DashboardConfig, logging, web};

#[derive(Parser, Debug)]
#[command(name = "weather-dashboard", version, about = "Weather dashboard API server")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on, overrides the configured one
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = DashboardConfig::load_from_path(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    logging::init(&config.logging)?;
    tracing::info!("Starting weather dashboard v{}", weather_dashboard::VERSION);

    web::run(&config).await
}
