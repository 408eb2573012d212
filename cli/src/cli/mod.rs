pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "detector-proxy")]
#[command(author, version, about = "Proxy CLI - Route image scans and icon requests to object-detection backends")]
pub struct Cli {
    /// Path to config file (checked in order: local config.toml, ~/.config/detector-proxy/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level for this crate (overrides [logging] level; RUST_LOG refines it)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the proxy server
    Start {
        /// Host to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show proxy status
    Status,

    /// Print the endpoints configured for a model (YOLO or RETINANET)
    Endpoints {
        model: String,
    },

    /// Validate configuration and exit
    CheckConfig,
}
