use clap::Parser;

mod cli;

use cli::{Cli, Commands};
use detector_proxy_core::config::load_config;

/// `--log-level` wins over the config file's `[logging] level`.
fn crate_log_level(flag: Option<&str>, configured: Option<&str>) -> String {
    flag.or(configured).unwrap_or("info").to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Config errors are reported by the subcommand once logging is up.
    let configured = load_config(cli.config.clone()).ok().map(|c| c.logging.level);
    let level = crate_log_level(cli.log_level.as_deref(), configured.as_deref());

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("detector_proxy={}", level).parse()?)
                .add_directive(format!("detector_proxy_core={}", level).parse()?)
                .add_directive("tower_http=debug".parse()?)
        )
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            cli::commands::start::run(cli.config, host, port).await?;
        }
        Commands::Status => {
            cli::commands::status::run(cli.config).await?;
        }
        Commands::Endpoints { model } => {
            cli::commands::endpoints::run(cli.config, model)?;
        }
        Commands::CheckConfig => {
            cli::commands::check_config::run(cli.config)?;
        }
    }

    Ok(())
}
