use std::path::PathBuf;
use std::time::Duration;

use detector_proxy_core::config::{default_config_path, load_config};

pub async fn run(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    println!("Detector Proxy Status");
    println!("=====================");
    println!();
    println!("Configuration:");
    println!("  Config file: {:?}", default_config_path());
    match config.validate() {
        Ok(_) => println!("  Valid: yes"),
        Err(e) => println!("  Valid: no ({})", e),
    }
    println!();
    println!("Server settings:");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);
    println!();
    println!("Backends:");
    println!("  Icons: {}", config.backends.icons_url);
    println!("  Detection: {}", config.backends.detect_url);

    // Check if server is reachable
    println!();
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;
    let url = format!("http://{}:{}/healthz", config.server.host, config.server.port);
    match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => {
            println!("Server: RUNNING ✓");
        }
        _ => {
            println!("Server: NOT RUNNING");
        }
    }

    Ok(())
}
