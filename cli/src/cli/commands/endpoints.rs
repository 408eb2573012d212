use std::path::PathBuf;

use detector_proxy_core::config::load_config;
use detector_proxy_core::models::EndpointResolver;

pub fn run(config_path: Option<PathBuf>, model: String) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let resolver = EndpointResolver::from_config(&config.models)?;

    let bundle = resolver.resolve_name(&model)?;
    println!("{}", serde_json::to_string_pretty(bundle)?);

    Ok(())
}
