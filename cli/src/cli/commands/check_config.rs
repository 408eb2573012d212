use std::path::PathBuf;

use detector_proxy_core::config::load_config;
use detector_proxy_core::models::ModelSelector;

pub fn run(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let resolver = config.validate()?;
    for model in ModelSelector::ALL {
        let bundle = resolver.resolve(model);
        let settings = match model {
            ModelSelector::Yolo => &config.models.yolo,
            ModelSelector::Retinanet => &config.models.retinanet,
        };
        println!("{}", model);
        println!("  detector:       {}", settings.endpoint.as_deref().unwrap_or("-"));
        println!("  api key:        {}", if settings.api_key.is_some() { "set" } else { "unset" });
        println!("  retrain:        {}", bundle.retrain_endpoint);
        println!("  add image:      {}", bundle.add_image_endpoint);
        println!("  bounding boxes: {}", bundle.bounding_boxes_endpoint);
    }

    if let Some(rlhf) = config.models.rlhf_base_endpoint.as_deref() {
        println!("RLHF base: {}", rlhf);
    }

    println!("Configuration OK");
    Ok(())
}
