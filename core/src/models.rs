//! Model selection and endpoint resolution
//! Maps a model family to the backend URLs it is served from

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{keys, non_empty, ConfigError, ModelSettings, ModelsConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ModelSelector {
    Yolo,
    Retinanet,
}

impl ModelSelector {
    pub const ALL: [ModelSelector; 2] = [ModelSelector::Yolo, ModelSelector::Retinanet];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelSelector::Yolo => "YOLO",
            ModelSelector::Retinanet => "RETINANET",
        }
    }
}

impl fmt::Display for ModelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelSelector {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelSelector::ALL
            .into_iter()
            .find(|model| model.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ResolveError::UnsupportedModel(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("unsupported model: {0}")]
    UnsupportedModel(String),
}

/// The three backend URLs serving one model family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointBundle {
    pub retrain_endpoint: String,
    pub add_image_endpoint: String,
    pub bounding_boxes_endpoint: String,
}

/// Setting keys feeding one bundle, in field order.
struct BundleKeys {
    retrain: &'static str,
    add_image: &'static str,
    bounding_boxes: &'static str,
}

const YOLO_KEYS: BundleKeys = BundleKeys {
    retrain: keys::YOLO_RETRAIN,
    add_image: keys::YOLO_ADD_TRAIN_IMAGE,
    bounding_boxes: keys::YOLO_BOUNDING_BOXES,
};

// Bounding boxes come from VITE_BOUNDING_BOXES_RETINANET_ENDPOINT, not the
// RETINANET-prefixed sibling.
const RETINANET_KEYS: BundleKeys = BundleKeys {
    retrain: keys::RETINANET_RETRAIN,
    add_image: keys::RETINANET_ADD_TRAIN_IMAGE,
    bounding_boxes: keys::RETINANET_BOUNDING_BOXES,
};

fn required(value: &Option<String>, key: &'static str) -> Result<String, ConfigError> {
    non_empty(value)
        .map(str::to_string)
        .ok_or(ConfigError::MissingSetting { key })
}

impl EndpointBundle {
    fn from_settings(settings: &ModelSettings, keys: &BundleKeys) -> Result<Self, ConfigError> {
        Ok(Self {
            retrain_endpoint: required(&settings.retrain, keys.retrain)?,
            add_image_endpoint: required(&settings.add_train_image, keys.add_image)?,
            bounding_boxes_endpoint: required(&settings.bounding_boxes, keys.bounding_boxes)?,
        })
    }
}

/// Read-only lookup from model family to its [`EndpointBundle`].
///
/// Built once from validated configuration; resolution never touches the
/// environment or performs I/O.
#[derive(Debug, Clone)]
pub struct EndpointResolver {
    yolo: EndpointBundle,
    retinanet: EndpointBundle,
}

impl EndpointResolver {
    pub fn from_config(models: &ModelsConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            yolo: EndpointBundle::from_settings(&models.yolo, &YOLO_KEYS)?,
            retinanet: EndpointBundle::from_settings(&models.retinanet, &RETINANET_KEYS)?,
        })
    }

    pub fn resolve(&self, model: ModelSelector) -> &EndpointBundle {
        match model {
            ModelSelector::Yolo => &self.yolo,
            ModelSelector::Retinanet => &self.retinanet,
        }
    }

    /// Resolve a model name coming from untyped input.
    pub fn resolve_name(&self, name: &str) -> Result<&EndpointBundle, ResolveError> {
        let model: ModelSelector = name.parse()?;
        Ok(self.resolve(model))
    }
}
