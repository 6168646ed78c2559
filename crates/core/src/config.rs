use std::{
    collections::HashMap,
    fs::{self, File},
    io::Write,
    path::PathBuf,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::{
    assets::{get_config_dir, get_default_config},
    model::ModelConfig,
};

#[derive(Error, Debug)]
pub enum KubepalConfigError {
    #[error("File system error: {0}")]
    IO(#[from] std::io::Error),
    #[error("YAML parsing error: {0}")]
    YAMLError(#[from] serde_yaml::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChatConfig {
    pub model: ModelConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub models: HashMap<String, ModelConfig>,
    pub chat: ChatConfig,
}

impl Config {
    /// Resolves the model for a session: a named override from the CLI, or
    /// the configured `chat.model`.
    pub fn chat_model(&self, name: Option<&str>) -> Result<ModelConfig, KubepalConfigError> {
        match name {
            Some(name) => self
                .models
                .get(name)
                .cloned()
                .ok_or_else(|| KubepalConfigError::Config(format!("Model '{name}' not found"))),
            None => Ok(self.chat.model.clone()),
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum StringOrObject<T> {
    String(String),
    Object(T),
}

#[derive(Deserialize, Debug)]
struct RawConfig {
    models: HashMap<String, ModelConfig>,
    chat: RawChatConfig,
}

#[derive(Deserialize, Debug)]
struct RawChatConfig {
    model: StringOrObject<ModelConfig>,
}

impl RawConfig {
    #[instrument]
    fn to_config(&self) -> Result<Config, KubepalConfigError> {
        let mut models_with_names = HashMap::new();
        for (k, v) in &self.models {
            // Update model name if not set
            let model_name = if v.name.is_empty() {
                k.clone()
            } else {
                v.name.clone()
            };
            let model = ModelConfig {
                name: model_name,
                ..v.clone()
            };
            models_with_names.insert(k.clone(), model);
        }

        let chat_model = match &self.chat.model {
            StringOrObject::String(s) => models_with_names
                .get(s)
                .cloned()
                .ok_or_else(|| KubepalConfigError::Config(format!("Model '{s}' not found")))?,
            StringOrObject::Object(m) => m.clone(),
        };

        Ok(Config {
            models: models_with_names,
            chat: ChatConfig { model: chat_model },
        })
    }
}

#[instrument(skip(config_path))]
pub fn create_or_get_config_file(
    config_path: Option<PathBuf>,
) -> Result<(bool, PathBuf), KubepalConfigError> {
    let actual_path = config_path.unwrap_or_else(|| {
        let config_dir = get_config_dir();
        config_dir.join("kubepal.yml")
    });

    let parent_dir = actual_path.parent().ok_or_else(|| {
        KubepalConfigError::IO(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Config path has no parent directory",
        ))
    })?;

    if !parent_dir.exists() {
        fs::create_dir_all(parent_dir)?;
    }

    if actual_path.exists() {
        Ok((true, actual_path))
    } else {
        File::create(&actual_path)?.write_all(get_default_config().as_bytes())?;
        Ok((false, actual_path))
    }
}

#[instrument(skip(config_path))]
pub fn get_config(config_path: Option<PathBuf>) -> Result<Config, KubepalConfigError> {
    let (_, config_file) = create_or_get_config_file(config_path)?;
    let content = fs::read_to_string(&config_file)?;
    let raw: RawConfig = serde_yaml::from_str(&content)?;
    raw.to_config()
}
