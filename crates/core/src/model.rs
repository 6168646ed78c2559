use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Model configuration for the assistant.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ModelConfig {
    #[serde(default)]
    pub name: String,
    #[serde(alias = "type")]
    pub provider: ModelProvider,
    #[serde(default, flatten)]
    pub settings: HashMap<String, serde_yaml::Value>,
}

impl ModelConfig {
    /// Reads a single provider setting, if present and well-typed.
    pub fn get_setting<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.settings
            .get(key)
            .and_then(|value| serde_yaml::from_value(value.clone()).ok())
    }
}

/// Supported model provider integrations (serialized as lowercase strings).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    Ollama,
    Openai,
    Test,
}

impl From<ModelProvider> for String {
    fn from(val: ModelProvider) -> Self {
        val.as_str().into()
    }
}

impl ModelProvider {
    pub fn as_str(&self) -> &'static str {
        match &self {
            ModelProvider::Ollama => "ollama",
            ModelProvider::Openai => "openai",
            ModelProvider::Test => "test",
        }
    }
}
