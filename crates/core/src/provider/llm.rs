use crate::completion::CompletionModel;
use crate::model::ModelProvider;
use crate::provider::{ollama, openai, test_provider};
use anyhow::Result;
use tracing::instrument;

#[instrument(skip(model_config))]
pub fn get_completion_llm(
    model_config: crate::model::ModelConfig,
) -> Result<Box<dyn CompletionModel + Send + Sync>> {
    match model_config.provider {
        ModelProvider::Ollama => {
            let model = ollama::OllamaModel::new(model_config)?;
            Ok(Box::new(model))
        }
        ModelProvider::Openai => {
            let model = openai::OpenAIModel::new(model_config)?;
            Ok(Box::new(model))
        }
        ModelProvider::Test => {
            let model = test_provider::TestProviderModel::new(model_config)?;
            Ok(Box::new(model))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelConfig, ModelProvider};
    use std::collections::HashMap;

    #[test]
    fn test_get_completion_llm_ollama_provider() {
        let mut settings = HashMap::new();
        settings.insert("model".to_string(), "mistral".into());
        let model_config = ModelConfig {
            name: "mistral-local".to_string(),
            provider: ModelProvider::Ollama,
            settings,
        };
        let model = get_completion_llm(model_config);
        assert!(model.is_ok());
    }

    #[test]
    fn test_get_completion_llm_openai_provider() {
        let mut settings = HashMap::new();
        settings.insert("base_url".to_string(), "http://localhost:1234".into());
        settings.insert("api_key".to_string(), "sk-dummy".into());
        let model_config = ModelConfig {
            name: "test-openai".to_string(),
            provider: ModelProvider::Openai,
            settings,
        };
        let model = get_completion_llm(model_config);
        assert!(model.is_ok());
    }

    #[test]
    fn test_get_completion_llm_ollama_provider_error() {
        // Ollama model requires a 'model' setting, so this should fail.
        let model_config = ModelConfig {
            name: "mistral-local".to_string(),
            provider: ModelProvider::Ollama,
            settings: HashMap::new(),
        };
        let model = get_completion_llm(model_config);
        assert!(model.is_err());
    }
}
