//! Hosted backend over an OpenAI-compatible chat completions API.
use crate::completion::{CompletionModel, GenerateOutcome, GenerateRequest};
use crate::model::ModelConfig;
use anyhow::{Context, Result, anyhow};
use async_openai::config::OpenAIConfig;
use async_openai::{
    Client as OpenAIClient,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;

fn default_api_key() -> String {
    "env:OPENAI_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.0
}

fn default_max_tokens() -> u32 {
    200
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct OpenAISettings {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default = "default_api_key")]
    api_key: String,
    #[serde(default = "default_temperature")]
    temperature: f32,
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,
}

#[derive(Debug)]
pub struct OpenAIModel {
    config: ModelConfig,
    client: OpenAIClient<OpenAIConfig>,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAIModel {
    pub fn new(model_config: ModelConfig) -> Result<Self> {
        let settings: OpenAISettings = serde_yaml::from_value(
            serde_yaml::to_value(&model_config.settings)
                .map_err(|_e| anyhow!("Invalid settings structure"))?,
        )?;

        // If api_key starts with "env:", read from environment variable. A
        // missing variable fails here, before the session loop starts.
        let api_key = if let Some(env_key) = settings.api_key.strip_prefix("env:") {
            let env_key = env_key.trim();
            std::env::var(env_key).map_err(|_| {
                anyhow!("Environment variable {env_key} is not set. Set it to your API key.")
            })?
        } else {
            settings.api_key.clone()
        };

        let mut openai_config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base_url) = &settings.base_url {
            openai_config = openai_config.with_api_base(base_url.clone());
        }

        Ok(Self {
            config: model_config,
            client: OpenAIClient::with_config(openai_config),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }
}

#[async_trait]
impl CompletionModel for OpenAIModel {
    async fn generate(&self, request: GenerateRequest<'_>) -> Result<GenerateOutcome> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(request.system)
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.utterance)
                .build()?
                .into(),
        ];

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(self.config.name.clone())
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .context("Invalid chat completion request")?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .context("OpenAI request failed")?;

        let text = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .ok_or_else(|| anyhow!("OpenAI response contained no message content"))?
            .trim()
            .to_string();

        // Chat completions carry no resumable state; full instructions are
        // resent on every turn instead.
        Ok(GenerateOutcome {
            text,
            continuation: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelProvider;
    use serde_json::json;
    use std::collections::HashMap;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_mock_model_config(server_url: &str) -> ModelConfig {
        let settings: HashMap<String, serde_yaml::Value> = HashMap::from([
            ("base_url".to_string(), server_url.into()),
            ("api_key".to_string(), "sk-dummy".into()),
        ]);

        ModelConfig {
            name: "gpt-4o-mini".to_string(),
            provider: ModelProvider::Openai,
            settings,
        }
    }

    fn mock_completion_body(content: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1684,
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": 20,
                "completion_tokens": 10,
                "total_tokens": 30
            }
        })
    }

    #[test]
    fn test_openai_new_with_plain_api_key() {
        let config = create_mock_model_config("http://localhost:1234");
        let model = OpenAIModel::new(config).unwrap();
        assert_eq!(model.config.name, "gpt-4o-mini");
        assert_eq!(model.temperature, 0.0);
        assert_eq!(model.max_tokens, 200);
    }

    #[test]
    fn test_openai_new_missing_env_credential_fails() {
        let settings: HashMap<String, serde_yaml::Value> = HashMap::from([(
            "api_key".to_string(),
            "env:KUBEPAL_TEST_MISSING_KEY".into(),
        )]);
        let config = ModelConfig {
            name: "gpt-4o-mini".to_string(),
            provider: ModelProvider::Openai,
            settings,
        };

        let err = OpenAIModel::new(config).unwrap_err();
        assert!(err.to_string().contains("KUBEPAL_TEST_MISSING_KEY"));
    }

    #[tokio::test]
    async fn test_openai_generate_returns_trimmed_text() {
        let server = MockServer::start().await;
        let config = create_mock_model_config(&server.uri());

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "temperature": 0.0,
                "messages": [
                    { "role": "system", "content": "instructions" },
                    { "role": "user", "content": "list my pods" }
                ]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(mock_completion_body(" kubectl get po -n <namespace> ")),
            )
            .mount(&server)
            .await;

        let model = OpenAIModel::new(config).unwrap();
        let outcome = model
            .generate(GenerateRequest {
                prompt: "",
                system: "instructions",
                utterance: "list my pods",
                continuation: None,
            })
            .await
            .unwrap();

        assert_eq!(outcome.text, "kubectl get po -n <namespace>");
        assert!(outcome.continuation.is_none());
    }

    #[tokio::test]
    async fn test_openai_generate_request_failure() {
        let server = MockServer::start().await;
        let config = create_mock_model_config(&server.uri());

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let model = OpenAIModel::new(config).unwrap();
        let err = model
            .generate(GenerateRequest {
                prompt: "",
                system: "instructions",
                utterance: "list my pods",
                continuation: None,
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("OpenAI request failed"));
    }
}
