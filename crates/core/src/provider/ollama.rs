//! Local-inference backend over the Ollama generate API.
use crate::completion::{CompletionModel, Continuation, GenerateOutcome, GenerateRequest};
use crate::model::ModelConfig;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

fn default_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_num_predict() -> u32 {
    80
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaSettings {
    #[serde(default = "default_host")]
    host: String,
    model: String,
    #[serde(default = "default_temperature")]
    temperature: f32,
    #[serde(default = "default_num_predict")]
    num_predict: u32,
}

#[derive(Debug, Serialize)]
struct GenerateApiRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateApiOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a Continuation>,
}

#[derive(Debug, Serialize)]
struct GenerateApiOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateApiResponse {
    response: String,
    #[serde(default)]
    context: Option<Continuation>,
}

pub struct OllamaModel {
    client: reqwest::Client,
    settings: OllamaSettings,
}

impl OllamaModel {
    pub fn new(model_config: ModelConfig) -> Result<Self> {
        let settings: OllamaSettings = serde_yaml::from_value(
            serde_yaml::to_value(&model_config.settings)
                .map_err(|_e| anyhow!("Invalid settings structure"))?,
        )?;

        Ok(Self {
            client: reqwest::Client::new(),
            settings,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.settings.host.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionModel for OllamaModel {
    async fn generate(&self, request: GenerateRequest<'_>) -> Result<GenerateOutcome> {
        let body = GenerateApiRequest {
            model: &self.settings.model,
            prompt: request.prompt,
            stream: false,
            options: GenerateApiOptions {
                temperature: self.settings.temperature,
                num_predict: self.settings.num_predict,
            },
            context: request.continuation,
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .context("Ollama request failed")?
            .error_for_status()
            .context("Ollama returned an error status")?;

        let parsed: GenerateApiResponse = response
            .json()
            .await
            .context("Ollama response is not valid JSON")?;

        Ok(GenerateOutcome {
            text: parsed.response.trim().to_string(),
            continuation: parsed.context,
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
            ("host".to_string(), server_url.into()),
            ("model".to_string(), "mistral".into()),
        ]);

        ModelConfig {
            name: "mistral-local".to_string(),
            provider: ModelProvider::Ollama,
            settings,
        }
    }

    fn request<'a>(
        prompt: &'a str,
        continuation: Option<&'a Continuation>,
    ) -> GenerateRequest<'a> {
        GenerateRequest {
            prompt,
            system: "",
            utterance: "",
            continuation,
        }
    }

    #[test]
    fn test_ollama_new_requires_model_setting() {
        let config = ModelConfig {
            name: "mistral-local".to_string(),
            provider: ModelProvider::Ollama,
            settings: HashMap::new(),
        };
        assert!(OllamaModel::new(config).is_err());
    }

    #[test]
    fn test_ollama_settings_defaults() {
        let config = create_mock_model_config("http://localhost:11434");
        let model = OllamaModel::new(config).unwrap();
        assert_eq!(model.settings.temperature, 0.2);
        assert_eq!(model.settings.num_predict, 80);
        assert_eq!(model.endpoint(), "http://localhost:11434/api/generate");
    }

    #[tokio::test]
    async fn test_ollama_generate_first_turn() {
        let server = MockServer::start().await;
        let config = create_mock_model_config(&server.uri());

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(json!({
                "model": "mistral",
                "stream": false,
                "options": { "temperature": 0.2, "num_predict": 80 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": "kubectl get po -n <namespace>\n",
                "context": [1, 2, 3]
            })))
            .mount(&server)
            .await;

        let model = OllamaModel::new(config).unwrap();
        let outcome = model
            .generate(request("list my pods", None))
            .await
            .unwrap();

        assert_eq!(outcome.text, "kubectl get po -n <namespace>");
        assert_eq!(outcome.continuation, Some(Continuation(json!([1, 2, 3]))));
    }

    #[tokio::test]
    async fn test_ollama_generate_forwards_continuation() {
        let server = MockServer::start().await;
        let config = create_mock_model_config(&server.uri());

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(json!({ "context": [7, 8, 9] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": "kubectl get po -o wide -n <namespace>",
                "context": [10, 11]
            })))
            .mount(&server)
            .await;

        let model = OllamaModel::new(config).unwrap();
        let prior = Continuation(json!([7, 8, 9]));
        let outcome = model
            .generate(request("show more detail", Some(&prior)))
            .await
            .unwrap();

        assert_eq!(outcome.text, "kubectl get po -o wide -n <namespace>");
        assert_eq!(outcome.continuation, Some(Continuation(json!([10, 11]))));
    }

    #[tokio::test]
    async fn test_ollama_generate_error_status() {
        let server = MockServer::start().await;
        let config = create_mock_model_config(&server.uri());

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let model = OllamaModel::new(config).unwrap();
        let err = model
            .generate(request("list my pods", None))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("error status"));
    }

    #[tokio::test]
    async fn test_ollama_generate_malformed_response() {
        let server = MockServer::start().await;
        let config = create_mock_model_config(&server.uri());

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let model = OllamaModel::new(config).unwrap();
        let err = model
            .generate(request("list my pods", None))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }
}
