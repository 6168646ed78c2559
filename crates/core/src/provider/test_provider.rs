//! A mock backend for unit testing purposes.
use crate::completion::{CompletionModel, Continuation, GenerateOutcome, GenerateRequest};
use crate::model::ModelConfig;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::json;

/// A mock `CompletionModel` for use in unit tests.
///
/// Its behavior can be configured via settings in the `ModelConfig`.
/// The `response_mode` setting controls what kind of outcome it produces:
/// - `""` (default): a command reply with a fresh continuation; the `reply`
///   setting overrides the command text.
/// - `"conversational"`: the fixed greeting sentence, no continuation.
/// - `"error"`: an error outcome.
#[derive(Debug)]
pub struct TestProviderModel {
    config: ModelConfig,
}

impl TestProviderModel {
    pub fn new(config: ModelConfig) -> Result<Self> {
        Ok(Self { config })
    }
}

#[async_trait]
impl CompletionModel for TestProviderModel {
    async fn generate(&self, _request: GenerateRequest<'_>) -> Result<GenerateOutcome> {
        let response_mode: String = self.config.get_setting("response_mode").unwrap_or_default();

        match response_mode.as_str() {
            "error" => Err(anyhow!("TestProviderModel error")),
            "conversational" => Ok(GenerateOutcome {
                text: "Hi, I'm Kube-Pal, your kubernetes buddy and I'm here to help you with kubectl commands. Let me know if you need my help with any kubectl commands..".to_string(),
                continuation: None,
            }),
            _ => {
                let text = self
                    .config
                    .get_setting::<String>("reply")
                    .unwrap_or_else(|| "kubectl get po -n <namespace>".to_string());
                Ok(GenerateOutcome {
                    text,
                    continuation: Some(Continuation(json!([1, 2, 3]))),
                })
            }
        }
    }
}
