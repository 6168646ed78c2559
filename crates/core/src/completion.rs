use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Opaque backend continuation state.
///
/// Completion-style backends hand back a token blob that resumes contextual
/// generation on the next call. The assistant never inspects the value, it
/// only round-trips it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Continuation(pub serde_json::Value);

/// Inputs for a single generation call.
///
/// Each provider picks the representation it needs: completion-style backends
/// consume the rendered `prompt` plus the prior `continuation`, chat-style
/// backends consume `system` and `utterance` as role-tagged messages.
#[derive(Debug)]
pub struct GenerateRequest<'a> {
    pub prompt: &'a str,
    pub system: &'a str,
    pub utterance: &'a str,
    pub continuation: Option<&'a Continuation>,
}

/// Generated text plus the state needed to resume the conversation.
#[derive(Debug)]
pub struct GenerateOutcome {
    /// Trimmed generated text.
    pub text: String,
    /// Updated continuation state. Chat-style backends return `None` and rely
    /// on resending full instructions each turn instead.
    pub continuation: Option<Continuation>,
}

#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn generate(&self, request: GenerateRequest<'_>) -> Result<GenerateOutcome>;
}
