//! Turn-taking service between the REPL and the model backend.
use anyhow::{Context, Result};
use kubepal_core::completion::{CompletionModel, GenerateRequest};
use kubepal_core::config::Config;
use kubepal_core::model::ModelConfig;
use kubepal_core::prompt::{SYSTEM_PROMPT, build_prompt};
use kubepal_core::risk::{self, RiskTier};
use kubepal_core::session::{Reply, SessionState};
use tracing::debug;

/// One classified turn result, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutput {
    Command { text: String, tier: RiskTier },
    Conversational(String),
}

/// Drives prompt building, the backend call, risk classification and session
/// memory for one conversation.
pub struct Assistant {
    model_config: ModelConfig,
    model: Box<dyn CompletionModel + Send + Sync>,
    session: SessionState,
}

impl std::fmt::Debug for Assistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assistant")
            .field("model_config", &self.model_config)
            .field("model", &"<dyn CompletionModel>")
            .field("session", &self.session)
            .finish()
    }
}

impl Assistant {
    pub fn new(config: &Config, model: Option<&str>) -> Result<Self> {
        let model_config = config.chat_model(model)?;
        let model = kubepal_core::get_completion_llm(model_config.clone())
            .context("Failed to initialize the completion model")?;

        Ok(Self {
            model_config,
            model,
            session: SessionState::default(),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_config.name
    }

    /// Runs one full turn: prompt build, backend call, memory update, risk
    /// classification.
    ///
    /// Session memory changes only when the backend produced a command-shaped
    /// reply; a conversational reply or a failed call leaves it untouched, so
    /// the loop can keep going with the prior state.
    pub async fn take_turn(&mut self, utterance: &str) -> Result<TurnOutput> {
        let prompt = build_prompt(utterance, &self.session);
        let outcome = self
            .model
            .generate(GenerateRequest {
                prompt: &prompt,
                system: SYSTEM_PROMPT,
                utterance,
                continuation: self.session.continuation.as_ref(),
            })
            .await?;
        debug!(text = %outcome.text, "backend reply");

        let reply = Reply::parse(&outcome.text);
        self.session.observe(&reply, outcome.continuation);

        Ok(match reply {
            Reply::Command { text, verb } => TurnOutput::Command {
                tier: risk::classify(&verb),
                text,
            },
            Reply::Conversational(text) => TurnOutput::Conversational(text),
        })
    }

    #[cfg(test)]
    pub(crate) fn session(&self) -> &SessionState {
        &self.session
    }
}
