use anyhow::{Context, Result};
use kubepal_core::config::Config;

mod repl;
mod service;

/// Executes the chat command, starting the interactive session.
pub async fn execute(model: Option<&str>, config: &Config) -> Result<()> {
    let assistant =
        service::Assistant::new(config, model).context("Failed to initialize the assistant")?;
    repl::run(assistant).await
}
