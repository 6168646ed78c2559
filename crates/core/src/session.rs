//! Conversational memory carried across turns.
use crate::completion::Continuation;

/// A backend reply split by shape.
///
/// Anything that starts with the `kubectl` token is a command; the second
/// whitespace-delimited token is the verb used for risk classification.
/// Everything else is one of the fixed conversational sentences and is
/// printed verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Command { text: String, verb: String },
    Conversational(String),
}

impl Reply {
    pub fn parse(text: &str) -> Reply {
        let trimmed = text.trim();
        let mut tokens = trimmed.split_whitespace();
        match tokens.next() {
            Some("kubectl") => Reply::Command {
                text: trimmed.to_string(),
                verb: tokens.next().unwrap_or_default().to_string(),
            },
            _ => Reply::Conversational(trimmed.to_string()),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Reply::Command { text, .. } => text,
            Reply::Conversational(text) => text,
        }
    }
}

/// Session memory for one process lifetime. Created empty, mutated once per
/// turn, never persisted.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Most recent command-shaped reply, used as memory for follow-up
    /// requests ("modify the last command").
    pub last_command: Option<String>,
    /// Backend continuation state from the turn that produced
    /// `last_command`. Never set without it.
    pub continuation: Option<Continuation>,
}

impl SessionState {
    /// Applies one backend outcome to the session memory.
    ///
    /// Command-shaped replies replace `last_command` and adopt the backend's
    /// continuation state. Conversational replies leave both fields
    /// untouched, so a later follow-up still refers to the most recent
    /// command.
    pub fn observe(&mut self, reply: &Reply, continuation: Option<Continuation>) {
        if let Reply::Command { text, .. } = reply {
            self.last_command = Some(text.clone());
            self.continuation = continuation;
        }
    }
}
