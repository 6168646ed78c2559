use console::{Style, StyledObject};

/// Represents the type of a chat message, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMessageType {
    /// The prompt for user input.
    Prompt,
    /// A risk warning following a generated command.
    Warning,
    /// An error message.
    Error,
}

/// Styles a string of text according to the specified `ChatMessageType`.
pub fn style_chat_text(text: &str, style: ChatMessageType) -> StyledObject<&str> {
    let style_obj = match style {
        ChatMessageType::Prompt => Style::new().blue().bold(),
        ChatMessageType::Warning => Style::new().yellow().bold(),
        ChatMessageType::Error => Style::new().red().bold(),
    };
    style_obj.apply_to(text)
}
