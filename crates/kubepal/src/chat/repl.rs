//! Interactive prompt loop.
use crate::chat::service::{Assistant, TurnOutput};
use crate::ux::{ChatMessageType, GenerationSpinner, style_chat_text};
use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

const FAREWELL: &str = "Bye.. Have a great day ahead!! Hope to meet you soon!!";

/// Runs the interactive loop until the user exits.
///
/// Empty input re-prompts without consuming a turn. `exit`/`quit` (any case),
/// Ctrl-C and Ctrl-D all end the session with the farewell and never reach
/// the backend.
pub async fn run(mut assistant: Assistant) -> Result<()> {
    println!("Hey, I'm Kube-Pal, your kubernetes buddy..!");
    println!(
        "Will be glad to help you with any kubernetes kubectl commands.. [model: {}]",
        assistant.model_name()
    );
    println!("Type 'exit' or 'quit' to leave..");

    let mut rl = DefaultEditor::new()?;
    loop {
        let prompt = style_chat_text(">> ", ChatMessageType::Prompt).to_string();
        match rl.readline(&prompt) {
            Ok(line) => {
                let utterance = line.trim();
                if utterance.is_empty() {
                    continue;
                }
                if is_exit_command(utterance) {
                    println!("{FAREWELL}");
                    return Ok(());
                }
                rl.add_history_entry(utterance)?;
                process_turn(&mut assistant, utterance).await;
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("{FAREWELL}");
                return Ok(());
            }
            Err(err) => {
                let error = format!("ERROR: Failed to read input: {err}");
                eprintln!("{}", style_chat_text(&error, ChatMessageType::Error));
            }
        }
    }
}

fn is_exit_command(line: &str) -> bool {
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

/// One turn of the conversation. Failures are reported on a single line and
/// the loop moves on with the session state unchanged.
async fn process_turn(assistant: &mut Assistant, utterance: &str) {
    let spinner = GenerationSpinner::new("Generating...".to_string());
    let result = assistant.take_turn(utterance).await;
    spinner.clear();

    match result {
        Ok(output) => {
            println!("{}", output_text(&output));
            if let Some(warning) = warning_line(&output) {
                println!("{}", style_chat_text(&warning, ChatMessageType::Warning));
            }
        }
        Err(e) => {
            let error = format!("ERROR: Failed to generate a response: {e:#}");
            eprintln!("{}", style_chat_text(&error, ChatMessageType::Error));
        }
    }
}

fn output_text(output: &TurnOutput) -> &str {
    match output {
        TurnOutput::Command { text, .. } => text,
        TurnOutput::Conversational(text) => text,
    }
}

/// The warning printed after a risky command, or `None` for low-risk and
/// conversational output.
fn warning_line(output: &TurnOutput) -> Option<String> {
    match output {
        TurnOutput::Command { tier, .. } if tier.warns() => {
            Some(format!("WARNING: This is a {tier} risk command!"))
        }
        _ => None,
    }
}
