//! Interactive concept chat command.

use std::io::{self, BufRead, Write};
use std::path::Path;

use console::style;

use super::super::helpers::{load_palace, truncate};
use crate::client::chat::{ChatClient, ChatTurn};
use crate::config::Settings;

/// Run an interactive chat loop about one concept of a saved palace.
pub async fn cmd_chat(settings: &Settings, palace_path: &Path, concept_id: &str) -> anyhow::Result<()> {
    let palace = load_palace(palace_path)?;

    let Some(concept) = palace.concept(concept_id) else {
        println!("{} Concept '{}' not found in this palace", style("✗").red(), concept_id);
        println!("\nAvailable concepts:");
        for concept in palace.learning_order() {
            println!("  {:<20} {}", concept.id, truncate(&concept.name, 40));
        }
        anyhow::bail!("unknown concept id: {}", concept_id);
    };

    let client = ChatClient::new(settings)?;

    println!("\n{} {}", style("Chatting about:").bold(), concept.name);
    println!("{}", truncate(&concept.description, 76));
    println!("{}", style("Empty line or 'exit' to quit.").dim());

    let mut history: Vec<ChatTurn> = Vec::new();
    let stdin = io::stdin();

    loop {
        print!("\n{} ", style(">").cyan());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let message = line.trim();
        if message.is_empty() || message.eq_ignore_ascii_case("exit") {
            break;
        }

        match client.ask(concept, message, &history).await {
            Ok(reply) => {
                println!("\n{}", reply);
                history.push(ChatTurn::user(message));
                history.push(ChatTurn::model(reply));
            }
            Err(e) => {
                // One failed turn shouldn't end the session.
                println!("{} {}", style("✗").red(), e);
            }
        }
    }

    println!("{} Ended chat after {} turns", style("✓").green(), history.len() / 2);
    Ok(())
}
