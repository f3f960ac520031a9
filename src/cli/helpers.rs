//! Shared helper functions for CLI commands.

use std::path::Path;

use anyhow::Context;
use console::style;

use crate::models::Palace;

/// Truncate a string to a maximum display width, adding an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// Load a palace from a saved JSON file.
pub fn load_palace(path: &Path) -> anyhow::Result<Palace> {
    let contents = std::fs::read(path)
        .with_context(|| format!("Failed to read palace file: {}", path.display()))?;
    serde_json::from_slice(&contents)
        .with_context(|| format!("Not a valid palace file: {}", path.display()))
}

/// Print a human-readable palace summary.
pub fn print_palace(palace: &Palace) {
    println!("\n{}", style(&palace.title).bold());
    println!("{}", "-".repeat(60));

    let theme = &palace.environment_theme;
    match theme.confidence {
        Some(confidence) => {
            println!("Theme: {} ({:.0}% confidence)", theme.theme, confidence * 100.0)
        }
        None => println!("Theme: {}", theme.theme),
    }
    if let Some(config) = &palace.environment_config {
        let objects = config.objects.as_deref().unwrap_or(&[]);
        let renderable = objects.iter().filter(|o| o.is_renderable()).count();
        println!("Scene: {} objects ({} renderable)", objects.len(), renderable);
    }
    if let Some(session) = &palace.music_session_id {
        println!("Music session: {}", session);
    }

    println!("\n{:<20} {:<30} Facts", "ID", "Name");
    println!("{}", "-".repeat(60));
    for concept in palace.learning_order() {
        println!(
            "{:<20} {:<30} {}",
            truncate(&concept.id, 19),
            truncate(&concept.name, 29),
            concept.key_facts.len()
        );
    }
    println!();
}
