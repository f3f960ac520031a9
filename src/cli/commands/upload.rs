//! Document upload command.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use super::super::helpers::print_palace;
use crate::client::UploadClient;
use crate::config::Settings;

/// Upload a document and present the generated palace.
pub async fn cmd_upload(
    settings: &Settings,
    file: &Path,
    json: bool,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let content =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let filename = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());

    // The server is authoritative about content; only warn on a suspicious
    // file, don't refuse it.
    let looks_like_pdf = infer::get(&content)
        .map(|kind| kind.mime_type() == "application/pdf")
        .unwrap_or(false);
    if !looks_like_pdf {
        eprintln!(
            "{} {} does not look like a PDF; uploading anyway",
            style("!").yellow(),
            file.display()
        );
    }

    let client = UploadClient::new(settings)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message(format!("Processing {} ({} bytes)...", filename, content.len()));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = client.upload(&content, &filename).await;
    spinner.finish_and_clear();
    let palace = result.with_context(|| format!("Upload of {} failed", file.display()))?;

    println!(
        "{} Processed into \"{}\" ({} concepts)",
        style("✓").green(),
        palace.title,
        palace.concepts.len()
    );

    if let Some(path) = output {
        let pretty = serde_json::to_vec_pretty(&palace)?;
        std::fs::write(path, pretty)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("{} Saved palace to {}", style("✓").green(), path.display());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&palace)?);
    } else {
        print_palace(&palace);
    }

    Ok(())
}
