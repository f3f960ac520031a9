use console::style;

#[tokio::main]
async fn main() {
    // Load .env if present; ignore absence.
    dotenvy::dotenv().ok();

    if let Err(e) = mindscape::cli::run().await {
        eprintln!("{} {:#}", style("✗").red(), e);
        std::process::exit(1);
    }
}
