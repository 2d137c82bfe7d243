use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use atheneum_app::modules::books::catalog::OpenLibraryClient;
use atheneum_app::modules::books::service::BookService;
use atheneum_kernel::settings::Settings;
use atheneum_kernel::{InitCtx, ModuleRegistry};
use atheneum_store::MemoryStore;

#[derive(Parser)]
#[command(name = "atheneum", about = "Book cataloging backend over the Open Library API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// One-shot lookup: fetch an ISBN and print the normalized metadata
    Fetch {
        #[arg(long)]
        isbn: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load atheneum settings")?;
    atheneum_telemetry::init(&settings.telemetry)?;

    tracing::info!(env = ?settings.environment, "atheneum CLI starting");

    match cli.command {
        Command::Serve => serve(&settings).await,
        Command::Fetch { isbn } => fetch(&settings, &isbn).await,
    }
}

async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let mut registry = ModuleRegistry::new();
    atheneum_app::modules::register_all(&mut registry, settings)?;

    let ctx = InitCtx { settings };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    atheneum_http::start_server(&registry, settings).await?;

    registry.stop_all().await?;
    Ok(())
}

async fn fetch(settings: &Settings, isbn: &str) -> anyhow::Result<()> {
    let client = Arc::new(OpenLibraryClient::new(&settings.catalog)?);
    let service = BookService::new(
        client,
        Arc::new(MemoryStore::new()),
        settings.catalog.covers_base_url.clone(),
    );

    let metadata = service
        .fetch_by_isbn(Some(isbn))
        .await
        .map_err(|err| anyhow::anyhow!("lookup failed: {err}"))?;

    println!("{}", serde_json::to_string_pretty(&metadata)?);
    Ok(())
}
