use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tower_http::services::ServeDir;

use quill::app::{router, AppState};
use quill::config::AppConfig;
use quill::service::ArticleService;

#[derive(Debug, Parser)]
#[command(name = "quill", about = "Blog reader and authoring front end")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the web server (default).
    Serve,
    /// Write the demo snapshot document to PATH.
    Seed {
        path: PathBuf,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quill=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::Seed { path, force } => {
            quill::demo_seeder::seed_snapshot(&path, force).await?;
            Ok(())
        }
    }
}

async fn serve() -> anyhow::Result<()> {
    tracing::info!("Starting Quill server...");

    let config = AppConfig::from_env()?;
    let article_service = ArticleService::from_config(&config)?;
    let app_state = AppState::new(article_service);

    // Static files (images, placeholder, snapshot)
    let app = router(app_state).fallback_service(ServeDir::new(&config.site_root));

    tracing::info!("Listening on http://{}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    axum::serve(listener, app.into_make_service())
        .await
        .context("Server error")?;

    Ok(())
}
