//! Fridge Chef - RAG backend
//!
//! Loads the recipe dataset, fits the TF-IDF index and serves the question
//! and feedback API consumed by the `fridgechef` client.

use std::sync::Arc;

use anyhow::{Context, Result};
use fridgechef_engine::config::ServerConfig;
use fridgechef_engine::feedback::FeedbackLog;
use fridgechef_engine::llm::{LanguageModel, OpenAiChat};
use fridgechef_engine::recipe::load_recipes;
use fridgechef_engine::server::{router, AppState};
use fridgechef_engine::{FridgeChef, IndexConfig, RecipeIndex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    let recipes = load_recipes(&config.data_source)
        .await
        .with_context(|| format!("Failed to load recipes from {}", config.data_source))?;
    let index = RecipeIndex::fit(recipes, IndexConfig::default());
    tracing::info!("Indexed {} recipes", index.len());

    let llm = OpenAiChat::from_env().context("Failed to configure the chat model")?;
    tracing::info!("Using chat model {}", llm.model());

    let state = Arc::new(AppState {
        chef: FridgeChef::new(Arc::new(index), Arc::new(llm)),
        log: FeedbackLog::open(&config.log_dir)
            .await
            .with_context(|| format!("Failed to open log directory {}", config.log_dir.display()))?,
    });

    let app = router(state);

    let addr = config.addr();
    tracing::info!("Starting Fridge Chef backend on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
