//! HTTP surface for the Gideon engagement and notification service.
//!
//! Exposes scheduler-triggered dispatch endpoints, the activity-event
//! endpoint the chat layer calls, and settings/notification reads for the
//! client UI.

mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use companion_core::ContentGenerator;
use database::Database;
use dispatcher::Dispatcher;
use llm_content::LlmContentGenerator;
use mock_content::FixedGenerator;
use tracing::info;

use crate::config::{Config, GeneratorKind};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting Gideon API server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Select the content backend
    let generator: Arc<dyn ContentGenerator> = match config.generator {
        GeneratorKind::Mock => {
            info!("Using mock content generator");
            Arc::new(FixedGenerator::placeholder())
        }
        GeneratorKind::Llm => {
            let llm = LlmContentGenerator::from_env()?;
            info!(model = %llm.config().model, "Using LLM content generator");
            Arc::new(llm)
        }
    };

    // Build application state
    let notification_dispatcher = Arc::new(Dispatcher::new(db.clone(), generator));
    let state = AppState::new(db, notification_dispatcher);

    // Build router
    let app = routes::router().with_state(state);

    // Start server
    info!(addr = %config.addr, "Gideon API server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
