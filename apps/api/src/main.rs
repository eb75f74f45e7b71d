mod config;
mod errors;
mod evaluation;
mod llm_client;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::evaluation::service::Evaluator;
use crate::llm_client::{CompletionBackend, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ICP Evaluator API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client, if a credential was provided
    let backend: Option<Arc<dyn CompletionBackend>> = match &config.openai_api_key {
        Some(api_key) => {
            let llm = LlmClient::new(api_key.clone(), &config.openai_base_url, config.llm_timeout)?;
            info!(
                "LLM client initialized (model: {}, timeout: {:?})",
                llm_client::MODEL,
                config.llm_timeout
            );
            Some(Arc::new(llm))
        }
        None => {
            warn!("OPENAI_API_KEY is not set; evaluations will answer 503 until it is configured");
            None
        }
    };

    let state = AppState {
        evaluator: Evaluator::new(backend),
        config: config.clone(),
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
