//! Comment Autopilot — Binary Entrypoint
//! Boots the Axum HTTP server, wiring the AI provider, the optional CRM
//! client, shared state, and middleware.

use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use comment_autopilot::api::{create_router, AppState};
use comment_autopilot::automation::AutomationSystem;
use comment_autopilot::config::provider::ProviderConfig;
use comment_autopilot::crm::{CrmClient, HttpCrmClient};
use comment_autopilot::metrics::Metrics;
use comment_autopilot::pipeline::CommentProcessor;
use comment_autopilot::provider::build_provider;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("comment_autopilot=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when the vars come from the environment.
    let _ = dotenvy::dotenv();
    init_tracing();

    let metrics = Metrics::init();

    // Provider config: config/ai.json if present, otherwise environment.
    let provider_cfg = match ProviderConfig::load_from_file("config/ai.json") {
        Ok(cfg) => cfg,
        Err(_) => ProviderConfig::from_env()?,
    };
    let provider = build_provider(&provider_cfg);
    tracing::info!(model = %provider_cfg.model, provider = provider.name(), "AI provider ready");

    // CRM is optional: without credentials the system runs AI-only.
    let crm: Option<Arc<dyn CrmClient>> =
        HttpCrmClient::from_env().map(|c| Arc::new(c) as Arc<dyn CrmClient>);
    if crm.is_some() {
        tracing::info!("CRM integration initialized");
    }

    let automation = Arc::new(AutomationSystem::new(CommentProcessor::new(provider), crm));
    let state = AppState { automation };
    let router = create_router(state).merge(metrics.router());

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, router).await?;
    Ok(())
}
