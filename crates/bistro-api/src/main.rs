use std::sync::Arc;

use bistro_api::{
    app::{build_router, init_logging},
    config::Config,
    state::AppState,
};
use bistro_llm::ClientFactory;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Fails before any client exists when the API key is missing
    let config = Config::load()?;

    init_logging(&config);

    tracing::info!("Starting Bistro API server");
    tracing::info!(
        model = %config.llm.model,
        max_retries = config.llm.max_retries,
        "Config loaded: {}:{}",
        config.server.host,
        config.server.port
    );

    let llm_client = ClientFactory::create_chat_client(config.model_config())?;
    let state = Arc::new(AppState::build(config.clone(), llm_client)?);

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
