use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bloommap_api::{build_router, jwt::JwtService, AppState};
use bloommap_board::{Board, SupabaseBackend};
use bloommap_common::Config;
use bloommap_forecast::PredictionStore;
use supabase_client::SupabaseClient;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("bloommap=info".parse()?))
        .init();

    let config = Config::from_env()?;

    let store = Arc::new(PredictionStore::load(&config.predictions_path)?);

    let client = SupabaseClient::new(&config.supabase_url, &config.supabase_anon_key);
    let service = config
        .supabase_service_key
        .as_deref()
        .map(|key| SupabaseClient::new(&config.supabase_url, key));
    if service.is_none() {
        info!("SUPABASE_SERVICE_KEY not set; profile lookups use the anon key");
    }
    let backend = SupabaseBackend::new(client, service, config.photo_bucket.clone());

    let state = Arc::new(AppState {
        store,
        board: Board::new(Arc::new(backend), config.photo_max_bytes),
        jwt: JwtService::new(&config.supabase_jwt_secret),
        photo_max_bytes: config.photo_max_bytes,
    });

    let app = build_router(state);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("BloomMap starting on {addr}");
    info!("Map available at http://{addr}/map");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
