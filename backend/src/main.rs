use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pocket_money_backend::rest::{self, AppState};
use pocket_money_backend::storage::JsonStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let data_path = std::env::var("POCKET_MONEY_DATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/data.json"));
    info!("Using data file {}", data_path.display());

    let state = AppState::new(JsonStore::new(data_path));

    // CORS setup to allow a browser frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = rest::router(state).layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
