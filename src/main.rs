mod config;
mod db;
mod room;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use services::persistence::PgDrawingStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env().expect("invalid configuration");

    let pool = db::init_pool(&config.database_url)
        .await
        .expect("database init failed");
    let store = Arc::new(PgDrawingStore::new(pool));
    let state = state::AppState::new(store, config.rooms);

    let app = routes::app(state);
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "sketchroom listening");
    axum::serve(listener, app).await.expect("server failed");
}
