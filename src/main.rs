use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use attendance_api::config::AppConfig;
use attendance_api::rpc;
use attendance_api::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up AUTH_ASSERTION_SECRET,
    // SUPER_ADMIN_EMAIL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    tracing::info!("Starting Attendance API in {:?} mode", config.environment);

    let state = AppState::new(config);
    let port = state.config.server.port;
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Attendance API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/rpc", post(rpc::handle))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> &'static str {
    "Attendance API is active"
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
