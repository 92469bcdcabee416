//! Sensor Similarity Service — standalone binary for storing sensor
//! readings and finding the stored readings most similar to a query.
//!
//! Hosts a small JSON API. Default: http://127.0.0.1:9103/

mod routes;
mod similarity;
mod store;

use routes::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let port: u16 = std::env::var("SENSOR_SIMILARITY_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(9103);

    let data_path = PathBuf::from(
        std::env::var("SENSOR_SIMILARITY_DATA_PATH")
            .unwrap_or_else(|_| "./sensor_readings.jsonl".to_string()),
    );

    let api_key = std::env::var("SENSOR_SIMILARITY_API_KEY").ok();
    if api_key.is_some() {
        log::info!("API key configured — requests must carry X-Api-Key");
    }

    log::info!("Opening data file at: {}", data_path.display());
    let store = Arc::new(
        store::Store::open(&data_path).expect("Failed to open store"),
    );
    log::info!("Loaded {} readings", store.len());

    let state = Arc::new(AppState {
        store,
        api_key,
        start_time: Instant::now(),
        started_at: chrono::Utc::now().to_rfc3339(),
    });

    let cors = tower_http::cors::CorsLayer::permissive();

    let app = axum::Router::new()
        .route("/add_data/", axum::routing::post(routes::add_data))
        .route("/query_similar/", axum::routing::post(routes::query_similar))
        .route("/rpc/status", axum::routing::get(routes::status))
        .with_state(state)
        .layer(cors);

    let addr = format!("127.0.0.1:{}", port);
    log::info!("Sensor Similarity Service listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app).await.expect("Server error");
}
