//! Axum route handlers for the sensor similarity HTTP API.

use crate::similarity;
use crate::store::Store;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use sensor_similarity_types::*;
use std::sync::Arc;
use std::time::Instant;

pub struct AppState {
    pub store: Arc<Store>,
    pub api_key: Option<String>,
    pub start_time: Instant,
    pub started_at: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Pre-shared key gate, evaluated before any core logic runs.
/// Active only when a key is configured; the key comes from the
/// environment, never from code.
fn require_api_key(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let expected = match &state.api_key {
        Some(key) => key,
        None => return Ok(()),
    };

    match headers.get("X-Api-Key").and_then(|h| h.to_str().ok()) {
        Some(provided) if provided == expected => Ok(()),
        _ => Err((
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::new("Invalid or missing API key")),
        )),
    }
}

// POST /add_data/
pub async fn add_data(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(reading): Json<SensorReading>,
) -> Result<Json<AddDataResponse>, ApiError> {
    require_api_key(&state, &headers)?;

    match state.store.append(reading) {
        Ok(id) => Ok(Json(AddDataResponse::success(id))),
        Err(e) => {
            log::error!("Append failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e)),
            ))
        }
    }
}

// POST /query_similar/
pub async fn query_similar(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<QuerySimilarRequest>,
) -> Result<Json<QuerySimilarResponse>, ApiError> {
    require_api_key(&state, &headers)?;

    let readings = state.store.snapshot();
    if readings.is_empty() {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Store is empty")),
        ));
    }

    let query_vec: Vec<f64> = req.sensor_data.values().copied().collect();
    let results = similarity::rank(readings, &query_vec)
        .into_iter()
        .map(|(data, similarity)| SimilarReading { similarity, data })
        .collect();

    Ok(Json(QuerySimilarResponse { results }))
}

// GET /rpc/status
pub async fn status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ServiceStatus>, ApiError> {
    require_api_key(&state, &headers)?;

    Ok(Json(ServiceStatus {
        running: true,
        uptime_secs: state.start_time.elapsed().as_secs(),
        started_at: state.started_at.clone(),
        total_records: state.store.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state(dir: &tempfile::TempDir, api_key: Option<&str>) -> AppState {
        let store = Store::open(&dir.path().join("readings.jsonl")).unwrap();
        AppState {
            store: Arc::new(store),
            api_key: api_key.map(|k| k.to_string()),
            start_time: Instant::now(),
            started_at: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_guard_disabled_without_configured_key() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir, None);
        assert!(require_api_key(&state, &HeaderMap::new()).is_ok());
    }

    #[test]
    fn test_guard_rejects_missing_header() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir, Some("hunter2"));
        let err = require_api_key(&state, &HeaderMap::new()).unwrap_err();
        assert_eq!(err.0, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_guard_rejects_wrong_key() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir, Some("hunter2"));
        let mut headers = HeaderMap::new();
        headers.insert("X-Api-Key", "wrong".parse().unwrap());
        let err = require_api_key(&state, &headers).unwrap_err();
        assert_eq!(err.0, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_guard_accepts_matching_key() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir, Some("hunter2"));
        let mut headers = HeaderMap::new();
        headers.insert("X-Api-Key", "hunter2".parse().unwrap());
        assert!(require_api_key(&state, &headers).is_ok());
    }

    fn reading(label: &str, v: [f64; 8]) -> SensorReading {
        SensorReading {
            sensor_1: v[0],
            sensor_2: v[1],
            sensor_3: v[2],
            sensor_4: v[3],
            sensor_5: v[4],
            sensor_6: v[5],
            sensor_7: v[6],
            sensor_8: v[7],
            label: label.to_string(),
        }
    }

    fn query_request(v: [f64; 8]) -> QuerySimilarRequest {
        let sensor_data = (0..8).map(|i| (format!("sensor_{}", i + 1), v[i])).collect();
        QuerySimilarRequest { sensor_data }
    }

    #[tokio::test]
    async fn test_add_data_returns_positional_id() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(test_state(&dir, None));

        let r = reading("x", [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let Json(resp) = add_data(State(state.clone()), HeaderMap::new(), Json(r))
            .await
            .unwrap();
        assert_eq!(resp.status, "success");
        assert_eq!(resp.id, 0);

        let r = reading("y", [0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let Json(resp) = add_data(State(state), HeaderMap::new(), Json(r))
            .await
            .unwrap();
        assert_eq!(resp.id, 1);
    }

    #[tokio::test]
    async fn test_query_empty_store_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(test_state(&dir, None));

        let err = query_similar(
            State(state),
            HeaderMap::new(),
            Json(query_request([1.0; 8])),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_query_ranks_aligned_reading_first() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(test_state(&dir, None));
        state
            .store
            .append(reading("x", [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]))
            .unwrap();
        state
            .store
            .append(reading("y", [0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]))
            .unwrap();

        let Json(resp) = query_similar(
            State(state),
            HeaderMap::new(),
            Json(query_request([1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])),
        )
        .await
        .unwrap();

        assert_eq!(resp.results.len(), 2);
        assert_eq!(resp.results[0].data.label, "x");
        assert!((resp.results[0].similarity - 1.0).abs() < 1e-12);
        assert_eq!(resp.results[1].data.label, "y");
        assert_eq!(resp.results[1].similarity, 0.0);
    }

    #[tokio::test]
    async fn test_status_reports_record_count() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(test_state(&dir, None));
        state.store.append(reading("x", [1.0; 8])).unwrap();

        let Json(s) = status(State(state), HeaderMap::new()).await.unwrap();
        assert!(s.running);
        assert_eq!(s.total_records, 1);
    }
}
