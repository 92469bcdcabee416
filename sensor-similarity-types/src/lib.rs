//! Shared types for the sensor similarity service and its HTTP clients.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =====================================================
// Domain Types
// =====================================================

/// One sensor reading: eight channel values plus a free-form label.
///
/// Field order is significant — [`SensorReading::vector`] returns the
/// channels in declared order, and that order defines the comparison
/// vector used by similarity queries. Readings are immutable once
/// appended; their identity is their position in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub sensor_1: f64,
    pub sensor_2: f64,
    pub sensor_3: f64,
    pub sensor_4: f64,
    pub sensor_5: f64,
    pub sensor_6: f64,
    pub sensor_7: f64,
    pub sensor_8: f64,
    pub label: String,
}

impl SensorReading {
    /// The eight channel values in field order.
    pub fn vector(&self) -> [f64; 8] {
        [
            self.sensor_1,
            self.sensor_2,
            self.sensor_3,
            self.sensor_4,
            self.sensor_5,
            self.sensor_6,
            self.sensor_7,
            self.sensor_8,
        ]
    }
}

// =====================================================
// Request Types
// =====================================================

/// Body of `POST /query_similar/`.
///
/// Values are taken in key-sorted iteration order as the query vector,
/// so the canonical `sensor_1`..`sensor_8` keys line up with
/// [`SensorReading::vector`].
#[derive(Debug, Serialize, Deserialize)]
pub struct QuerySimilarRequest {
    pub sensor_data: BTreeMap<String, f64>,
}

// =====================================================
// Response Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct AddDataResponse {
    pub status: String,
    pub id: usize,
}

impl AddDataResponse {
    pub fn success(id: usize) -> Self {
        Self {
            status: "success".to_string(),
            id,
        }
    }
}

/// One query hit: the stored reading plus its similarity to the query.
#[derive(Debug, Serialize, Deserialize)]
pub struct SimilarReading {
    pub similarity: f64,
    pub data: SensorReading,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuerySimilarResponse {
    pub results: Vec<SimilarReading>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

// =====================================================
// Service Status
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub running: bool,
    pub uptime_secs: u64,
    pub started_at: String,
    pub total_records: usize,
}
