use anyhow::Context;
use voxquery_core::types::{HealthStatus, IngestReceipt, SearchResponse};

pub fn parse_health(body: &[u8]) -> anyhow::Result<HealthStatus> {
    serde_json::from_slice(body).context("decode health JSON")
}

pub fn parse_search(body: &[u8]) -> anyhow::Result<SearchResponse> {
    serde_json::from_slice(body).context("decode search JSON")
}

pub fn parse_ingest(body: &[u8]) -> anyhow::Result<IngestReceipt> {
    serde_json::from_slice(body).context("decode ingest JSON")
}

/// Pulls the backend's message out of an error body.
///
/// The backend reports failures as `{"message": ...}`, with `{"error": ...}`
/// on some older routes. Non-JSON bodies yield nothing.
pub fn extract_backend_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    for key in ["message", "error"] {
        if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
            if !msg.trim().is_empty() {
                return Some(msg.to_string());
            }
        }
    }
    None
}
