use actix_web::{get, http::StatusCode, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::response::Envelope;

/// Health check endpoint
///
/// Unauthenticated. Returns "ok" and the current server time.
#[get("/health")]
pub async fn health() -> HttpResponse {
    Envelope::respond(StatusCode::OK, "ok", json!({ "timestamp": Utc::now() }))
}
