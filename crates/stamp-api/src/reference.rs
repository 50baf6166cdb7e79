//! Liveness and static reference data.

use axum::Json;
use serde_json::{Value, json};
use stamp_core::personality::{Category, Profile};

/// `GET /api/health`
pub async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

/// `GET /api/personalities`: every category profile, in declaration order.
pub async fn personalities() -> Json<Vec<&'static Profile>> {
  Json(Category::ALL.into_iter().map(Category::profile).collect())
}
