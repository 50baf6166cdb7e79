//! Handlers for `/api/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/users` | Intake form body; 422 with per-field messages |
//! | `GET`  | `/api/users/{id}` | 404 if not found |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use serde::Serialize;
use stamp_core::{
  intake::IntakeForm,
  store::RecordStore,
  user::{UserId, UserRecord},
};
use tracing::info;

use crate::{AppState, error::ApiError};

/// Shown when a record could only be kept in the local store.
pub const SAVE_NOTICE: &str =
  "Error saving data. The app will continue without saving to database.";

#[derive(Debug, Serialize)]
pub struct Created {
  pub user:   UserRecord,
  /// Present when the record fell back to local storage.
  pub notice: Option<&'static str>,
  /// Where the client goes next.
  pub next:   String,
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /api/users`
pub async fn create<S: RecordStore>(
  State(state): State<AppState<S>>,
  Json(form): Json<IntakeForm>,
) -> Result<impl IntoResponse, ApiError> {
  let input = form.validate(Utc::now().date_naive())?;
  let user = state
    .store
    .create_record(input)
    .await
    .map_err(ApiError::store)?;

  let local = user.id.is_local();
  info!(id = %user.id, local, "created user record");

  let next = format!("/personality-test?userId={}", user.id);
  let notice = local.then_some(SAVE_NOTICE);
  Ok((StatusCode::CREATED, Json(Created { user, notice, next })))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /api/users/{id}`
pub async fn get_one<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<UserRecord>, ApiError> {
  let id = UserId::new(id);
  let user = state
    .store
    .get_record(id.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::user_not_found(&id))?;
  Ok(Json(user))
}
