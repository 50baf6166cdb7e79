//! Handlers for the digital ID and share screens.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/digital-id/{id}` | Owner view: share link, upload allowed |
//! | `GET`  | `/api/digital-id/{id}/card.svg` | Card download, with ETag |
//! | `PUT`  | `/api/digital-id/{id}/selfie` | Raw `image/jpeg` or `image/png` body |
//! | `GET`  | `/api/share/{id}` | Read-only view |
//! | `GET`  | `/api/share/{id}/card.svg` | Read-only card download |

use axum::{
  Json,
  extract::{Path, State},
  http::{HeaderMap, HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use stamp_card::{Card, download_filename, long_date};
use stamp_core::{
  personality::Profile,
  store::{Image, RecordStore},
  user::{UserId, UserRecord},
};
use tracing::info;

use crate::{
  AppState, MAX_SELFIE_BYTES,
  error::ApiError,
  etag::{compute_etag, matches},
};

const ACCEPTED_IMAGE_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

// ─── View ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DigitalIdView {
  pub user:          UserRecord,
  pub id_number:     String,
  pub date_of_birth: String,
  pub personality:   &'static Profile,
  /// Loadable URL of the selfie, if one was taken.
  pub selfie_url:    Option<String>,
  pub card_url:      String,
  /// Only present on the owner's view.
  pub share_url:     Option<String>,
  pub can_upload:    bool,
}

#[derive(Clone, Copy)]
enum Audience {
  Owner,
  Shared,
}

fn build_view<S>(
  state: &AppState<S>,
  user: UserRecord,
  audience: Audience,
) -> DigitalIdView {
  let config = &state.config;
  let (card_url, share_url, can_upload) = match audience {
    Audience::Owner => (
      format!("/api/digital-id/{}/card.svg", user.id),
      Some(config.absolute(&format!("/share/{}", user.id))),
      true,
    ),
    Audience::Shared => (format!("/api/share/{}/card.svg", user.id), None, false),
  };
  DigitalIdView {
    id_number: user.id.id_number(),
    date_of_birth: long_date(user.date_of_birth),
    personality: user.category().profile(),
    selfie_url: user.selfie_reference.as_deref().map(|r| config.image_href(r)),
    card_url,
    share_url,
    can_upload,
    user,
  }
}

async fn load<S: RecordStore>(
  state: &AppState<S>,
  id: &UserId,
) -> Result<UserRecord, ApiError> {
  state
    .store
    .get_record(id.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::user_not_found(id))
}

/// `GET /api/digital-id/{id}`
pub async fn view<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<DigitalIdView>, ApiError> {
  let user = load(&state, &UserId::new(id)).await?;
  Ok(Json(build_view(&state, user, Audience::Owner)))
}

/// `GET /api/share/{id}`
pub async fn share_view<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<DigitalIdView>, ApiError> {
  let user = load(&state, &UserId::new(id)).await?;
  Ok(Json(build_view(&state, user, Audience::Shared)))
}

// ─── Card download ───────────────────────────────────────────────────────────

fn card_response<S>(
  state: &AppState<S>,
  user: &UserRecord,
  headers: &HeaderMap,
) -> Response {
  let selfie = user
    .selfie_reference
    .as_deref()
    .map(|r| state.config.image_href(r));
  let mut card = Card::new(user, Utc::now().date_naive());
  if let Some(href) = selfie.as_deref() {
    card = card.with_selfie(href);
  }
  let body = stamp_card::render(&card);
  let etag = compute_etag(&body);

  let fresh = headers
    .get(header::IF_NONE_MATCH)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|inm| matches(inm, &etag));
  if fresh {
    return (StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response();
  }

  let disposition =
    format!("attachment; filename=\"{}\"", download_filename(&user.name));
  let mut resp = (
    StatusCode::OK,
    [
      (header::CONTENT_TYPE, "image/svg+xml".to_owned()),
      (header::ETAG, etag),
    ],
    body,
  )
    .into_response();
  // Names are free text; skip the header rather than fail the download.
  if let Ok(value) = HeaderValue::from_str(&disposition) {
    resp.headers_mut().insert(header::CONTENT_DISPOSITION, value);
  }
  resp
}

/// `GET /api/digital-id/{id}/card.svg`
pub async fn card<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  headers: HeaderMap,
) -> Result<Response, ApiError> {
  let user = load(&state, &UserId::new(id)).await?;
  Ok(card_response(&state, &user, &headers))
}

/// `GET /api/share/{id}/card.svg`
pub async fn share_card<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  headers: HeaderMap,
) -> Result<Response, ApiError> {
  let user = load(&state, &UserId::new(id)).await?;
  Ok(card_response(&state, &user, &headers))
}

// ─── Selfie upload ───────────────────────────────────────────────────────────

fn media_type(headers: &HeaderMap) -> Result<String, ApiError> {
  let raw = headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .unwrap_or_default();
  let essence = raw.split(';').next().unwrap_or_default().trim().to_lowercase();
  if ACCEPTED_IMAGE_TYPES.contains(&essence.as_str()) {
    Ok(essence)
  } else {
    Err(ApiError::UnsupportedMediaType(raw.to_owned()))
  }
}

/// `PUT /api/digital-id/{id}/selfie`, body: the captured still frame.
///
/// The image is stored under the user's key, replacing any previous one, and
/// linked from the record. A failed upload leaves both the record and the
/// previous image untouched.
pub async fn upload_selfie<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<Json<DigitalIdView>, ApiError> {
  let media_type = media_type(&headers)?;
  if body.is_empty() {
    return Err(ApiError::BadRequest("image body is empty".into()));
  }
  if body.len() > MAX_SELFIE_BYTES {
    return Err(ApiError::PayloadTooLarge { limit: MAX_SELFIE_BYTES });
  }

  let id = UserId::new(id);
  load(&state, &id).await?;

  let image = Image { media_type, bytes: body.to_vec() };
  let reference = state
    .store
    .upload_image(id.clone(), image)
    .await
    .map_err(ApiError::store)?;
  let user = state
    .store
    .set_selfie(id.clone(), reference)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::user_not_found(&id))?;
  info!(%id, "selfie updated");

  Ok(Json(build_view(&state, user, Audience::Owner)))
}
