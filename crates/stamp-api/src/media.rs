//! `GET /media/{key}`: images kept in the local store.
//!
//! Hosted images are served by the hosted service itself; only `local-` keys
//! resolve here.

use axum::{
  extract::{Path, State},
  http::header,
  response::{IntoResponse, Response},
};
use stamp_core::{store::RecordStore, user::UserId};

use crate::{AppState, error::ApiError};

pub async fn get_one<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(key): Path<String>,
) -> Result<Response, ApiError> {
  let key = UserId::new(key);
  let not_found = || ApiError::NotFound {
    message:  format!("no image stored under {key}"),
    redirect: "/",
  };
  if !key.is_local() {
    return Err(not_found());
  }
  let image = state
    .store
    .load_image(key.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;
  Ok(
    (
      [
        (header::CONTENT_TYPE, image.media_type),
        (header::CACHE_CONTROL, "no-cache".to_owned()),
      ],
      image.bytes,
    )
      .into_response(),
  )
}
