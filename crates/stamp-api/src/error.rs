//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use stamp_core::{intake::FieldErrors, store::StoreError, user::UserId};
use thiserror::Error;
use tracing::error;

/// Shown when the hosted service fails a read or update.
pub const REMOTE_NOTICE: &str = "Error loading data. Please try again later.";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("please correct the highlighted fields")]
  Validation(#[from] FieldErrors),

  #[error("{message}")]
  NotFound {
    message:  String,
    /// Screen the client should return to.
    redirect: &'static str,
  },

  #[error("{0}")]
  Quiz(#[from] stamp_core::Error),

  #[error("a personality type is already assigned to {0}")]
  AlreadyScored(UserId),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unsupported media type: {0}")]
  UnsupportedMediaType(String),

  #[error("image exceeds {limit} bytes")]
  PayloadTooLarge { limit: usize },

  #[error("remote service error: {0}")]
  Remote(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a backend failure, keeping hosted-service failures apart.
  pub fn store<E: StoreError>(e: E) -> Self {
    error!(error = %e, remote = e.is_remote(), "store operation failed");
    if e.is_remote() {
      ApiError::Remote(Box::new(e))
    } else {
      ApiError::Store(Box::new(e))
    }
  }

  /// Unknown identifier on the ID or share screens.
  pub fn user_not_found(id: &UserId) -> Self {
    ApiError::NotFound { message: format!("user {id} not found"), redirect: "/" }
  }

  /// Unknown identifier on the quiz screen; the user starts over at intake.
  pub fn quiz_user_not_found(id: &UserId) -> Self {
    ApiError::NotFound {
      message:  format!("user {id} not found"),
      redirect: "/personal-info",
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let message = self.to_string();
    match self {
      ApiError::Validation(fields) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": message, "fields": fields })),
      )
        .into_response(),
      ApiError::NotFound { redirect, .. } => (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": message, "redirect": redirect })),
      )
        .into_response(),
      ApiError::Remote(_) => (
        StatusCode::BAD_GATEWAY,
        Json(json!({ "error": REMOTE_NOTICE, "redirect": "/" })),
      )
        .into_response(),
      other => {
        let status = match other {
          ApiError::AlreadyScored(_) => StatusCode::CONFLICT,
          ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
          ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
          ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
          _ => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "error": message }))).into_response()
      }
    }
  }
}
