//! JSON HTTP API for the personality stamp service.
//!
//! Exposes an axum [`Router`] backed by any [`RecordStore`]; in production
//! that is a [`stamp_core::fallback::FallbackStore`] over the hosted service
//! and the local SQLite store.
//!
//! | Screen | Routes |
//! |--------|--------|
//! | intake | `POST /api/users`, `GET /api/users/{id}` |
//! | quiz | `GET /api/quiz/{id}`, `POST /api/quiz/{id}/{select,next,previous}` |
//! | ID | `GET /api/digital-id/{id}[/card.svg]`, `PUT /api/digital-id/{id}/selfie` |
//! | share | `GET /api/share/{id}[/card.svg]` |
//! | images | `GET /media/{key}` |

pub mod digital_id;
pub mod error;
pub mod etag;
pub mod media;
pub mod quiz;
pub mod reference;
pub mod session;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post, put},
};
use stamp_core::store::{LOCAL_IMAGE_SCHEME, RecordStore};

pub use error::ApiError;
use session::Sessions;

/// Largest accepted selfie, in bytes.
pub const MAX_SELFIE_BYTES: usize = 5 * 1024 * 1024;

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ApiConfig {
  /// Externally visible base URL, used for share links and image links.
  pub public_url: String,
}

impl ApiConfig {
  pub fn new(public_url: impl Into<String>) -> Self {
    Self { public_url: public_url.into() }
  }

  fn absolute(&self, path: &str) -> String {
    format!("{}{path}", self.public_url.trim_end_matches('/'))
  }

  /// Turn a stored image reference into a URL a browser can load. Local blob
  /// references are served by this service under `/media`.
  pub fn image_href(&self, reference: &str) -> String {
    match reference.strip_prefix(LOCAL_IMAGE_SCHEME) {
      Some(key) => self.absolute(&format!("/media/{key}")),
      None => reference.to_owned(),
    }
  }
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:    Arc<S>,
  pub config:   Arc<ApiConfig>,
  pub sessions: Arc<Sessions>,
}

impl<S> AppState<S> {
  pub fn new(store: S, config: ApiConfig) -> Self {
    Self {
      store:    Arc::new(store),
      config:   Arc::new(config),
      sessions: Arc::new(Sessions::default()),
    }
  }
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:    self.store.clone(),
      config:   self.config.clone(),
      sessions: self.sessions.clone(),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full application router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RecordStore + 'static,
{
  Router::new()
    .route("/api/health", get(reference::health))
    .route("/api/personalities", get(reference::personalities))
    // Intake
    .route("/api/users", post(users::create::<S>))
    .route("/api/users/{id}", get(users::get_one::<S>))
    // Quiz
    .route("/api/quiz/{id}", get(quiz::view::<S>))
    .route("/api/quiz/{id}/select", post(quiz::select::<S>))
    .route("/api/quiz/{id}/next", post(quiz::next::<S>))
    .route("/api/quiz/{id}/previous", post(quiz::previous::<S>))
    // Digital ID
    .route("/api/digital-id/{id}", get(digital_id::view::<S>))
    .route("/api/digital-id/{id}/card.svg", get(digital_id::card::<S>))
    .route(
      "/api/digital-id/{id}/selfie",
      // Leave headroom above the limit so oversized uploads get a JSON 413.
      put(digital_id::upload_selfie::<S>)
        .layer(DefaultBodyLimit::max(2 * MAX_SELFIE_BYTES)),
    )
    // Share
    .route("/api/share/{id}", get(digital_id::share_view::<S>))
    .route("/api/share/{id}/card.svg", get(digital_id::share_card::<S>))
    .route("/media/{key}", get(media::get_one::<S>))
    .with_state(state)
}
