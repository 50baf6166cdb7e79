//! The `RecordStore` trait and the values that cross it.
//!
//! The trait is implemented by storage backends (`stamp-store-sqlite` for the
//! local fallback, `stamp-remote` for the hosted service) and by
//! [`crate::fallback::FallbackStore`], which composes the two. Higher layers
//! depend on this abstraction only.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  personality::Category,
  scoring::QuizResponse,
  user::{NewUser, UserId, UserRecord},
};

/// Scheme of image references handed out by backends that keep images
/// themselves rather than at a public URL: `local-blob:<user id>`.
pub const LOCAL_IMAGE_SCHEME: &str = "local-blob:";

// ─── Values ──────────────────────────────────────────────────────────────────

/// An image payload with its media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
  pub media_type: String,
  pub bytes:      Vec<u8>,
}

/// The stored outcome of a completed quiz, kept alongside the record's
/// personality type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
  pub user_id:          UserId,
  pub personality_type: Category,
  pub answers:          QuizResponse,
  pub created_at:       DateTime<Utc>,
}

/// What happened when a backend was asked to assign a personality type.
#[derive(Debug, Clone, PartialEq)]
pub enum PersonalityUpdate {
  /// The type was written; the record is returned as stored.
  Assigned(UserRecord),
  /// The record already had a type; nothing was written.
  AlreadyAssigned(UserRecord),
  NotFound,
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Error bound for [`RecordStore`] backends.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// Whether the failure came from the hosted service rather than from local
  /// storage.
  fn is_remote(&self) -> bool { false }
}

/// Abstraction over a user-record backend.
///
/// Images are keyed by the owning user's identifier; uploading under a key
/// replaces whatever was stored there.
///
/// All methods return `Send` futures so the trait can be used from a
/// multi-threaded runtime (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: StoreError;

  // ── Records ───────────────────────────────────────────────────────────

  /// Persist a new record and return it with its assigned identifier.
  fn create_record(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<UserRecord, Self::Error>> + Send + '_;

  /// Fetch a record. Returns `None` if the identifier is unknown.
  fn get_record(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<UserRecord>, Self::Error>> + Send + '_;

  /// Assign the personality type and stamp `updated_at`, unless one is
  /// already set.
  fn set_personality(
    &self,
    id: UserId,
    category: Category,
  ) -> impl Future<Output = Result<PersonalityUpdate, Self::Error>> + Send + '_;

  /// Point the record at a new selfie. Returns `None` if the identifier is
  /// unknown.
  fn set_selfie(
    &self,
    id: UserId,
    reference: String,
  ) -> impl Future<Output = Result<Option<UserRecord>, Self::Error>> + Send + '_;

  /// Record a completed quiz.
  fn insert_quiz_result(
    &self,
    result: QuizResult,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Images ────────────────────────────────────────────────────────────

  /// Store `image` under `key`, overwriting any previous image, and return a
  /// reference the image can be fetched from.
  fn upload_image(
    &self,
    key: UserId,
    image: Image,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;

  /// Remove the image under `key`. Removing a missing image succeeds.
  fn delete_image(
    &self,
    key: UserId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Fetch the image under `key`, if any.
  fn load_image(
    &self,
    key: UserId,
  ) -> impl Future<Output = Result<Option<Image>, Self::Error>> + Send + '_;
}
