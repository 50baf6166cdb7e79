//! Key layout and value encodings for the `local_storage` table.
//!
//! Records and quiz results are stored as their serde JSON form. Images are
//! stored as JSON with the bytes in standard base64.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use stamp_core::{
  store::{Image, QuizResult},
  user::{UserId, UserRecord},
};

use crate::{Error, Result};

// ─── Keys ────────────────────────────────────────────────────────────────────

/// User records are stored under their own identifier.
pub fn record_key(id: &UserId) -> String { id.as_str().to_owned() }

pub fn quiz_key(id: &UserId) -> String { format!("quiz-{id}") }

pub fn image_key(id: &UserId) -> String { format!("selfie-{id}") }

// ─── Records ─────────────────────────────────────────────────────────────────

pub fn encode_record(record: &UserRecord) -> Result<String> {
  Ok(serde_json::to_string(record)?)
}

pub fn decode_record(s: &str) -> Result<UserRecord> {
  Ok(serde_json::from_str(s)?)
}

pub fn encode_quiz_result(result: &QuizResult) -> Result<String> {
  Ok(serde_json::to_string(result)?)
}

#[cfg(test)]
pub fn decode_quiz_result(s: &str) -> Result<QuizResult> {
  Ok(serde_json::from_str(s)?)
}

// ─── Images ──────────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct StoredImage {
  media_type: String,
  data:       String,
}

pub fn encode_image(image: &Image) -> Result<String> {
  Ok(serde_json::to_string(&StoredImage {
    media_type: image.media_type.clone(),
    data:       STANDARD.encode(&image.bytes),
  })?)
}

pub fn decode_image(key: &str, s: &str) -> Result<Image> {
  let stored: StoredImage = serde_json::from_str(s)?;
  let bytes = STANDARD
    .decode(stored.data)
    .map_err(|source| Error::ImageEncoding { key: key.to_owned(), source })?;
  Ok(Image { media_type: stored.media_type, bytes })
}
