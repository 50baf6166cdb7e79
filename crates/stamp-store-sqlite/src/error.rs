//! Error type for `stamp-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] stamp_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("stored image under {key} is not valid base64: {source}")]
  ImageEncoding {
    key:    String,
    #[source]
    source: base64::DecodeError,
  },
}

impl stamp_core::store::StoreError for Error {}

pub type Result<T, E = Error> = std::result::Result<T, E>;
