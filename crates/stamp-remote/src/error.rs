//! Error type for `stamp-remote`.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{op} returned {status}: {body}")]
  Status {
    op:     &'static str,
    status: StatusCode,
    body:   String,
  },

  #[error("{0} returned no rows")]
  NoRows(&'static str),
}

impl stamp_core::store::StoreError for Error {
  fn is_remote(&self) -> bool { true }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
