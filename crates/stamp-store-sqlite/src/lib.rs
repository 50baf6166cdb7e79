//! SQLite backend for the local fallback store.
//!
//! Records live in a plain string-keyed, string-valued table, one JSON value
//! per key, mirroring a browser's local storage. [`tokio_rusqlite`] runs all
//! database access on a dedicated thread without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
