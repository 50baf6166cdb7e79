//! Client for the hosted record service.
//!
//! The service exposes a PostgREST-style table API under `/rest/v1` and an
//! object store under `/storage/v1`, both authenticated with the project's
//! API key. [`RemoteStore`] implements [`stamp_core::store::RecordStore`] on
//! top of them.

mod client;
mod config;
mod row;

pub mod error;

pub use client::RemoteStore;
pub use config::RemoteConfig;
pub use error::{Error, Result};
