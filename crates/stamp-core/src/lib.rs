//! Core types and trait definitions for the personality stamp service.
//!
//! No HTTP or database dependencies live here. The crate holds the intake
//! validator, the quiz state machine, the scoring table, the
//! personality reference data and the [`store::RecordStore`] abstraction that
//! storage backends implement.

// Backend impls use native `async fn`; the trait spells out `Send` futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod fallback;
pub mod intake;
pub mod personality;
pub mod quiz;
pub mod scoring;
pub mod store;
pub mod user;

pub use error::{Error, Result};
