//! SQL schema for the local store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! layout so later migrations can be gated on it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One JSON document per key. Keys are namespaced by prefix:
--   local-<millis>     user record
--   quiz-<user id>     completed quiz result
--   selfie-<user id>   selfie image
CREATE TABLE IF NOT EXISTS local_storage (
    key    TEXT PRIMARY KEY,
    value  TEXT NOT NULL
);

PRAGMA user_version = 1;
";
