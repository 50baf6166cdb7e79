//! [`SqliteStore`]: the local fallback implementation of [`RecordStore`].

use std::path::Path;

use chrono::{Duration, Utc};
use rusqlite::OptionalExtension as _;
use tracing::debug;

use stamp_core::{
  personality::Category,
  store::{Image, LOCAL_IMAGE_SCHEME, PersonalityUpdate, QuizResult, RecordStore},
  user::{NewUser, UserId, UserRecord},
};

use crate::{
  Result,
  encode::{
    decode_image, decode_record, encode_image, encode_quiz_result,
    encode_record, image_key, quiz_key, record_key,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A key-value store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Raw items ─────────────────────────────────────────────────────────────

  pub(crate) async fn get_item(&self, key: String) -> Result<Option<String>> {
    let value = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT value FROM local_storage WHERE key = ?1",
              rusqlite::params![key],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(value)
  }

  async fn set_item(&self, key: String, value: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
           ON CONFLICT (key) DO UPDATE SET value = excluded.value",
          rusqlite::params![key, value],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert only if `key` is unused. Returns whether the row was written.
  async fn insert_new_item(&self, key: String, value: String) -> Result<bool> {
    let inserted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "INSERT OR IGNORE INTO local_storage (key, value) VALUES (?1, ?2)",
          rusqlite::params![key, value],
        )?;
        Ok(n == 1)
      })
      .await?;
    Ok(inserted)
  }

  async fn remove_item(&self, key: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM local_storage WHERE key = ?1",
          rusqlite::params![key],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Read-modify-write one item inside a single connection call.
  ///
  /// `f` receives the current value and returns its result plus the value to
  /// write back, if any. Returns `None` when `key` is absent.
  async fn update_item<T, F>(&self, key: String, f: F) -> Result<Option<T>>
  where
    T: Send + 'static,
    F: FnOnce(&str) -> Result<(T, Option<String>)> + Send + 'static,
  {
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let current: Option<String> = tx
          .query_row(
            "SELECT value FROM local_storage WHERE key = ?1",
            rusqlite::params![key],
            |r| r.get(0),
          )
          .optional()?;
        let Some(current) = current else {
          return Ok(None);
        };

        let outcome = match f(&current) {
          Ok((value, Some(next))) => {
            tx.execute(
              "UPDATE local_storage SET value = ?2 WHERE key = ?1",
              rusqlite::params![key, next],
            )?;
            Ok(value)
          }
          Ok((value, None)) => Ok(value),
          Err(e) => Err(e),
        };
        tx.commit()?;
        Ok(Some(outcome))
      })
      .await?;
    outcome.transpose()
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = crate::Error;

  // ── Records ───────────────────────────────────────────────────────────────

  async fn create_record(&self, input: NewUser) -> Result<UserRecord> {
    let created_at = Utc::now();
    let mut stamp = created_at;

    // Two records created within the same millisecond would share an id;
    // bump the id until the key is free.
    loop {
      let record =
        UserRecord::create(UserId::local(stamp), input.clone(), created_at);
      let encoded = encode_record(&record)?;
      if self.insert_new_item(record_key(&record.id), encoded).await? {
        debug!(id = %record.id, "created local record");
        return Ok(record);
      }
      stamp += Duration::milliseconds(1);
    }
  }

  async fn get_record(&self, id: UserId) -> Result<Option<UserRecord>> {
    self
      .get_item(record_key(&id))
      .await?
      .map(|raw| decode_record(&raw))
      .transpose()
  }

  async fn set_personality(
    &self,
    id: UserId,
    category: Category,
  ) -> Result<PersonalityUpdate> {
    let now = Utc::now();
    let outcome = self
      .update_item(record_key(&id), move |raw| {
        let mut record = decode_record(raw)?;
        if record.is_scored() {
          return Ok((PersonalityUpdate::AlreadyAssigned(record), None));
        }
        record.personality_type = Some(category.key().to_owned());
        record.updated_at = Some(now);
        let encoded = encode_record(&record)?;
        Ok((PersonalityUpdate::Assigned(record), Some(encoded)))
      })
      .await?;
    Ok(outcome.unwrap_or(PersonalityUpdate::NotFound))
  }

  async fn set_selfie(
    &self,
    id: UserId,
    reference: String,
  ) -> Result<Option<UserRecord>> {
    self
      .update_item(record_key(&id), move |raw| {
        let mut record = decode_record(raw)?;
        record.selfie_reference = Some(reference);
        let encoded = encode_record(&record)?;
        Ok((record, Some(encoded)))
      })
      .await
  }

  async fn insert_quiz_result(&self, result: QuizResult) -> Result<()> {
    let encoded = encode_quiz_result(&result)?;
    self.set_item(quiz_key(&result.user_id), encoded).await
  }

  // ── Images ────────────────────────────────────────────────────────────────

  async fn upload_image(&self, key: UserId, image: Image) -> Result<String> {
    let encoded = encode_image(&image)?;
    self.set_item(image_key(&key), encoded).await?;
    debug!(%key, bytes = image.bytes.len(), "stored local image");
    Ok(format!("{LOCAL_IMAGE_SCHEME}{key}"))
  }

  async fn delete_image(&self, key: UserId) -> Result<()> {
    self.remove_item(image_key(&key)).await
  }

  async fn load_image(&self, key: UserId) -> Result<Option<Image>> {
    let item_key = image_key(&key);
    self
      .get_item(item_key.clone())
      .await?
      .map(|raw| decode_image(&item_key, &raw))
      .transpose()
  }
}
