//! [`FallbackStore`]: a remote backend with a local safety net.
//!
//! Creation tries the remote backend first and falls back to the local one on
//! any failure, writing identical field values. Every other operation is
//! routed by the identifier: `local-` identifiers go to the local backend,
//! everything else to the remote one.

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
  personality::Category,
  store::{Image, PersonalityUpdate, QuizResult, RecordStore, StoreError},
  user::{NewUser, UserId, UserRecord},
};

#[derive(Debug, Error)]
pub enum FallbackError<R, L> {
  #[error("remote store: {0}")]
  Remote(#[source] R),

  #[error("local store: {0}")]
  Local(#[source] L),

  #[error("no remote store is configured for {0}")]
  RemoteUnavailable(UserId),
}

impl<R: StoreError, L: StoreError> StoreError for FallbackError<R, L> {
  fn is_remote(&self) -> bool {
    matches!(self, FallbackError::Remote(_) | FallbackError::RemoteUnavailable(_))
  }
}

/// Dual-backend store. `remote` is `None` when no hosted service is
/// configured, in which case every record is created locally.
#[derive(Clone)]
pub struct FallbackStore<R, L> {
  remote: Option<R>,
  local:  L,
}

enum Route<'a, R, L> {
  Remote(&'a R),
  Local(&'a L),
  Unavailable,
}

impl<R, L> FallbackStore<R, L>
where
  R: RecordStore,
  L: RecordStore,
{
  pub fn new(remote: Option<R>, local: L) -> Self { Self { remote, local } }

  pub fn has_remote(&self) -> bool { self.remote.is_some() }

  pub fn local(&self) -> &L { &self.local }

  fn route(&self, id: &UserId) -> Route<'_, R, L> {
    if id.is_local() {
      return Route::Local(&self.local);
    }
    match &self.remote {
      Some(remote) => Route::Remote(remote),
      None => {
        debug!(%id, "remote identifier but no remote store configured");
        Route::Unavailable
      }
    }
  }
}

impl<R, L> RecordStore for FallbackStore<R, L>
where
  R: RecordStore,
  L: RecordStore,
{
  type Error = FallbackError<R::Error, L::Error>;

  async fn create_record(&self, input: NewUser) -> Result<UserRecord, Self::Error> {
    if let Some(remote) = &self.remote {
      match remote.create_record(input.clone()).await {
        Ok(record) => return Ok(record),
        Err(e) => warn!(error = %e, "remote create failed; saving record locally"),
      }
    }
    self
      .local
      .create_record(input)
      .await
      .map_err(FallbackError::Local)
  }

  async fn get_record(&self, id: UserId) -> Result<Option<UserRecord>, Self::Error> {
    match self.route(&id) {
      Route::Remote(r) => r.get_record(id).await.map_err(FallbackError::Remote),
      Route::Local(l) => l.get_record(id).await.map_err(FallbackError::Local),
      Route::Unavailable => Ok(None),
    }
  }

  async fn set_personality(
    &self,
    id: UserId,
    category: Category,
  ) -> Result<PersonalityUpdate, Self::Error> {
    match self.route(&id) {
      Route::Remote(r) => r
        .set_personality(id, category)
        .await
        .map_err(FallbackError::Remote),
      Route::Local(l) => l
        .set_personality(id, category)
        .await
        .map_err(FallbackError::Local),
      Route::Unavailable => Ok(PersonalityUpdate::NotFound),
    }
  }

  async fn set_selfie(
    &self,
    id: UserId,
    reference: String,
  ) -> Result<Option<UserRecord>, Self::Error> {
    match self.route(&id) {
      Route::Remote(r) => r
        .set_selfie(id, reference)
        .await
        .map_err(FallbackError::Remote),
      Route::Local(l) => l
        .set_selfie(id, reference)
        .await
        .map_err(FallbackError::Local),
      Route::Unavailable => Ok(None),
    }
  }

  async fn insert_quiz_result(&self, result: QuizResult) -> Result<(), Self::Error> {
    match self.route(&result.user_id) {
      Route::Remote(r) => r
        .insert_quiz_result(result)
        .await
        .map_err(FallbackError::Remote),
      Route::Local(l) => l
        .insert_quiz_result(result)
        .await
        .map_err(FallbackError::Local),
      Route::Unavailable => Err(FallbackError::RemoteUnavailable(result.user_id)),
    }
  }

  async fn upload_image(&self, key: UserId, image: Image) -> Result<String, Self::Error> {
    match self.route(&key) {
      Route::Remote(r) => r.upload_image(key, image).await.map_err(FallbackError::Remote),
      Route::Local(l) => l.upload_image(key, image).await.map_err(FallbackError::Local),
      Route::Unavailable => Err(FallbackError::RemoteUnavailable(key)),
    }
  }

  async fn delete_image(&self, key: UserId) -> Result<(), Self::Error> {
    match self.route(&key) {
      Route::Remote(r) => r.delete_image(key).await.map_err(FallbackError::Remote),
      Route::Local(l) => l.delete_image(key).await.map_err(FallbackError::Local),
      Route::Unavailable => Ok(()),
    }
  }

  async fn load_image(&self, key: UserId) -> Result<Option<Image>, Self::Error> {
    match self.route(&key) {
      Route::Remote(r) => r.load_image(key).await.map_err(FallbackError::Remote),
      Route::Local(l) => l.load_image(key).await.map_err(FallbackError::Local),
      Route::Unavailable => Ok(None),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::{
    collections::HashMap,
    sync::{
      Arc, Mutex,
      atomic::{AtomicBool, AtomicU64, Ordering},
    },
  };

  use chrono::{NaiveDate, Utc};

  use super::*;
  use crate::user::{Sex, Species};

  #[derive(Debug, Error)]
  #[error("memory store offline")]
  struct Offline;

  impl StoreError for Offline {
    fn is_remote(&self) -> bool { true }
  }

  /// A minimal in-memory backend; `prefix` decides the identifiers it hands
  /// out and `offline` makes every call fail.
  #[derive(Clone, Default)]
  struct MemoryStore {
    prefix:  &'static str,
    offline: Arc<AtomicBool>,
    next:    Arc<AtomicU64>,
    records: Arc<Mutex<HashMap<UserId, UserRecord>>>,
    images:  Arc<Mutex<HashMap<UserId, Image>>>,
    results: Arc<Mutex<Vec<QuizResult>>>,
  }

  impl MemoryStore {
    fn new(prefix: &'static str) -> Self {
      Self { prefix, ..Default::default() }
    }

    fn check(&self) -> Result<(), Offline> {
      if self.offline.load(Ordering::SeqCst) { Err(Offline) } else { Ok(()) }
    }
  }

  impl RecordStore for MemoryStore {
    type Error = Offline;

    async fn create_record(&self, input: NewUser) -> Result<UserRecord, Offline> {
      self.check()?;
      let n = self.next.fetch_add(1, Ordering::SeqCst);
      let id = UserId::new(format!("{}{n}", self.prefix));
      let record = UserRecord::create(id.clone(), input, Utc::now());
      self.records.lock().unwrap().insert(id, record.clone());
      Ok(record)
    }

    async fn get_record(&self, id: UserId) -> Result<Option<UserRecord>, Offline> {
      self.check()?;
      Ok(self.records.lock().unwrap().get(&id).cloned())
    }

    async fn set_personality(
      &self,
      id: UserId,
      category: Category,
    ) -> Result<PersonalityUpdate, Offline> {
      self.check()?;
      let mut records = self.records.lock().unwrap();
      let Some(record) = records.get_mut(&id) else {
        return Ok(PersonalityUpdate::NotFound);
      };
      if record.is_scored() {
        return Ok(PersonalityUpdate::AlreadyAssigned(record.clone()));
      }
      record.personality_type = Some(category.key().to_owned());
      record.updated_at = Some(Utc::now());
      Ok(PersonalityUpdate::Assigned(record.clone()))
    }

    async fn set_selfie(
      &self,
      id: UserId,
      reference: String,
    ) -> Result<Option<UserRecord>, Offline> {
      self.check()?;
      let mut records = self.records.lock().unwrap();
      Ok(records.get_mut(&id).map(|r| {
        r.selfie_reference = Some(reference);
        r.clone()
      }))
    }

    async fn insert_quiz_result(&self, result: QuizResult) -> Result<(), Offline> {
      self.check()?;
      self.results.lock().unwrap().push(result);
      Ok(())
    }

    async fn upload_image(&self, key: UserId, image: Image) -> Result<String, Offline> {
      self.check()?;
      let reference = format!("mem:{key}");
      self.images.lock().unwrap().insert(key, image);
      Ok(reference)
    }

    async fn delete_image(&self, key: UserId) -> Result<(), Offline> {
      self.check()?;
      self.images.lock().unwrap().remove(&key);
      Ok(())
    }

    async fn load_image(&self, key: UserId) -> Result<Option<Image>, Offline> {
      self.check()?;
      Ok(self.images.lock().unwrap().get(&key).cloned())
    }
  }

  fn new_user() -> NewUser {
    NewUser {
      name:          "Ada Lovelace".into(),
      date_of_birth: NaiveDate::from_ymd_opt(1815, 12, 10).unwrap(),
      nationality:   "British".into(),
      sex:           Sex::Female,
      species:       Species::Human,
    }
  }

  fn stores() -> (MemoryStore, MemoryStore) {
    (MemoryStore::new("remote-"), MemoryStore::new("local-"))
  }

  #[tokio::test]
  async fn create_prefers_remote() {
    let (remote, local) = stores();
    let store = FallbackStore::new(Some(remote.clone()), local.clone());

    let record = store.create_record(new_user()).await.unwrap();
    assert!(!record.id.is_local());
    assert_eq!(remote.records.lock().unwrap().len(), 1);
    assert!(local.records.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn remote_failure_falls_back_with_identical_fields() {
    let (remote, local) = stores();
    remote.offline.store(true, Ordering::SeqCst);
    let store = FallbackStore::new(Some(remote), local.clone());

    let record = store.create_record(new_user()).await.unwrap();
    assert!(record.id.is_local());
    assert_eq!(record.intake_fields(), new_user());

    // Later operations on the local id are served by the local backend.
    let fetched = store.get_record(record.id.clone()).await.unwrap().unwrap();
    assert_eq!(fetched, record);
    let update = store
      .set_personality(record.id.clone(), Category::Visionary)
      .await
      .unwrap();
    assert!(matches!(update, PersonalityUpdate::Assigned(_)));
  }

  #[tokio::test]
  async fn without_remote_everything_is_local() {
    let (_, local) = stores();
    let store: FallbackStore<MemoryStore, _> = FallbackStore::new(None, local);
    assert!(!store.has_remote());
    let record = store.create_record(new_user()).await.unwrap();
    assert!(record.id.is_local());
  }

  #[tokio::test]
  async fn remote_ids_without_remote_resolve_to_nothing() {
    let (_, local) = stores();
    let store: FallbackStore<MemoryStore, _> = FallbackStore::new(None, local);
    let id = UserId::new("9d1f4e0a-0000-4000-8000-000000000000");

    assert!(store.get_record(id.clone()).await.unwrap().is_none());
    assert_eq!(
      store.set_personality(id.clone(), Category::Artisan).await.unwrap(),
      PersonalityUpdate::NotFound
    );
    assert!(matches!(
      store
        .upload_image(id, Image { media_type: "image/png".into(), bytes: vec![1] })
        .await,
      Err(FallbackError::RemoteUnavailable(_))
    ));
  }

  #[tokio::test]
  async fn remote_read_errors_are_not_masked() {
    let (remote, local) = stores();
    let store = FallbackStore::new(Some(remote.clone()), local);
    let record = store.create_record(new_user()).await.unwrap();

    remote.offline.store(true, Ordering::SeqCst);
    assert!(matches!(
      store.get_record(record.id).await,
      Err(ref e @ FallbackError::Remote(Offline)) if e.is_remote()
    ));
  }

  #[tokio::test]
  async fn images_follow_the_identifier() {
    let (remote, local) = stores();
    let store = FallbackStore::new(Some(remote.clone()), local.clone());
    let local_id = UserId::new("local-42");
    let image = Image { media_type: "image/jpeg".into(), bytes: vec![0xff, 0xd8] };

    let reference = store.upload_image(local_id.clone(), image.clone()).await.unwrap();
    assert_eq!(reference, "mem:local-42");
    assert!(remote.images.lock().unwrap().is_empty());
    assert_eq!(store.load_image(local_id.clone()).await.unwrap(), Some(image));

    store.delete_image(local_id.clone()).await.unwrap();
    assert_eq!(store.load_image(local_id).await.unwrap(), None);
  }
}
