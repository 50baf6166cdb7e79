//! Integration tests for `SqliteStore` against an in-memory database.

use std::collections::HashSet;

use chrono::NaiveDate;
use stamp_core::{
  personality::Category,
  scoring::QuizResponse,
  store::{Image, PersonalityUpdate, QuizResult, RecordStore},
  user::{NewUser, Sex, Species, UserId},
};

use crate::{
  SqliteStore,
  encode::{decode_quiz_result, quiz_key},
};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn ada() -> NewUser {
  NewUser {
    name:          "Ada Lovelace".into(),
    date_of_birth: NaiveDate::from_ymd_opt(1815, 12, 10).unwrap(),
    nationality:   "British".into(),
    sex:           Sex::Female,
    species:       Species::Human,
  }
}

fn png() -> Image {
  Image {
    media_type: "image/png".into(),
    bytes:      vec![0x89, b'P', b'N', b'G', 0, 1, 2, 3],
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_record() {
  let s = store().await;

  let record = s.create_record(ada()).await.unwrap();
  assert!(record.id.is_local());
  assert_eq!(record.intake_fields(), ada());
  assert!(record.personality_type.is_none());
  assert!(record.selfie_reference.is_none());
  assert!(record.updated_at.is_none());

  let fetched = s.get_record(record.id.clone()).await.unwrap();
  assert_eq!(fetched, Some(record));
}

#[tokio::test]
async fn get_record_missing_returns_none() {
  let s = store().await;
  let result = s.get_record(UserId::new("local-1")).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn rapid_creation_yields_distinct_ids() {
  let s = store().await;
  let mut ids = HashSet::new();
  for _ in 0..20 {
    let record = s.create_record(ada()).await.unwrap();
    assert!(ids.insert(record.id));
  }
  assert_eq!(ids.len(), 20);
}

#[tokio::test]
async fn records_survive_reopening_the_file() {
  let dir = std::env::temp_dir()
    .join(format!("stamp-store-test-{}", std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("local.db");
  let _ = std::fs::remove_file(&path);

  let id = {
    let s = SqliteStore::open(&path).await.unwrap();
    s.create_record(ada()).await.unwrap().id
  };

  let s = SqliteStore::open(&path).await.unwrap();
  let record = s.get_record(id).await.unwrap().unwrap();
  assert_eq!(record.name, "Ada Lovelace");

  drop(s);
  let _ = std::fs::remove_dir_all(&dir);
}

// ─── Personality ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn personality_is_written_once() {
  let s = store().await;
  let record = s.create_record(ada()).await.unwrap();

  let PersonalityUpdate::Assigned(updated) = s
    .set_personality(record.id.clone(), Category::Artisan)
    .await
    .unwrap()
  else {
    panic!("expected assignment");
  };
  assert_eq!(updated.personality_type.as_deref(), Some("artisan"));
  assert!(updated.updated_at.is_some());

  let second = s
    .set_personality(record.id.clone(), Category::Catalyst)
    .await
    .unwrap();
  assert_eq!(second, PersonalityUpdate::AlreadyAssigned(updated.clone()));

  let stored = s.get_record(record.id).await.unwrap().unwrap();
  assert_eq!(stored, updated);
}

#[tokio::test]
async fn personality_on_missing_record_is_not_found() {
  let s = store().await;
  let outcome = s
    .set_personality(UserId::new("local-42"), Category::Visionary)
    .await
    .unwrap();
  assert_eq!(outcome, PersonalityUpdate::NotFound);
}

#[tokio::test]
async fn quiz_result_is_stored_per_user() {
  let s = store().await;
  let record = s.create_record(ada()).await.unwrap();

  let result = QuizResult {
    user_id:          record.id.clone(),
    personality_type: Category::Architect,
    answers:          QuizResponse::new(&[0; 10]).unwrap(),
    created_at:       record.created_at,
  };
  s.insert_quiz_result(result.clone()).await.unwrap();

  let raw = s.get_item(quiz_key(&record.id)).await.unwrap().unwrap();
  assert_eq!(decode_quiz_result(&raw).unwrap(), result);
}

// ─── Images ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn image_upload_replaces_and_links() {
  let s = store().await;
  let record = s.create_record(ada()).await.unwrap();

  let reference = s.upload_image(record.id.clone(), png()).await.unwrap();
  assert_eq!(reference, format!("local-blob:{}", record.id));
  assert_eq!(s.load_image(record.id.clone()).await.unwrap(), Some(png()));

  let jpeg = Image {
    media_type: "image/jpeg".into(),
    bytes:      vec![0xff, 0xd8, 0xff],
  };
  s.upload_image(record.id.clone(), jpeg.clone()).await.unwrap();
  assert_eq!(s.load_image(record.id.clone()).await.unwrap(), Some(jpeg));

  let updated = s
    .set_selfie(record.id.clone(), reference.clone())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.selfie_reference.as_deref(), Some(reference.as_str()));
  // The intake fields are untouched by a selfie update.
  assert_eq!(updated.intake_fields(), ada());
}

#[tokio::test]
async fn delete_image_is_idempotent() {
  let s = store().await;
  let id = UserId::new("local-7");

  s.delete_image(id.clone()).await.unwrap();
  s.upload_image(id.clone(), png()).await.unwrap();
  s.delete_image(id.clone()).await.unwrap();
  assert!(s.load_image(id).await.unwrap().is_none());
}

#[tokio::test]
async fn selfie_on_missing_record_returns_none() {
  let s = store().await;
  let updated = s
    .set_selfie(UserId::new("local-9"), "local-blob:local-9".into())
    .await
    .unwrap();
  assert!(updated.is_none());
}
