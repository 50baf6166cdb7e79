//! [`RemoteStore`]: the hosted-service implementation of [`RecordStore`].

use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use tracing::debug;

use stamp_core::{
  personality::Category,
  store::{Image, PersonalityUpdate, QuizResult, RecordStore},
  user::{NewUser, UserId, UserRecord},
};

use crate::{
  Error, RemoteConfig, Result,
  row::{
    InsertQuizResult, InsertUser, PersonalityPatch, RemovePrefixes,
    SelfiePatch, UserRow,
  },
};

/// Async client for the hosted record service.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct RemoteStore {
  client: Client,
  config: RemoteConfig,
}

impl RemoteStore {
  pub fn new(config: RemoteConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    Ok(Self { client, config })
  }

  fn base(&self) -> &str { self.config.url.trim_end_matches('/') }

  fn table_url(&self, table: &str) -> String {
    format!("{}/rest/v1/{table}", self.base())
  }

  fn object_url(&self, key: &UserId) -> String {
    format!("{}/storage/v1/object/{}/{key}", self.base(), self.config.bucket)
  }

  /// The public URL an uploaded image is served from.
  pub fn public_url(&self, key: &UserId) -> String {
    format!(
      "{}/storage/v1/object/public/{}/{key}",
      self.base(),
      self.config.bucket
    )
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    req
      .header("apikey", &self.config.api_key)
      .bearer_auth(&self.config.api_key)
  }

  fn id_filter(id: &UserId) -> (&'static str, String) {
    ("id", format!("eq.{id}"))
  }

  /// Pass successful responses through; turn anything else into
  /// [`Error::Status`] carrying the response body.
  async fn check(op: &'static str, resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(Error::Status { op, status, body })
  }

  async fn rows(op: &'static str, resp: Response) -> Result<Vec<UserRow>> {
    Ok(Self::check(op, resp).await?.json().await?)
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for RemoteStore {
  type Error = Error;

  // ── Records ───────────────────────────────────────────────────────────────

  /// `POST /rest/v1/users`
  async fn create_record(&self, input: NewUser) -> Result<UserRecord> {
    let resp = self
      .auth(self.client.post(self.table_url("users")))
      .header("Prefer", "return=representation")
      .json(&InsertUser::new(&input, Utc::now()))
      .send()
      .await?;

    let row = Self::rows("insert user", resp)
      .await?
      .into_iter()
      .next()
      .ok_or(Error::NoRows("insert user"))?;
    debug!(id = %row.id, "created remote record");
    Ok(row.into())
  }

  /// `GET /rest/v1/users?id=eq.<id>&select=*`
  async fn get_record(&self, id: UserId) -> Result<Option<UserRecord>> {
    let resp = self
      .auth(self.client.get(self.table_url("users")))
      .query(&[Self::id_filter(&id), ("select", "*".to_owned())])
      .send()
      .await?;
    // An id the `uuid` column cannot parse is rejected with 400; no record
    // can carry it.
    if resp.status() == StatusCode::BAD_REQUEST {
      debug!(%id, "remote rejected identifier");
      return Ok(None);
    }

    let rows = Self::rows("select user", resp).await?;
    Ok(rows.into_iter().next().map(UserRecord::from))
  }

  /// `PATCH /rest/v1/users?id=eq.<id>&personality_type=is.null`
  ///
  /// The `is.null` filter makes the write conditional on the service side,
  /// so a type is never overwritten.
  async fn set_personality(
    &self,
    id: UserId,
    category: Category,
  ) -> Result<PersonalityUpdate> {
    let resp = self
      .auth(self.client.patch(self.table_url("users")))
      .query(&[
        Self::id_filter(&id),
        ("personality_type", "is.null".to_owned()),
      ])
      .header("Prefer", "return=representation")
      .json(&PersonalityPatch {
        personality_type: category,
        updated_at:       Utc::now(),
      })
      .send()
      .await?;

    if let Some(row) = Self::rows("update personality", resp).await?.pop() {
      return Ok(PersonalityUpdate::Assigned(row.into()));
    }
    Ok(match self.get_record(id).await? {
      Some(record) => PersonalityUpdate::AlreadyAssigned(record),
      None => PersonalityUpdate::NotFound,
    })
  }

  /// `PATCH /rest/v1/users?id=eq.<id>`
  async fn set_selfie(
    &self,
    id: UserId,
    reference: String,
  ) -> Result<Option<UserRecord>> {
    let resp = self
      .auth(self.client.patch(self.table_url("users")))
      .query(&[Self::id_filter(&id)])
      .header("Prefer", "return=representation")
      .json(&SelfiePatch { selfie_url: reference })
      .send()
      .await?;

    let rows = Self::rows("update selfie", resp).await?;
    Ok(rows.into_iter().next().map(UserRecord::from))
  }

  /// `POST /rest/v1/quiz_results`
  async fn insert_quiz_result(&self, result: QuizResult) -> Result<()> {
    let resp = self
      .auth(self.client.post(self.table_url("quiz_results")))
      .header("Prefer", "return=minimal")
      .json(&InsertQuizResult::from(&result))
      .send()
      .await?;
    Self::check("insert quiz result", resp).await?;
    Ok(())
  }

  // ── Images ────────────────────────────────────────────────────────────────

  /// `POST /storage/v1/object/<bucket>/<key>` with upsert.
  async fn upload_image(&self, key: UserId, image: Image) -> Result<String> {
    let size = image.bytes.len();
    let resp = self
      .auth(self.client.post(self.object_url(&key)))
      .header("x-upsert", "true")
      .header(header::CONTENT_TYPE, image.media_type)
      .body(image.bytes)
      .send()
      .await?;
    Self::check("upload image", resp).await?;
    debug!(%key, bytes = size, "uploaded remote image");
    Ok(self.public_url(&key))
  }

  /// `DELETE /storage/v1/object/<bucket>`
  async fn delete_image(&self, key: UserId) -> Result<()> {
    let url = format!(
      "{}/storage/v1/object/{}",
      self.base(),
      self.config.bucket
    );
    let resp = self
      .auth(self.client.delete(url))
      .json(&RemovePrefixes { prefixes: [key.as_str()] })
      .send()
      .await?;
    Self::check("delete image", resp).await?;
    Ok(())
  }

  /// `GET /storage/v1/object/public/<bucket>/<key>`
  async fn load_image(&self, key: UserId) -> Result<Option<Image>> {
    let resp = self.client.get(self.public_url(&key)).send().await?;
    // The storage API reports a missing object as 400 or 404.
    if matches!(resp.status(), StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST) {
      return Ok(None);
    }
    let resp = Self::check("load image", resp).await?;
    let media_type = resp
      .headers()
      .get(header::CONTENT_TYPE)
      .and_then(|v| v.to_str().ok())
      .unwrap_or("application/octet-stream")
      .to_owned();
    let bytes = resp.bytes().await?.to_vec();
    Ok(Some(Image { media_type, bytes }))
  }
}
