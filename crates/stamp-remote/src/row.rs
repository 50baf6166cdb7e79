//! Wire shapes of the `users` and `quiz_results` tables.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use stamp_core::{
  personality::Category,
  store::QuizResult,
  user::{NewUser, Sex, Species, UserId, UserRecord},
};

/// A `users` row as returned by the table API.
#[derive(Debug, Deserialize)]
pub struct UserRow {
  pub id:               String,
  pub name:             String,
  pub dob:              NaiveDate,
  pub nationality:      String,
  pub sex:              Sex,
  pub human_robot:      Species,
  #[serde(default)]
  pub personality_type: Option<String>,
  #[serde(default)]
  pub selfie_url:       Option<String>,
  pub created_at:       DateTime<Utc>,
  #[serde(default)]
  pub updated_at:       Option<DateTime<Utc>>,
}

impl From<UserRow> for UserRecord {
  fn from(row: UserRow) -> Self {
    UserRecord {
      id:               UserId::new(row.id),
      name:             row.name,
      date_of_birth:    row.dob,
      nationality:      row.nationality,
      sex:              row.sex,
      species:          row.human_robot,
      personality_type: row.personality_type,
      selfie_reference: row.selfie_url,
      created_at:       row.created_at,
      updated_at:       row.updated_at,
    }
  }
}

/// Body of a `users` insert. The service assigns `id`.
#[derive(Debug, Serialize)]
pub struct InsertUser<'a> {
  pub name:        &'a str,
  pub dob:         NaiveDate,
  pub nationality: &'a str,
  pub sex:         Sex,
  pub human_robot: Species,
  pub created_at:  DateTime<Utc>,
}

impl<'a> InsertUser<'a> {
  pub fn new(input: &'a NewUser, created_at: DateTime<Utc>) -> Self {
    Self {
      name: &input.name,
      dob: input.date_of_birth,
      nationality: &input.nationality,
      sex: input.sex,
      human_robot: input.species,
      created_at,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct PersonalityPatch {
  pub personality_type: Category,
  pub updated_at:       DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SelfiePatch {
  pub selfie_url: String,
}

/// Body of a `quiz_results` insert.
#[derive(Debug, Serialize)]
pub struct InsertQuizResult<'a> {
  pub user_id:          &'a str,
  pub personality_type: Category,
  pub answers:          &'a [u8],
  pub created_at:       DateTime<Utc>,
}

impl<'a> From<&'a QuizResult> for InsertQuizResult<'a> {
  fn from(result: &'a QuizResult) -> Self {
    Self {
      user_id:          result.user_id.as_str(),
      personality_type: result.personality_type,
      answers:          result.answers.answers(),
      created_at:       result.created_at,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct RemovePrefixes<'a> {
  pub prefixes: [&'a str; 1],
}
