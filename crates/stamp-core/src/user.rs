//! User records: the identity and profile data collected at intake.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::personality::Category;

/// Prefix marking identifiers whose records live only in the local store.
pub const LOCAL_ID_PREFIX: &str = "local-";

// ─── Identifier ──────────────────────────────────────────────────────────────

/// An opaque user identifier. Remote identifiers are assigned by the hosted
/// service; local ones are synthesised from the creation timestamp.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  /// A local-fallback identifier: `local-<unix millis>`.
  pub fn local(created_at: DateTime<Utc>) -> Self {
    Self(format!("{LOCAL_ID_PREFIX}{}", created_at.timestamp_millis()))
  }

  pub fn is_local(&self) -> bool { self.0.starts_with(LOCAL_ID_PREFIX) }

  pub fn as_str(&self) -> &str { &self.0 }

  /// The printed ID number: the first 16 characters, uppercased.
  pub fn id_number(&self) -> String {
    self.0.chars().take(16).collect::<String>().to_uppercase()
  }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<String> for UserId {
  fn from(s: String) -> Self { Self(s) }
}

// ─── Enumerated profile fields ───────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Sex {
  Male,
  Female,
  NonBinary,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Species {
  Human,
  Robot,
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A validated intake submission, ready to be persisted.
///
/// Produced only by [`crate::intake::IntakeForm::validate`]; backends receive
/// exactly these field values whether the record ends up remote or local.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
  pub name:          String,
  pub date_of_birth: NaiveDate,
  pub nationality:   String,
  pub sex:           Sex,
  pub species:       Species,
}

/// A persisted user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
  pub id:               UserId,
  pub name:             String,
  pub date_of_birth:    NaiveDate,
  pub nationality:      String,
  pub sex:              Sex,
  pub species:          Species,
  /// Stored category key. Absent until the quiz completes; written once.
  #[serde(default)]
  pub personality_type: Option<String>,
  /// Where the current selfie can be fetched from, if one was taken.
  #[serde(default)]
  pub selfie_reference: Option<String>,
  pub created_at:       DateTime<Utc>,
  /// Set when the personality type is assigned.
  #[serde(default)]
  pub updated_at:       Option<DateTime<Utc>>,
}

impl UserRecord {
  /// Build a freshly-created record; backends call this with the identifier
  /// and timestamp they assign.
  pub fn create(id: UserId, input: NewUser, created_at: DateTime<Utc>) -> Self {
    Self {
      id,
      name: input.name,
      date_of_birth: input.date_of_birth,
      nationality: input.nationality,
      sex: input.sex,
      species: input.species,
      personality_type: None,
      selfie_reference: None,
      created_at,
      updated_at: None,
    }
  }

  /// The intake fields of this record, as they were submitted.
  pub fn intake_fields(&self) -> NewUser {
    NewUser {
      name:          self.name.clone(),
      date_of_birth: self.date_of_birth,
      nationality:   self.nationality.clone(),
      sex:           self.sex,
      species:       self.species,
    }
  }

  pub fn is_scored(&self) -> bool { self.personality_type.is_some() }

  /// The category to display; unknown or missing keys resolve to
  /// [`Category::Architect`].
  pub fn category(&self) -> Category {
    Category::resolve(self.personality_type.as_deref())
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn local_ids_carry_the_marker() {
    let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
    let id = UserId::local(at);
    assert_eq!(id.as_str(), "local-1700000000123");
    assert!(id.is_local());
    assert!(!UserId::new("3f2a9c1e-0000-4000-8000-000000000000").is_local());
  }

  #[test]
  fn id_number_is_first_sixteen_chars_uppercased() {
    let id = UserId::new("3f2a9c1e-ab12-4000-8000-000000000000");
    assert_eq!(id.id_number(), "3F2A9C1E-AB12-40");
    assert_eq!(UserId::new("local-1").id_number(), "LOCAL-1");
  }

  #[test]
  fn sex_uses_kebab_case_keys() {
    assert_eq!(Sex::NonBinary.as_ref(), "non-binary");
    assert_eq!("non-binary".parse::<Sex>().unwrap(), Sex::NonBinary);
    assert_eq!(
      serde_json::to_string(&Sex::NonBinary).unwrap(),
      "\"non-binary\""
    );
  }

  #[test]
  fn unknown_personality_type_displays_as_architect() {
    let at = Utc.timestamp_millis_opt(0).unwrap();
    let mut record = UserRecord::create(
      UserId::local(at),
      NewUser {
        name:          "Ada".into(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        nationality:   "British".into(),
        sex:           Sex::Female,
        species:       Species::Human,
      },
      at,
    );
    assert!(!record.is_scored());
    assert_eq!(record.category(), Category::Architect);

    record.personality_type = Some("wizard".into());
    assert_eq!(record.category(), Category::Architect);

    record.personality_type = Some("innovator".into());
    assert_eq!(record.category(), Category::Innovator);
  }
}
