//! Intake form validation.
//!
//! Validation runs once, on submit. Every failing field is reported together;
//! a submission either passes completely or produces no [`NewUser`].

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::user::{NewUser, Sex, Species};

/// Oldest accepted age, in whole calendar years.
pub const MAX_AGE_YEARS: i32 = 150;

/// The raw intake submission, exactly as the client sent it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeForm {
  #[serde(default, alias = "fullName")]
  pub name:          String,
  #[serde(default)]
  pub date_of_birth: String,
  #[serde(default)]
  pub nationality:   String,
  #[serde(default)]
  pub sex:           String,
  #[serde(default)]
  pub species:       String,
}

/// The intake fields, used as keys in [`FieldErrors`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Field {
  Name,
  DateOfBirth,
  Nationality,
  Sex,
  Species,
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("{} intake field(s) failed validation", .0.len())]
pub struct FieldErrors(BTreeMap<Field, &'static str>);

impl FieldErrors {
  pub fn get(&self, field: Field) -> Option<&'static str> {
    self.0.get(&field).copied()
  }

  pub fn contains(&self, field: Field) -> bool { self.0.contains_key(&field) }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  fn insert(&mut self, field: Field, message: &'static str) {
    self.0.insert(field, message);
  }
}

impl IntakeForm {
  /// Validate the submission against `today`.
  ///
  /// Age is the difference of calendar years between `today` and the birth
  /// date and must fall within `0..=MAX_AGE_YEARS`.
  pub fn validate(&self, today: NaiveDate) -> Result<NewUser, FieldErrors> {
    let mut errors = FieldErrors::default();

    let name = self.name.trim();
    if name.is_empty() {
      errors.insert(Field::Name, "Full name is required");
    } else if name.chars().count() < 2 {
      errors.insert(Field::Name, "Name must be at least 2 characters");
    }

    let date_of_birth = match self.date_of_birth.trim() {
      "" => {
        errors.insert(Field::DateOfBirth, "Date of birth is required");
        None
      }
      raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(dob) if (0..=MAX_AGE_YEARS).contains(&(today.year() - dob.year())) => {
          Some(dob)
        }
        _ => {
          errors.insert(Field::DateOfBirth, "Please enter a valid date of birth");
          None
        }
      },
    };

    let nationality = self.nationality.trim();
    if nationality.is_empty() {
      errors.insert(Field::Nationality, "Nationality is required");
    }

    let sex = self.sex.trim().parse::<Sex>().ok();
    if sex.is_none() {
      errors.insert(Field::Sex, "Please select your sex");
    }

    let species = self.species.trim().parse::<Species>().ok();
    if species.is_none() {
      errors.insert(Field::Species, "Please select human or robot");
    }

    match (date_of_birth, sex, species) {
      (Some(date_of_birth), Some(sex), Some(species)) if errors.is_empty() => {
        Ok(NewUser {
          name: name.to_owned(),
          date_of_birth,
          nationality: nationality.to_owned(),
          sex,
          species,
        })
      }
      _ => Err(errors),
    }
  }
}
