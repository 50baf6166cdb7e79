//! SVG rendering of the digital ID card.
//!
//! The card is the downloadable form of a stamped record: the intake fields,
//! the selfie (or a placeholder), and the personality sigil on the category's
//! gradient.

mod svg;

use chrono::NaiveDate;
use stamp_core::{
  personality::Category,
  user::{Sex, Species, UserRecord},
};

pub use svg::render;

/// Serial printed in the card footer.
pub const SERIAL: &str = "PS-2025-OFFICIAL";

/// Everything printed on one card.
#[derive(Debug, Clone)]
pub struct Card<'a> {
  pub record:      &'a UserRecord,
  /// Resolved category; unknown stored types have already been defaulted.
  pub category:    Category,
  /// Where the selfie can be fetched from. `None` prints a placeholder.
  pub selfie_href: Option<&'a str>,
  pub issued_on:   NaiveDate,
}

impl<'a> Card<'a> {
  pub fn new(record: &'a UserRecord, issued_on: NaiveDate) -> Self {
    Self {
      record,
      category: record.category(),
      selfie_href: None,
      issued_on,
    }
  }

  pub fn with_selfie(mut self, href: &'a str) -> Self {
    self.selfie_href = Some(href);
    self
  }
}

/// `March 4, 1990`.
pub fn long_date(date: NaiveDate) -> String {
  date.format("%B %-d, %Y").to_string()
}

pub fn sex_label(sex: Sex) -> &'static str {
  match sex {
    Sex::Male => "Male",
    Sex::Female => "Female",
    Sex::NonBinary => "Non-binary",
  }
}

pub fn species_label(species: Species) -> &'static str {
  match species {
    Species::Human => "Human",
    Species::Robot => "Robot",
  }
}

/// Download file name: `personality-stamp-<name>.svg` with each whitespace
/// run in the name replaced by `-`.
pub fn download_filename(name: &str) -> String {
  let slug = name.split_whitespace().collect::<Vec<_>>().join("-");
  format!("personality-stamp-{slug}.svg")
}
