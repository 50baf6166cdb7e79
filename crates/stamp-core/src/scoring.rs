//! The personality scoring table.
//!
//! Scoring is a pure function of a complete [`QuizResponse`]: every answer
//! adds fixed weights to two categories, three positional bonuses are applied
//! on top, and the highest score wins. Ties go to the category declared first
//! in [`Category::ALL`].

use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};

use crate::{Error, Result, personality::Category};

/// Number of questions in the quiz.
pub const QUESTION_COUNT: usize = 10;

/// Number of options offered for every question.
pub const OPTION_COUNT: u8 = 4;

// ─── QuizResponse ────────────────────────────────────────────────────────────

/// A complete set of answers: exactly [`QUESTION_COUNT`] option indices, each
/// below [`OPTION_COUNT`], in question order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct QuizResponse([u8; QUESTION_COUNT]);

impl QuizResponse {
  pub fn new(answers: &[u8]) -> Result<Self> {
    if let Some(&bad) = answers.iter().find(|&&a| a >= OPTION_COUNT) {
      return Err(Error::AnswerOutOfRange(bad));
    }
    let answers: [u8; QUESTION_COUNT] = answers
      .try_into()
      .map_err(|_| Error::WrongAnswerCount(answers.len()))?;
    Ok(Self(answers))
  }

  pub fn answers(&self) -> &[u8; QUESTION_COUNT] { &self.0 }

  /// The answer at a 1-indexed question position.
  fn at_position(&self, position: usize) -> u8 { self.0[position - 1] }
}

impl TryFrom<Vec<u8>> for QuizResponse {
  type Error = Error;

  fn try_from(answers: Vec<u8>) -> Result<Self> { Self::new(&answers) }
}

impl From<QuizResponse> for Vec<u8> {
  fn from(response: QuizResponse) -> Self { response.0.to_vec() }
}

// ─── Scores ──────────────────────────────────────────────────────────────────

/// Accumulated points per category. Serialises as a map in declaration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scores([u32; 6]);

impl Scores {
  pub fn get(&self, category: Category) -> u32 { self.0[category.index()] }

  fn add(&mut self, category: Category, points: u32) {
    self.0[category.index()] += points;
  }

  /// The first category, in declaration order, holding the maximum score.
  pub fn winner(&self) -> Category {
    let max = self.0.iter().copied().max().unwrap_or_default();
    Category::ALL
      .into_iter()
      .find(|c| self.get(*c) == max)
      .unwrap_or(Category::Architect)
  }
}

impl Serialize for Scores {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(Category::ALL.len()))?;
    for category in Category::ALL {
      map.serialize_entry(category.key(), &self.get(category))?;
    }
    map.end()
  }
}

/// The result of scoring a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome {
  pub category: Category,
  pub scores:   Scores,
}

// ─── Scoring ─────────────────────────────────────────────────────────────────

/// Points awarded for choosing option `answer`.
fn weights(answer: u8) -> [(Category, u32); 2] {
  match answer {
    0 => [(Category::Architect, 2), (Category::Innovator, 1)],
    1 => [(Category::Visionary, 2), (Category::Catalyst, 1)],
    2 => [(Category::Artisan, 2), (Category::Innovator, 1)],
    _ => [(Category::Catalyst, 2), (Category::Harmonizer, 1)],
  }
}

/// `(1-indexed position, required answer, category, bonus)`.
const POSITIONAL_BONUSES: [(usize, u8, Category, u32); 3] = [
  (3, 3, Category::Harmonizer, 2),
  (8, 2, Category::Innovator, 2),
  (5, 1, Category::Harmonizer, 1),
];

/// Score a complete response.
pub fn score(response: &QuizResponse) -> Outcome {
  let mut scores = Scores::default();

  for &answer in response.answers() {
    for (category, points) in weights(answer) {
      scores.add(category, points);
    }
  }

  for (position, required, category, bonus) in POSITIONAL_BONUSES {
    if response.at_position(position) == required {
      scores.add(category, bonus);
    }
  }

  Outcome { category: scores.winner(), scores }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn response(answers: [u8; 10]) -> QuizResponse {
    QuizResponse::new(&answers).unwrap()
  }

  #[test]
  fn all_zeros_is_architect() {
    let out = score(&response([0; 10]));
    assert_eq!(out.scores.get(Category::Architect), 20);
    assert_eq!(out.scores.get(Category::Innovator), 10);
    for c in [
      Category::Visionary,
      Category::Artisan,
      Category::Catalyst,
      Category::Harmonizer,
    ] {
      assert_eq!(out.scores.get(c), 0, "{c}");
    }
    assert_eq!(out.category, Category::Architect);
  }

  #[test]
  fn all_threes_is_catalyst() {
    let out = score(&response([3; 10]));
    assert_eq!(out.scores.get(Category::Catalyst), 20);
    // Position 3 answered 3 earns the harmonizer bonus; position 5 does not.
    assert_eq!(out.scores.get(Category::Harmonizer), 12);
    assert_eq!(out.category, Category::Catalyst);
  }

  #[test]
  fn position_three_bonus_goes_to_harmonizer() {
    let baseline = score(&response([1; 10]));
    assert_eq!(baseline.scores.get(Category::Visionary), 20);
    assert_eq!(baseline.scores.get(Category::Catalyst), 10);
    // Only the position-5 bonus applies to the all-ones baseline.
    assert_eq!(baseline.scores.get(Category::Harmonizer), 1);
    assert_eq!(baseline.category, Category::Visionary);

    let mut answers = [1; 10];
    answers[2] = 3;
    let out = score(&response(answers));
    assert_eq!(out.scores.get(Category::Harmonizer), 4);
    assert_eq!(out.scores.get(Category::Catalyst), 11);
    assert_eq!(out.scores.get(Category::Visionary), 18);
  }

  #[test]
  fn positional_bonus_can_flip_the_winner() {
    // Five 0s then five 2s: architect, artisan and innovator all reach 10,
    // and position 8 answered 2 lifts innovator past the others.
    let mut answers = [0, 0, 0, 0, 0, 2, 2, 2, 2, 2];
    let out = score(&response(answers));
    assert_eq!(out.scores.get(Category::Architect), 10);
    assert_eq!(out.scores.get(Category::Artisan), 10);
    assert_eq!(out.scores.get(Category::Innovator), 12);
    assert_eq!(out.category, Category::Innovator);

    // Moving a 2 off position 8 removes the bonus and architect wins the tie.
    answers.swap(7, 4);
    let out = score(&response(answers));
    assert_eq!(out.scores.get(Category::Innovator), 10);
    assert_eq!(out.category, Category::Architect);
  }

  #[test]
  fn ties_resolve_in_declaration_order() {
    // visionary 10, artisan 10, innovator 7, catalyst 5, harmonizer 1.
    let out = score(&response([1, 2, 1, 2, 1, 2, 1, 2, 1, 2]));
    assert_eq!(out.scores.get(Category::Visionary), 10);
    assert_eq!(out.scores.get(Category::Artisan), 10);
    assert_eq!(out.category, Category::Visionary);
  }

  #[test]
  fn scoring_is_deterministic() {
    let r = response([2, 3, 0, 1, 1, 3, 2, 2, 0, 1]);
    let first = score(&r);
    for _ in 0..100 {
      assert_eq!(score(&r), first);
    }
  }

  #[test]
  fn response_rejects_bad_shapes() {
    assert!(matches!(
      QuizResponse::new(&[0; 9]),
      Err(Error::WrongAnswerCount(9))
    ));
    assert!(matches!(
      QuizResponse::new(&[0, 0, 0, 4, 0, 0, 0, 0, 0, 0]),
      Err(Error::AnswerOutOfRange(4))
    ));
  }

  #[test]
  fn scores_serialize_in_declaration_order() {
    let out = score(&response([0; 10]));
    let json = serde_json::to_string(&out.scores).unwrap();
    assert_eq!(
      json,
      r#"{"architect":20,"visionary":0,"artisan":0,"catalyst":0,"harmonizer":0,"innovator":10}"#
    );
  }
}
