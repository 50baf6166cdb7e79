//! Error types for `stamp-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("answer {0} is out of range; options are numbered 0 to 3")]
  AnswerOutOfRange(u8),

  #[error("a quiz response needs exactly 10 answers, got {0}")]
  WrongAnswerCount(usize),

  #[error("please select an answer")]
  NoSelection,

  #[error("already at the first question")]
  AtFirstQuestion,

  #[error("quiz cannot {action} while {state}")]
  InvalidState {
    action: &'static str,
    state:  &'static str,
  },

  #[error("unknown personality type: {0:?}")]
  UnknownCategory(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
