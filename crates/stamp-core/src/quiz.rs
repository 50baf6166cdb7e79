//! The fixed question bank and the quiz state machine.
//!
//! A [`QuizEngine`] walks one user through the ten questions. Each question
//! needs a pending selection before the engine advances; stepping back pops
//! the last recorded answer and restores it as the pending selection, so an
//! answer is never counted twice.

use serde::Serialize;

use crate::{
  Error, Result,
  scoring::{self, OPTION_COUNT, Outcome, QUESTION_COUNT, QuizResponse},
};

// ─── Question bank ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Question {
  /// 1-based question number.
  pub id:      u8,
  pub text:    &'static str,
  pub options: [&'static str; OPTION_COUNT as usize],
}

pub static QUESTIONS: [Question; QUESTION_COUNT] = [
  Question {
    id:      1,
    text:    "When starting a new project, you prefer to:",
    options: [
      "Plan everything in detail before starting",
      "Dive in and figure it out as you go",
      "Gather inspiration from various sources first",
      "Collaborate with others to brainstorm ideas",
    ],
  },
  Question {
    id:      2,
    text:    "Your workspace is usually:",
    options: [
      "Organized and minimalist",
      "Creative chaos with inspiration everywhere",
      "Functional and practical",
      "Constantly evolving and changing",
    ],
  },
  Question {
    id:      3,
    text:    "When solving a problem, you tend to:",
    options: [
      "Use logical analysis and data",
      "Trust your intuition and feelings",
      "Look for innovative and unconventional solutions",
      "Consider how it affects people involved",
    ],
  },
  Question {
    id:      4,
    text:    "Your ideal creative process involves:",
    options: [
      "Following a structured methodology",
      "Experimenting freely without constraints",
      "Iterating and refining constantly",
      "Working in bursts of intense inspiration",
    ],
  },
  Question {
    id:      5,
    text:    "When receiving feedback, you:",
    options: [
      "Appreciate detailed, constructive criticism",
      "Prefer positive reinforcement and encouragement",
      "Want honest, direct opinions",
      "Like to discuss and debate different perspectives",
    ],
  },
  Question {
    id:      6,
    text:    "Your approach to deadlines is:",
    options: [
      "Complete tasks well in advance",
      "Work best under pressure at the last minute",
      "Maintain steady progress throughout",
      "Flexible, depends on the project",
    ],
  },
  Question {
    id:      7,
    text:    "When learning something new, you prefer:",
    options: [
      "Step-by-step tutorials and guides",
      "Hands-on experimentation",
      "Understanding the big picture first",
      "Learning from others' experiences",
    ],
  },
  Question {
    id:      8,
    text:    "Your creative inspiration comes from:",
    options: [
      "Nature and the physical world",
      "Emotions and human experiences",
      "Technology and innovation",
      "Art, culture, and history",
    ],
  },
  Question {
    id:      9,
    text:    "In a team setting, you usually:",
    options: [
      "Take charge and lead the project",
      "Support others and help execute ideas",
      "Generate creative concepts and ideas",
      "Ensure everything stays organized",
    ],
  },
  Question {
    id:      10,
    text:    "Your definition of success in a creative project is:",
    options: [
      "Achieving the planned objectives efficiently",
      "Creating something emotionally impactful",
      "Pushing boundaries and innovating",
      "Making something useful and functional",
    ],
  },
];

// ─── State machine ───────────────────────────────────────────────────────────

/// Where a quiz run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QuizState {
  /// Showing question `index` (0-based) with an optional pending selection.
  Asking { index: usize, pending: Option<u8> },
  /// All answers recorded; waiting for [`QuizEngine::finish`].
  Scoring,
  /// Terminal: the run has been scored.
  ShowingResult { outcome: Outcome },
}

impl QuizState {
  fn name(&self) -> &'static str {
    match self {
      QuizState::Asking { .. } => "asking a question",
      QuizState::Scoring => "scoring",
      QuizState::ShowingResult { .. } => "showing the result",
    }
  }
}

/// What [`QuizEngine::advance`] moved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
  /// The next question, by 0-based index.
  Question(usize),
  /// The last question was answered; the engine is now in
  /// [`QuizState::Scoring`].
  Complete(QuizResponse),
}

/// One user's pass through the quiz.
///
/// While asking question `i`, exactly `i` answers are recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizEngine {
  state:   QuizState,
  answers: Vec<u8>,
}

impl Default for QuizEngine {
  fn default() -> Self { Self::new() }
}

impl QuizEngine {
  pub fn new() -> Self {
    Self {
      state:   QuizState::Asking { index: 0, pending: None },
      answers: Vec::with_capacity(QUESTION_COUNT),
    }
  }

  pub fn state(&self) -> QuizState { self.state }

  pub fn answers(&self) -> &[u8] { &self.answers }

  /// The question currently on screen, if the engine is asking one.
  pub fn current_question(&self) -> Option<&'static Question> {
    match self.state {
      QuizState::Asking { index, .. } => QUESTIONS.get(index),
      _ => None,
    }
  }

  fn invalid(&self, action: &'static str) -> Error {
    Error::InvalidState { action, state: self.state.name() }
  }

  /// Set the pending selection for the current question.
  pub fn select(&mut self, option: u8) -> Result<()> {
    let QuizState::Asking { index, .. } = self.state else {
      return Err(self.invalid("select an answer"));
    };
    if option >= OPTION_COUNT {
      return Err(Error::AnswerOutOfRange(option));
    }
    self.state = QuizState::Asking { index, pending: Some(option) };
    Ok(())
  }

  /// Record the pending selection and move forward.
  pub fn advance(&mut self) -> Result<Step> {
    let QuizState::Asking { index, pending } = self.state else {
      return Err(self.invalid("advance"));
    };
    let answer = pending.ok_or(Error::NoSelection)?;
    self.answers.push(answer);

    if index + 1 < QUESTION_COUNT {
      self.state = QuizState::Asking { index: index + 1, pending: None };
      Ok(Step::Question(index + 1))
    } else {
      let response = QuizResponse::new(&self.answers)?;
      self.state = QuizState::Scoring;
      Ok(Step::Complete(response))
    }
  }

  /// Step back one question, restoring its answer as the pending selection.
  pub fn previous(&mut self) -> Result<()> {
    let QuizState::Asking { index, .. } = self.state else {
      return Err(self.invalid("go back"));
    };
    if index == 0 {
      return Err(Error::AtFirstQuestion);
    }
    let restored = self.answers.pop();
    self.state = QuizState::Asking { index: index - 1, pending: restored };
    Ok(())
  }

  /// Score the recorded answers and enter the terminal state. Valid only in
  /// [`QuizState::Scoring`], so a run is scored exactly once.
  pub fn finish(&mut self) -> Result<Outcome> {
    if self.state != QuizState::Scoring {
      return Err(self.invalid("score"));
    }
    let response = QuizResponse::new(&self.answers)?;
    let outcome = scoring::score(&response);
    self.state = QuizState::ShowingResult { outcome };
    Ok(outcome)
  }
}
