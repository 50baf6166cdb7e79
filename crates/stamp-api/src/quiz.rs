//! Handlers for `/api/quiz` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/quiz/{id}` | Current question, or the stored result |
//! | `POST` | `/api/quiz/{id}/select` | Body: `{"option":2}` |
//! | `POST` | `/api/quiz/{id}/next` | Records the selection; scores after question 10 |
//! | `POST` | `/api/quiz/{id}/previous` | Restores the previous answer as the selection |
//!
//! Every route first loads the record: unknown users get a 404 pointing back
//! to intake, and users who already have a personality type get their result
//! (or a 409 for mutations).

use axum::{
  Json,
  extract::{Path, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use stamp_core::{
  personality::Profile,
  quiz::{QUESTIONS, Question, QuizEngine, QuizState, Step},
  scoring::{Outcome, QUESTION_COUNT, QuizResponse, Scores},
  store::{PersonalityUpdate, QuizResult, RecordStore},
  user::{UserId, UserRecord},
};
use tracing::{info, warn};

use crate::{AppState, error::ApiError};

// ─── Views ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Progress {
  /// 1-based number of the question on screen.
  pub current: usize,
  pub total:   usize,
}

#[derive(Debug, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum QuizView {
  Question {
    user_id:     UserId,
    progress:    Progress,
    question:    &'static Question,
    selected:    Option<u8>,
    can_go_back: bool,
  },
  /// Scored, but the type has not been saved yet; `next` retries the save.
  Unsaved {
    user_id:     UserId,
    personality: Option<&'static Profile>,
    scores:      Option<Scores>,
    next:        Option<String>,
  },
  Result {
    user_id:     UserId,
    personality: &'static Profile,
    /// Only known right after scoring; stored results carry the type alone.
    scores:      Option<Scores>,
    next:        String,
  },
}

impl QuizView {
  fn of_engine(user_id: UserId, engine: &QuizEngine) -> Self {
    match engine.state() {
      QuizState::Asking { index, pending } => QuizView::Question {
        user_id,
        progress: Progress { current: index + 1, total: QUESTION_COUNT },
        question: &QUESTIONS[index],
        selected: pending,
        can_go_back: index > 0,
      },
      // `advance` and `finish` run under one lock, so `Scoring` is never
      // observed from outside.
      QuizState::Scoring => QuizView::Unsaved {
        user_id,
        personality: None,
        scores: None,
        next: None,
      },
      QuizState::ShowingResult { outcome } => Self::unsaved(user_id, outcome),
    }
  }

  fn unsaved(user_id: UserId, outcome: Outcome) -> Self {
    QuizView::Unsaved {
      next: Some(digital_id_link(&user_id)),
      user_id,
      personality: Some(outcome.category.profile()),
      scores: Some(outcome.scores),
    }
  }

  fn result(record: &UserRecord, scores: Option<Scores>) -> Self {
    QuizView::Result {
      user_id: record.id.clone(),
      personality: record.category().profile(),
      scores,
      next: digital_id_link(&record.id),
    }
  }
}

fn digital_id_link(id: &UserId) -> String { format!("/digital-id?userId={id}") }

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Load the record behind a quiz route.
async fn load<S: RecordStore>(
  state: &AppState<S>,
  id: &UserId,
) -> Result<UserRecord, ApiError> {
  match state
    .store
    .get_record(id.clone())
    .await
    .map_err(ApiError::store)?
  {
    Some(record) => Ok(record),
    None => {
      state.sessions.remove(id);
      Err(ApiError::quiz_user_not_found(id))
    }
  }
}

/// Load a record that may still take answers.
async fn load_unscored<S: RecordStore>(
  state: &AppState<S>,
  id: &UserId,
) -> Result<(), ApiError> {
  let record = load(state, id).await?;
  if record.is_scored() {
    state.sessions.remove(id);
    return Err(ApiError::AlreadyScored(record.id));
  }
  Ok(())
}

// ─── View ────────────────────────────────────────────────────────────────────

/// `GET /api/quiz/{id}`
pub async fn view<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<QuizView>, ApiError> {
  let id = UserId::new(id);
  let record = load(&state, &id).await?;
  if record.is_scored() {
    return Ok(Json(QuizView::result(&record, None)));
  }
  let view = state
    .sessions
    .with(&id, |engine| QuizView::of_engine(id.clone(), engine));
  Ok(Json(view))
}

// ─── Select ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SelectBody {
  pub option: u8,
}

/// `POST /api/quiz/{id}/select`, body: `{"option":2}`
pub async fn select<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  Json(body): Json<SelectBody>,
) -> Result<Json<QuizView>, ApiError> {
  let id = UserId::new(id);
  load_unscored(&state, &id).await?;
  let view = state.sessions.with(&id, |engine| {
    engine.select(body.option)?;
    Ok::<_, ApiError>(QuizView::of_engine(id.clone(), engine))
  })?;
  Ok(Json(view))
}

// ─── Previous ────────────────────────────────────────────────────────────────

/// `POST /api/quiz/{id}/previous`
pub async fn previous<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<QuizView>, ApiError> {
  let id = UserId::new(id);
  load_unscored(&state, &id).await?;
  let view = state.sessions.with(&id, |engine| {
    engine.previous()?;
    Ok::<_, ApiError>(QuizView::of_engine(id.clone(), engine))
  })?;
  Ok(Json(view))
}

// ─── Next ────────────────────────────────────────────────────────────────────

enum Advanced {
  Question(QuizView),
  Finished(Outcome, QuizResponse),
}

/// `POST /api/quiz/{id}/next`
///
/// After the tenth answer the run is scored and the type is saved. The result
/// is shown either way; if saving fails the session keeps its outcome and
/// calling `next` again retries.
pub async fn next<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<QuizView>, ApiError> {
  let id = UserId::new(id);
  load_unscored(&state, &id).await?;

  let advanced = state.sessions.with(&id, |engine| {
    if let QuizState::ShowingResult { outcome } = engine.state() {
      let response = QuizResponse::new(engine.answers())?;
      return Ok::<_, ApiError>(Advanced::Finished(outcome, response));
    }
    match engine.advance()? {
      Step::Question(_) => {
        Ok(Advanced::Question(QuizView::of_engine(id.clone(), engine)))
      }
      Step::Complete(response) => {
        Ok(Advanced::Finished(engine.finish()?, response))
      }
    }
  })?;

  match advanced {
    Advanced::Question(view) => Ok(Json(view)),
    Advanced::Finished(outcome, answers) => {
      save(&state, id, outcome, answers).await.map(Json)
    }
  }
}

/// Persist a scored run: the type on the record first, then the quiz result
/// on a best-effort basis. A failed type save still shows the outcome.
async fn save<S: RecordStore>(
  state: &AppState<S>,
  id: UserId,
  outcome: Outcome,
  answers: QuizResponse,
) -> Result<QuizView, ApiError> {
  let update = match state.store.set_personality(id.clone(), outcome.category).await {
    Ok(update) => update,
    Err(e) => {
      warn!(%id, error = %e, "could not save personality type");
      return Ok(QuizView::unsaved(id, outcome));
    }
  };
  state.sessions.remove(&id);

  let record = match update {
    PersonalityUpdate::Assigned(record) => record,
    PersonalityUpdate::AlreadyAssigned(record) => {
      return Err(ApiError::AlreadyScored(record.id));
    }
    PersonalityUpdate::NotFound => return Err(ApiError::quiz_user_not_found(&id)),
  };
  info!(%id, category = %outcome.category, "personality assigned");

  let result = QuizResult {
    user_id: id.clone(),
    personality_type: outcome.category,
    answers,
    created_at: Utc::now(),
  };
  if let Err(e) = state.store.insert_quiz_result(result).await {
    warn!(%id, error = %e, "could not save quiz result");
  }

  Ok(QuizView::result(&record, Some(outcome.scores)))
}
