//! In-memory quiz sessions, one [`QuizEngine`] per user.
//!
//! A session ends when its quiz is scored and saved or its record turns out
//! to be missing. Abandoned sessions are evicted once idle for longer than
//! [`IDLE_TIMEOUT`], and the map never holds more than [`MAX_SESSIONS`]
//! entries; the least recently touched one makes room for a new user.

use std::{
  collections::HashMap,
  sync::{
    Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
  },
  time::{Duration, Instant},
};

use stamp_core::{quiz::QuizEngine, user::UserId};

pub const IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

pub const MAX_SESSIONS: usize = 10_000;

#[derive(Debug)]
struct Entry {
  engine:  QuizEngine,
  touched: Instant,
  /// Recency rank; higher was touched later.
  rank:    u64,
}

/// Quiz progress by user. The lock is only taken inside the synchronous
/// closures passed to [`Sessions::with`], never across an await.
#[derive(Debug)]
pub struct Sessions {
  inner:        Mutex<HashMap<UserId, Entry>>,
  idle_timeout: Duration,
  capacity:     usize,
  clock:        AtomicU64,
}

impl Default for Sessions {
  fn default() -> Self { Self::with_limits(IDLE_TIMEOUT, MAX_SESSIONS) }
}

impl Sessions {
  pub fn with_limits(idle_timeout: Duration, capacity: usize) -> Self {
    Self {
      inner: Mutex::default(),
      idle_timeout,
      capacity: capacity.max(1),
      clock: AtomicU64::new(0),
    }
  }

  /// Run `f` against the user's engine, starting a fresh one if needed.
  pub fn with<T>(&self, id: &UserId, f: impl FnOnce(&mut QuizEngine) -> T) -> T {
    let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
    let now = Instant::now();
    let rank = self.clock.fetch_add(1, Ordering::Relaxed);
    map.retain(|_, entry| now.duration_since(entry.touched) < self.idle_timeout);

    if !map.contains_key(id) && map.len() >= self.capacity {
      let oldest = map
        .iter()
        .min_by_key(|(_, entry)| entry.rank)
        .map(|(key, _)| key.clone());
      if let Some(oldest) = oldest {
        map.remove(&oldest);
      }
    }

    let entry = map.entry(id.clone()).or_insert_with(|| Entry {
      engine:  QuizEngine::new(),
      touched: now,
      rank,
    });
    entry.touched = now;
    entry.rank = rank;
    f(&mut entry.engine)
  }

  pub fn remove(&self, id: &UserId) {
    self
      .inner
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .remove(id);
  }

  pub fn contains(&self, id: &UserId) -> bool {
    self
      .inner
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .contains_key(id)
  }

  pub fn len(&self) -> usize {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

#[cfg(test)]
mod tests {
  use stamp_core::quiz::QuizState;

  use super::*;

  fn id(n: u32) -> UserId { UserId::new(format!("local-{n}")) }

  #[test]
  fn progress_is_kept_between_calls() {
    let sessions = Sessions::default();
    sessions.with(&id(1), |engine| engine.select(2)).unwrap();
    let state = sessions.with(&id(1), |engine| engine.state());
    assert_eq!(state, QuizState::Asking { index: 0, pending: Some(2) });
  }

  #[test]
  fn idle_sessions_are_evicted() {
    let sessions = Sessions::with_limits(Duration::ZERO, MAX_SESSIONS);
    sessions.with(&id(1), |engine| engine.select(2)).unwrap();

    // The next call sweeps the idle entry and starts over.
    let state = sessions.with(&id(1), |engine| engine.state());
    assert_eq!(state, QuizState::Asking { index: 0, pending: None });
    assert_eq!(sessions.len(), 1);
  }

  #[test]
  fn capacity_drops_the_least_recently_touched() {
    let sessions = Sessions::with_limits(IDLE_TIMEOUT, 2);
    sessions.with(&id(1), |_| ());
    sessions.with(&id(2), |_| ());
    // Touch 1 again so 2 is now the oldest.
    sessions.with(&id(1), |_| ());
    sessions.with(&id(3), |_| ());

    assert_eq!(sessions.len(), 2);
    assert!(sessions.contains(&id(1)));
    assert!(!sessions.contains(&id(2)));
    assert!(sessions.contains(&id(3)));
  }

  #[test]
  fn removed_sessions_start_over() {
    let sessions = Sessions::default();
    sessions.with(&id(1), |engine| engine.select(1)).unwrap();
    sessions.remove(&id(1));
    assert!(sessions.is_empty());
  }
}
