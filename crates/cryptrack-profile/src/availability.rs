//! # Username Availability Checker
//!
//! Debounced remote validation of a candidate username.
//!
//! ## Check Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  check("alice")                                                        │
//! │       │                                                                 │
//! │       ├── len < min? ──yes──► publish {available: false,               │
//! │       │                        checking: false}, no remote call        │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  issue token #n, publish {candidate, checking: true}                   │
//! │       │                                                                 │
//! │       ▼  (spawned)                                                      │
//! │  sleep(debounce window)                                                │
//! │       │                                                                 │
//! │       ├── token #n superseded or editor closed ──► drop                │
//! │       ▼                                                                 │
//! │  find_by_username(candidate, exclude = me)                             │
//! │       │                                                                 │
//! │       ├── token #n superseded or editor closed ──► drop response       │
//! │       ▼                                                                 │
//! │  Ok(None)     → available                                              │
//! │  Ok(Some(_))  → taken                                                  │
//! │  Err(_)       → warn!, stop checking, keep previous flag               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Publishing `checking: true` for every new candidate means a result
//! computed for an older candidate can never gate a newer one.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use cryptrack_core::validation::meets_min_length;
use cryptrack_core::UsernameAvailability;

use crate::debounce::{DebounceTokens, Liveness, Token};
use crate::error::ProfileError;
use crate::service::ProfileService;

/// Debounced username availability checker.
///
/// Clones share state; every clone observes and supersedes the same
/// checks.
#[derive(Clone)]
pub struct AvailabilityChecker {
    inner: Arc<CheckerInner>,
}

struct CheckerInner {
    service: Arc<dyn ProfileService>,
    user_id: String,
    window: Duration,
    min_length: usize,
    tokens: DebounceTokens,
    liveness: Liveness,
    state: watch::Sender<UsernameAvailability>,
}

impl AvailabilityChecker {
    /// Creates a checker for `user_id`, whose own record never counts as
    /// a conflict.
    pub fn new(
        service: Arc<dyn ProfileService>,
        user_id: impl Into<String>,
        window: Duration,
        min_length: usize,
        liveness: Liveness,
    ) -> Self {
        let (state, _) = watch::channel(UsernameAvailability::default());
        AvailabilityChecker {
            inner: Arc::new(CheckerInner {
                service,
                user_id: user_id.into(),
                window,
                min_length,
                tokens: DebounceTokens::new(),
                liveness,
                state,
            }),
        }
    }

    /// Schedules a check of `candidate`.
    ///
    /// Returns the handle of the scheduled task, or `None` when the
    /// candidate was rejected locally. Dropping the handle does not cancel
    /// the check.
    pub fn check(&self, candidate: impl Into<String>) -> Option<JoinHandle<()>> {
        let candidate = candidate.into();
        let token = self.inner.tokens.issue();

        if !meets_min_length(&candidate, self.inner.min_length) {
            debug!(candidate = %candidate, "Username too short, skipping remote check");
            self.inner.state.send_replace(UsernameAvailability {
                candidate,
                is_available: false,
                is_checking: false,
            });
            return None;
        }

        // A flag computed for another name never carries over.
        self.inner.state.send_modify(|state| {
            if state.candidate != candidate {
                state.candidate = candidate.clone();
                state.is_available = false;
            }
            state.is_checking = true;
        });

        let inner = Arc::clone(&self.inner);
        Some(tokio::spawn(async move {
            inner.run_check(token, candidate).await;
        }))
    }

    /// Replaces the published state and supersedes pending checks.
    ///
    /// Used when the draft is (re)loaded from a record the user already
    /// owns.
    pub fn reset(&self, state: UsernameAvailability) {
        self.inner.tokens.invalidate();
        self.inner.state.send_replace(state);
    }

    /// Returns a snapshot of the current state.
    pub fn current(&self) -> UsernameAvailability {
        self.inner.state.borrow().clone()
    }

    /// Returns a receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<UsernameAvailability> {
        self.inner.state.subscribe()
    }

    /// Minimum accepted username length.
    pub fn min_length(&self) -> usize {
        self.inner.min_length
    }
}

impl CheckerInner {
    async fn run_check(&self, token: Token, candidate: String) {
        tokio::time::sleep(self.window).await;

        if !self.is_current(token) {
            debug!(candidate = %candidate, token = token.sequence(), "Check superseded before sending");
            return;
        }

        debug!(candidate = %candidate, token = token.sequence(), "Checking username availability");
        let result = self
            .service
            .find_by_username(&candidate, &self.user_id)
            .await;

        // Token and liveness are re-checked under the watch lock so a newer
        // check() cannot publish between the test and the write.
        self.state.send_if_modified(|state| {
            if !self.is_current(token) {
                debug!(candidate = %candidate, token = token.sequence(), "Discarding stale availability response");
                return false;
            }

            match &result {
                Ok(existing) => {
                    state.candidate = candidate.clone();
                    state.is_available = existing.is_none();
                    state.is_checking = false;
                    debug!(candidate = %candidate, available = state.is_available, "Username checked");
                }
                Err(e) => {
                    // is_available still belongs to `candidate` (or is false)
                    let err = ProfileError::AvailabilityCheck(e.clone());
                    warn!(candidate = %candidate, error = %err, "Availability check failed");
                    state.is_checking = false;
                }
            }
            true
        });
    }

    fn is_current(&self, token: Token) -> bool {
        self.liveness.is_alive() && self.tokens.is_latest(token)
    }
}
