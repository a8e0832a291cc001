//! # Debounce Tokens and Liveness
//!
//! Two small primitives that keep asynchronous results from landing in
//! the wrong place.
//!
//! ## Tokens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  keystroke "al"    issue() → #1 ──┐                                    │
//! │  keystroke "ali"   issue() → #2 ──┼─ #1 wakes: is_latest(#1)? no → drop │
//! │  keystroke "alic"  issue() → #3 ──┘  #2 wakes: no → drop               │
//! │                                      #3 wakes: yes → remote call        │
//! │                                      #3 response: is_latest(#3)? apply  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A token is checked twice: after the quiet window (should the call go
//! out at all) and when the response arrives (is it still wanted).
//!
//! ## Liveness
//! One flag per editor session. It turns off on close and stays off, so
//! any task finishing afterwards leaves state alone.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Identifies one scheduled check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(u64);

impl Token {
    /// Sequence number of this token.
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Monotonic token source. Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct DebounceTokens {
    latest: Arc<AtomicU64>,
}

impl DebounceTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new token, superseding every token issued before it.
    pub fn issue(&self) -> Token {
        Token(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Returns true if no newer token has been issued.
    pub fn is_latest(&self, token: Token) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    /// Supersedes every outstanding token without scheduling anything.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

/// Per-session liveness flag. Clones share the same flag.
#[derive(Debug, Clone)]
pub struct Liveness {
    alive: Arc<AtomicBool>,
}

impl Liveness {
    /// Creates a live flag.
    pub fn new() -> Self {
        Liveness {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Turns the flag off. There is no way back on.
    pub fn shutdown(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}
