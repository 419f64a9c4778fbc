// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process pool of solved captcha tokens.
//!
//! Tokens are deposited by detached solver tasks and consumed by transfer
//! pipeline runs. The provider accepts each token once and only within a
//! few minutes of issuance, so the cache hands every token to at most one
//! caller and never hands out an expired one.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Provider-side captcha token validity window.
const TOKEN_LIFETIME: Duration = Duration::from_secs(5 * 60);

/// Time-bounded pool of single-use verification tokens.
pub struct TokenCache {
    tokens: Mutex<HashMap<String, Instant>>,
    lifetime: Duration,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::with_lifetime(TOKEN_LIFETIME)
    }

    /// Create a cache with a custom token lifetime.
    pub fn with_lifetime(lifetime: Duration) -> Self {
        Self {
            tokens: Mutex::new(HashMap::new()),
            lifetime,
        }
    }

    /// Insert a freshly solved token, stamped with the current time.
    pub fn deposit(&self, token: String) {
        let mut tokens = self.tokens.lock().expect("token cache lock poisoned");
        tokens.insert(token, Instant::now());
    }

    /// Take one valid token out of the pool.
    ///
    /// Expired entries are swept first; the sweep and the removal of one
    /// surviving entry happen under a single lock guard, so two concurrent
    /// callers can never be handed the same token. Returns `None` when no
    /// valid token remains. Selection among multiple valid tokens is
    /// arbitrary.
    pub fn acquire(&self) -> Option<String> {
        let mut tokens = self.tokens.lock().expect("token cache lock poisoned");
        tokens.retain(|_, issued_at| issued_at.elapsed() <= self.lifetime);

        let token = tokens.keys().next().cloned()?;
        tokens.remove(&token);
        Some(token)
    }

    /// Number of tokens currently pooled (expired ones included until the
    /// next `acquire` sweeps them).
    pub fn len(&self) -> usize {
        self.tokens.lock().expect("token cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}
