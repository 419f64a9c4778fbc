// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::captcha::{CaptchaSolver, TokenCache};
use crate::catalog::CountryCatalog;
use crate::providers::multitransfer::MultitransferClient;

/// Shared application state handed to every request handler.
///
/// The token cache is the only mutable piece; everything else is
/// immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CountryCatalog>,
    pub tokens: Arc<TokenCache>,
    pub provider: Arc<MultitransferClient>,
    /// Absent when `RUCAPTCHA_KEY` is not configured; solving endpoints
    /// then report an error while the rest of the API stays available.
    pub solver: Option<Arc<CaptchaSolver>>,
}

impl AppState {
    pub fn new(
        catalog: CountryCatalog,
        provider: MultitransferClient,
        solver: Option<CaptchaSolver>,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            tokens: Arc::new(TokenCache::new()),
            provider: Arc::new(provider),
            solver: solver.map(Arc::new),
        }
    }
}
