// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer pipeline: quote → token → create → confirm.
//!
//! Each run owns its own state (commission id, transfer id); nothing is
//! shared across concurrent runs except the token cache. A failed step
//! aborts the run without compensating for earlier steps: a created but
//! unconfirmed transfer is the provider's problem to expire, and no step
//! is ever retried by re-running an earlier one.

use serde_json::Value;
use tracing::debug;

use crate::captcha::TokenCache;
use crate::error::ApiError;
use crate::models::TransferRequest;
use crate::providers::multitransfer::MultitransferClient;

/// Run the three-step transfer flow end to end.
///
/// Token acquisition happens between quote and create and never solves
/// synchronously; when the pool is dry the caller gets a 400 telling them
/// to trigger solving first.
pub async fn run_transfer(
    provider: &MultitransferClient,
    tokens: &TokenCache,
    request: &TransferRequest,
) -> Result<Value, ApiError> {
    let commission_id = provider.quote(request).await?;
    debug!(commission_id = %commission_id, "Using commission");

    let token = tokens.acquire().ok_or_else(|| {
        ApiError::bad_request("no captcha tokens available; call /solve_captcha first")
    })?;
    debug!(remaining = tokens.len(), "Using captcha token");

    let transfer_id = provider.create(request, &commission_id, &token).await?;
    debug!(transfer_id = %transfer_id, "Created transfer");

    let confirmation = provider.confirm(&transfer_id).await?;
    Ok(confirmation)
}
