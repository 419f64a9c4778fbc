// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer API: country listing, captcha solving trigger, transfer creation.

use axum::{extract::Query, extract::State, Json};
use serde_json::Value;
use tracing::{debug, error};

use crate::{
    error::ApiError,
    models::{Country, SolveCaptchaResponse, TransferRequest},
    pipeline,
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/transfer/countries_and_currencies",
    tag = "Transfer",
    responses((status = 200, body = [Country]))
)]
pub async fn countries_and_currencies(State(state): State<AppState>) -> Json<Vec<Country>> {
    let countries = state
        .catalog
        .list_public()
        .map(|entry| Country {
            country_code: entry.code.clone(),
            country: entry.name.clone(),
            currency: entry.currency.clone(),
        })
        .collect();
    Json(countries)
}

/// Trigger a captcha solve and return immediately.
///
/// The solve runs as a detached task; its only output channel is the
/// token cache. A solve failure is logged and never surfaced to the
/// caller that triggered it.
#[utoipa::path(
    post,
    path = "/api/transfer/solve_captcha",
    tag = "Transfer",
    responses(
        (status = 200, body = SolveCaptchaResponse),
        (status = 500, description = "Solver not configured")
    )
)]
pub async fn solve_captcha(
    State(state): State<AppState>,
) -> Result<Json<SolveCaptchaResponse>, ApiError> {
    let solver = state
        .solver
        .clone()
        .ok_or_else(|| ApiError::internal("captcha solver is not configured (RUCAPTCHA_KEY)"))?;
    let tokens = state.tokens.clone();

    tokio::spawn(async move {
        match solver.solve_challenge().await {
            Ok(token) => {
                tokens.deposit(token);
                debug!(queue_size = tokens.len(), "Captcha token added in background");
            }
            Err(e) => {
                error!(error = %e, "Failed to solve captcha in background");
            }
        }
    });

    Ok(Json(SolveCaptchaResponse {
        message: "Captcha solving started in background".to_string(),
        queue_size: state.tokens.len(),
    }))
}

/// Run the full transfer pipeline and return the provider's confirmation
/// payload verbatim.
#[utoipa::path(
    post,
    path = "/api/transfer/create",
    params(TransferRequest),
    tag = "Transfer",
    responses(
        (status = 200, description = "Provider confirmation payload"),
        (status = 400, description = "Invalid amount or no captcha token available"),
        (status = 502, description = "Provider response missing an expected field")
    )
)]
pub async fn create_transfer(
    State(state): State<AppState>,
    Query(request): Query<TransferRequest>,
) -> Result<Json<Value>, ApiError> {
    if !request.amount.is_finite() || request.amount <= 0.0 {
        return Err(ApiError::bad_request("amount must be greater than zero"));
    }

    let confirmation = pipeline::run_transfer(&state.provider, &state.tokens, &request).await?;
    Ok(Json(confirmation))
}
