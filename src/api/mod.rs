// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{Country, SolveCaptchaResponse, TransferRequest},
    state::AppState,
};

pub mod health;
pub mod transfer;

pub fn router(state: AppState) -> Router {
    let transfer_routes = Router::new()
        .route(
            "/countries_and_currencies",
            get(transfer::countries_and_currencies),
        )
        .route("/solve_captcha", post(transfer::solve_captcha))
        .route("/create", post(transfer::create_transfer));

    Router::new()
        .nest("/api/transfer", transfer_routes)
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        transfer::countries_and_currencies,
        transfer::solve_captcha,
        transfer::create_transfer,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Country,
            SolveCaptchaResponse,
            TransferRequest,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "Transfer", description = "Anonymous transfer automation"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
