// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! rucaptcha client for solving the provider's Yandex SmartCaptcha.
//!
//! Solving is a two-call protocol: submit the challenge to `in.php`, then
//! poll `res.php` until a worker produces a token. A solve typically takes
//! tens of seconds, which is why callers run it as a detached task and
//! communicate the result only through the [`TokenCache`](super::TokenCache).

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::{
    env_optional, env_or_default, RUCAPTCHA_BASE_URL_ENV, RUCAPTCHA_KEY_ENV, USER_AGENT,
};

const DEFAULT_BASE_URL: &str = "https://rucaptcha.com";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Poll budget: 24 polls at 5 s each gives workers two minutes to answer.
const DEFAULT_MAX_POLLS: u32 = 24;

/// Site key of the provider's sender-details captcha widget.
pub const YANDEX_SITE_KEY: &str = "ysc1_DAo8nFPdNCMHkAwYxIUJFxW5IIJd3ITGArZehXxO9a0ea6f8";
/// Page the captcha is served on; workers load it to solve in context.
pub const CHALLENGE_PAGE_URL: &str = "https://multitransfer.ru/transfer/tajikistan/sender-details&test=false&webview=false&hideChallengeContainer=false";

#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("solver configuration missing: {0}")]
    MissingConfig(String),

    #[error("solver request failed: {0}")]
    Request(String),

    #[error("solver rejected the task: {0}")]
    Rejected(String),

    #[error("solver did not produce a token within the poll budget")]
    Timeout,
}

/// Client for the rucaptcha HTTP API.
#[derive(Debug, Clone)]
pub struct CaptchaSolver {
    base_url: String,
    api_key: String,
    poll_interval: Duration,
    max_polls: u32,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct RucaptchaResponse {
    status: i64,
    request: String,
}

/// Outcome of one `res.php` poll.
#[derive(Debug, PartialEq, Eq)]
enum PollOutcome {
    Ready(String),
    NotReady,
    Failed(String),
}

fn classify_poll(response: &RucaptchaResponse) -> PollOutcome {
    if response.status == 1 {
        PollOutcome::Ready(response.request.clone())
    } else if response.request == "CAPCHA_NOT_READY" {
        PollOutcome::NotReady
    } else {
        PollOutcome::Failed(response.request.clone())
    }
}

impl CaptchaSolver {
    /// Whether the solver credential is present in the environment.
    pub fn is_configured() -> bool {
        env_optional(RUCAPTCHA_KEY_ENV).is_some()
    }

    pub fn from_env() -> Result<Self, SolverError> {
        let api_key = env_optional(RUCAPTCHA_KEY_ENV)
            .ok_or_else(|| SolverError::MissingConfig(RUCAPTCHA_KEY_ENV.to_string()))?;
        let base_url = env_or_default(RUCAPTCHA_BASE_URL_ENV, DEFAULT_BASE_URL);
        Self::new(base_url, api_key, DEFAULT_POLL_INTERVAL, DEFAULT_MAX_POLLS)
    }

    pub fn new(
        base_url: String,
        api_key: String,
        poll_interval: Duration,
        max_polls: u32,
    ) -> Result<Self, SolverError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SolverError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            api_key,
            poll_interval,
            max_polls,
            http,
        })
    }

    /// Solve the provider's fixed sender-details captcha.
    pub async fn solve_challenge(&self) -> Result<String, SolverError> {
        self.solve(YANDEX_SITE_KEY, CHALLENGE_PAGE_URL).await
    }

    /// Submit a Yandex SmartCaptcha task and poll until a token is ready.
    pub async fn solve(&self, site_key: &str, page_url: &str) -> Result<String, SolverError> {
        let task_id = self.submit(site_key, page_url).await?;
        debug!(task_id = %task_id, "Captcha task submitted, polling for token");

        for _ in 0..self.max_polls {
            tokio::time::sleep(self.poll_interval).await;

            match classify_poll(&self.poll(&task_id).await?) {
                PollOutcome::Ready(token) => return Ok(token),
                PollOutcome::NotReady => continue,
                PollOutcome::Failed(reason) => return Err(SolverError::Rejected(reason)),
            }
        }

        Err(SolverError::Timeout)
    }

    async fn submit(&self, site_key: &str, page_url: &str) -> Result<String, SolverError> {
        let form = [
            ("key", self.api_key.as_str()),
            ("method", "yandex"),
            ("sitekey", site_key),
            ("pageurl", page_url),
            ("invisible", "0"),
            ("userAgent", USER_AGENT),
            ("json", "1"),
        ];

        let response = self
            .http
            .post(format!("{}/in.php", self.base_url.trim_end_matches('/')))
            .form(&form)
            .send()
            .await
            .map_err(|e| SolverError::Request(format!("submit failed: {e}")))?;

        let body: RucaptchaResponse = response
            .json()
            .await
            .map_err(|e| SolverError::Request(format!("invalid submit response: {e}")))?;

        if body.status != 1 {
            return Err(SolverError::Rejected(body.request));
        }
        Ok(body.request)
    }

    async fn poll(&self, task_id: &str) -> Result<RucaptchaResponse, SolverError> {
        self.http
            .get(format!("{}/res.php", self.base_url.trim_end_matches('/')))
            .query(&[
                ("key", self.api_key.as_str()),
                ("action", "get"),
                ("id", task_id),
                ("json", "1"),
            ])
            .send()
            .await
            .map_err(|e| SolverError::Request(format!("poll failed: {e}")))?
            .json()
            .await
            .map_err(|e| SolverError::Request(format!("invalid poll response: {e}")))
    }
}
