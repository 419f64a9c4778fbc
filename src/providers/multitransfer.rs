// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! multitransfer.ru private API client.
//!
//! The provider exposes three anonymous-transfer endpoints: commission
//! quote, transfer creation and confirmation. Field names, nesting and
//! header names form an opaque wire contract and must match the web
//! client byte for byte, so payloads are built with `serde_json::json!`
//! rather than typed structs.
//!
//! Every outbound call goes through [`MultitransferClient::post_with_retries`],
//! which retries with a fixed delay. The delay is deliberately constant,
//! not exponential: the flow is gated on human captcha verification, so
//! hammering the provider faster would not help, and the web client the
//! gateway impersonates behaves the same way.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::error;
use uuid::Uuid;

use crate::config::{env_or_default, MULTITRANSFER_BASE_URL_ENV, USER_AGENT};
use crate::models::TransferRequest;

const DEFAULT_BASE_URL: &str = "https://api.multitransfer.ru";

const QUOTE_PATH: &str = "/anonymous/multi/multitransfer-fee-calc/v3/commissions";
const CREATE_PATH: &str =
    "/anonymous/multi/multitransfer-transfer-create/v3/anonymous/transfers/create";
const CONFIRM_PATH: &str = "/anonymous/multi/multitransfer-qr-processing/v3/anonymous/confirm";

/// Client identifier the provider expects from its own web frontend.
const CLIENT_ID: &str = "multitransfer-web-id";

/// Header carrying the solved captcha token; sent on the create call only.
pub const TOKEN_HEADER: &str = "fhptokenid";

/// Source currency of every transfer; the operator settles in RUB.
const SOURCE_CURRENCY: &str = "RUB";

/// Issuing country for sender identification documents.
const DOCUMENT_COUNTRY: &str = "RUS";

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(2500);

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("provider request failed: {0}")]
    Transport(String),

    #[error("provider response missing field: {0}")]
    MissingField(&'static str),
}

/// Client for the provider's anonymous transfer API.
#[derive(Debug, Clone)]
pub struct MultitransferClient {
    base_url: String,
    max_attempts: u32,
    retry_delay: Duration,
    http: Client,
}

impl MultitransferClient {
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::new(
            env_or_default(MULTITRANSFER_BASE_URL_ENV, DEFAULT_BASE_URL),
            DEFAULT_MAX_ATTEMPTS,
            DEFAULT_RETRY_DELAY,
        )
    }

    pub fn new(
        base_url: String,
        max_attempts: u32,
        retry_delay: Duration,
    ) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ProviderError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            max_attempts,
            retry_delay,
            http,
        })
    }

    /// Fetch a commission quote and return the first offered commission id.
    pub async fn quote(&self, request: &TransferRequest) -> Result<String, ProviderError> {
        let payload = build_quote_payload(request);
        let response = self.post_with_retries(QUOTE_PATH, &payload, None).await?;
        extract_commission_id(&response)
    }

    /// Create the transfer and return the provider-assigned transfer id.
    ///
    /// The captcha token rides along as the `fhptokenid` header on this
    /// call only; the other two calls are not verification-gated.
    pub async fn create(
        &self,
        request: &TransferRequest,
        commission_id: &str,
        captcha_token: &str,
    ) -> Result<String, ProviderError> {
        let payload = build_create_payload(request, commission_id);
        let response = self
            .post_with_retries(CREATE_PATH, &payload, Some(captcha_token))
            .await?;
        extract_transfer_id(&response)
    }

    /// Confirm the created transfer. The decoded response is returned
    /// verbatim; it becomes the pipeline's result.
    pub async fn confirm(&self, transfer_id: &str) -> Result<Value, ProviderError> {
        let payload = build_confirm_payload(transfer_id);
        self.post_with_retries(CONFIRM_PATH, &payload, None).await
    }

    /// POST a payload with bounded retries and a fixed inter-attempt delay.
    ///
    /// A 200/201 response short-circuits remaining attempts. Anything else
    /// is classified (upstream status + raw body, or transport error),
    /// logged with its attempt number, and retried after `retry_delay`.
    /// After the last attempt the most recent classified failure is raised.
    pub async fn post_with_retries(
        &self,
        path: &str,
        payload: &Value,
        captcha_token: Option<&str>,
    ) -> Result<Value, ProviderError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);

        let mut last_error = ProviderError::Transport("no attempts were made".to_string());
        for attempt in 1..=self.max_attempts {
            match self.attempt_post(&url, payload, captcha_token).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    error!(
                        attempt,
                        max_attempts = self.max_attempts,
                        url = %url,
                        error = %e,
                        "Provider call failed"
                    );
                    last_error = e;
                }
            }
            if attempt < self.max_attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }
        Err(last_error)
    }

    async fn attempt_post(
        &self,
        url: &str,
        payload: &Value,
        captcha_token: Option<&str>,
    ) -> Result<Value, ProviderError> {
        // Correlation headers identify one provider-visible attempt, so
        // they are regenerated for every attempt, never reused.
        let mut request = self
            .http
            .post(url)
            .json(payload)
            .header("client-id", CLIENT_ID)
            .header("Accept", "application/json, text/plain, */*")
            .header("User-Agent", USER_AGENT)
            .header("fhprequestid", Uuid::new_v4().to_string())
            .header("fhpsessionid", Uuid::new_v4().to_string())
            .header("x-request-id", Uuid::new_v4().to_string());
        if let Some(token) = captcha_token {
            request = request.header(TOKEN_HEADER, token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Transport(format!("POST {url} failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::OK || status == StatusCode::CREATED {
            response
                .json()
                .await
                .map_err(|e| ProviderError::Transport(format!("POST {url} invalid JSON: {e}")))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ProviderError::Upstream {
                status: status.as_u16(),
                body,
            })
        }
    }
}

pub fn build_quote_payload(request: &TransferRequest) -> Value {
    json!({
        "countryCode": request.country_code,
        "range": "ALL_PLUS_LIMITS",
        "money": {
            "acceptedMoney": {
                "amount": request.amount,
                "currencyCode": SOURCE_CURRENCY
            },
            "withdrawMoney": {
                "currencyCode": request.currency_to
            }
        }
    })
}

pub fn build_create_payload(request: &TransferRequest, commission_id: &str) -> Value {
    json!({
        "beneficiary": {
            "lastName": request.beneficiary_last_name,
            "firstName": request.beneficiary_first_name
        },
        "transfer": {
            "beneficiaryAccountNumber": request.account_number,
            "commissionId": commission_id,
            "paymentInstrument": {"type": "ANONYMOUS_CARD"}
        },
        "sender": {
            "lastName": request.sender_last_name,
            "firstName": request.sender_first_name,
            "middleName": request.sender_middle_name,
            "birthDate": request.sender_birth_date,
            "phoneNumber": request.sender_phone,
            "documents": [{
                "type": request.doc_type,
                "number": request.doc_number,
                "series": request.doc_series,
                "issueDate": request.doc_issue_date,
                "countryCode": DOCUMENT_COUNTRY
            }]
        }
    })
}

pub fn build_confirm_payload(transfer_id: &str) -> Value {
    json!({
        "transactionId": transfer_id,
        "recordType": "transfer"
    })
}

pub fn extract_commission_id(response: &Value) -> Result<String, ProviderError> {
    response
        .pointer("/fees/0/commissions/0/commissionId")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ProviderError::MissingField(
            "fees[0].commissions[0].commissionId",
        ))
}

pub fn extract_transfer_id(response: &Value) -> Result<String, ProviderError> {
    response
        .get("transferId")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ProviderError::MissingField("transferId"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::State,
        http::{HeaderMap, StatusCode},
        routing::post,
        Router,
    };
    use std::sync::{Arc, Mutex};

    #[test]
    fn quote_payload_matches_wire_contract() {
        let request = TransferRequest::default();
        let payload = build_quote_payload(&request);
        assert_eq!(
            payload,
            json!({
                "countryCode": "TJK",
                "range": "ALL_PLUS_LIMITS",
                "money": {
                    "acceptedMoney": {"amount": 10000.0, "currencyCode": "RUB"},
                    "withdrawMoney": {"currencyCode": "TJS"}
                }
            })
        );
    }

    #[test]
    fn create_payload_matches_wire_contract() {
        let request = TransferRequest::default();
        let payload = build_create_payload(&request, "c1");
        assert_eq!(
            payload.pointer("/transfer/commissionId").and_then(Value::as_str),
            Some("c1")
        );
        assert_eq!(
            payload
                .pointer("/transfer/paymentInstrument/type")
                .and_then(Value::as_str),
            Some("ANONYMOUS_CARD")
        );
        assert_eq!(
            payload
                .pointer("/transfer/beneficiaryAccountNumber")
                .and_then(Value::as_str),
            Some("2200700164833154")
        );
        assert_eq!(
            payload.pointer("/sender/lastName").and_then(Value::as_str),
            Some("Петров")
        );
        assert_eq!(
            payload
                .pointer("/sender/documents/0/countryCode")
                .and_then(Value::as_str),
            Some("RUS")
        );
    }

    #[test]
    fn confirm_payload_matches_wire_contract() {
        assert_eq!(
            build_confirm_payload("t1"),
            json!({"transactionId": "t1", "recordType": "transfer"})
        );
    }

    #[test]
    fn commission_id_extraction() {
        let response = json!({"fees": [{"commissions": [{"commissionId": "c1"}]}]});
        assert_eq!(extract_commission_id(&response).unwrap(), "c1");

        let empty = json!({"fees": []});
        assert!(matches!(
            extract_commission_id(&empty),
            Err(ProviderError::MissingField(_))
        ));
    }

    #[test]
    fn transfer_id_extraction() {
        let response = json!({"transferId": "t1"});
        assert_eq!(extract_transfer_id(&response).unwrap(), "t1");

        assert!(matches!(
            extract_transfer_id(&json!({})),
            Err(ProviderError::MissingField("transferId"))
        ));
    }

    /// Records every hit the mock provider receives.
    #[derive(Clone, Default)]
    struct Hits(Arc<Mutex<Vec<HeaderMap>>>);

    impl Hits {
        fn count(&self) -> usize {
            self.0.lock().unwrap().len()
        }

        fn headers(&self) -> Vec<HeaderMap> {
            self.0.lock().unwrap().clone()
        }
    }

    /// Mock upstream that fails with `failures` 500s before succeeding.
    async fn spawn_mock_upstream(failures: usize) -> (String, Hits) {
        let hits = Hits::default();
        let recorded = hits.clone();

        let app = Router::new()
            .route(
                "/{*path}",
                post(move |State(hits): State<Hits>, headers: HeaderMap| async move {
                    let seen = {
                        let mut guard = hits.0.lock().unwrap();
                        guard.push(headers);
                        guard.len()
                    };
                    if seen <= failures {
                        (StatusCode::INTERNAL_SERVER_ERROR, format!("boom {seen}"))
                    } else {
                        (StatusCode::OK, r#"{"ok": true}"#.to_string())
                    }
                }),
            )
            .with_state(recorded.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock upstream");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock upstream");
        });
        (format!("http://{addr}"), hits)
    }

    fn fast_client(base_url: String) -> MultitransferClient {
        MultitransferClient::new(base_url, 3, Duration::from_millis(10)).expect("client builds")
    }

    #[tokio::test]
    async fn success_on_first_attempt_makes_exactly_one_call() {
        let (base_url, hits) = spawn_mock_upstream(0).await;
        let client = fast_client(base_url);

        let body = client
            .post_with_retries("/quote", &json!({}), None)
            .await
            .expect("call succeeds");
        assert_eq!(body, json!({"ok": true}));
        assert_eq!(hits.count(), 1);
    }

    #[tokio::test]
    async fn success_after_failures_stops_retrying() {
        let (base_url, hits) = spawn_mock_upstream(1).await;
        let client = fast_client(base_url);

        client
            .post_with_retries("/quote", &json!({}), None)
            .await
            .expect("second attempt succeeds");
        assert_eq!(hits.count(), 2);
    }

    #[tokio::test]
    async fn exhausted_retries_surface_last_status_and_body() {
        let (base_url, hits) = spawn_mock_upstream(usize::MAX).await;
        let client = fast_client(base_url);

        let err = client
            .post_with_retries("/quote", &json!({}), None)
            .await
            .expect_err("all attempts fail");

        assert_eq!(hits.count(), 3);
        match err {
            ProviderError::Upstream { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom 3");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn retries_are_separated_by_the_fixed_delay() {
        let (base_url, _hits) = spawn_mock_upstream(usize::MAX).await;
        let delay = Duration::from_millis(100);

        let client =
            MultitransferClient::new(base_url.clone(), 3, delay).expect("client builds");
        let started = std::time::Instant::now();
        let _ = client.post_with_retries("/quote", &json!({}), None).await;
        let three_attempts = started.elapsed();
        // Three attempts sleep twice between them.
        assert!(
            three_attempts >= delay * 2,
            "three attempts finished in {three_attempts:?}, expected at least {:?}",
            delay * 2
        );

        let client = MultitransferClient::new(base_url, 2, delay).expect("client builds");
        let started = std::time::Instant::now();
        let _ = client.post_with_retries("/quote", &json!({}), None).await;
        let two_attempts = started.elapsed();
        assert!(
            two_attempts >= delay,
            "two attempts finished in {two_attempts:?}, expected at least {delay:?}"
        );
        assert!(
            two_attempts < three_attempts,
            "dropping an attempt should drop one backoff delay"
        );
    }

    #[tokio::test]
    async fn transport_failure_surfaces_after_retries() {
        // Nothing listens on this port; connections are refused.
        let client = fast_client("http://127.0.0.1:9".to_string());

        let err = client
            .post_with_retries("/quote", &json!({}), None)
            .await
            .expect_err("transport fails");
        assert!(matches!(err, ProviderError::Transport(_)));
    }

    #[tokio::test]
    async fn correlation_headers_are_fresh_per_attempt() {
        let (base_url, hits) = spawn_mock_upstream(usize::MAX).await;
        let client = fast_client(base_url);

        let _ = client.post_with_retries("/quote", &json!({}), None).await;

        let headers = hits.headers();
        assert_eq!(headers.len(), 3);
        for name in ["fhprequestid", "fhpsessionid", "x-request-id"] {
            let mut values: Vec<String> = headers
                .iter()
                .map(|h| {
                    h.get(name)
                        .expect("correlation header present")
                        .to_str()
                        .unwrap()
                        .to_string()
                })
                .collect();
            let total = values.len();
            values.sort();
            values.dedup();
            assert_eq!(values.len(), total, "{name} was reused across attempts");
        }
        for h in &headers {
            assert_eq!(h.get("client-id").unwrap(), "multitransfer-web-id");
        }
    }

    #[tokio::test]
    async fn captcha_token_header_is_attached_when_given() {
        let (base_url, hits) = spawn_mock_upstream(0).await;
        let client = fast_client(base_url);

        client
            .post_with_retries("/create", &json!({}), Some("tok-1"))
            .await
            .expect("call succeeds");

        let headers = hits.headers();
        assert_eq!(headers[0].get(TOKEN_HEADER).unwrap(), "tok-1");
    }
}
