// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response data structures used by the REST API. All types
//! derive `Serialize`/`Deserialize` and `ToSchema` for automatic JSON
//! handling and OpenAPI documentation.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// One row of the public country/currency listing.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct Country {
    /// ISO alpha-3 country code.
    pub country_code: String,
    /// Display name.
    pub country: String,
    /// Default payout currency.
    pub currency: String,
}

/// Acknowledgement returned by the solve-captcha trigger endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SolveCaptchaResponse {
    /// Human-readable status line.
    pub message: String,
    /// Number of tokens pooled at the time of the request.
    pub queue_size: usize,
}

/// Input for one transfer pipeline run.
///
/// Every field carries an illustrative default so the endpoint can be
/// exercised interactively from the Swagger UI without typing out a full
/// sender identity. Dates use the provider's `YYYY-MM-DDTHH:MM:SS` format.
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[serde(default)]
pub struct TransferRequest {
    /// Destination country (alpha-3).
    pub country_code: String,
    /// Amount in the source currency (RUB). Must be positive.
    pub amount: f64,
    /// Destination payout currency.
    pub currency_to: String,
    pub beneficiary_last_name: String,
    pub beneficiary_first_name: String,
    /// Beneficiary card/account number.
    pub account_number: String,
    pub sender_last_name: String,
    pub sender_first_name: String,
    pub sender_middle_name: String,
    /// Sender phone number, digits only.
    pub sender_phone: String,
    pub sender_birth_date: String,
    /// Identification document type code (21 = RU internal passport).
    pub doc_type: String,
    pub doc_number: String,
    pub doc_series: String,
    pub doc_issue_date: String,
}

impl Default for TransferRequest {
    fn default() -> Self {
        Self {
            country_code: "TJK".to_string(),
            amount: 10000.0,
            currency_to: "TJS".to_string(),
            beneficiary_last_name: "Petrov".to_string(),
            beneficiary_first_name: "Ivan".to_string(),
            account_number: "2200700164833154".to_string(),
            sender_last_name: "Петров".to_string(),
            sender_first_name: "Иван".to_string(),
            sender_middle_name: "Иванович".to_string(),
            sender_phone: "79281234567".to_string(),
            sender_birth_date: "1990-02-01T12:00:00".to_string(),
            doc_type: "21".to_string(),
            doc_number: "136012".to_string(),
            doc_series: "1232".to_string(),
            doc_issue_date: "2011-11-12T12:00:00".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_request_fills_missing_fields_from_defaults() {
        let request: TransferRequest =
            serde_json::from_str(r#"{"country_code": "UZB", "amount": 500}"#)
                .expect("partial request deserializes");

        assert_eq!(request.country_code, "UZB");
        assert_eq!(request.amount, 500.0);
        // Untouched fields keep their illustrative defaults.
        assert_eq!(request.currency_to, "TJS");
        assert_eq!(request.sender_last_name, "Петров");
        assert_eq!(request.doc_type, "21");
    }
}
