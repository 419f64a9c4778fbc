// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `127.0.0.1` |
//! | `PORT` | Server bind port | `8015` |
//! | `COUNTRIES_FILE` | Country/currency catalog JSON path | `multitransfer_data.json` |
//! | `RUCAPTCHA_KEY` | rucaptcha API key | Required for solving |
//! | `RUCAPTCHA_BASE_URL` | rucaptcha API base URL | `https://rucaptcha.com` |
//! | `MULTITRANSFER_BASE_URL` | Provider API base URL | `https://api.multitransfer.ru` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

/// Environment variable name for the country catalog file path.
///
/// The catalog is a scraped Next.js data dump containing the provider's
/// supported destination countries and currencies. It is read exactly once
/// at startup; a missing or malformed file degrades the service to an
/// empty catalog rather than failing boot.
pub const COUNTRIES_FILE_ENV: &str = "COUNTRIES_FILE";

/// Environment variable name for the rucaptcha API key.
pub const RUCAPTCHA_KEY_ENV: &str = "RUCAPTCHA_KEY";

/// Environment variable name for the rucaptcha base URL override.
pub const RUCAPTCHA_BASE_URL_ENV: &str = "RUCAPTCHA_BASE_URL";

/// Environment variable name for the provider base URL override.
pub const MULTITRANSFER_BASE_URL_ENV: &str = "MULTITRANSFER_BASE_URL";

/// Browser identity presented to both the captcha solving service and the
/// provider API. The two must match or the provider rejects the token.
pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/145.0.0.0 Safari/537.36";

/// Read an environment variable, treating empty/whitespace values as unset.
pub fn env_optional(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) => {
            let trimmed = value.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

/// Read an environment variable, falling back to `default` when unset or empty.
pub fn env_or_default(name: &str, default: &str) -> String {
    env_optional(name).unwrap_or_else(|| default.to_string())
}
