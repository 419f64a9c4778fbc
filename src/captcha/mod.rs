// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Captcha token handling: the verification token cache and the
//! rucaptcha solver client that refills it.

pub mod cache;
pub mod solver;

pub use cache::TokenCache;
pub use solver::CaptchaSolver;
