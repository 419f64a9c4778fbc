// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Multitransfer Gateway - Anonymous Transfer Automation Service
//!
//! This crate exposes a small HTTP API that drives the multitransfer.ru
//! anonymous transfer flow end to end: commission quote, captcha token
//! acquisition, transfer creation and confirmation.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `captcha` - Verification token cache and captcha solver client
//! - `catalog` - Country/currency reference catalog
//! - `pipeline` - Quote → create → confirm orchestration
//! - `providers` - multitransfer.ru API client with fixed-delay retries

pub mod api;
pub mod captcha;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod state;
