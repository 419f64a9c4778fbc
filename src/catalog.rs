// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Country/currency reference catalog.
//!
//! The provider publishes its supported destination countries inside a
//! Next.js data dump (`pageProps.countries`). The catalog is parsed once
//! at startup into an in-memory lookup table and is read-only afterwards.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

/// One destination country supported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryEntry {
    /// ISO alpha-3 country code.
    pub code: String,
    /// Preferred display name (Cyrillic when available, Latin otherwise).
    pub name: String,
    /// Default payout currency code.
    pub currency: String,
    /// All payout currencies supported for this country.
    pub currencies: Vec<String>,
}

/// Immutable catalog of destination countries, keyed by alpha-3 code.
#[derive(Debug, Default)]
pub struct CountryCatalog {
    entries: Vec<CountryEntry>,
    by_code: HashMap<String, CountryEntry>,
    codes: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),
}

// Raw shape of the scraped data file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(rename = "pageProps", default)]
    page_props: PageProps,
}

#[derive(Debug, Default, Deserialize)]
struct PageProps {
    #[serde(default)]
    countries: Vec<RawCountry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCountry {
    alfa3_code: Option<String>,
    name_cyrillic: Option<String>,
    name_lat: Option<String>,
    default_currency: Option<String>,
    #[serde(default)]
    currencies: Vec<RawCurrency>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCurrency {
    currency_code: Option<String>,
}

impl CountryCatalog {
    /// Parse a catalog file. Entries without an alpha-3 code are skipped.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)?;
        let file: CatalogFile = serde_json::from_str(&raw)?;

        let entries: Vec<CountryEntry> = file
            .page_props
            .countries
            .into_iter()
            .filter_map(|country| {
                let code = country.alfa3_code?;
                let name = country
                    .name_cyrillic
                    .filter(|n| !n.is_empty())
                    .or(country.name_lat)
                    .unwrap_or_default();
                Some(CountryEntry {
                    code,
                    name,
                    currency: country.default_currency.unwrap_or_default(),
                    currencies: country
                        .currencies
                        .into_iter()
                        .filter_map(|c| c.currency_code)
                        .collect(),
                })
            })
            .collect();

        Ok(Self::from_entries(entries))
    }

    /// Load a catalog, degrading to an empty one on any read/parse failure.
    ///
    /// The service is still useful without reference data (the transfer
    /// pipeline does not consult it), so a broken catalog file must not
    /// prevent boot.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(catalog) => {
                info!(
                    path = %path.display(),
                    countries = catalog.len(),
                    "Loaded country catalog"
                );
                catalog
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to load country catalog, starting with an empty one"
                );
                Self::default()
            }
        }
    }

    fn from_entries(entries: Vec<CountryEntry>) -> Self {
        let by_code = entries
            .iter()
            .map(|e| (e.code.clone(), e.clone()))
            .collect();
        let codes = entries.iter().map(|e| e.code.clone()).collect();
        Self {
            entries,
            by_code,
            codes,
        }
    }

    /// Look up an entry by alpha-3 code.
    pub fn get(&self, code: &str) -> Option<&CountryEntry> {
        self.by_code.get(code)
    }

    /// All known alpha-3 codes, in file order.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries exposed through the public listing endpoint.
    ///
    /// Countries whose default payout currency is USD or EUR are excluded
    /// from the listing (business rule: those corridors are not offered).
    pub fn list_public(&self) -> impl Iterator<Item = &CountryEntry> {
        self.entries
            .iter()
            .filter(|e| e.currency != "USD" && e.currency != "EUR")
    }
}
