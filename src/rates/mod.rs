//! Fiat exchange-rate snapshots.
//!
//! Rates are supplied by whoever owns the rate feed; this module only looks
//! them up. A rate is the price of one bitcoin in the given fiat currency.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{error::TipError, order::round_fiat, utils::format::group_thousands};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub code: String,
    /// Fiat units per 1 BTC.
    pub rate: Decimal,
}

impl ExchangeRate {
    pub fn new(code: impl Into<String>, rate: Decimal) -> Self {
        Self {
            code: code.into(),
            rate,
        }
    }

    /// A zero or negative rate cannot price anything.
    pub fn is_usable(&self) -> bool {
        self.rate > Decimal::ZERO
    }

    /// `"$30,000.00 BTC/USD"`
    pub fn display(&self) -> String {
        let amount = group_thousands(&format!("{:.2}", round_fiat(self.rate)));
        match self.code.as_str() {
            "USD" => format!("${amount} BTC/{}", self.code),
            code => format!("{amount} BTC/{code}"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    entries: Vec<ExchangeRate>,
}

impl RateTable {
    pub fn new(entries: Vec<ExchangeRate>) -> Self {
        Self { entries }
    }

    /// Read a JSON array of `{"code": "...", "rate": ...}` entries.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading rates file {:?}", path.as_ref()))?;
        let table: RateTable = serde_json::from_str(&raw).context("parsing rates file")?;
        debug!("[RATES] loaded {} entries", table.entries.len());
        Ok(table)
    }

    pub fn get(&self, code: &str) -> Option<&ExchangeRate> {
        self.entries.iter().find(|entry| entry.code == code)
    }

    /// Resolve the rate for the selected fiat code.
    ///
    /// No selected code, no matching entry, and a non-positive rate all mean
    /// there is no bitcoin amount to quote.
    pub fn rate_for(&self, fiat: Option<&str>) -> Result<&ExchangeRate, TipError> {
        let entry = fiat
            .and_then(|code| self.get(code))
            .filter(|entry| entry.is_usable());
        entry.ok_or_else(|| TipError::rate_unavailable(fiat))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
