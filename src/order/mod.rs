//! Order records as handed over by the order-loading side of the POS.
//!
//! Money is carried in minor units (cents) exactly as the order source
//! reports it, and only turned into a `Decimal` when something needs to
//! be computed or displayed.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::TipError;

/// Minor units per fiat unit (cents per dollar).
pub const MINOR_UNITS_PER_UNIT: i64 = 100;

/// Decimal places used for every fiat amount we output.
pub const FIAT_DP: u32 = 2;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in minor units.
    pub amount: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Money {
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.amount, FIAT_DP)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub total_money: Money,
}

fn default_quantity() -> u32 {
    1
}

impl LineItem {
    /// `"Coffee (x2)"` for multiples, plain name otherwise.
    pub fn label(&self) -> String {
        if self.quantity > 1 {
            format!("{} (x{})", self.name, self.quantity)
        } else {
            self.name.clone()
        }
    }

    pub fn unit_price(&self) -> Decimal {
        if self.quantity == 0 {
            return Decimal::ZERO;
        }
        self.total_money.to_decimal() / Decimal::from(self.quantity)
    }

    pub fn display_total(&self) -> String {
        format_fiat(self.total_money.to_decimal())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub total_money: Money,
    #[serde(default)]
    pub total_tax_money: Money,
}

impl Order {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading order file {:?}", path.as_ref()))?;
        let order: Order = serde_json::from_str(&raw).context("parsing order file")?;
        Ok(order)
    }

    /// Pre-tip total in fiat units.
    pub fn base_total(&self) -> Decimal {
        self.total_money.to_decimal()
    }

    pub fn tax_total(&self) -> Decimal {
        self.total_tax_money.to_decimal()
    }

    pub fn total_display(&self) -> String {
        format_fiat(self.base_total())
    }

    pub fn tax_display(&self) -> String {
        format_fiat(self.tax_total())
    }
}

/// Round to cents, midpoint away from zero.
pub fn round_fiat(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(FIAT_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// `"$12.00"`
pub fn format_fiat(amount: Decimal) -> String {
    format!("${:.2}", round_fiat(amount))
}

/// Exact conversion of a fiat amount into minor units, after rounding to cents.
pub fn to_minor_units(amount: Decimal) -> Result<i64, TipError> {
    round_fiat(amount)
        .checked_mul(Decimal::from(MINOR_UNITS_PER_UNIT))
        .and_then(|cents| cents.to_i64())
        .ok_or(TipError::Overflow)
}
