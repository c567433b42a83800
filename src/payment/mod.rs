//! Hand-off record for the payment-request (invoice) step.

use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    error::TipError,
    order::{to_minor_units, Order},
    rates::ExchangeRate,
    tip::CalculationResult,
};

pub const DEFAULT_MEMO_PREFIX: &str = "POS";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub sat_amount: u64,
    pub memo: String,
    pub order_id: String,
    /// Tip in fiat minor units.
    pub order_tip_minor_units: i64,
    /// Pre-tip order total in fiat minor units.
    pub order_amount_minor_units: i64,
    pub auto_generate: bool,
}

/// Whether the pay action should be enabled for `result`.
pub fn is_payable(result: &CalculationResult) -> bool {
    result.is_valid()
}

/// `"POS: ORD-1 | $30,000.00 BTC/USD"`
pub fn memo(prefix: &str, order_id: &str, rate: &ExchangeRate) -> String {
    format!("{}: {} | {}", prefix, order_id, rate.display())
}

impl PaymentRequest {
    /// Fails with the calculation's error when there is no sats amount. The
    /// memo quotes the same rate the sats were priced at.
    pub fn build(
        order: &Order,
        result: &CalculationResult,
        memo_prefix: &str,
    ) -> Result<Self, TipError> {
        let quote = result.quote.as_ref().map_err(Clone::clone)?;

        let request = Self {
            sat_amount: quote.sats,
            memo: memo(memo_prefix, &order.id, &quote.rate),
            order_id: order.id.clone(),
            order_tip_minor_units: to_minor_units(result.tip_amount)?,
            order_amount_minor_units: to_minor_units(order.base_total())?,
            auto_generate: true,
        };
        info!(
            "[PAYMENT] order {} -> {} sats (tip {} minor units)",
            request.order_id, request.sat_amount, request.order_tip_minor_units
        );
        Ok(request)
    }
}
