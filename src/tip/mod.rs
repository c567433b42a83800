//! Tip policies and the tip / total / sats calculation.
//!
//! Everything here is pure: the caller resolves its input state into a
//! [`TipPolicy`] and an optional [`ExchangeRate`], calls [`compute`], and
//! gets back a [`CalculationResult`]. Recompute on every input change.

pub mod selection;

use log::{debug, warn};
use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use strum_macros::{Display, EnumIter};

use crate::{
    error::TipError,
    order::{round_fiat, Order, FIAT_DP},
    rates::{ExchangeRate, RateTable},
};

pub const SATS_PER_BTC: i64 = 100_000_000;

/// The four choices of the tip picker, in picker order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum TipPreset {
    #[strum(serialize = "20%")]
    Twenty,
    #[strum(serialize = "25%")]
    TwentyFive,
    #[strum(serialize = "30%")]
    Thirty,
    #[strum(serialize = "Custom")]
    Custom,
}

impl TipPreset {
    pub fn from_index(index: usize) -> Result<Self, TipError> {
        match index {
            0 => Ok(Self::Twenty),
            1 => Ok(Self::TwentyFive),
            2 => Ok(Self::Thirty),
            3 => Ok(Self::Custom),
            other => Err(TipError::InvalidSelection(other)),
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Twenty => 0,
            Self::TwentyFive => 1,
            Self::Thirty => 2,
            Self::Custom => 3,
        }
    }

    /// Fractional tip rate, `None` for [`TipPreset::Custom`].
    pub fn rate(self) -> Option<Decimal> {
        match self {
            Self::Twenty => Some(Decimal::new(20, 2)),
            Self::TwentyFive => Some(Decimal::new(25, 2)),
            Self::Thirty => Some(Decimal::new(30, 2)),
            Self::Custom => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CustomTip {
    /// Whole percent, `21` means 21 %.
    Percentage(Decimal),
    /// Absolute fiat amount.
    Amount(Decimal),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TipPolicy {
    /// Fractional rate, `0.20` for 20 %.
    Fixed(Decimal),
    Custom(CustomTip),
}

impl TipPolicy {
    /// Policy for a fixed preset; the custom entry has no policy of its own.
    pub fn from_preset(preset: TipPreset) -> Option<Self> {
        preset.rate().map(Self::Fixed)
    }

    /// Unrounded tip for `base_total`. Negative inputs contribute nothing.
    fn tip_for(&self, base_total: Decimal) -> Result<Decimal, TipError> {
        let tip = match *self {
            Self::Fixed(rate) => base_total.checked_mul(rate),
            Self::Custom(CustomTip::Percentage(pct)) => base_total
                .checked_mul(pct)
                .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED)),
            Self::Custom(CustomTip::Amount(amount)) => Some(amount),
        };
        tip.map(|tip| tip.max(Decimal::ZERO))
            .ok_or(TipError::Overflow)
    }
}

/// A sats figure together with the rate it was priced at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SatQuote {
    pub sats: u64,
    pub rate: ExchangeRate,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalculationResult {
    pub tip_amount: Decimal,
    pub total_amount: Decimal,
    /// `Err` when no rate could be applied or the amounts overflowed;
    /// payment must stay disabled.
    pub quote: Result<SatQuote, TipError>,
}

impl CalculationResult {
    pub fn is_valid(&self) -> bool {
        self.quote.is_ok()
    }

    pub fn sat_amount(&self) -> Result<u64, TipError> {
        self.quote.as_ref().map(|quote| quote.sats).map_err(Clone::clone)
    }

    pub fn sats(&self) -> Option<u64> {
        self.quote.as_ref().ok().map(|quote| quote.sats)
    }

    /// Rate the sats figure was priced at.
    pub fn rate(&self) -> Option<&ExchangeRate> {
        self.quote.as_ref().ok().map(|quote| &quote.rate)
    }
}

/// Parse a custom percentage such as `"21"` or `"12.5"`.
pub fn parse_percentage(text: &str) -> Result<Decimal, TipError> {
    parse_non_negative(text)
}

/// Parse a custom tip amount: non-negative, at most two fractional digits.
pub fn parse_amount(text: &str) -> Result<Decimal, TipError> {
    let too_precise = text
        .trim()
        .split_once('.')
        .map_or(false, |(_, frac)| frac.len() > FIAT_DP as usize);
    if too_precise {
        return Err(TipError::parse(text, "more than two decimal places"));
    }
    parse_non_negative(text)
}

fn parse_non_negative(text: &str) -> Result<Decimal, TipError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    if trimmed.contains('-') {
        return Err(TipError::parse(text, "negative values are not allowed"));
    }
    trimmed
        .parse::<Decimal>()
        .map_err(|e| TipError::parse(text, e.to_string()))
}

/// Convert a fiat total into sats at `rate`, rounding to the nearest sat.
pub fn fiat_to_sats(total: Decimal, rate: &ExchangeRate) -> Result<u64, TipError> {
    if !rate.is_usable() {
        return Err(TipError::rate_unavailable(Some(&rate.code)));
    }
    total
        .checked_div(rate.rate)
        .and_then(|btc| btc.checked_mul(Decimal::from(SATS_PER_BTC)))
        .map(|sats| sats.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|sats| sats.to_u64())
        .ok_or(TipError::Overflow)
}

/// Tip, total and sats for a pre-tip `base_total`.
pub fn compute(
    base_total: Decimal,
    policy: &TipPolicy,
    rate: Option<&ExchangeRate>,
) -> CalculationResult {
    let rate = rate.ok_or_else(|| TipError::rate_unavailable(None));
    calculate(base_total, policy, rate)
}

/// [`compute`] for an order, resolving the rate of the selected fiat code.
pub fn compute_for_order(
    order: &Order,
    policy: &TipPolicy,
    rates: &RateTable,
    fiat: Option<&str>,
) -> CalculationResult {
    calculate(order.base_total(), policy, rates.rate_for(fiat))
}

fn calculate(
    base_total: Decimal,
    policy: &TipPolicy,
    rate: Result<&ExchangeRate, TipError>,
) -> CalculationResult {
    let priced = policy.tip_for(base_total).and_then(|tip| {
        base_total
            .checked_add(tip)
            .map(|total| (tip, total))
            .ok_or(TipError::Overflow)
    });

    // an unpriceable tip shows as no tip at all
    let (tip_amount, total_amount, quote) = match priced {
        Ok((tip, total)) => {
            let total_amount = round_fiat(total);
            let quote = rate.and_then(|rate| {
                fiat_to_sats(total_amount, rate).map(|sats| SatQuote {
                    sats,
                    rate: rate.clone(),
                })
            });
            (round_fiat(tip), total_amount, quote)
        }
        Err(e) => (Decimal::ZERO, round_fiat(base_total), Err(e)),
    };

    match &quote {
        Ok(quote) => debug!(
            "[TIP] {:?}: base {} tip {} total {} -> {} sats at {}",
            policy, base_total, tip_amount, total_amount, quote.sats, quote.rate.code
        ),
        Err(e) => warn!("[TIP] total {} has no sats amount: {}", total_amount, e),
    }

    CalculationResult {
        tip_amount,
        total_amount,
        quote,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use strum::IntoEnumIterator;

    fn usd() -> ExchangeRate {
        ExchangeRate::new("USD", dec!(30000))
    }

    #[test]
    fn test_fixed_twenty_percent() {
        let result = compute(dec!(10.00), &TipPolicy::Fixed(dec!(0.20)), Some(&usd()));
        assert_eq!(result.tip_amount, dec!(2.00));
        assert_eq!(result.total_amount, dec!(12.00));
        assert!(result.is_valid());
    }

    #[test]
    fn test_fixed_presets_round_half_up() {
        // 33.33 * 0.25 = 8.3325, 33.33 * 0.30 = 9.999
        let base = dec!(33.33);
        for preset in TipPreset::iter() {
            let Some(policy) = TipPolicy::from_preset(preset) else {
                continue;
            };
            let rate = preset.rate().unwrap();
            let result = compute(base, &policy, Some(&usd()));
            assert_eq!(result.tip_amount, round_fiat(base * rate));
            assert_eq!(result.total_amount, round_fiat(base * (Decimal::ONE + rate)));
            assert_eq!(result.total_amount, base + result.tip_amount);
        }

        let half = compute(dec!(0.10), &TipPolicy::Fixed(dec!(0.25)), None);
        assert_eq!(half.tip_amount, dec!(0.03));
        assert_eq!(half.total_amount, dec!(0.13));
    }

    #[test]
    fn test_custom_percentage() {
        let policy = TipPolicy::Custom(CustomTip::Percentage(dec!(21)));
        let result = compute(dec!(50.00), &policy, Some(&usd()));
        assert_eq!(result.total_amount, dec!(60.50));
        assert_eq!(result.tip_amount, dec!(10.50));

        let single_digit = TipPolicy::Custom(CustomTip::Percentage(dec!(5)));
        let result = compute(dec!(50.00), &single_digit, Some(&usd()));
        assert_eq!(result.total_amount, dec!(52.50));
    }

    #[test]
    fn test_custom_amount() {
        let policy = TipPolicy::Custom(CustomTip::Amount(dec!(5.00)));
        let result = compute(dec!(20.00), &policy, Some(&usd()));
        assert_eq!(result.total_amount, dec!(25.00));
        assert_eq!(result.tip_amount, dec!(5.00));
    }

    #[test]
    fn test_sats_conversion() {
        let policy = TipPolicy::Custom(CustomTip::Percentage(dec!(21)));
        let result = compute(dec!(100.00), &policy, Some(&usd()));
        assert_eq!(result.total_amount, dec!(121.00));
        assert_eq!(result.sat_amount(), Ok(403_333));
        assert_eq!(result.rate(), Some(&usd()));
        assert_eq!(result.sats(), Some(403_333));
    }

    #[test]
    fn test_zero_base_is_valid_zero() {
        for preset in [TipPreset::Twenty, TipPreset::TwentyFive, TipPreset::Thirty] {
            let policy = TipPolicy::from_preset(preset).unwrap();
            let result = compute(Decimal::ZERO, &policy, Some(&usd()));
            assert_eq!(result.tip_amount, Decimal::ZERO);
            assert_eq!(result.total_amount, Decimal::ZERO);
            assert_eq!(result.sat_amount(), Ok(0));
        }
    }

    #[test]
    fn test_missing_rate_is_invalid() {
        let policy = TipPolicy::Fixed(dec!(0.20));
        let result = compute(dec!(10.00), &policy, None);
        assert!(!result.is_valid());
        assert_eq!(result.total_amount, dec!(12.00));

        let zero = ExchangeRate::new("USD", Decimal::ZERO);
        let result = compute(dec!(10.00), &policy, Some(&zero));
        assert_eq!(
            result.sat_amount(),
            Err(TipError::RateUnavailable {
                code: "USD".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_fiat_code_is_invalid() {
        let order: Order = serde_json::from_str(
            r#"{"id": "A1", "total_money": {"amount": 1000, "currency": "USD"}}"#,
        )
        .unwrap();
        let rates = RateTable::new(vec![usd()]);
        let policy = TipPolicy::Fixed(dec!(0.20));

        let ok = compute_for_order(&order, &policy, &rates, Some("USD"));
        assert_eq!(ok.sat_amount(), Ok(40_000));

        let missing = compute_for_order(&order, &policy, &rates, Some("EUR"));
        assert_eq!(missing.sats(), None);
        assert_eq!(
            missing.sat_amount(),
            Err(TipError::RateUnavailable {
                code: "EUR".to_string()
            })
        );
    }

    #[test]
    fn test_oversized_custom_tip_is_overflow_not_panic() {
        let huge = Decimal::MAX;
        for policy in [
            TipPolicy::Custom(CustomTip::Percentage(huge)),
            TipPolicy::Custom(CustomTip::Amount(huge)),
            TipPolicy::Fixed(huge),
        ] {
            let result = compute(dec!(50.00), &policy, Some(&usd()));
            assert_eq!(result.sat_amount(), Err(TipError::Overflow));
            assert_eq!(result.rate(), None);
            assert_eq!(result.tip_amount, Decimal::ZERO);
            assert_eq!(result.total_amount, dec!(50.00));
        }
    }

    #[test]
    fn test_compute_is_idempotent() {
        let policy = TipPolicy::Custom(CustomTip::Amount(dec!(3.33)));
        let first = compute(dec!(47.19), &policy, Some(&usd()));
        let second = compute(dec!(47.19), &policy, Some(&usd()));
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_inputs() {
        assert_eq!(parse_percentage("21").unwrap(), dec!(21));
        assert_eq!(parse_percentage(" 12.5 ").unwrap(), dec!(12.5));
        assert_eq!(parse_percentage("").unwrap(), Decimal::ZERO);
        assert!(parse_percentage("abc").is_err());
        assert!(parse_percentage("-3").is_err());

        assert_eq!(parse_amount("5.00").unwrap(), dec!(5.00));
        assert_eq!(parse_amount("0.5").unwrap(), dec!(0.5));
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("1.234").is_err());
        assert!(parse_amount("1.230").is_err());
        assert!(parse_amount("1.2.3").is_err());
    }

    #[test]
    fn test_preset_index_round_trip() {
        for preset in TipPreset::iter() {
            assert_eq!(TipPreset::from_index(preset.index()), Ok(preset));
        }
        assert_eq!(TipPreset::from_index(4), Err(TipError::InvalidSelection(4)));
        assert_eq!(TipPreset::TwentyFive.to_string(), "25%");
    }
}
