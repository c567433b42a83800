//! Sats / BTC display toggle. Presentation only; amounts stay in sats.

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::{error::TipError, tip::SATS_PER_BTC, utils::format::group_thousands};

const BTC_DP: u32 = 8;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayUnits {
    #[default]
    #[strum(serialize = "sats")]
    Sats,
    #[strum(serialize = "BTC")]
    Btc,
}

impl DisplayUnits {
    pub fn toggle(self) -> Self {
        match self {
            Self::Sats => Self::Btc,
            Self::Btc => Self::Sats,
        }
    }

    /// `"403,333 sats"` or `"0.00403333 BTC"`.
    pub fn format(self, sats: u64) -> String {
        match self {
            Self::Sats => format!("{} {}", group_thousands(&sats.to_string()), self),
            Self::Btc => format!("{} {}", sats_to_btc(sats), self),
        }
    }
}

pub fn sats_to_btc(sats: u64) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(sats), BTC_DP)
}

pub fn btc_to_sats(btc: Decimal) -> Result<u64, TipError> {
    btc.checked_mul(Decimal::from(SATS_PER_BTC))
        .map(|sats| sats.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|sats| sats.to_u64())
        .ok_or(TipError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_toggle() {
        assert_eq!(DisplayUnits::Sats.toggle(), DisplayUnits::Btc);
        assert_eq!(DisplayUnits::Sats.toggle().toggle(), DisplayUnits::Sats);
    }

    #[test]
    fn test_format() {
        assert_eq!(DisplayUnits::Sats.format(403_333), "403,333 sats");
        assert_eq!(DisplayUnits::Btc.format(403_333), "0.00403333 BTC");
        assert_eq!(DisplayUnits::Btc.format(150_000_000), "1.50000000 BTC");
        assert_eq!(DisplayUnits::Sats.format(0), "0 sats");
    }

    #[test]
    fn test_btc_round_trip() {
        for sats in [0_u64, 1, 403_333, 99_999_999, 2_100_000_000_000_000] {
            assert_eq!(btc_to_sats(sats_to_btc(sats)).unwrap(), sats);
        }
        assert_eq!(btc_to_sats(dec!(0.000000015)).unwrap(), 2);
        assert!(btc_to_sats(dec!(-1)).is_err());
    }
}
