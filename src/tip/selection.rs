//! Tip picker state, kept apart from the calculation.
//!
//! The screen owns one [`TipSelection`], feeds it input events, and asks it
//! for the resolved [`TipPolicy`] whenever it needs to recompute. Raw text is
//! kept as typed so editing can continue; it never reaches the calculator.

use log::{debug, warn};
use rust_decimal::Decimal;

use super::{parse_amount, parse_percentage, CustomTip, TipPolicy, TipPreset};
use crate::{error::TipError, order::FIAT_DP};

pub const DEFAULT_CUSTOM_PERCENTAGE: &str = "21";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CustomMode {
    #[default]
    Percentage,
    Amount,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TipSelection {
    preset: TipPreset,
    custom_percentage: String,
    custom_amount: String,
    custom_mode: CustomMode,
}

impl Default for TipSelection {
    fn default() -> Self {
        Self::new(DEFAULT_CUSTOM_PERCENTAGE)
    }
}

impl TipSelection {
    pub fn new(default_percentage: &str) -> Self {
        Self {
            preset: TipPreset::Twenty,
            custom_percentage: default_percentage.to_string(),
            custom_amount: String::new(),
            custom_mode: CustomMode::Percentage,
        }
    }

    pub fn preset(&self) -> TipPreset {
        self.preset
    }

    pub fn custom_mode(&self) -> CustomMode {
        self.custom_mode
    }

    pub fn custom_percentage(&self) -> &str {
        &self.custom_percentage
    }

    pub fn custom_amount(&self) -> &str {
        &self.custom_amount
    }

    /// Picker tap. Unknown indices leave the state untouched.
    pub fn select_index(&mut self, index: usize) -> Result<(), TipError> {
        self.preset = TipPreset::from_index(index)?;
        Ok(())
    }

    pub fn select(&mut self, preset: TipPreset) {
        self.preset = preset;
    }

    pub fn focus_percentage(&mut self) {
        self.custom_mode = CustomMode::Percentage;
    }

    pub fn focus_amount(&mut self) {
        self.custom_mode = CustomMode::Amount;
    }

    pub fn edit_percentage(&mut self, text: &str) {
        self.custom_percentage = text.to_string();
    }

    /// Returns `false` and keeps the previous text when the edit is refused:
    /// a minus sign, or more than two digits after the decimal point.
    pub fn edit_amount(&mut self, text: &str) -> bool {
        let too_precise = text
            .split_once('.')
            .map_or(false, |(_, frac)| frac.len() > FIAT_DP as usize);
        if text.contains('-') || too_precise {
            debug!("[TIP] rejected amount edit {:?}", text);
            return false;
        }
        self.custom_amount = text.to_string();
        true
    }

    /// Resolve the current state into a policy.
    ///
    /// Custom text that does not parse counts as a zero tip so checkout is
    /// never blocked on a typo.
    pub fn policy(&self) -> TipPolicy {
        if let Some(policy) = TipPolicy::from_preset(self.preset) {
            return policy;
        }

        let custom = match self.custom_mode {
            CustomMode::Percentage => {
                CustomTip::Percentage(or_zero(parse_percentage(&self.custom_percentage)))
            }
            CustomMode::Amount => CustomTip::Amount(or_zero(parse_amount(&self.custom_amount))),
        };
        TipPolicy::Custom(custom)
    }
}

fn or_zero(parsed: Result<Decimal, TipError>) -> Decimal {
    parsed.unwrap_or_else(|e| {
        warn!("[TIP] {}; using a zero tip", e);
        Decimal::ZERO
    })
}
