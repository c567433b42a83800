//! Error taxonomy for the tip / conversion core.

use thiserror::Error as ThisError;

///
/// TipError
///

#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum TipError {
    #[error("cannot parse `{input}`: {reason}")]
    Parse { input: String, reason: String },

    #[error("no usable exchange rate for `{code}`")]
    RateUnavailable { code: String },

    #[error("tip selection index {0} is out of range")]
    InvalidSelection(usize),

    #[error("amount overflowed while converting")]
    Overflow,
}

impl TipError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn rate_unavailable(code: Option<&str>) -> Self {
        Self::RateUnavailable {
            code: code.unwrap_or("<none>").to_string(),
        }
    }
}
