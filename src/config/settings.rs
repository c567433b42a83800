//! Runtime configuration loader and common helpers.

use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    payment::DEFAULT_MEMO_PREFIX,
    tip::selection::{TipSelection, DEFAULT_CUSTOM_PERCENTAGE},
    units::DisplayUnits,
};

/// ------------------------------------------------------------------
/// Main Settings object
/// ------------------------------------------------------------------
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /* -------- currency ------------------------------ */
    /// Selected fiat code, e.g. `"USD"`. `None` disables bitcoin pricing.
    pub fiat: Option<String>,
    pub rates_file: PathBuf,

    /* -------- order screen -------------------------- */
    pub memo_prefix: String,
    pub default_custom_percentage: String,
    pub display_units: DisplayUnits,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fiat: Some("USD".to_string()),
            rates_file: PathBuf::from("./rates.json"),
            memo_prefix: DEFAULT_MEMO_PREFIX.to_string(),
            default_custom_percentage: DEFAULT_CUSTOM_PERCENTAGE.to_string(),
            display_units: DisplayUnits::Sats,
        }
    }
}

impl Settings {
    /// --------------------------------------------------------------
    /// Read `settings.json` from disk. Missing keys take defaults.
    /// --------------------------------------------------------------
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading settings file {:?}", path.as_ref()))?;
        let json: serde_json::Value = serde_json::from_str(&raw)?;
        let defaults = Self::default();

        /* -------- currency --------------------------------------- */
        // explicit null turns pricing off
        let fiat = match json.get("fiat") {
            Some(value) => value.as_str().map(|s| s.to_string()),
            None => defaults.fiat,
        };
        let rates_file = json["rates_file"]
            .as_str()
            .map(PathBuf::from)
            .unwrap_or(defaults.rates_file);

        /* -------- order screen ----------------------------------- */
        let memo_prefix = json["memo_prefix"]
            .as_str()
            .map(|s| s.to_string())
            .unwrap_or(defaults.memo_prefix);
        let default_custom_percentage = json["default_custom_percentage"]
            .as_str()
            .map(|s| s.to_string())
            .unwrap_or(defaults.default_custom_percentage);
        let display_units = match json.get("display_units") {
            Some(value) => serde_json::from_value(value.clone())
                .context("parsing display_units (expected \"sats\" or \"btc\")")?,
            None => defaults.display_units,
        };

        Ok(Self {
            fiat,
            rates_file,
            memo_prefix,
            default_custom_percentage,
            display_units,
        })
    }

    /// --------------------------------------------------------------
    /// Load settings from default config/settings.json file.
    /// --------------------------------------------------------------
    pub fn load() -> Result<Self> {
        Self::load_from_file("config/settings.json")
    }

    /// --------------------------------------------------------------
    /// Save settings to a specific file path.
    /// --------------------------------------------------------------
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json_string = serde_json::to_string_pretty(self)?;
        fs::write(&path, json_string)
            .with_context(|| format!("writing settings to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Fresh tip picker state seeded from these settings.
    pub fn tip_selection(&self) -> TipSelection {
        TipSelection::new(&self.default_custom_percentage)
    }
}
