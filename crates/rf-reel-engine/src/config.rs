//! Game settings: decoding and validation

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::reels::ReelSet;
use crate::symbols::{EMPTY, SymbolDef, SymbolTable};

fn default_max_steps() -> usize {
    32
}

/// Complete per-game setting as decoded from YAML or JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSetting {
    /// Numeric game id
    pub id: u32,
    /// Unique game name
    pub name: String,
    /// Registry key of the logic that runs this game
    pub logic: String,
    /// Visible rows
    pub rows: usize,
    /// Columns (one reel each)
    pub cols: usize,
    /// Selectable bet units; the request's bet mode indexes into this list
    pub bet_units: Vec<f64>,
    /// Upper bound on cascade steps per round
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    /// Symbol table
    pub symbols: Vec<SymbolDef>,
    /// Base mode reel set
    pub base_reels: ReelSet,
    /// Free mode reel set (falls back to `base_reels`)
    #[serde(default)]
    pub free_reels: Option<ReelSet>,
    /// Logic-specific fixed parameters
    #[serde(default)]
    pub params: serde_json::Value,
}

impl GameSetting {
    /// Decode from a YAML document and validate
    pub fn from_yaml_str(yaml: &str) -> Result<Self, EngineError> {
        let setting: Self = serde_yml::from_str(yaml)?;
        setting.validate()?;
        Ok(setting)
    }

    /// Decode from a JSON document and validate
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let setting: Self = serde_json::from_str(json)?;
        setting.validate()?;
        Ok(setting)
    }

    /// Load from disk; `.json` is parsed as JSON, everything else as YAML
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_yaml_str(&text),
        }
    }

    /// Free mode reels
    pub fn free_reels(&self) -> &ReelSet {
        self.free_reels.as_ref().unwrap_or(&self.base_reels)
    }

    /// Build the symbol-type table
    pub fn symbol_table(&self) -> Result<SymbolTable, EngineError> {
        SymbolTable::new(self.symbols.clone()).map_err(|e| EngineError::setting(&self.name, e))
    }

    /// Bet unit for a bet mode
    pub fn bet_unit(&self, bet_mode: usize) -> Result<f64, EngineError> {
        self.bet_units
            .get(bet_mode)
            .copied()
            .ok_or(EngineError::BetModeOutOfRange {
                mode: bet_mode,
                count: self.bet_units.len(),
            })
    }

    /// Decode `params` into a logic's typed fixed config
    pub fn decode_params<T: serde::de::DeserializeOwned>(&self) -> Result<T, EngineError> {
        let params = if self.params.is_null() {
            serde_json::Value::Object(Default::default())
        } else {
            self.params.clone()
        };
        Ok(serde_json::from_value(params)?)
    }

    /// Check structural invariants
    pub fn validate(&self) -> Result<(), EngineError> {
        let fail = |reason: String| Err(EngineError::setting(&self.name, reason));

        if self.name.is_empty() {
            return fail("empty game name".into());
        }
        if self.rows == 0 || self.cols == 0 {
            return fail(format!("invalid shape {}x{}", self.rows, self.cols));
        }
        if self.max_steps == 0 {
            return fail("max_steps must be at least 1".into());
        }
        if self.bet_units.is_empty() {
            return fail("bet unit list is empty".into());
        }
        if let Some(bad) = self.bet_units.iter().find(|u| !(**u > 0.0) || !u.is_finite()) {
            return fail(format!("bet unit {bad} is not positive"));
        }

        let table = self.symbol_table()?;
        let sets = [("base_reels", Some(&self.base_reels)), ("free_reels", self.free_reels.as_ref())];
        for (label, set) in sets {
            let Some(set) = set else { continue };
            if set.len() != self.cols {
                return fail(format!("{label} has {} reels for {} columns", set.len(), self.cols));
            }
            for (col, lut) in set.reels().iter().enumerate() {
                if lut.produces(EMPTY) {
                    return fail(format!("{label}[{col}] produces the empty symbol"));
                }
                if let Some(e) = lut.entries().iter().find(|e| !table.contains(e.symbol)) {
                    return fail(format!("{label}[{col}] uses unknown symbol {}", e.symbol));
                }
            }
        }

        Ok(())
    }
}
