//! Symbol definitions and the symbol-type table

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Symbol code as stored on a screen
pub type SymbolCode = u16;

/// Reserved "empty" sentinel. Never a valid paytable symbol.
pub const EMPTY: SymbolCode = 0;

/// Symbol type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    /// Regular paying symbol
    Normal,
    /// Substitutes for normal symbols
    Wild,
    /// Counted anywhere for trigger detection, never part of a line/ways win
    Scatter,
}

/// A symbol definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolDef {
    /// Unique symbol code (must not be `EMPTY`)
    pub code: SymbolCode,
    /// Symbol name (e.g., "HP1", "LP3", "WILD", "SCATTER")
    pub name: String,
    /// Symbol type
    pub kind: SymbolKind,
    /// Pay values keyed by minimum count, in bet multiples
    #[serde(default)]
    pub pays: BTreeMap<usize, f64>,
}

impl SymbolDef {
    /// Create a normal symbol
    pub fn normal(code: SymbolCode, name: impl Into<String>, pays: &[(usize, f64)]) -> Self {
        Self {
            code,
            name: name.into(),
            kind: SymbolKind::Normal,
            pays: pays.iter().copied().collect(),
        }
    }

    /// Create a wild symbol
    pub fn wild(code: SymbolCode, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
            kind: SymbolKind::Wild,
            pays: BTreeMap::new(),
        }
    }

    /// Create a scatter symbol
    pub fn scatter(code: SymbolCode, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
            kind: SymbolKind::Scatter,
            pays: BTreeMap::new(),
        }
    }

    /// Pay for a match count: value of the highest key not above `count`
    pub fn pay(&self, count: usize) -> f64 {
        self.pays
            .range(..=count)
            .next_back()
            .map(|(_, pay)| *pay)
            .unwrap_or(0.0)
    }
}

/// Dense lookup from symbol code to its definition
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    defs: Vec<SymbolDef>,
    by_code: Vec<Option<usize>>,
}

impl SymbolTable {
    /// Build a table; codes must be unique and non-empty
    pub fn new(defs: Vec<SymbolDef>) -> Result<Self, String> {
        let max_code = defs.iter().map(|d| d.code).max().unwrap_or(EMPTY) as usize;
        let mut by_code = vec![None; max_code + 1];

        for (i, def) in defs.iter().enumerate() {
            if def.code == EMPTY {
                return Err(format!("symbol '{}' uses the empty code 0", def.name));
            }
            let slot = &mut by_code[def.code as usize];
            if slot.is_some() {
                return Err(format!("duplicate symbol code {}", def.code));
            }
            *slot = Some(i);
        }

        Ok(Self { defs, by_code })
    }

    /// Get a definition by code
    pub fn get(&self, code: SymbolCode) -> Option<&SymbolDef> {
        self.by_code
            .get(code as usize)
            .copied()
            .flatten()
            .map(|i| &self.defs[i])
    }

    /// Symbol kind for a code (`None` for `EMPTY` or unknown codes)
    #[inline]
    pub fn kind(&self, code: SymbolCode) -> Option<SymbolKind> {
        self.get(code).map(|d| d.kind)
    }

    /// Pay for a code at a match count
    pub fn pay(&self, code: SymbolCode, count: usize) -> f64 {
        self.get(code).map(|d| d.pay(count)).unwrap_or(0.0)
    }

    /// Check whether a code is defined
    pub fn contains(&self, code: SymbolCode) -> bool {
        self.get(code).is_some()
    }

    /// All definitions in declaration order
    pub fn defs(&self) -> &[SymbolDef] {
        &self.defs
    }

    /// Codes of all normal (paying) symbols
    pub fn normal_codes(&self) -> Vec<SymbolCode> {
        self.codes_of(SymbolKind::Normal)
    }

    /// Codes of all symbols of one kind
    pub fn codes_of(&self, kind: SymbolKind) -> Vec<SymbolCode> {
        self.defs
            .iter()
            .filter(|d| d.kind == kind)
            .map(|d| d.code)
            .collect()
    }

    /// First scatter code, if the table has one
    pub fn scatter_code(&self) -> Option<SymbolCode> {
        self.codes_of(SymbolKind::Scatter).first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SymbolTable {
        SymbolTable::new(vec![
            SymbolDef::normal(1, "HP1", &[(3, 1.0), (5, 4.0)]),
            SymbolDef::wild(7, "WILD"),
            SymbolDef::scatter(9, "SCATTER"),
        ])
        .unwrap()
    }

    #[test]
    fn test_pay_uses_highest_reached_key() {
        let t = table();
        assert_eq!(t.pay(1, 2), 0.0);
        assert_eq!(t.pay(1, 3), 1.0);
        assert_eq!(t.pay(1, 4), 1.0);
        assert_eq!(t.pay(1, 6), 4.0);
    }

    #[test]
    fn test_kinds() {
        let t = table();
        assert_eq!(t.kind(7), Some(SymbolKind::Wild));
        assert_eq!(t.kind(EMPTY), None);
        assert_eq!(t.kind(200), None);
        assert_eq!(t.scatter_code(), Some(9));
        assert_eq!(t.normal_codes(), vec![1]);
    }

    #[test]
    fn test_rejects_empty_and_duplicate_codes() {
        assert!(SymbolTable::new(vec![SymbolDef::normal(0, "X", &[])]).is_err());
        assert!(
            SymbolTable::new(vec![
                SymbolDef::normal(2, "A", &[]),
                SymbolDef::normal(2, "B", &[]),
            ])
            .is_err()
        );
    }
}
