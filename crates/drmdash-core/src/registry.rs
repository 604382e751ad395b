//! # Benchmark Registries
//!
//! Static code → (display name, color) tables for benchmark aggregates.
//!
//! - The regional registry holds the African aggregates (SSA, AFE, AFW)
//! - The global registry is the regional one extended with five more regions
//! - Declaration order is the order series are drawn and listed
//! - No dynamic registration: a registry is fixed once constructed

use crate::types::{BenchmarkEntry, BenchmarkOption, DashError, RegionCode};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Regional entries, in declaration order.
const REGIONAL: [(RegionCode, &str, &str); 3] = [
    (RegionCode::SSA, "Sub-Saharan Africa", "#c0392b"),
    (RegionCode::AFE, "Africa Eastern and Southern", "#16a085"),
    (RegionCode::AFW, "Africa Western and Central", "#8e44ad"),
];

/// Entries appended to the regional set to form the global registry.
const GLOBAL_EXTENSION: [(RegionCode, &str, &str); 5] = [
    (RegionCode::EAP, "East Asia & Pacific", "#d35400"),
    (RegionCode::ECA, "Europe & Central Asia", "#2c3e50"),
    (RegionCode::LCR, "Latin America & Caribbean", "#f1c40f"),
    (RegionCode::MNA, "Middle East & North Africa", "#7f8c8d"),
    (RegionCode::SAR, "South Asia", "#27ae60"),
];

// =============================================================================
// SCOPE
// =============================================================================

/// Which benchmark set a registry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkScope {
    Regional,
    Global,
}

impl BenchmarkScope {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regional => "regional",
            Self::Global => "global",
        }
    }
}

impl fmt::Display for BenchmarkScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BenchmarkScope {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regional" => Ok(Self::Regional),
            "global" => Ok(Self::Global),
            _ => Err(DashError::InvalidRequest(format!(
                "Unknown benchmark scope: {}. Use: regional, global",
                s
            ))),
        }
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// An ordered, read-only benchmark registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkRegistry {
    scope: BenchmarkScope,
    entries: Vec<BenchmarkEntry>,
}

impl BenchmarkRegistry {
    /// The regional registry: SSA, AFE, AFW.
    #[must_use]
    pub fn regional() -> Self {
        Self {
            scope: BenchmarkScope::Regional,
            entries: REGIONAL.iter().map(to_entry).collect(),
        }
    }

    /// The global registry: the regional entries followed by
    /// EAP, ECA, LCR, MNA, SAR.
    #[must_use]
    pub fn global() -> Self {
        let mut entries = Self::regional().entries;
        entries.extend(GLOBAL_EXTENSION.iter().map(to_entry));
        Self {
            scope: BenchmarkScope::Global,
            entries,
        }
    }

    /// Registry for a scope.
    #[must_use]
    pub fn for_scope(scope: BenchmarkScope) -> Self {
        match scope {
            BenchmarkScope::Regional => Self::regional(),
            BenchmarkScope::Global => Self::global(),
        }
    }

    #[must_use]
    pub fn scope(&self) -> BenchmarkScope {
        self.scope
    }

    /// Map code → display name.
    #[must_use]
    pub fn names(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|e| (e.code.clone(), e.display_name.clone()))
            .collect()
    }

    /// Map code → hex color.
    #[must_use]
    pub fn colors(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|e| (e.code.clone(), e.color.clone()))
            .collect()
    }

    /// Selector options in declaration order.
    #[must_use]
    pub fn options(&self) -> Vec<BenchmarkOption> {
        self.entries
            .iter()
            .map(|e| BenchmarkOption {
                code: e.code.clone(),
                display_name: e.display_name.clone(),
            })
            .collect()
    }

    /// All entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[BenchmarkEntry] {
        &self.entries
    }

    /// Codes in declaration order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.code.as_str())
    }

    #[must_use]
    pub fn get(&self, code: &str) -> Option<&BenchmarkEntry> {
        self.entries.iter().find(|e| e.code == code)
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries named in `codes`, in declaration order.
    ///
    /// The iteration order of `codes` has no effect. Codes not in the
    /// registry are dropped.
    #[must_use]
    pub fn select(&self, codes: &BTreeSet<String>) -> Vec<&BenchmarkEntry> {
        self.entries
            .iter()
            .filter(|e| codes.contains(&e.code))
            .collect()
    }
}

fn to_entry(&(code, name, color): &(RegionCode, &str, &str)) -> BenchmarkEntry {
    BenchmarkEntry::new(code.as_str(), name, color)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn regional_has_three_entries() {
        let reg = BenchmarkRegistry::regional();
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.codes().collect::<Vec<_>>(), vec!["SSA", "AFE", "AFW"]);
        assert_eq!(reg.scope(), BenchmarkScope::Regional);
    }

    #[test]
    fn global_extends_regional() {
        let global = BenchmarkRegistry::global();
        assert_eq!(global.len(), 8);
        assert_eq!(
            global.codes().collect::<Vec<_>>(),
            vec!["SSA", "AFE", "AFW", "EAP", "ECA", "LCR", "MNA", "SAR"]
        );
    }

    #[test]
    fn shared_codes_have_identical_values() {
        let regional = BenchmarkRegistry::regional();
        let global = BenchmarkRegistry::global();
        let (gn, gc) = (global.names(), global.colors());

        for (code, name) in regional.names() {
            assert_eq!(gn.get(&code), Some(&name));
        }
        for (code, color) in regional.colors() {
            assert_eq!(gc.get(&code), Some(&color));
        }
        assert!(gn.len() > regional.names().len());
    }

    #[test]
    fn select_uses_declaration_order() {
        let reg = BenchmarkRegistry::regional();
        let picked: Vec<&str> = reg
            .select(&codes(&["AFW", "SSA"]))
            .iter()
            .map(|e| e.code.as_str())
            .collect();
        assert_eq!(picked, vec!["SSA", "AFW"]);
    }

    #[test]
    fn select_drops_unknown_codes() {
        let reg = BenchmarkRegistry::regional();
        let picked = reg.select(&codes(&["EAP", "XXX", "AFE"]));
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].code, "AFE");
    }

    #[test]
    fn options_follow_declaration_order() {
        let opts = BenchmarkRegistry::global().options();
        assert_eq!(opts[0].code, "SSA");
        assert_eq!(opts[7].code, "SAR");
        assert_eq!(opts[3].display_name, "East Asia & Pacific");
    }

    #[test]
    fn colors_are_hex() {
        for entry in BenchmarkRegistry::global().entries() {
            assert!(entry.color.starts_with('#'));
            assert_eq!(entry.color.len(), 7);
        }
    }

    #[test]
    fn scope_parsing() {
        assert_eq!("Global".parse::<BenchmarkScope>().expect("parse"), BenchmarkScope::Global);
        assert_eq!(
            BenchmarkRegistry::for_scope("regional".parse().expect("parse")),
            BenchmarkRegistry::regional()
        );
        assert!("world".parse::<BenchmarkScope>().is_err());
    }
}
