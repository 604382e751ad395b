//! # Property-Based Tests
//!
//! Ordering and row-count invariants of the resolver, checked with proptest.

use drmdash_core::{
    BenchmarkRegistry, CountryRecord, CountryTable, Observation, RegionCode, SeriesKind,
    SeriesRequest, Snapshot, Table, resolve,
};
use proptest::collection::{btree_set, vec};
use proptest::prelude::*;

const REGIONAL: [&str; 3] = ["SSA", "AFE", "AFW"];
const GLOBAL: [&str; 8] = ["SSA", "AFE", "AFW", "EAP", "ECA", "LCR", "MNA", "SAR"];
const COUNTRIES: [&str; 5] = ["KEN", "NGA", "GHA", "ETH", "SEN"];

fn countries() -> CountryTable {
    CountryTable::new(
        COUNTRIES
            .iter()
            .map(|c| CountryRecord::new(*c, RegionCode::SSA, format!("Country {}", c))),
    )
}

/// A table where every country and aggregate has `rows[i]` rows.
fn snapshot_with(rows: &[usize]) -> Snapshot {
    let mut table = Table::new("src");
    for (code, &n) in COUNTRIES.iter().chain(GLOBAL.iter()).zip(rows.iter().cycle()) {
        for year in 0..n {
            table.push(*code, Observation::new(2000 + year as i32, Some(year as f64)));
        }
    }
    Snapshot::new(countries(), [table])
}

fn registry_position(registry: &BenchmarkRegistry, code: &str) -> usize {
    registry
        .codes()
        .position(|c| c == code)
        .unwrap_or(usize::MAX)
}

proptest! {
    /// A country-only request returns one series with the table's row count.
    #[test]
    fn country_row_count_matches_table(
        idx in 0usize..COUNTRIES.len(),
        rows in vec(1usize..30, 13)
    ) {
        let snap = snapshot_with(&rows);
        let code = COUNTRIES[idx];
        let expected = snap.table("src").and_then(|t| t.rows_for(code)).map_or(0, <[Observation]>::len);

        let out = resolve("src", &SeriesRequest::for_country(code), snap.countries(), &snap)
            .expect("resolve");

        prop_assert_eq!(out.len(), 1);
        prop_assert_eq!(out[0].len(), expected);
        prop_assert_eq!(out[0].kind, SeriesKind::SelectedCountry);
    }

    /// Regional output order is declaration order, whatever the input order.
    #[test]
    fn regional_order_is_declaration_order(
        picked in btree_set(0usize..REGIONAL.len(), 1..=REGIONAL.len()),
        reversed in any::<bool>()
    ) {
        let snap = snapshot_with(&[3]);
        let mut input: Vec<&str> = picked.iter().map(|&i| REGIONAL[i]).collect();
        if reversed {
            input.reverse();
        }

        let request = SeriesRequest::new().with_regional(input.clone());
        let out = resolve("src", &request, snap.countries(), &snap).expect("resolve");

        let registry = BenchmarkRegistry::regional();
        let positions: Vec<usize> = out.iter().map(|s| registry_position(&registry, &s.code)).collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        prop_assert_eq!(positions, sorted);
        prop_assert_eq!(out.len(), input.len());
    }

    /// Global output order is declaration order too.
    #[test]
    fn global_order_is_declaration_order(
        picked in btree_set(0usize..GLOBAL.len(), 1..=GLOBAL.len())
    ) {
        let snap = snapshot_with(&[2]);
        let input: Vec<&str> = picked.iter().rev().map(|&i| GLOBAL[i]).collect();

        let request = SeriesRequest::new().with_global(input);
        let out = resolve("src", &request, snap.countries(), &snap).expect("resolve");

        let registry = BenchmarkRegistry::global();
        let positions: Vec<usize> = out.iter().map(|s| registry_position(&registry, &s.code)).collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    /// Unknown benchmark codes never cause an error and never appear.
    #[test]
    fn unknown_codes_dropped(noise in vec("[A-Z]{3}", 0..6)) {
        let snap = snapshot_with(&[1]);
        let request = SeriesRequest::new()
            .with_regional(noise.iter().cloned().chain(["SSA".to_string()]));

        let out = resolve("src", &request, snap.countries(), &snap).expect("resolve");

        prop_assert!(out.iter().all(|s| REGIONAL.contains(&s.code.as_str())));
        prop_assert!(out.iter().any(|s| s.code == "SSA"));
    }

    /// Resolution is deterministic.
    #[test]
    fn resolve_deterministic(
        idx in 0usize..COUNTRIES.len(),
        picked in btree_set(0usize..GLOBAL.len(), 0..4)
    ) {
        let snap = snapshot_with(&[4, 2, 7]);
        let request = SeriesRequest::for_country(COUNTRIES[idx])
            .with_global(picked.iter().map(|&i| GLOBAL[i]));

        let first = resolve("src", &request, snap.countries(), &snap).expect("resolve");
        let second = resolve("src", &request, snap.countries(), &snap).expect("resolve");
        prop_assert_eq!(first, second);
    }
}
