//! Property-based test generators using proptest.
//!
//! Provides strategies for generating tables whose CSV rendering reads back
//! to the same cells under the default reader configuration.

use crate::fixtures::Table;
use proptest::prelude::*;
use std::collections::HashSet;

/// Strategy for generating header names.
pub fn header_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,11}").expect("Invalid regex")
}

/// Strategy for generating primary key values.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z0-9-]{1,10}").expect("Invalid regex")
}

/// Strategy for generating cell values.
///
/// Values may contain delimiters, quotes and line breaks, but never leading
/// or trailing whitespace, so trimming leaves them unchanged.
pub fn cell_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 ,\"\n]{0,16}")
        .expect("Invalid regex")
        .prop_map(|s| s.trim().to_string())
}

/// Strategy for generating tables with a unique first column.
///
/// Tables have 2 to 5 distinct headers and `min_rows..max_rows` rows.
pub fn table_strategy(min_rows: usize, max_rows: usize) -> impl Strategy<Value = Table> {
    let headers = prop::collection::hash_set(header_strategy(), 2..6)
        .prop_map(|set| set.into_iter().collect::<Vec<_>>());
    let keys = prop::collection::hash_set(key_strategy(), min_rows..max_rows)
        .prop_map(|set| set.into_iter().collect::<Vec<_>>());

    (headers, keys).prop_flat_map(|(headers, keys)| {
        let width = headers.len() - 1;
        let cells = prop::collection::vec(
            prop::collection::vec(cell_strategy(), width),
            keys.len(),
        );
        (Just(headers), Just(keys), cells).prop_map(|(headers, keys, cells)| Table {
            headers,
            rows: keys
                .into_iter()
                .zip(cells)
                .map(|(key, rest)| std::iter::once(key).chain(rest).collect())
                .collect(),
        })
    })
}

/// Strategy for generating tables where some keys repeat.
///
/// Every row's key is drawn from a small pool, so duplicates are common.
pub fn duplicate_key_table_strategy(max_rows: usize) -> impl Strategy<Value = Table> {
    let pool = prop::collection::vec(key_strategy(), 1..4);
    (pool, 1..max_rows.max(2)).prop_flat_map(|(pool, rows)| {
        let picks = prop::collection::vec((0..pool.len(), cell_strategy()), rows);
        (Just(pool), picks).prop_map(|(pool, picks)| Table {
            headers: vec!["key".to_string(), "value".to_string()],
            rows: picks
                .into_iter()
                .map(|(i, value)| vec![pool[i].clone(), value])
                .collect(),
        })
    })
}

/// Returns the index of the first row keyed `key`.
pub fn first_row_with_key(table: &Table, key: &str) -> Option<usize> {
    table.rows.iter().position(|row| row[0] == key)
}

/// Returns the distinct keys of `table` in first-seen order.
pub fn distinct_keys(table: &Table) -> Vec<String> {
    let mut seen = HashSet::new();
    table
        .rows
        .iter()
        .filter(|row| seen.insert(row[0].clone()))
        .map(|row| row[0].clone())
        .collect()
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
