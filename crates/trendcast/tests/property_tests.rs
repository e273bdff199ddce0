//! Property-based tests for column detection and normalization.
//!
//! # Testing Philosophy
//!
//! 1. **No panics**: detection and normalization never crash on any cells
//! 2. **Closed results**: detected names always come from the table
//! 3. **Invariants**: prepared series are sorted, never grow and repeat exactly
//!
//! # Running Property Tests
//!
//! ```bash
//! PROPTEST_CASES=10000 cargo test -p trendcast --test property_tests
//! ```

use chrono::NaiveDate;
use proptest::prelude::*;

use trendcast::{Cell, RawTable, SchemaProber, prepare};

// =============================================================================
// Test Strategies
// =============================================================================

/// Text that sometimes looks like a date or a number.
fn text_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9_\\-\\.\\s]{0,20}",
        "20[0-3][0-9]-[01][0-9]-[0-3][0-9]",
        "[01][0-9]/[0-3][0-9]/20[0-3][0-9]",
        "-?[0-9]{1,6}(\\.[0-9]{1,3})?",
        Just("NA".to_string()),
        Just(String::new()),
    ]
}

fn any_cell() -> impl Strategy<Value = Cell> {
    prop_oneof![
        text_cell().prop_map(Cell::Text),
        any::<f64>().prop_map(Cell::Number),
        (2000i32..2040, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| {
            Cell::from(NaiveDate::from_ymd_opt(y, m, d).unwrap())
        }),
        Just(Cell::Missing),
    ]
}

/// A table of 1-5 columns sharing one row count.
fn any_table() -> impl Strategy<Value = RawTable> {
    (1usize..5, 0usize..40).prop_flat_map(|(cols, rows)| {
        prop::collection::vec(prop::collection::vec(any_cell(), rows), cols).prop_map(|columns| {
            RawTable::from_columns(
                columns
                    .into_iter()
                    .enumerate()
                    .map(|(i, cells)| (format!("col_{}", i), cells)),
            )
            .unwrap()
        })
    })
}

// =============================================================================
// Schema Prober Properties
// =============================================================================

proptest! {
    #[test]
    fn date_detection_returns_known_column(table in any_table(), threshold in 0.0f64..=1.0) {
        let prober = SchemaProber::with_threshold(threshold);
        if let Some(name) = prober.detect_date_column(&table) {
            prop_assert!(table.has_column(&name));
        }
    }

    #[test]
    fn numeric_detection_respects_exclusions(table in any_table()) {
        let prober = SchemaProber::new();
        let names = table.column_names();
        let exclude = [names[0].as_str()];

        let numeric = prober.detect_numeric_columns(&table, &exclude);
        prop_assert!(!numeric.contains(&names[0]));
        for name in &numeric {
            prop_assert!(table.has_column(name));
        }
    }

    #[test]
    fn one_bad_cell_excludes_column(values in prop::collection::vec(-1e6f64..1e6, 1..200), bad_at in any::<prop::sample::Index>()) {
        let mut cells: Vec<Cell> = values.into_iter().map(Cell::Number).collect();
        let idx = bad_at.index(cells.len());
        cells[idx] = Cell::Text("n/a-ish".to_string());

        let table = RawTable::from_columns(vec![("amount", cells)]).unwrap();
        prop_assert!(SchemaProber::new().detect_numeric_columns(&table, &[]).is_empty());
    }

    #[test]
    fn detection_is_deterministic(table in any_table()) {
        let prober = SchemaProber::new();
        prop_assert_eq!(prober.suggest_columns(&table), prober.suggest_columns(&table));
    }
}

// =============================================================================
// Normalizer Properties
// =============================================================================

proptest! {
    #[test]
    fn prepare_is_sorted_and_no_longer(
        dates in prop::collection::vec(any_cell(), 0..60),
        seed in any::<u64>(),
    ) {
        let values: Vec<Cell> = dates
            .iter()
            .enumerate()
            .map(|(i, _)| if (seed >> (i % 64)) & 1 == 0 { Cell::Number(i as f64) } else { Cell::from("x") })
            .collect();
        let rows = dates.len();
        let table = RawTable::from_columns(vec![("ds", dates), ("y", values)]).unwrap();

        let series = prepare(&table, "ds", "y").unwrap();
        prop_assert!(series.len() <= rows);
        let timestamps: Vec<_> = series.timestamps().collect();
        prop_assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(series.values().all(f64::is_finite));
    }

    #[test]
    fn prepare_twice_gives_equal_results(table in any_table()) {
        let names = table.column_names();
        let last = names.last().unwrap();
        prop_assert_eq!(
            prepare(&table, &names[0], last).ok(),
            prepare(&table, &names[0], last).ok()
        );
    }

    #[test]
    fn prepare_never_panics(table in any_table()) {
        let names = table.column_names();
        let last = names.last().unwrap();
        let _ = prepare(&table, &names[0], last);
    }
}
