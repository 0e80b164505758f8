//! Property-based tests for the selection and analytics invariants
//!
//! - Regression is a pure function of the multiset of pairs
//! - Degenerate inputs never produce a line
//! - Empty and full candidates both normalize to the sentinel
//! - Aggregates stay ordered and ignore NaN

use proptest::prelude::*;
use pw_core::analytics::{fit, summarize, Aggregate, NoFit};
use pw_core::{FieldId, Record, RecordIdx, RecordSet, RecordStore, Selection};

// ============================================================================
// Strategies
// ============================================================================

/// Integer x and quarter-step y keep every running sum exact
fn arb_pairs(max: usize) -> impl Strategy<Value = Vec<(f64, f64)>> {
    proptest::collection::vec((0u32..60, 320u32..480), 2..max).prop_map(|raw| {
        raw.into_iter()
            .map(|(x, y)| (x as f64, y as f64 / 4.0))
            .collect()
    })
}

fn store_of(pairs: &[(f64, f64)]) -> RecordStore {
    RecordStore::from_records(
        pairs
            .iter()
            .map(|&(x, y)| {
                Record::empty()
                    .with_value(FieldId::TyreLife, x)
                    .with_value(FieldId::LapTime, y)
            })
            .collect(),
    )
}

fn fit_all(store: &RecordStore) -> Result<pw_core::RegressionModel, NoFit> {
    fit(store, &store.all(), FieldId::TyreLife, FieldId::LapTime)
}

/// `a <= b` up to interpolation rounding
fn le(a: f64, b: f64) -> bool {
    a <= b + 1e-9
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: shuffling the input never changes the fitted line
    #[test]
    fn prop_regression_order_independent(
        (pairs, shuffled) in arb_pairs(40).prop_flat_map(|pairs| {
            let shuffled = Just(pairs.clone()).prop_shuffle();
            (Just(pairs), shuffled)
        })
    ) {
        let a = fit_all(&store_of(&pairs));
        let b = fit_all(&store_of(&shuffled));
        match (a, b) {
            (Ok(a), Ok(b)) => {
                prop_assert!(close(a.slope, b.slope));
                prop_assert!(close(a.intercept, b.intercept));
            }
            (a, b) => prop_assert_eq!(a, b),
        }
    }

    /// Property: identical x values are always degenerate
    #[test]
    fn prop_constant_x_is_no_fit(
        x in 0u32..60,
        ys in proptest::collection::vec(80.0f64..100.0, 2..30)
    ) {
        let pairs: Vec<(f64, f64)> = ys.into_iter().map(|y| (x as f64, y)).collect();
        prop_assert_eq!(fit_all(&store_of(&pairs)), Err(NoFit::DegenerateX));
    }

    /// Property: the fitted line passes through the centroid
    #[test]
    fn prop_line_through_centroid(pairs in arb_pairs(40)) {
        let store = store_of(&pairs);
        if let Ok(model) = fit_all(&store) {
            let n = pairs.len() as f64;
            let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
            let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
            prop_assert!((model.predict(mean_x) - mean_y).abs() < 1e-6);
        }
    }

    /// Property: only empty or full candidates become the sentinel
    #[test]
    fn prop_sentinel_equivalence(
        len in 1usize..30,
        picks in proptest::collection::vec(any::<bool>(), 30)
    ) {
        let store = store_of(&vec![(1.0, 90.0); len]);
        let candidate: RecordSet = picks
            .iter()
            .take(len)
            .enumerate()
            .filter(|(_, keep)| **keep)
            .map(|(i, _)| RecordIdx(i))
            .collect();

        let sentinel = candidate.is_empty() || candidate.len() == len;
        let selection = Selection::normalize(candidate.clone(), &store);
        prop_assert_eq!(selection.is_everything(), sentinel);

        let effective = selection.effective(&store);
        prop_assert!(!effective.is_empty());
        if sentinel {
            prop_assert_eq!(effective, store.all());
        } else {
            prop_assert_eq!(effective, candidate);
        }
    }

    /// Property: quartiles and whiskers are ordered within the data range
    #[test]
    fn prop_aggregate_ordering(
        values in proptest::collection::vec(prop_oneof![
            4 => (60.0f64..120.0),
            1 => Just(f64::NAN),
        ], 0..50)
    ) {
        let pairs: Vec<(f64, f64)> = values.iter().map(|&v| (0.0, v)).collect();
        let store = store_of(&pairs);
        let finite = values.iter().filter(|v| !v.is_nan()).count();

        match summarize(&store, &store.all(), FieldId::LapTime) {
            Aggregate::NoData => prop_assert_eq!(finite, 0),
            Aggregate::Snapshot(s) => {
                prop_assert_eq!(s.count, finite);
                let ordered = [s.min, s.whisker_low, s.q1, s.median, s.q3, s.whisker_high, s.max];
                for pair in ordered.windows(2) {
                    prop_assert!(le(pair[0], pair[1]), "{:?}", ordered);
                }
                prop_assert!(le(s.min, s.mean) && le(s.mean, s.max));
                prop_assert_eq!(store.get(s.argmin).map(|r| r.value(FieldId::LapTime)), Some(s.min));
            }
        }
    }
}
