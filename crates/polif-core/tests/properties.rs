//! Property-based tests for the polifunction contracts
//!
//! These tests use proptest to check the laws every polifunction and every
//! operation must satisfy, over generated inputs and mapping tables.

use std::collections::BTreeSet;

use polif_core::{
    compose, compose_into, lift_to_set, to_interval, BasicIntervalValuedPolifunction,
    BasicSetValuedPolifunction, ErrorKind, Interval, IntervalValuedPolifunction, Polifunction,
    PolifunctionError, Predicate, SetValuedPolifunction, UnionPolifunction, Universe,
};
use proptest::prelude::*;

// ===== Strategies for generating test data =====

/// Small output sets, possibly empty
fn arb_value_set() -> impl Strategy<Value = BTreeSet<i64>> {
    prop::collection::btree_set(-50i64..50, 0..8)
}

/// Nonempty output sets
fn arb_nonempty_set() -> impl Strategy<Value = BTreeSet<i64>> {
    prop::collection::btree_set(-50i64..50, 1..8)
}

/// Modulus used to carve a domain out of the integers
fn arb_modulus() -> impl Strategy<Value = i64> {
    prop_oneof![Just(1i64), 2i64..6]
}

fn constant_set(
    values: BTreeSet<i64>,
) -> BasicSetValuedPolifunction<Universe<i64>, Universe<i64>> {
    BasicSetValuedPolifunction::new(
        move |_: &i64| Ok(values.clone()),
        Universe::<i64>::new(),
        Universe::<i64>::new(),
    )
}

/// Outputs `{x + o | o ∈ offsets}`
fn shifted(
    offsets: BTreeSet<i64>,
) -> BasicSetValuedPolifunction<Universe<i64>, Universe<i64>> {
    BasicSetValuedPolifunction::new(
        move |x: &i64| Ok(offsets.iter().map(|o| x + o).collect()),
        Universe::<i64>::new(),
        Universe::<i64>::new(),
    )
}

// ===== Property Tests =====

proptest! {
    #[test]
    fn prop_domain_error_iff_outside_domain(modulus in arb_modulus(), x in -100i64..100) {
        let pf = lift_to_set(
            |n: &i64| Ok(n * 3),
            Predicate::new(move |n: &i64| n.rem_euclid(modulus) == 0),
            Universe::<i64>::new(),
        );
        let result = pf.evaluate(&x);
        prop_assert_eq!(
            matches!(result, Err(PolifunctionError::Domain)),
            !pf.in_domain(&x)
        );
    }

    #[test]
    fn prop_cardinality_matches_value_set(values in arb_value_set(), x in any::<i64>()) {
        let pf = constant_set(values);
        prop_assert_eq!(pf.cardinality(&x).unwrap(), pf.value_set(&x).unwrap().len());
    }

    #[test]
    fn prop_contains_value_is_membership(
        values in arb_value_set(),
        candidate in -60i64..60,
    ) {
        let pf = constant_set(values.clone());
        prop_assert_eq!(pf.contains_value(&0, &candidate).unwrap(), values.contains(&candidate));
    }

    #[test]
    fn prop_interval_contains_is_bound_comparison(
        a in -100i64..100,
        b in -100i64..100,
        lower_inclusive in any::<bool>(),
        upper_inclusive in any::<bool>(),
        candidate in -120i64..120,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let interval = Interval::new(lo, hi, lower_inclusive, upper_inclusive).unwrap();
        let pf = BasicIntervalValuedPolifunction::new(
            move |_: &i64| Ok(interval.clone()),
            Universe::<i64>::new(),
            Universe::<i64>::new(),
        );

        let above = if lower_inclusive { candidate >= lo } else { candidate > lo };
        let below = if upper_inclusive { candidate <= hi } else { candidate < hi };
        prop_assert_eq!(pf.contains_value(&0, &candidate).unwrap(), above && below);

        let width = pf.interval_width(&0).unwrap();
        prop_assert_eq!(width, hi - lo);
        prop_assert!(width >= 0);
    }

    #[test]
    fn prop_to_interval_is_min_max(values in arb_nonempty_set()) {
        let min = *values.iter().next().unwrap();
        let max = *values.iter().next_back().unwrap();
        let interval = to_interval(constant_set(values)).value_interval(&0).unwrap();

        prop_assert_eq!(*interval.lower(), min);
        prop_assert_eq!(*interval.upper(), max);
        prop_assert!(interval.lower_inclusive() && interval.upper_inclusive());
    }

    #[test]
    fn prop_lift_is_singleton(x in -1000i64..1000) {
        let pf = lift_to_set(|n: &i64| Ok(2 * n + 1), Universe::<i64>::new(), Universe::<i64>::new());
        prop_assert_eq!(pf.value_set(&x).unwrap(), BTreeSet::from([2 * x + 1]));
        prop_assert_eq!(pf.cardinality(&x).unwrap(), 1);
    }

    #[test]
    fn prop_lift_passes_errors_unchanged(x in -1000i64..1000) {
        let pf = lift_to_set(
            |n: &i64| -> Result<i64, PolifunctionError> {
                Err(PolifunctionError::Convergence { iterations: 3, detail: format!("at {}", n) })
            },
            Universe::<i64>::new(),
            Universe::<i64>::new(),
        );
        prop_assert_eq!(
            pf.evaluate(&x).unwrap_err(),
            PolifunctionError::Convergence { iterations: 3, detail: format!("at {}", x) }
        );
    }

    #[test]
    fn prop_union_is_set_union(a in arb_value_set(), b in arb_value_set(), x in any::<i64>()) {
        let expected: BTreeSet<i64> = a.union(&b).copied().collect();
        let union = UnionPolifunction::new(constant_set(a), constant_set(b));
        prop_assert_eq!(union.value_set(&x).unwrap(), expected);
    }

    #[test]
    fn prop_compose_unions_over_intermediates(
        inner_offsets in arb_value_set(),
        outer_offsets in arb_value_set(),
        x in -100i64..100,
    ) {
        let expected: BTreeSet<i64> = inner_offsets
            .iter()
            .flat_map(|i| outer_offsets.iter().map(move |o| x + i + o))
            .collect();
        let composed = compose_into(shifted(outer_offsets), shifted(inner_offsets));
        prop_assert_eq!(composed.value_set(&x).unwrap(), expected);
    }

    #[test]
    fn prop_compose_inner_failure_unchanged(x in -100i64..100) {
        let inner = lift_to_set(
            |_: &i64| -> Result<i64, PolifunctionError> { Err(PolifunctionError::Cancelled) },
            Universe::<i64>::new(),
            Universe::<i64>::new(),
        );
        let composed = compose(shifted(BTreeSet::from([1])), inner, |v: &i64| Some(*v));
        prop_assert_eq!(composed.evaluate(&x).unwrap_err().kind(), ErrorKind::Cancelled);
    }
}
