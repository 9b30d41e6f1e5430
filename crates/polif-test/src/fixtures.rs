//! Shared polifunction fixtures and input generators

use std::collections::BTreeSet;

use polif_core::{
    lift_to_set, BasicIntervalValuedPolifunction, BasicSetValuedPolifunction, Interval,
    LiftedPolifunction, NonNegativeReals, Predicate, Real, Reals, UnionPolifunction, Universe,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Lifted `x ↦ x²` from the reals into the non-negative reals
pub type Square = LiftedPolifunction<Reals, NonNegativeReals>;

/// Lifted `x ↦ √|x|`
pub type SqrtAbs = LiftedPolifunction<Reals, NonNegativeReals>;

pub fn square() -> Square {
    lift_to_set(|x: &Real| Ok(*x * *x), Reals, NonNegativeReals)
}

pub fn sqrt_abs() -> SqrtAbs {
    lift_to_set(|x: &Real| Ok(x.abs().sqrt()), Reals, NonNegativeReals)
}

/// `{x², √|x|}`
pub fn square_or_root() -> UnionPolifunction<Square, SqrtAbs> {
    UnionPolifunction::new(square(), sqrt_abs())
}

/// `x ↦ [x - 1, x + 1]`
pub fn plus_minus_one() -> BasicIntervalValuedPolifunction<Reals, Reals> {
    BasicIntervalValuedPolifunction::new(
        |x: &Real| Interval::closed(*x - Real::ONE, *x + Real::ONE),
        Reals,
        Reals,
    )
}

type PositiveInts = Predicate<i64, fn(&i64) -> bool>;

fn is_positive(n: &i64) -> bool {
    *n > 0
}

/// Positive divisors of a positive integer
pub fn divisors() -> BasicSetValuedPolifunction<PositiveInts, Universe<i64>> {
    BasicSetValuedPolifunction::new(
        |n: &i64| {
            let mut found = BTreeSet::new();
            let mut d = 1;
            while d * d <= *n {
                if n % d == 0 {
                    found.insert(d);
                    found.insert(n / d);
                }
                d += 1;
            }
            Ok(found)
        },
        Predicate::new(is_positive as fn(&i64) -> bool),
        Universe::<i64>::new(),
    )
}

/// Deterministic input generator
pub struct InputGenerator {
    rng: StdRng,
}

impl InputGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// `count` finite reals in `[-magnitude, magnitude)`
    pub fn reals(&mut self, count: usize, magnitude: f64) -> Vec<Real> {
        (0..count)
            .map(|_| Real::new(self.rng.gen_range(-magnitude..magnitude)))
            .collect()
    }

    /// `count` integers in `[low, high)`
    pub fn ints(&mut self, count: usize, low: i64, high: i64) -> Vec<i64> {
        (0..count).map(|_| self.rng.gen_range(low..high)).collect()
    }

    /// Mixes non-finite values into `count` reals
    pub fn reals_with_specials(&mut self, count: usize, magnitude: f64) -> Vec<Real> {
        const SPECIALS: [f64; 3] = [f64::NAN, f64::INFINITY, f64::NEG_INFINITY];
        (0..count)
            .map(|_| {
                if self.rng.gen_bool(0.1) {
                    Real::new(SPECIALS[self.rng.gen_range(0..SPECIALS.len())])
                } else {
                    Real::new(self.rng.gen_range(-magnitude..magnitude))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polif_core::{Polifunction, SetValuedPolifunction};

    #[test]
    fn test_divisors() {
        let pf = divisors();
        assert_eq!(pf.value_set(&12).unwrap(), BTreeSet::from([1, 2, 3, 4, 6, 12]));
        assert_eq!(pf.cardinality(&7).unwrap(), 2);
        assert!(!pf.in_domain(&0));
    }

    #[test]
    fn test_generator_is_deterministic() {
        let a = InputGenerator::new(7).reals(16, 10.0);
        let b = InputGenerator::new(7).reals(16, 10.0);
        assert_eq!(a, b);
        assert!(a.iter().all(|x| x.is_finite() && x.abs().value() <= 10.0));
    }
}
