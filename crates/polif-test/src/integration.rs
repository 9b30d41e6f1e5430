//! End-to-end Integration Test Suite
//!
//! Tests that exercise the full pipeline:
//! - Lifting, union, composition and conversion on real polifunctions
//! - Memoized and batched evaluation agreeing with direct evaluation
//! - Wire round-trips of evaluated values
//! - Contract laws over generated inputs

use std::collections::BTreeSet;

use polif_core::{
    compose_into, evaluate_batch, memoize, to_interval, BatchConfig, IntervalValuedPolifunction,
    Polifunction, PolifunctionError, PolifunctionValue, Real, SetValuedPolifunction,
};
use polif_wire::{decode_value, encode_value};

use crate::fixtures::{plus_minus_one, square, square_or_root, InputGenerator};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Contract check configuration
#[derive(Debug, Clone)]
pub struct ContractCheckConfig {
    /// Number of generated inputs
    pub samples: usize,

    /// Inputs are drawn from `[-magnitude, magnitude)`
    pub magnitude: f64,

    /// Mix NaN and infinities into the inputs
    pub include_specials: bool,

    /// Random seed
    pub seed: u64,
}

impl Default for ContractCheckConfig {
    fn default() -> Self {
        Self {
            samples: 256,
            magnitude: 1.0e3,
            include_specials: true,
            seed: 42,
        }
    }
}

impl ContractCheckConfig {
    /// Minimal configuration
    pub fn minimal() -> Self {
        Self {
            samples: 16,
            include_specials: false,
            ..Default::default()
        }
    }

    pub fn standard() -> Self {
        Self::default()
    }

    /// Stress configuration
    pub fn stress() -> Self {
        Self {
            samples: 4096,
            magnitude: 1.0e150,
            include_specials: true,
            seed: 0xC0FFEE,
        }
    }
}

/// Result of a contract check run
#[derive(Debug, Clone, Default)]
pub struct ContractCheckResult {
    /// Inputs evaluated
    pub samples_checked: usize,

    /// Inputs outside the domain
    pub domain_rejections: usize,

    /// Law violations, one line each
    pub violations: Vec<String>,
}

impl ContractCheckResult {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

// ============================================================================
// HARNESS
// ============================================================================

/// Checks the contract laws of the fixture polifunctions on generated inputs
pub struct ContractHarness {
    config: ContractCheckConfig,
    generator: InputGenerator,
}

impl ContractHarness {
    pub fn new(config: ContractCheckConfig) -> Self {
        let generator = InputGenerator::new(config.seed);
        Self { config, generator }
    }

    /// Run all checks
    pub fn run(&mut self) -> ContractCheckResult {
        let inputs = if self.config.include_specials {
            self.generator
                .reals_with_specials(self.config.samples, self.config.magnitude)
        } else {
            self.generator.reals(self.config.samples, self.config.magnitude)
        };

        let mut result = ContractCheckResult::default();
        for x in &inputs {
            result.samples_checked += 1;
            if !square_or_root().in_domain(x) {
                result.domain_rejections += 1;
            }
            self.check_input(x, &mut result.violations);
        }
        self.check_batch(&inputs, &mut result.violations);
        result
    }

    fn check_input(&self, x: &Real, violations: &mut Vec<String>) {
        let union = square_or_root();

        // Domain error iff outside the domain
        let outcome = union.evaluate(x);
        if matches!(outcome, Err(PolifunctionError::Domain)) == union.in_domain(x) {
            violations.push(format!("{:?}: domain error disagrees with in_domain", x));
        }

        let values = match union.value_set(x) {
            Ok(values) => values,
            Err(_) => return,
        };

        // Cardinality and membership
        if union.cardinality(x).ok() != Some(values.len()) {
            violations.push(format!("{:?}: cardinality differs from value set size", x));
        }
        for v in &values {
            if union.contains_value(x, v).ok() != Some(true) {
                violations.push(format!("{:?}: contains_value misses {:?}", x, v));
            }
        }

        // Union equals the set union of its operands
        if let (Ok(a), Ok(b)) = (square().value_set(x), crate::fixtures::sqrt_abs().value_set(x)) {
            let expected: BTreeSet<Real> = a.union(&b).copied().collect();
            if expected != values {
                violations.push(format!("{:?}: union is not the set union", x));
            }
        }

        // Interval enclosure is [min, max]
        match to_interval(square_or_root()).value_interval(x) {
            Ok(interval) => {
                if Some(interval.lower()) != values.first()
                    || Some(interval.upper()) != values.last()
                {
                    violations.push(format!("{:?}: interval is not [min, max]", x));
                }
            }
            Err(e) => violations.push(format!("{:?}: to_interval failed: {}", x, e)),
        }

        // Wire round-trip
        let value = PolifunctionValue::Set(values);
        match encode_value(&value).and_then(|bytes| decode_value::<Real>(&bytes)) {
            Ok(decoded) if decoded == value => {}
            Ok(_) => violations.push(format!("{:?}: wire round-trip changed the value", x)),
            Err(e) => violations.push(format!("{:?}: wire round-trip failed: {}", x, e)),
        }
    }

    fn check_batch(&self, inputs: &[Real], violations: &mut Vec<String>) {
        let union = square_or_root();
        let memo = memoize(square_or_root());

        let direct: Vec<_> = inputs.iter().map(|x| union.evaluate(x)).collect();
        let parallel = evaluate_batch(&union, inputs, &BatchConfig::always_parallel(), None);
        let memoized = evaluate_batch(&memo, inputs, &BatchConfig::always_parallel(), None);

        if direct != parallel {
            violations.push("parallel batch differs from direct evaluation".to_string());
        }
        if direct != memoized {
            violations.push("memoized batch differs from direct evaluation".to_string());
        }
    }
}

// ============================================================================
// SCENARIOS
// ============================================================================

/// Outcome of a named end-to-end scenario
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub name: &'static str,
    pub failure: Option<String>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

fn expect(condition: bool, msg: &str) -> Result<(), String> {
    if condition {
        Ok(())
    } else {
        Err(msg.to_string())
    }
}

fn reals(values: &[f64]) -> BTreeSet<Real> {
    values.iter().copied().map(Real::new).collect()
}

/// Lifted square maps 2 to {4} and -3 to {9}
pub fn scenario_lifted_square() -> Result<(), String> {
    let pf = square();
    let at_two = pf.evaluate(&Real::new(2.0)).map_err(|e| e.to_string())?;
    expect(
        at_two == PolifunctionValue::Set(reals(&[4.0])),
        "square(2) is not {4}",
    )?;
    let at_minus_three = pf.evaluate(&Real::new(-3.0)).map_err(|e| e.to_string())?;
    expect(
        at_minus_three == PolifunctionValue::Set(reals(&[9.0])),
        "square(-3) is not {9}",
    )
}

/// Union of square and root at 2 is {4, √2}
pub fn scenario_union() -> Result<(), String> {
    let values = square_or_root()
        .value_set(&Real::new(2.0))
        .map_err(|e| e.to_string())?;
    expect(
        values == reals(&[4.0, std::f64::consts::SQRT_2]),
        "union at 2 is not {4, √2}",
    )
}

/// Enclosure of the union at 2 is [√2, 4], both bounds inclusive
pub fn scenario_enclosure() -> Result<(), String> {
    let interval = to_interval(square_or_root())
        .value_interval(&Real::new(2.0))
        .map_err(|e| e.to_string())?;
    expect(
        *interval.lower() == Real::new(std::f64::consts::SQRT_2)
            && *interval.upper() == Real::new(4.0),
        "enclosure bounds are not [√2, 4]",
    )?;
    expect(
        interval.lower_inclusive() && interval.upper_inclusive(),
        "enclosure bounds are not inclusive",
    )
}

/// `[x - 1, x + 1]` at 3 contains 4 but not 4.0000001
pub fn scenario_interval_membership() -> Result<(), String> {
    let pf = plus_minus_one();
    let x = Real::new(3.0);
    let interval = pf.value_interval(&x).map_err(|e| e.to_string())?;
    expect(
        *interval.lower() == Real::new(2.0) && *interval.upper() == Real::new(4.0),
        "interval at 3 is not [2, 4]",
    )?;
    expect(
        pf.contains_value(&x, &Real::new(4.0)).map_err(|e| e.to_string())?,
        "upper bound not contained",
    )?;
    expect(
        !pf.contains_value(&x, &Real::new(4.0000001))
            .map_err(|e| e.to_string())?,
        "value past the upper bound contained",
    )
}

/// A foreign version tag is a serialization error
pub fn scenario_unknown_version() -> Result<(), String> {
    let mut bytes = encode_value(&PolifunctionValue::Single(Real::ONE)).map_err(|e| e.to_string())?;
    bytes[0..2].copy_from_slice(&0xFFFFu16.to_le_bytes());
    match decode_value::<Real>(&bytes) {
        Err(PolifunctionError::Serialization(_)) => Ok(()),
        other => Err(format!("expected a serialization error, got {:?}", other)),
    }
}

/// Root after square is |x|
pub fn scenario_composition() -> Result<(), String> {
    let pf = compose_into(crate::fixtures::sqrt_abs(), square());
    let values = pf.value_set(&Real::new(-3.0)).map_err(|e| e.to_string())?;
    expect(values == reals(&[3.0]), "√(x²) at -3 is not {3}")
}

/// Run every scenario
pub fn run_scenarios() -> Vec<ScenarioReport> {
    let scenarios: [(&'static str, fn() -> Result<(), String>); 6] = [
        ("lifted_square", scenario_lifted_square),
        ("union", scenario_union),
        ("enclosure", scenario_enclosure),
        ("interval_membership", scenario_interval_membership),
        ("unknown_version", scenario_unknown_version),
        ("composition", scenario_composition),
    ];
    scenarios
        .into_iter()
        .map(|(name, run)| ScenarioReport {
            name,
            failure: run().err(),
        })
        .collect()
}
