//! Squares, sums of squares and estimating chains of powers.

use std::cell::RefCell;

use rand::RngCore;
use tracing::trace;

use mathdrill_core::eval::Evaluator;
use mathdrill_core::markup::prettify_expression;
use mathdrill_core::random;
use mathdrill_core::range::{NumericRange, RangeStore};
use mathdrill_core::{
    Problem, ProblemSupplier, Setting, SettingError, SettingRef, SupplierError, Tolerance,
};

use crate::simple_expression;

/// Tolerance of approximate problems unless configured otherwise.
pub const DEFAULT_TOLERANCE_PERCENT: i64 = 5;

/// `n²` for `n` in the configured range.
#[derive(Debug)]
pub struct SquaresSupplier {
    base: Setting<NumericRange>,
}

impl SquaresSupplier {
    pub const NAME: &'static str = "Squares";
    const BASE: RangeStore = RangeStore::of(0, 200, 1, 30);

    pub fn new() -> Result<Self, SettingError> {
        Self::with_bases(Self::BASE.low, Self::BASE.high)
    }

    pub fn with_bases(low: i64, high: i64) -> Result<Self, SettingError> {
        let base = Self::BASE.named("Base")?;
        base.set_bounds(low, high)?;
        Ok(Self { base })
    }

    pub fn base(&self) -> &Setting<NumericRange> {
        &self.base
    }
}

impl ProblemSupplier for SquaresSupplier {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn settings(&self) -> Vec<SettingRef<'_>> {
        vec![SettingRef::Range(&self.base)]
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Result<Problem, SupplierError> {
        simple_expression(&format!("{}^2", self.base.pick(rng)))
    }
}

/// `a² + (3a)²`, which is always `10a²`.
#[derive(Debug)]
pub struct SumOfSquaresX3XSupplier {
    base: Setting<NumericRange>,
}

impl SumOfSquaresX3XSupplier {
    pub const NAME: &'static str = "Sum of squares with bases x and 3x";
    const BASE: RangeStore = RangeStore::of(1, 30, 3, 25);

    pub fn new() -> Result<Self, SettingError> {
        Ok(Self {
            base: Self::BASE.named("Base of smaller term")?,
        })
    }
}

impl ProblemSupplier for SumOfSquaresX3XSupplier {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn settings(&self) -> Vec<SettingRef<'_>> {
        vec![SettingRef::Range(&self.base)]
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Result<Problem, SupplierError> {
        let smaller = self.base.pick(rng);
        simple_expression(&format!("{smaller}^2+{}^2", 3 * smaller))
    }
}

/// A chain of powers joined by `×` (and `÷` when division is on), answered
/// approximately.
///
/// "Terms" counts the operators, so a chain has one more power than that.
#[derive(Debug)]
pub struct ExponentApproximationSupplier {
    division: Setting<bool>,
    terms: Setting<NumericRange>,
    exponents: Setting<NumericRange>,
    bases: Setting<NumericRange>,
    tolerance: RefCell<Tolerance>,
}

impl ExponentApproximationSupplier {
    pub const NAME: &'static str = "Exponent approximation";
    const TERMS: RangeStore = RangeStore::of(1, 4, 1, 3);
    const EXPONENTS: RangeStore = RangeStore::of(1, 6, 1, 4);
    const BASES: RangeStore = RangeStore::of(1, 100, 1, 20);

    pub fn new() -> Result<Self, SettingError> {
        Ok(Self {
            division: Setting::new("Division", true),
            terms: Self::TERMS.named("Terms")?,
            exponents: Self::EXPONENTS.named("Exponents")?,
            bases: Self::BASES.named("Bases")?,
            tolerance: RefCell::new(Tolerance::percent(DEFAULT_TOLERANCE_PERCENT)),
        })
    }

    pub fn division(&self) -> &Setting<bool> {
        &self.division
    }

    fn power(&self, rng: &mut dyn RngCore) -> String {
        format!("{}^{}", self.bases.pick(rng), self.exponents.pick(rng))
    }
}

impl ProblemSupplier for ExponentApproximationSupplier {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn settings(&self) -> Vec<SettingRef<'_>> {
        vec![
            SettingRef::Toggle(&self.division),
            SettingRef::Range(&self.terms),
            SettingRef::Range(&self.exponents),
            SettingRef::Range(&self.bases),
        ]
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Result<Problem, SupplierError> {
        let operators = self.terms.pick(rng);
        let mut expression = self.power(rng);
        for _ in 0..operators {
            let divide = self.division.get() && random::coin(rng);
            expression.push(if divide { '/' } else { '*' });
            expression.push_str(&self.power(rng));
        }
        trace!(%expression, "exponent approximation");
        let value = Evaluator::default().evaluate(&expression)?;
        let tolerance = self.tolerance.borrow().clone();
        Ok(Problem::approximation(
            prettify_expression(&expression),
            value,
            tolerance,
        )?)
    }

    fn tolerance(&self) -> Option<Tolerance> {
        Some(self.tolerance.borrow().clone())
    }

    fn set_tolerance(&self, tolerance: Tolerance) -> bool {
        *self.tolerance.borrow_mut() = tolerance;
        true
    }
}
