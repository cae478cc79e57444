//! Geometric sequences: nth terms and infinite sums.

use rand::RngCore;

use mathdrill_core::markup::ordinal;
use mathdrill_core::random;
use mathdrill_core::range::{NumericRange, RangeStore};
use mathdrill_core::{
    ArithmeticError, BigFraction, Problem, ProblemSupplier, Setting, SettingError, SettingRef,
    SupplierError,
};

/// `first, first·r, first·r², …`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometricSequence {
    first: BigFraction,
    ratio: BigFraction,
}

impl GeometricSequence {
    pub fn new(first: BigFraction, ratio: BigFraction) -> Self {
        Self { first, ratio }
    }

    /// The 1-based `n`th term.
    pub fn nth_term(&self, n: u32) -> Result<BigFraction, ArithmeticError> {
        let exponent = i32::try_from(n.saturating_sub(1))
            .map_err(|_| ArithmeticError::Domain(format!("term index {n} is too large")))?;
        Ok(&self.first * &self.ratio.pow(exponent)?)
    }

    /// Sum of the infinite series. Only converges for `|r| < 1`.
    pub fn sum(&self) -> Result<BigFraction, ArithmeticError> {
        if self.ratio.abs() >= BigFraction::one() {
            return Err(ArithmeticError::Domain(format!(
                "series with ratio {} does not converge",
                self.ratio
            )));
        }
        self.first.checked_div(&(BigFraction::one() - self.ratio.clone()))
    }

    /// The first `count` terms followed by an ellipsis.
    pub fn partial_string(&self, count: u32) -> Result<String, ArithmeticError> {
        let mut parts = (1..=count)
            .map(|n| self.nth_term(n).map(|t| t.to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        parts.push("...".to_string());
        Ok(parts.join(", "))
    }
}

/// Geometric sequences with ratio `±1/k`.
#[derive(Debug)]
pub struct GeometricSequencesSupplier {
    first_numerator: Setting<NumericRange>,
    first_denominator: Setting<NumericRange>,
    ratio_denominator: Setting<NumericRange>,
}

impl GeometricSequencesSupplier {
    pub const NAME: &'static str = "Geometric sequences";
    const FIRST_NUMERATOR: RangeStore = RangeStore::full(1, 10);
    const FIRST_DENOMINATOR: RangeStore = RangeStore::full(1, 10);
    const RATIO_DENOMINATOR: RangeStore = RangeStore::of(2, 10, 2, 8);
    const MIN_NTH_TERM: i64 = 6;
    const MAX_NTH_TERM: i64 = 12;

    pub fn new() -> Result<Self, SettingError> {
        Ok(Self {
            first_numerator: Self::FIRST_NUMERATOR.named("Numerator of first term")?,
            first_denominator: Self::FIRST_DENOMINATOR.named("Denominator of first term")?,
            ratio_denominator: Self::RATIO_DENOMINATOR.named("Denominator of ratio")?,
        })
    }

    fn term_problem(
        &self,
        sequence: &GeometricSequence,
        rng: &mut dyn RngCore,
    ) -> Result<Problem, SupplierError> {
        let n = random::int_inclusive(rng, Self::MIN_NTH_TERM, Self::MAX_NTH_TERM) as u32;
        let display = format!(
            "What is the {} term of the sequence {}?",
            ordinal(i64::from(n)),
            sequence.partial_string(4)?
        );
        Ok(Problem::exact(display, sequence.nth_term(n)?)?)
    }

    fn sum_problem(&self, sequence: &GeometricSequence) -> Result<Problem, SupplierError> {
        let display = format!(
            "What is the sum of the sequence {}?",
            sequence.partial_string(3)?
        );
        Ok(Problem::exact(display, sequence.sum()?)?)
    }
}

impl ProblemSupplier for GeometricSequencesSupplier {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn settings(&self) -> Vec<SettingRef<'_>> {
        vec![
            SettingRef::Range(&self.first_numerator),
            SettingRef::Range(&self.first_denominator),
            SettingRef::Range(&self.ratio_denominator),
        ]
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Result<Problem, SupplierError> {
        let mut ratio = BigFraction::of(1, self.ratio_denominator.pick(rng))?;
        if random::coin(rng) {
            ratio = -ratio;
        }
        let first = BigFraction::of(
            self.first_numerator.pick(rng),
            self.first_denominator.pick(rng),
        )?;
        let sequence = GeometricSequence::new(first, ratio);
        if random::coin(rng) {
            self.sum_problem(&sequence)
        } else {
            self.term_problem(&sequence, rng)
        }
    }
}
