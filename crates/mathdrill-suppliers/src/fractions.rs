//! Multiplying and dividing fractions.

use rand::RngCore;

use mathdrill_core::random;
use mathdrill_core::range::{NumericRange, RangeStore};
use mathdrill_core::{
    BigFraction, Problem, ProblemSupplier, Setting, SettingError, SettingRef, SupplierError,
};

/// `a/b × c/d` or `a/b ÷ c/d`, answered as a reduced fraction.
#[derive(Debug)]
pub struct MultiplyingOrDividingFractionsSupplier {
    first_numerator: Setting<NumericRange>,
    first_denominator: Setting<NumericRange>,
    second_numerator: Setting<NumericRange>,
    second_denominator: Setting<NumericRange>,
}

impl MultiplyingOrDividingFractionsSupplier {
    pub const NAME: &'static str = "Multiplying or dividing fractions";
    const TERM: RangeStore = RangeStore::of(1, 50, 1, 20);

    pub fn new() -> Result<Self, SettingError> {
        Ok(Self {
            first_numerator: Self::TERM.named("First numerator")?,
            first_denominator: Self::TERM.named("First denominator")?,
            second_numerator: Self::TERM.named("Second numerator")?,
            second_denominator: Self::TERM.named("Second denominator")?,
        })
    }
}

impl ProblemSupplier for MultiplyingOrDividingFractionsSupplier {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn settings(&self) -> Vec<SettingRef<'_>> {
        vec![
            SettingRef::Range(&self.first_numerator),
            SettingRef::Range(&self.first_denominator),
            SettingRef::Range(&self.second_numerator),
            SettingRef::Range(&self.second_denominator),
        ]
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Result<Problem, SupplierError> {
        let (a, b) = (self.first_numerator.pick(rng), self.first_denominator.pick(rng));
        let (c, d) = (self.second_numerator.pick(rng), self.second_denominator.pick(rng));
        let first = BigFraction::of(a, b)?;
        let second = BigFraction::of(c, d)?;
        let (operator, answer) = if random::coin(rng) {
            ('÷', first.checked_div(&second)?)
        } else {
            ('×', first * second)
        };
        Ok(Problem::exact(format!("{a}/{b} {operator} {c}/{d}"), answer)?)
    }
}
