//! Mental arithmetic shortcuts.

use rand::RngCore;

use mathdrill_core::random;
use mathdrill_core::range::{NumericRange, RangeStore};
use mathdrill_core::{Problem, ProblemSupplier, Setting, SettingError, SettingRef, SupplierError};

use crate::simple_expression;

/// `n × 25` with the factors in random order.
#[derive(Debug)]
pub struct Multiply25Supplier {
    digits: Setting<NumericRange>,
}

impl Multiply25Supplier {
    pub const NAME: &'static str = "Multiply by 25";
    const DIGITS: RangeStore = RangeStore::of(1, 4, 1, 3);

    pub fn new() -> Result<Self, SettingError> {
        Self::with_digits(Self::DIGITS.low, Self::DIGITS.high)
    }

    pub fn with_digits(low: i64, high: i64) -> Result<Self, SettingError> {
        let digits = Self::DIGITS.named("Digits in non-25 term")?;
        digits.set_bounds(low, high)?;
        Ok(Self { digits })
    }
}

impl ProblemSupplier for Multiply25Supplier {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn settings(&self) -> Vec<SettingRef<'_>> {
        vec![SettingRef::Range(&self.digits)]
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Result<Problem, SupplierError> {
        let (low, high) = (self.digits.low(), self.digits.high());
        // Bounded to 1..=4 by the setting.
        let term = random::int_with_digits(rng, low as u32, high as u32);
        let [a, b] = random::shuffled(rng, term, 25);
        simple_expression(&format!("{a}*{b}"))
    }
}
