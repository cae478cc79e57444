//! Conversions between related bases.

use rand::RngCore;

use mathdrill_core::base::convert_base;
use mathdrill_core::markup;
use mathdrill_core::random;
use mathdrill_core::range::{NumericRange, RangeStore};
use mathdrill_core::{Problem, ProblemSupplier, Setting, SettingError, SettingRef, SupplierError};

/// Convert a number between base `a` and base `aⁿ`, in either direction.
#[derive(Debug)]
pub struct BaseAToPowerOfASupplier {
    value: Setting<NumericRange>,
}

impl BaseAToPowerOfASupplier {
    pub const NAME: &'static str = "Base a to a^n";
    const VALUE: RangeStore = RangeStore::of(1, 10_000, 2, 200);

    pub fn new() -> Result<Self, SettingError> {
        Ok(Self {
            value: Self::VALUE.named("Base 10 value of number")?,
        })
    }

    /// A related pair of bases in random order. Base 2 pairs are split
    /// three ways so each of the three base families is equally likely.
    fn bases(rng: &mut dyn RngCore) -> [u32; 2] {
        let (a, b) = match random::index(rng, 3) {
            0 => [(2, 4), (2, 8), (2, 16)][random::index(rng, 3)],
            1 => (3, 9),
            _ => (4, 16),
        };
        random::shuffled(rng, a, b)
    }
}

impl ProblemSupplier for BaseAToPowerOfASupplier {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn settings(&self) -> Vec<SettingRef<'_>> {
        vec![SettingRef::Range(&self.value)]
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Result<Problem, SupplierError> {
        let decimal = self.value.pick(rng).to_string();
        let [from, to] = Self::bases(rng);
        let source = convert_base(&decimal, 10, from)?;
        let target = convert_base(&decimal, 10, to)?;
        let display = format!("What is {} in base {to}?", markup::base(&source, from));
        Ok(Problem::radix(display, target, to)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::assert_round_trips;
    use mathdrill_core::problem::Answer;

    #[test]
    fn round_trip() {
        let supplier = BaseAToPowerOfASupplier::new().unwrap();
        for problem in assert_round_trips(&supplier, 100) {
            assert!(problem.display_string().starts_with("What is "));
            let Answer::Radix { radix, .. } = problem.answer() else {
                panic!("expected a radix answer");
            };
            assert!([2, 3, 4, 8, 9, 16].contains(radix));
        }
    }

    #[test]
    fn answer_matches_source_value() {
        let supplier = BaseAToPowerOfASupplier::new().unwrap();
        supplier.value.set_bounds(255, 255).unwrap();
        for problem in assert_round_trips(&supplier, 20) {
            let Answer::Radix { digits, radix } = problem.answer() else {
                panic!("expected a radix answer");
            };
            assert_eq!(convert_base(digits, *radix, 10).unwrap(), "255");
        }
    }
}
