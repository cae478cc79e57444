//! Complex number arithmetic.

use rand::RngCore;

use mathdrill_core::decimal::MathContext;
use mathdrill_core::markup::superscript;
use mathdrill_core::range::{NumericRange, RangeStore};
use mathdrill_core::{
    Complex, Problem, ProblemSupplier, Setting, SettingError, SettingRef, SupplierError,
};

/// `(a+bi)(c+di)` with integer parts.
#[derive(Debug)]
pub struct ComplexMultiplicationSupplier {
    parts: Setting<NumericRange>,
}

impl ComplexMultiplicationSupplier {
    pub const NAME: &'static str = "Multiplying complex numbers";
    const PARTS: RangeStore = RangeStore::of(-12, 12, -9, 9);

    pub fn new() -> Result<Self, SettingError> {
        Ok(Self {
            parts: Self::PARTS.named("Parts")?,
        })
    }

    fn operand(&self, rng: &mut dyn RngCore) -> Complex {
        Complex::from_parts(self.parts.pick(rng), self.parts.pick(rng))
    }
}

impl ProblemSupplier for ComplexMultiplicationSupplier {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn settings(&self) -> Vec<SettingRef<'_>> {
        vec![SettingRef::Range(&self.parts)]
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Result<Problem, SupplierError> {
        let (left, right) = (self.operand(rng), self.operand(rng));
        // Integer parts, so the product is exact.
        let product = left.multiply(&right, &MathContext::UNLIMITED);
        Ok(Problem::complex(format!("({left})({right})"), product)?)
    }
}

/// Simplify `iⁿ`.
#[derive(Debug)]
pub struct PowersOfISupplier {
    exponent: Setting<NumericRange>,
}

impl PowersOfISupplier {
    pub const NAME: &'static str = "Powers of i";
    const EXPONENT: RangeStore = RangeStore::of(0, 200, 0, 100);

    pub fn new() -> Result<Self, SettingError> {
        Ok(Self {
            exponent: Self::EXPONENT.named("Exponent")?,
        })
    }

    /// `iⁿ` from the remainder of `n` modulo 4.
    pub fn power_of_i(exponent: i64) -> Result<Complex, SupplierError> {
        let remainder = Complex::from(exponent).remainder_i64(4)?.long_value_exact()?;
        Ok(match remainder.rem_euclid(4) {
            0 => Complex::from(1),
            1 => Complex::i(),
            2 => Complex::from(-1),
            _ => Complex::from_parts(0, -1),
        })
    }
}

impl ProblemSupplier for PowersOfISupplier {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn settings(&self) -> Vec<SettingRef<'_>> {
        vec![SettingRef::Range(&self.exponent)]
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Result<Problem, SupplierError> {
        let exponent = self.exponent.pick(rng);
        let display = format!("Simplify i{}", superscript(exponent));
        Ok(Problem::complex(display, Self::power_of_i(exponent)?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::assert_round_trips;

    #[test]
    fn multiplication_round_trip() {
        let supplier = ComplexMultiplicationSupplier::new().unwrap();
        for problem in assert_round_trips(&supplier, 100) {
            assert!(problem.display_string().starts_with('('));
        }
    }

    #[test]
    fn powers_of_i_cycle() {
        let expected = [
            Complex::from(1),
            Complex::i(),
            Complex::from(-1),
            Complex::from_parts(0, -1),
        ];
        for n in 0..12 {
            assert_eq!(PowersOfISupplier::power_of_i(n).unwrap(), expected[(n % 4) as usize]);
        }
        assert_eq!(PowersOfISupplier::power_of_i(-1).unwrap(), Complex::from_parts(0, -1));
    }

    #[test]
    fn powers_of_i_round_trip() {
        let supplier = PowersOfISupplier::new().unwrap();
        for problem in assert_round_trips(&supplier, 50) {
            assert!(problem.display_string().starts_with("Simplify i<sup>"));
        }
    }
}
