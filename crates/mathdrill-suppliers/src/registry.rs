//! Supplier construction by name.

use mathdrill_core::{CompositeSupplier, ProblemSupplier, SupplierError};

use crate::arithmetic::Multiply25Supplier;
use crate::bases::BaseAToPowerOfASupplier;
use crate::complex::{ComplexMultiplicationSupplier, PowersOfISupplier};
use crate::exponentiation::{
    ExponentApproximationSupplier, SquaresSupplier, SumOfSquaresX3XSupplier,
};
use crate::fractions::MultiplyingOrDividingFractionsSupplier;
use crate::sequences::GeometricSequencesSupplier;

const NAMES: &[&str] = &[
    SquaresSupplier::NAME,
    SumOfSquaresX3XSupplier::NAME,
    Multiply25Supplier::NAME,
    ExponentApproximationSupplier::NAME,
    BaseAToPowerOfASupplier::NAME,
    MultiplyingOrDividingFractionsSupplier::NAME,
    GeometricSequencesSupplier::NAME,
    ComplexMultiplicationSupplier::NAME,
    PowersOfISupplier::NAME,
];

/// Names of every built-in supplier, in display order.
pub fn all_supplier_names() -> &'static [&'static str] {
    NAMES
}

/// The canonical spelling of a supplier name, matched case-insensitively.
pub fn resolve_name(name: &str) -> Option<&'static str> {
    let name = name.trim();
    NAMES.iter().copied().find(|n| n.eq_ignore_ascii_case(name))
}

/// Build a fresh supplier with default settings.
pub fn create_supplier(name: &str) -> Result<Box<dyn ProblemSupplier>, SupplierError> {
    let canonical = resolve_name(name).ok_or_else(|| SupplierError::Unknown(name.to_string()))?;
    let supplier: Box<dyn ProblemSupplier> = match canonical {
        SquaresSupplier::NAME => Box::new(SquaresSupplier::new()?),
        SumOfSquaresX3XSupplier::NAME => Box::new(SumOfSquaresX3XSupplier::new()?),
        Multiply25Supplier::NAME => Box::new(Multiply25Supplier::new()?),
        ExponentApproximationSupplier::NAME => Box::new(ExponentApproximationSupplier::new()?),
        BaseAToPowerOfASupplier::NAME => Box::new(BaseAToPowerOfASupplier::new()?),
        MultiplyingOrDividingFractionsSupplier::NAME => {
            Box::new(MultiplyingOrDividingFractionsSupplier::new()?)
        }
        GeometricSequencesSupplier::NAME => Box::new(GeometricSequencesSupplier::new()?),
        ComplexMultiplicationSupplier::NAME => Box::new(ComplexMultiplicationSupplier::new()?),
        PowersOfISupplier::NAME => Box::new(PowersOfISupplier::new()?),
        _ => return Err(SupplierError::Unknown(name.to_string())),
    };
    Ok(supplier)
}

/// A composite of the named suppliers, in the given order.
pub fn composite_of<S: AsRef<str>>(names: &[S]) -> Result<CompositeSupplier, SupplierError> {
    let mut composite = CompositeSupplier::new();
    for name in names {
        composite.add_supplier_or_err(create_supplier(name.as_ref())?)?;
    }
    Ok(composite)
}

/// A composite of every built-in supplier.
pub fn default_composite() -> Result<CompositeSupplier, SupplierError> {
    composite_of(NAMES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::assert_round_trips;

    #[test]
    fn every_name_builds_its_supplier() {
        for name in all_supplier_names() {
            let supplier = create_supplier(name).unwrap();
            assert_eq!(supplier.name(), *name);
        }
    }

    #[test]
    fn names_resolve_case_insensitively() {
        assert_eq!(resolve_name("powers OF i"), Some(PowersOfISupplier::NAME));
        assert_eq!(create_supplier(" squares ").unwrap().name(), "Squares");
        assert!(matches!(
            create_supplier("Cubes"),
            Err(SupplierError::Unknown(name)) if name == "Cubes"
        ));
    }

    #[test]
    fn every_supplier_round_trips() {
        for name in all_supplier_names() {
            let supplier = create_supplier(name).unwrap();
            assert_round_trips(supplier.as_ref(), 40);
        }
    }

    #[test]
    fn default_composite_has_everything() {
        let composite = default_composite().unwrap();
        assert_eq!(composite.len(), all_supplier_names().len());
        assert_eq!(composite.names(), all_supplier_names());
    }

    #[test]
    fn composite_rejects_duplicates() {
        assert!(matches!(
            composite_of(&["Squares", "squares"]),
            Err(SupplierError::Duplicate(_))
        ));
    }

    #[test]
    fn setting_names_are_unique_per_supplier() {
        for name in all_supplier_names() {
            let supplier = create_supplier(name).unwrap();
            let settings = supplier.settings();
            let unique: std::collections::HashSet<_> = settings.iter().map(|s| s.name()).collect();
            assert_eq!(unique.len(), settings.len(), "{name}");
        }
    }
}
