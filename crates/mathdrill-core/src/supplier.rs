//! The problem supplier abstraction.

use rand::RngCore;

use crate::error::SupplierError;
use crate::problem::{Problem, Tolerance};
use crate::setting::SettingRef;

/// Generates problems of one category.
///
/// Implementations declare their settings at construction and draw every
/// random value from the generator passed to [`generate`](Self::generate).
/// The name doubles as the supplier's identity in a
/// [`CompositeSupplier`](crate::composite::CompositeSupplier).
pub trait ProblemSupplier {
    /// Stable, human-readable name.
    fn name(&self) -> &str;

    /// Tunable settings in display order.
    fn settings(&self) -> Vec<SettingRef<'_>> {
        Vec::new()
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Result<Problem, SupplierError>;

    /// Called when a problem from this supplier was solved without a wrong
    /// answer, clear or reveal. Suppliers may use it to adapt difficulty.
    fn strictly_solved(&self, _problem: &Problem) {}

    /// Tolerance used for approximate problems, if this supplier makes any.
    fn tolerance(&self) -> Option<Tolerance> {
        None
    }

    /// Change the tolerance of approximate problems. Returns `false` when
    /// the supplier only makes exact problems.
    fn set_tolerance(&self, _tolerance: Tolerance) -> bool {
        false
    }

    /// Look up a setting by name.
    fn setting(&self, name: &str) -> Option<SettingRef<'_>> {
        self.settings().into_iter().find(|s| s.name() == name)
    }
}
