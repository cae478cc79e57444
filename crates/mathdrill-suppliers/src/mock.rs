//! Mock supplier for testing.

use std::cell::Cell;
use std::rc::Rc;

use rand::RngCore;

use mathdrill_core::{Problem, ProblemSupplier, SupplierError};

/// Call counts of a [`FixedSupplier`], readable after the supplier has been
/// boxed into a composite.
#[derive(Debug, Clone, Default)]
pub struct CallCounts {
    generated: Rc<Cell<u32>>,
    strictly_solved: Rc<Cell<u32>>,
}

impl CallCounts {
    pub fn generated(&self) -> u32 {
        self.generated.get()
    }

    pub fn strictly_solved(&self) -> u32 {
        self.strictly_solved.get()
    }
}

/// A supplier that hands out a fixed list of problems in order, cycling.
///
/// Lets session and front-end code be tested without depending on random
/// draws.
#[derive(Debug)]
pub struct FixedSupplier {
    name: String,
    problems: Vec<Problem>,
    next: Cell<usize>,
    counts: CallCounts,
}

impl FixedSupplier {
    pub fn new(name: impl Into<String>, problems: Vec<Problem>) -> Self {
        Self {
            name: name.into(),
            problems,
            next: Cell::new(0),
            counts: CallCounts::default(),
        }
    }

    /// A supplier that always asks the same question.
    pub fn with_problem(name: impl Into<String>, problem: Problem) -> Self {
        Self::new(name, vec![problem])
    }

    pub fn counts(&self) -> CallCounts {
        self.counts.clone()
    }
}

impl ProblemSupplier for FixedSupplier {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate(&self, _rng: &mut dyn RngCore) -> Result<Problem, SupplierError> {
        if self.problems.is_empty() {
            return Err(SupplierError::Empty);
        }
        self.counts.generated.set(self.counts.generated() + 1);
        let index = self.next.get();
        self.next.set((index + 1) % self.problems.len());
        Ok(self.problems[index].clone())
    }

    fn strictly_solved(&self, _problem: &Problem) {
        self.counts
            .strictly_solved
            .set(self.counts.strictly_solved() + 1);
    }
}
