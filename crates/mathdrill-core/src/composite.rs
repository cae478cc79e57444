//! A set of suppliers that picks one at random for each problem.

use rand::RngCore;
use tracing::debug;

use crate::error::SupplierError;
use crate::problem::Problem;
use crate::random;
use crate::supplier::ProblemSupplier;

/// Handle returned when registering an add or remove listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type SupplierListener = Box<dyn Fn(&dyn ProblemSupplier)>;

/// Suppliers keyed by name, in insertion order.
#[derive(Default)]
pub struct CompositeSupplier {
    suppliers: Vec<Box<dyn ProblemSupplier>>,
    add_listeners: Vec<(ListenerId, SupplierListener)>,
    remove_listeners: Vec<(ListenerId, SupplierListener)>,
    next_listener: u64,
}

impl CompositeSupplier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a supplier. Returns `false`, dropping `supplier`, when one with
    /// the same name is already present.
    pub fn add_supplier(&mut self, supplier: Box<dyn ProblemSupplier>) -> bool {
        self.add_supplier_or_err(supplier).is_ok()
    }

    pub fn add_supplier_or_err(
        &mut self,
        supplier: Box<dyn ProblemSupplier>,
    ) -> Result<(), SupplierError> {
        if self.contains(supplier.name()) {
            debug!(name = supplier.name(), "supplier already registered");
            return Err(SupplierError::Duplicate(supplier.name().to_string()));
        }
        debug!(name = supplier.name(), "adding supplier");
        self.suppliers.push(supplier);
        if let Some(added) = self.suppliers.last() {
            for (_, listener) in &self.add_listeners {
                listener(added.as_ref());
            }
        }
        Ok(())
    }

    /// Remove the supplier called `name`, returning it if present.
    pub fn remove_supplier(&mut self, name: &str) -> Option<Box<dyn ProblemSupplier>> {
        let index = self.suppliers.iter().position(|s| s.name() == name)?;
        let removed = self.suppliers.remove(index);
        debug!(name, "removed supplier");
        for (_, listener) in &self.remove_listeners {
            listener(removed.as_ref());
        }
        Some(removed)
    }

    /// Pick a supplier uniformly at random.
    pub fn random_supplier(
        &self,
        rng: &mut dyn RngCore,
    ) -> Result<&dyn ProblemSupplier, SupplierError> {
        if self.suppliers.is_empty() {
            return Err(SupplierError::Empty);
        }
        let index = random::index(rng, self.suppliers.len());
        Ok(self.suppliers[index].as_ref())
    }

    /// Pick a supplier and generate a problem from it.
    pub fn generate(
        &self,
        rng: &mut dyn RngCore,
    ) -> Result<(&dyn ProblemSupplier, Problem), SupplierError> {
        let supplier = self.random_supplier(rng)?;
        let problem = supplier.generate(rng)?;
        Ok((supplier, problem))
    }

    /// Forward solve feedback to the supplier called `name`.
    pub fn strictly_solved(&self, name: &str, problem: &Problem) {
        if let Some(supplier) = self.get(name) {
            supplier.strictly_solved(problem);
        }
    }

    pub fn add_add_listener(
        &mut self,
        listener: impl Fn(&dyn ProblemSupplier) + 'static,
    ) -> ListenerId {
        let id = self.next_id();
        self.add_listeners.push((id, Box::new(listener)));
        id
    }

    pub fn add_remove_listener(
        &mut self,
        listener: impl Fn(&dyn ProblemSupplier) + 'static,
    ) -> ListenerId {
        let id = self.next_id();
        self.remove_listeners.push((id, Box::new(listener)));
        id
    }

    /// Unregister an add or remove listener.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.add_listeners.len() + self.remove_listeners.len();
        self.add_listeners.retain(|(existing, _)| *existing != id);
        self.remove_listeners.retain(|(existing, _)| *existing != id);
        self.add_listeners.len() + self.remove_listeners.len() != before
    }

    fn next_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        id
    }

    pub fn names(&self) -> Vec<&str> {
        self.suppliers.iter().map(|s| s.name()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&dyn ProblemSupplier> {
        self.suppliers
            .iter()
            .find(|s| s.name() == name)
            .map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.suppliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suppliers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn ProblemSupplier> {
        self.suppliers.iter().map(|s| s.as_ref())
    }
}

impl std::fmt::Debug for CompositeSupplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeSupplier")
            .field("suppliers", &self.names())
            .field("add_listeners", &self.add_listeners.len())
            .field("remove_listeners", &self.remove_listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::fraction::BigFraction;
    use crate::random::create_rng;

    struct Named {
        name: &'static str,
        solved: Rc<RefCell<Vec<String>>>,
    }

    impl Named {
        fn boxed(name: &'static str) -> Box<dyn ProblemSupplier> {
            Box::new(Self {
                name,
                solved: Rc::default(),
            })
        }
    }

    impl ProblemSupplier for Named {
        fn name(&self) -> &str {
            self.name
        }

        fn generate(&self, _rng: &mut dyn RngCore) -> Result<Problem, SupplierError> {
            Ok(Problem::exact(self.name, BigFraction::one())?)
        }

        fn strictly_solved(&self, problem: &Problem) {
            self.solved
                .borrow_mut()
                .push(problem.display_string().to_string());
        }
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut composite = CompositeSupplier::new();
        assert!(composite.add_supplier(Named::boxed("Squares")));
        assert!(!composite.add_supplier(Named::boxed("Squares")));
        assert_eq!(composite.len(), 1);
        assert!(matches!(
            composite.add_supplier_or_err(Named::boxed("Squares")),
            Err(SupplierError::Duplicate(name)) if name == "Squares"
        ));
    }

    #[test]
    fn random_selection_returns_a_member() {
        let mut composite = CompositeSupplier::new();
        for name in ["a", "b", "c"] {
            composite.add_supplier(Named::boxed(name));
        }
        let mut rng = create_rng(Some(5));
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            let supplier = composite.random_supplier(&mut rng).unwrap();
            assert!(composite.contains(supplier.name()));
            seen.insert(supplier.name().to_string());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn empty_composite_fails() {
        let composite = CompositeSupplier::new();
        let mut rng = create_rng(Some(1));
        let err = composite.random_supplier(&mut rng).err().unwrap();
        assert!(err.is_empty());
    }

    #[test]
    fn listeners_fire_and_can_be_removed() {
        let mut composite = CompositeSupplier::new();
        let events = Rc::new(RefCell::new(Vec::new()));

        let log = Rc::clone(&events);
        let add =
            composite.add_add_listener(move |s| log.borrow_mut().push(format!("+{}", s.name())));
        let log = Rc::clone(&events);
        composite.add_remove_listener(move |s| log.borrow_mut().push(format!("-{}", s.name())));

        composite.add_supplier(Named::boxed("a"));
        composite.add_supplier(Named::boxed("a"));
        assert!(composite.remove_supplier("a").is_some());
        assert!(composite.remove_supplier("a").is_none());
        assert!(composite.remove_listener(add));
        assert!(!composite.remove_listener(add));
        composite.add_supplier(Named::boxed("b"));

        assert_eq!(*events.borrow(), vec!["+a", "-a"]);
        assert_eq!(composite.names(), vec!["b"]);
    }

    #[test]
    fn strictly_solved_is_forwarded_by_name() {
        let solved = Rc::new(RefCell::new(Vec::new()));
        let mut composite = CompositeSupplier::new();
        composite.add_supplier(Box::new(Named {
            name: "a",
            solved: Rc::clone(&solved),
        }));
        let mut rng = create_rng(Some(2));
        let (supplier, problem) = composite.generate(&mut rng).unwrap();
        assert_eq!(supplier.name(), "a");
        composite.strictly_solved("a", &problem);
        composite.strictly_solved("missing", &problem);
        assert_eq!(*solved.borrow(), vec!["a"]);
    }
}
