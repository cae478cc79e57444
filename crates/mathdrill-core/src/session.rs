//! A practice session: the current problem, its timer and the rules that
//! decide whether a solve counts as strict.

use std::time::{Duration, Instant};

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::composite::CompositeSupplier;
use crate::error::SupplierError;
use crate::problem::Problem;
use crate::statistics::{ResultHistory, DEFAULT_RESULTS_TRACKED};
use crate::supplier::ProblemSupplier;

/// Scoring rules for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Clearing the answer field forfeits a strict solve.
    pub mark_wrong_if_cleared: bool,
    /// Revealing the answer forfeits a strict solve.
    pub mark_wrong_if_shown_answer: bool,
    pub results_tracked: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            mark_wrong_if_cleared: true,
            mark_wrong_if_shown_answer: true,
            results_tracked: DEFAULT_RESULTS_TRACKED,
        }
    }
}

/// What happened to a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input.
    Ignored,
    /// No suppliers are registered, so there is nothing to answer.
    NoProblem,
    /// Correct; the session has moved on to the next problem.
    Correct { strictly: bool, time: Duration },
    Incorrect { wrong_answers: u32 },
}

#[derive(Debug)]
struct CurrentProblem {
    supplier: String,
    problem: Problem,
    started: Instant,
    wrong_answers: u32,
    cleared: bool,
    shown_answer: bool,
}

/// Drives one user through a stream of problems.
pub struct PracticeSession {
    suppliers: CompositeSupplier,
    rng: Box<dyn RngCore>,
    options: SessionOptions,
    history: ResultHistory,
    current: Option<CurrentProblem>,
}

impl PracticeSession {
    /// Create a session. Call [`next_problem`](Self::next_problem) to show
    /// the first problem.
    pub fn new(
        suppliers: CompositeSupplier,
        rng: impl RngCore + 'static,
        options: SessionOptions,
    ) -> Self {
        Self {
            suppliers,
            rng: Box::new(rng),
            history: ResultHistory::new(options.results_tracked),
            options,
            current: None,
        }
    }

    /// Replace the current problem with a fresh one.
    ///
    /// With no suppliers the session becomes problemless and `Ok(None)` is
    /// returned.
    pub fn next_problem(&mut self) -> Result<Option<&Problem>, SupplierError> {
        if self.suppliers.is_empty() {
            debug!("no suppliers registered, session is problemless");
            self.current = None;
            return Ok(None);
        }
        let (supplier, problem) = self.suppliers.generate(self.rng.as_mut())?;
        trace!(supplier = supplier.name(), display = problem.display_string(), "new problem");
        let current = self.current.insert(CurrentProblem {
            supplier: supplier.name().to_string(),
            problem,
            started: Instant::now(),
            wrong_answers: 0,
            cleared: false,
            shown_answer: false,
        });
        Ok(Some(&current.problem))
    }

    pub fn current(&self) -> Option<&Problem> {
        self.current.as_ref().map(|c| &c.problem)
    }

    pub fn is_problemless(&self) -> bool {
        self.current.is_none()
    }

    /// Name of the supplier that produced the current problem.
    pub fn skill(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.supplier.as_str())
    }

    pub fn wrong_answers(&self) -> u32 {
        self.current.as_ref().map_or(0, |c| c.wrong_answers)
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.current.as_ref().map(|c| c.started.elapsed())
    }

    fn is_strict(&self, current: &CurrentProblem) -> bool {
        current.wrong_answers == 0
            && (!current.cleared || !self.options.mark_wrong_if_cleared)
            && (!current.shown_answer || !self.options.mark_wrong_if_shown_answer)
    }

    /// Judge `input` against the current problem.
    ///
    /// A correct answer is recorded and the next problem generated before
    /// this returns.
    pub fn submit(&mut self, input: &str) -> Result<SubmitOutcome, SupplierError> {
        if input.trim().is_empty() {
            return Ok(SubmitOutcome::Ignored);
        }
        let Some(current) = self.current.as_mut() else {
            return Ok(SubmitOutcome::NoProblem);
        };
        if !current.problem.is_correct(input) {
            current.wrong_answers += 1;
            return Ok(SubmitOutcome::Incorrect {
                wrong_answers: current.wrong_answers,
            });
        }

        let Some(solved) = self.current.take() else {
            return Ok(SubmitOutcome::NoProblem);
        };
        let time = solved.started.elapsed();
        let strictly = self.is_strict(&solved);
        self.history.record(time, strictly);
        debug!(supplier = %solved.supplier, strictly, ?time, "problem solved");
        if strictly {
            self.suppliers
                .strictly_solved(&solved.supplier, &solved.problem);
        }
        self.next_problem()?;
        Ok(SubmitOutcome::Correct { strictly, time })
    }

    /// Reveal the canonical answer of the current problem.
    pub fn show_answer(&mut self) -> Option<String> {
        let current = self.current.as_mut()?;
        current.shown_answer = true;
        Some(current.problem.answer_as_string())
    }

    /// Record that the user cleared their answer.
    pub fn note_cleared(&mut self) {
        if let Some(current) = self.current.as_mut() {
            current.cleared = true;
        }
    }

    /// Add a supplier, leaving the problemless state if necessary.
    pub fn add_supplier(
        &mut self,
        supplier: Box<dyn ProblemSupplier>,
    ) -> Result<bool, SupplierError> {
        let added = self.suppliers.add_supplier(supplier);
        if added && self.current.is_none() {
            self.next_problem()?;
        }
        Ok(added)
    }

    /// Remove a supplier. If it produced the current problem, a new one is
    /// drawn from the remaining suppliers.
    pub fn remove_supplier(
        &mut self,
        name: &str,
    ) -> Result<Option<Box<dyn ProblemSupplier>>, SupplierError> {
        let removed = self.suppliers.remove_supplier(name);
        if removed.is_some() && self.skill() == Some(name) {
            self.next_problem()?;
        }
        Ok(removed)
    }

    pub fn suppliers(&self) -> &CompositeSupplier {
        &self.suppliers
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn history(&self) -> &ResultHistory {
        &self.history
    }

    pub fn reset_results(&mut self) {
        self.history.clear();
    }

    pub fn set_results_tracked(&mut self, results_tracked: usize) {
        self.options.results_tracked = results_tracked;
        self.history.change_capacity(results_tracked);
    }
}

impl std::fmt::Debug for PracticeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticeSession")
            .field("suppliers", &self.suppliers)
            .field("options", &self.options)
            .field("history", &self.history)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::fraction::BigFraction;
    use crate::random::create_rng;

    /// Always asks for `value` and counts strict solves.
    struct Constant {
        name: &'static str,
        value: i64,
        strict_solves: Rc<Cell<u32>>,
    }

    impl ProblemSupplier for Constant {
        fn name(&self) -> &str {
            self.name
        }

        fn generate(&self, _rng: &mut dyn RngCore) -> Result<Problem, SupplierError> {
            Ok(Problem::exact(format!("{}", self.value), BigFraction::from(self.value))?)
        }

        fn strictly_solved(&self, _problem: &Problem) {
            self.strict_solves.set(self.strict_solves.get() + 1);
        }
    }

    fn session_with(options: SessionOptions) -> (PracticeSession, Rc<Cell<u32>>) {
        let count = Rc::new(Cell::new(0));
        let mut suppliers = CompositeSupplier::new();
        suppliers.add_supplier(Box::new(Constant {
            name: "seven",
            value: 7,
            strict_solves: Rc::clone(&count),
        }));
        let mut session = PracticeSession::new(suppliers, create_rng(Some(1)), options);
        session.next_problem().unwrap();
        (session, count)
    }

    #[test]
    fn clean_solve_is_strict() {
        let (mut session, count) = session_with(SessionOptions::default());
        assert_eq!(session.skill(), Some("seven"));
        let outcome = session.submit("7").unwrap();
        assert!(matches!(outcome, SubmitOutcome::Correct { strictly: true, .. }));
        assert_eq!(count.get(), 1);
        assert_eq!(session.history().len(), 1);
        assert!(session.current().is_some());
    }

    #[test]
    fn wrong_answer_forfeits_strictness() {
        let (mut session, count) = session_with(SessionOptions::default());
        assert_eq!(
            session.submit("8").unwrap(),
            SubmitOutcome::Incorrect { wrong_answers: 1 }
        );
        assert_eq!(session.wrong_answers(), 1);
        let outcome = session.submit("7").unwrap();
        assert!(matches!(outcome, SubmitOutcome::Correct { strictly: false, .. }));
        assert_eq!(count.get(), 0);
        assert_eq!(session.history().accuracy(), Some(0.0));
        assert_eq!(session.wrong_answers(), 0);
    }

    #[test]
    fn blank_input_is_ignored() {
        let (mut session, _) = session_with(SessionOptions::default());
        assert_eq!(session.submit("   ").unwrap(), SubmitOutcome::Ignored);
        assert_eq!(session.wrong_answers(), 0);
    }

    #[test]
    fn clearing_and_revealing_follow_options() {
        let (mut session, _) = session_with(SessionOptions::default());
        session.note_cleared();
        assert!(matches!(
            session.submit("7").unwrap(),
            SubmitOutcome::Correct { strictly: false, .. }
        ));

        let lenient = SessionOptions {
            mark_wrong_if_cleared: false,
            mark_wrong_if_shown_answer: false,
            ..SessionOptions::default()
        };
        let (mut session, _) = session_with(lenient);
        session.note_cleared();
        assert_eq!(session.show_answer().as_deref(), Some("7"));
        assert!(matches!(
            session.submit("7").unwrap(),
            SubmitOutcome::Correct { strictly: true, .. }
        ));

        let (mut session, _) = session_with(SessionOptions::default());
        session.show_answer();
        assert!(matches!(
            session.submit("7").unwrap(),
            SubmitOutcome::Correct { strictly: false, .. }
        ));
    }

    #[test]
    fn problemless_state() {
        let mut session = PracticeSession::new(
            CompositeSupplier::new(),
            create_rng(Some(3)),
            SessionOptions::default(),
        );
        assert!(session.next_problem().unwrap().is_none());
        assert!(session.is_problemless());
        assert_eq!(session.submit("1").unwrap(), SubmitOutcome::NoProblem);
        assert_eq!(session.show_answer(), None);

        let added = session
            .add_supplier(Box::new(Constant {
                name: "one",
                value: 1,
                strict_solves: Rc::default(),
            }))
            .unwrap();
        assert!(added);
        assert_eq!(session.skill(), Some("one"));

        assert!(session.remove_supplier("one").unwrap().is_some());
        assert!(session.is_problemless());
    }

    #[test]
    fn results_tracked_bounds_history() {
        let (mut session, _) = session_with(SessionOptions {
            results_tracked: 2,
            ..SessionOptions::default()
        });
        for _ in 0..5 {
            session.submit("7").unwrap();
        }
        assert_eq!(session.history().len(), 2);
        session.set_results_tracked(1);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.options().results_tracked, 1);
        session.reset_results();
        assert!(session.history().is_empty());
    }
}
