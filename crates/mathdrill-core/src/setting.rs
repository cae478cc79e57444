//! Observable, named settings.
//!
//! A [`Setting`] holds a value and an ordered list of zero-argument change
//! actions. Actions run synchronously after a changed value is committed,
//! in registration order. No borrow is held while they run, so an action
//! may read the setting, mutate it again, or (un)register actions. Avoiding
//! mutation cycles is up to the caller.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::SettingError;
use crate::random;
use crate::range::NumericRange;

/// Handle returned by [`Setting::add_change_action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChangeActionId(u64);

type ChangeAction = Rc<dyn Fn()>;

/// A named value that notifies listeners when it changes.
pub struct Setting<T> {
    name: String,
    value: RefCell<T>,
    actions: RefCell<Vec<(ChangeActionId, ChangeAction)>>,
    next_id: Cell<u64>,
}

impl<T> Setting<T> {
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Self {
            name: name.into(),
            value: RefCell::new(value),
            actions: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Human-readable name shown by configuration front ends.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Borrow the current value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Register an action to run after every change.
    pub fn add_change_action(&self, action: impl Fn() + 'static) -> ChangeActionId {
        let id = ChangeActionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.actions.borrow_mut().push((id, Rc::new(action)));
        id
    }

    /// Unregister an action. Returns `false` if it was not registered.
    pub fn remove_change_action(&self, id: ChangeActionId) -> bool {
        let mut actions = self.actions.borrow_mut();
        let before = actions.len();
        actions.retain(|(existing, _)| *existing != id);
        actions.len() != before
    }

    pub fn change_action_count(&self) -> usize {
        self.actions.borrow().len()
    }

    fn notify(&self) {
        let snapshot: Vec<ChangeAction> = self
            .actions
            .borrow()
            .iter()
            .map(|(_, action)| Rc::clone(action))
            .collect();
        for action in snapshot {
            action();
        }
    }
}

impl<T: Clone + PartialEq> Setting<T> {
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Store `value`, returning whether it differed from the old value.
    ///
    /// Change actions run only when it did.
    pub fn set(&self, value: T) -> bool {
        let changed = {
            let mut current = self.value.borrow_mut();
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        };
        if changed {
            self.notify();
        }
        changed
    }

    /// Apply a fallible edit to a copy of the value and commit it on success.
    ///
    /// On error the stored value is unchanged and no action runs.
    pub fn try_update<E>(&self, edit: impl FnOnce(&mut T) -> Result<(), E>) -> Result<bool, E> {
        let changed = {
            let mut current = self.value.borrow_mut();
            let mut next = current.clone();
            edit(&mut next)?;
            if next == *current {
                false
            } else {
                *current = next;
                true
            }
        };
        if changed {
            self.notify();
        }
        Ok(changed)
    }
}

impl<T: fmt::Debug> fmt::Debug for Setting<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setting")
            .field("name", &self.name)
            .field("value", &self.value.borrow())
            .field("actions", &self.actions.borrow().len())
            .finish()
    }
}

impl Setting<NumericRange> {
    pub fn low(&self) -> i64 {
        self.with(NumericRange::low)
    }

    pub fn high(&self) -> i64 {
        self.with(NumericRange::high)
    }

    pub fn set_low(&self, low: i64) -> Result<bool, SettingError> {
        self.try_update(|range| range.set_low(low))
    }

    pub fn set_high(&self, high: i64) -> Result<bool, SettingError> {
        self.try_update(|range| range.set_high(high))
    }

    pub fn set_bounds(&self, low: i64, high: i64) -> Result<bool, SettingError> {
        self.try_update(|range| range.set_bounds(low, high))
    }

    /// Draw a value uniformly from the configured sub-range.
    pub fn pick(&self, rng: &mut dyn RngCore) -> i64 {
        let (low, high) = self.with(|r| (r.low(), r.high()));
        random::int_inclusive(rng, low, high)
    }
}

/// A configured value as it appears in a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Toggle(bool),
    Range([i64; 2]),
}

/// A type-erased view of one supplier setting.
#[derive(Clone, Copy)]
pub enum SettingRef<'a> {
    Range(&'a Setting<NumericRange>),
    Toggle(&'a Setting<bool>),
}

impl<'a> SettingRef<'a> {
    pub fn name(&self) -> &'a str {
        match *self {
            SettingRef::Range(s) => s.name(),
            SettingRef::Toggle(s) => s.name(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SettingRef::Range(_) => "range",
            SettingRef::Toggle(_) => "toggle",
        }
    }

    /// The current value rendered for display.
    pub fn value_string(&self) -> String {
        match self {
            SettingRef::Range(s) => s.with(|r| r.to_string()),
            SettingRef::Toggle(s) => {
                let label = if s.get() { "on" } else { "off" };
                label.to_string()
            }
        }
    }

    pub fn add_change_action(&self, action: impl Fn() + 'static) -> ChangeActionId {
        match self {
            SettingRef::Range(s) => s.add_change_action(action),
            SettingRef::Toggle(s) => s.add_change_action(action),
        }
    }

    pub fn remove_change_action(&self, id: ChangeActionId) -> bool {
        match self {
            SettingRef::Range(s) => s.remove_change_action(id),
            SettingRef::Toggle(s) => s.remove_change_action(id),
        }
    }

    /// Apply a configured value, returning whether the setting changed.
    pub fn apply(&self, value: &SettingValue) -> Result<bool, SettingError> {
        match (self, value) {
            (SettingRef::Range(s), SettingValue::Range([low, high])) => s.set_bounds(*low, *high),
            (SettingRef::Toggle(s), SettingValue::Toggle(on)) => Ok(s.set(*on)),
            (SettingRef::Range(s), _) => Err(SettingError::TypeMismatch {
                name: s.name().to_string(),
                expected: "a [low, high] pair",
            }),
            (SettingRef::Toggle(s), _) => Err(SettingError::TypeMismatch {
                name: s.name().to_string(),
                expected: "a boolean",
            }),
        }
    }
}

impl fmt::Debug for SettingRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name(), self.value_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> (Rc<Cell<u32>>, impl Fn() + 'static) {
        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        (count, move || inner.set(inner.get() + 1))
    }

    #[test]
    fn notifies_once_per_change() {
        let setting = Setting::new("Division", true);
        let (count, action) = counter();
        setting.add_change_action(action);

        assert!(setting.set(false));
        assert_eq!(count.get(), 1);
        assert!(!setting.set(false));
        assert_eq!(count.get(), 1);
        assert!(setting.set(true));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn removed_action_stops_firing() {
        let setting = Setting::new("Toggle", false);
        let (count, action) = counter();
        let id = setting.add_change_action(action);
        assert!(setting.remove_change_action(id));
        assert!(!setting.remove_change_action(id));
        setting.set(true);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn actions_run_in_registration_order_after_commit() {
        let setting = Rc::new(Setting::new("Order", 0i64));
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second"] {
            let log = Rc::clone(&log);
            let observed = Rc::clone(&setting);
            setting.add_change_action(move || log.borrow_mut().push((tag, observed.get())));
        }
        setting.set(7);
        assert_eq!(*log.borrow(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn reentrant_mutation_is_allowed() {
        let setting = Rc::new(Setting::new("Clamp", 0i64));
        let inner = Rc::clone(&setting);
        setting.add_change_action(move || {
            if inner.get() > 10 {
                inner.set(10);
            }
        });
        setting.set(25);
        assert_eq!(setting.get(), 10);
    }

    #[test]
    fn range_mutation_notifies_and_validates() {
        let setting = Setting::new("Base", NumericRange::new(0, 200, 1, 30).unwrap());
        let (count, action) = counter();
        setting.add_change_action(action);

        assert_eq!(setting.set_high(40), Ok(true));
        assert_eq!(count.get(), 1);
        assert!(setting.set_low(41).is_err());
        assert_eq!(count.get(), 1);
        assert_eq!(setting.low(), 1);
        assert_eq!(setting.set_high(40), Ok(false));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn setting_ref_apply_checks_shape() {
        let range = Setting::new("Base", NumericRange::new(0, 200, 1, 30).unwrap());
        let toggle = Setting::new("Division", true);

        let r = SettingRef::Range(&range);
        assert_eq!(r.apply(&SettingValue::Range([5, 9])), Ok(true));
        assert_eq!((range.low(), range.high()), (5, 9));
        assert!(matches!(
            r.apply(&SettingValue::Toggle(true)),
            Err(SettingError::TypeMismatch { .. })
        ));

        let t = SettingRef::Toggle(&toggle);
        assert_eq!(t.apply(&SettingValue::Toggle(false)), Ok(true));
        assert_eq!(t.value_string(), "off");
        assert!(t.apply(&SettingValue::Range([1, 2])).is_err());
    }

    #[test]
    fn setting_value_deserializes_untagged() {
        #[derive(Deserialize)]
        struct Wrapper {
            a: SettingValue,
            b: SettingValue,
        }
        let w: Wrapper = serde_json::from_str(r#"{"a": true, "b": [1, 4]}"#).unwrap();
        assert_eq!(w.a, SettingValue::Toggle(true));
        assert_eq!(w.b, SettingValue::Range([1, 4]));
    }
}
