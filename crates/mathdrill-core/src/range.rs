//! Bounded integer ranges used as supplier settings.
//!
//! A [`NumericRange`] has absolute bounds (`min`, `max`) fixed at
//! construction and a configurable sub-range (`low`, `high`). The invariant
//! `min <= low <= high <= max` holds at all times; mutators validate inline
//! and leave the range untouched on failure.

use std::fmt;

use crate::error::SettingError;
use crate::setting::Setting;

/// An integer range with a mutable inclusive sub-range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NumericRange {
    min: i64,
    max: i64,
    low: i64,
    high: i64,
}

impl NumericRange {
    /// Create a range, validating `min <= low <= high <= max`.
    pub fn new(min: i64, max: i64, low: i64, high: i64) -> Result<Self, SettingError> {
        if min > max {
            return Err(SettingError::InvalidBounds { min, max });
        }
        if low < min {
            return Err(SettingError::LowBelowMin { low, min });
        }
        if high > max {
            return Err(SettingError::HighAboveMax { high, max });
        }
        if low > high {
            return Err(SettingError::LowAboveHigh { low, high });
        }
        Ok(Self {
            min,
            max,
            low,
            high,
        })
    }

    /// A range whose sub-range spans the full bounds.
    pub fn full(min: i64, max: i64) -> Result<Self, SettingError> {
        Self::new(min, max, min, max)
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn low(&self) -> i64 {
        self.low
    }

    pub fn high(&self) -> i64 {
        self.high
    }

    pub fn set_low(&mut self, low: i64) -> Result<(), SettingError> {
        if low < self.min {
            return Err(SettingError::LowBelowMin { low, min: self.min });
        }
        if low > self.high {
            return Err(SettingError::LowAboveHigh {
                low,
                high: self.high,
            });
        }
        self.low = low;
        Ok(())
    }

    pub fn set_high(&mut self, high: i64) -> Result<(), SettingError> {
        if high > self.max {
            return Err(SettingError::HighAboveMax { high, max: self.max });
        }
        if high < self.low {
            return Err(SettingError::HighBelowLow { high, low: self.low });
        }
        self.high = high;
        Ok(())
    }

    /// Set both ends of the sub-range at once.
    ///
    /// Needed when the new sub-range does not overlap the old one, where
    /// setting the ends one at a time would trip the invariant midway.
    pub fn set_bounds(&mut self, low: i64, high: i64) -> Result<(), SettingError> {
        let next = Self::new(self.min, self.max, low, high)?;
        *self = next;
        Ok(())
    }

    /// Whether `value` lies in the configured sub-range.
    pub fn contains(&self, value: i64) -> bool {
        (self.low..=self.high).contains(&value)
    }

    /// Number of integers in the sub-range: `high - low + 1`.
    pub fn value_range(&self) -> u128 {
        u128::from(self.high.abs_diff(self.low)) + 1
    }

    /// Largest possible [`value_range`](Self::value_range): `max - min + 1`.
    pub fn max_value_range(&self) -> u128 {
        u128::from(self.max.abs_diff(self.min)) + 1
    }
}

impl fmt::Display for NumericRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={} (of {}..={})", self.low, self.high, self.min, self.max)
    }
}

/// Compile-time default for a named range setting.
///
/// Suppliers declare their defaults as `const` stores and turn them into
/// live settings with [`RangeStore::named`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeStore {
    pub min: i64,
    pub max: i64,
    pub low: i64,
    pub high: i64,
}

impl RangeStore {
    pub const fn of(min: i64, max: i64, low: i64, high: i64) -> Self {
        Self {
            min,
            max,
            low,
            high,
        }
    }

    /// A store whose default sub-range is the whole range.
    pub const fn full(min: i64, max: i64) -> Self {
        Self::of(min, max, min, max)
    }

    pub fn to_range(self) -> Result<NumericRange, SettingError> {
        NumericRange::new(self.min, self.max, self.low, self.high)
    }

    /// Build a named range setting from this store.
    pub fn named(self, name: impl Into<String>) -> Result<Setting<NumericRange>, SettingError> {
        Ok(Setting::new(name, self.to_range()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn construction_validates() {
        assert!(NumericRange::new(1, 10, 2, 5).is_ok());
        assert_eq!(
            NumericRange::new(10, 1, 1, 1),
            Err(SettingError::InvalidBounds { min: 10, max: 1 })
        );
        assert!(matches!(
            NumericRange::new(1, 10, 0, 5),
            Err(SettingError::LowBelowMin { .. })
        ));
        assert!(matches!(
            NumericRange::new(1, 10, 2, 11),
            Err(SettingError::HighAboveMax { .. })
        ));
        assert!(matches!(
            NumericRange::new(1, 10, 6, 5),
            Err(SettingError::LowAboveHigh { .. })
        ));
    }

    #[test]
    fn set_low_rejects_and_leaves_state() {
        let mut r = NumericRange::new(1, 10, 3, 6).unwrap();
        assert!(r.set_low(7).is_err());
        assert!(r.set_low(0).is_err());
        assert_eq!((r.low(), r.high()), (3, 6));
        r.set_low(6).unwrap();
        assert_eq!(r.low(), 6);
    }

    #[test]
    fn set_high_rejects_and_leaves_state() {
        let mut r = NumericRange::new(1, 10, 3, 6).unwrap();
        assert!(r.set_high(2).is_err());
        assert!(r.set_high(11).is_err());
        assert_eq!((r.low(), r.high()), (3, 6));
        r.set_high(10).unwrap();
        assert_eq!(r.high(), 10);
    }

    #[test]
    fn set_bounds_moves_disjoint_window() {
        let mut r = NumericRange::new(1, 100, 1, 5).unwrap();
        r.set_bounds(50, 60).unwrap();
        assert_eq!((r.low(), r.high()), (50, 60));
        assert!(r.set_bounds(70, 60).is_err());
        assert_eq!((r.low(), r.high()), (50, 60));
    }

    #[test]
    fn value_ranges() {
        let r = NumericRange::new(1, 50, 1, 20).unwrap();
        assert_eq!(r.value_range(), 20);
        assert_eq!(r.max_value_range(), 50);
        assert!(r.contains(20));
        assert!(!r.contains(21));

        let widest = NumericRange::full(i64::MIN, i64::MAX).unwrap();
        assert_eq!(widest.value_range(), 1u128 << 64);
        assert_eq!(widest.max_value_range(), 1u128 << 64);
        let single = NumericRange::full(i64::MAX, i64::MAX).unwrap();
        assert_eq!(single.value_range(), 1);
    }

    #[test]
    fn store_builds_named_setting() {
        const VALUE: RangeStore = RangeStore::of(1, 10_000, 2, 200);
        let setting = VALUE.named("Value").unwrap();
        assert_eq!(setting.name(), "Value");
        assert_eq!(setting.get().low(), 2);
        assert!(RangeStore::of(5, 1, 1, 1).named("bad").is_err());
    }

    proptest! {
        #[test]
        fn invariant_holds_after_any_mutation(
            min in -50i64..50,
            span in 0i64..50,
            ops in proptest::collection::vec((any::<bool>(), -120i64..120), 0..40),
        ) {
            let max = min + span;
            let mut r = NumericRange::full(min, max).unwrap();
            for (is_low, v) in ops {
                let before = r;
                let result = if is_low { r.set_low(v) } else { r.set_high(v) };
                if result.is_err() {
                    prop_assert_eq!(r, before);
                }
                prop_assert!(r.min() <= r.low());
                prop_assert!(r.low() <= r.high());
                prop_assert!(r.high() <= r.max());
            }
        }
    }
}
