//! mathdrill-core: problem generation, exact arithmetic and answer checking.
//!
//! This crate defines the pieces every problem supplier builds on: bounded
//! range settings with change notification, the exact arithmetic layer, the
//! expression evaluator, the problem model, the supplier trait, the composite
//! supplier and the practice session.

pub mod base;
pub mod complex;
pub mod composite;
pub mod decimal;
pub mod error;
pub mod eval;
pub mod fraction;
pub mod markup;
pub mod number;
pub mod problem;
pub mod random;
pub mod range;
pub mod session;
pub mod setting;
pub mod statistics;
pub mod supplier;

pub use complex::Complex;
pub use composite::CompositeSupplier;
pub use decimal::{Decimal, MathContext, RoundingMode};
pub use error::{ArithmeticError, EvalError, ProblemError, SettingError, SupplierError};
pub use eval::Evaluator;
pub use fraction::BigFraction;
pub use number::Number;
pub use problem::{Answer, Problem, Tolerance};
pub use range::{NumericRange, RangeStore};
pub use session::{PracticeSession, SessionOptions, SubmitOutcome};
pub use setting::{Setting, SettingRef, SettingValue};
pub use supplier::ProblemSupplier;
