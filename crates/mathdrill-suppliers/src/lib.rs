//! mathdrill-suppliers: the concrete problem suppliers.
//!
//! Each supplier implements [`ProblemSupplier`] for one category of problem.
//! The registry builds them by name and the config module applies a user's
//! `mathdrill.toml` to them.

pub mod arithmetic;
pub mod bases;
pub mod complex;
pub mod config;
pub mod exponentiation;
pub mod fractions;
pub mod mock;
pub mod registry;
pub mod sequences;

pub use config::{load_config, load_config_from, DrillConfig};
pub use registry::{all_supplier_names, create_supplier, default_composite};

use mathdrill_core::eval::Evaluator;
use mathdrill_core::markup::prettify_expression;
use mathdrill_core::{Problem, SupplierError};

/// An exact problem whose display is `expression` rendered with markup and
/// whose answer is its value.
pub(crate) fn simple_expression(expression: &str) -> Result<Problem, SupplierError> {
    let value = Evaluator::default().evaluate_exact(expression)?;
    Ok(Problem::exact(prettify_expression(expression), value)?)
}
