//! The `mathdrill eval` command.

use anyhow::{Context, Result};

use mathdrill_core::Evaluator;

pub fn execute(expr: String) -> Result<()> {
    let value = Evaluator::default()
        .evaluate(&expr)
        .with_context(|| format!("could not evaluate '{expr}'"))?;
    println!("{value}");
    Ok(())
}
