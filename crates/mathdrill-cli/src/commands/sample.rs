//! The `mathdrill sample` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use mathdrill_core::markup::to_plain;
use mathdrill_core::random::create_rng;
use mathdrill_core::Problem;

/// One generated problem as printed by `sample --format json`.
#[derive(Debug, Serialize)]
struct SampleRecord {
    supplier: String,
    problem: String,
    markup: String,
    answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tolerance: Option<String>,
}

impl SampleRecord {
    fn new(supplier: &str, problem: &Problem) -> Self {
        Self {
            supplier: supplier.to_string(),
            problem: to_plain(problem.display_string()),
            markup: problem.display_string().to_string(),
            answer: problem.answer_as_string(),
            tolerance: problem.tolerance().map(|t| t.to_string()),
        }
    }
}

pub fn execute(
    count: usize,
    seed: Option<u64>,
    supplier: Option<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = super::load_with_overrides(config_path, seed, Vec::new())?;
    let mut rng = create_rng(config.seed);

    let mut records = Vec::with_capacity(count);
    match supplier {
        Some(name) => {
            let supplier = config.build_supplier(&name)?;
            for _ in 0..count {
                let problem = supplier
                    .generate(&mut rng)
                    .with_context(|| format!("'{}' failed to generate", supplier.name()))?;
                records.push(SampleRecord::new(supplier.name(), &problem));
            }
        }
        None => {
            let composite = config.build_composite()?;
            for _ in 0..count {
                let (supplier, problem) = composite.generate(&mut rng)?;
                records.push(SampleRecord::new(supplier.name(), &problem));
            }
        }
    }

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&records)?),
        "text" => {
            for record in &records {
                let tolerance = record
                    .tolerance
                    .as_ref()
                    .map(|t| format!("  ({t})"))
                    .unwrap_or_default();
                println!(
                    "[{}] {}  =>  {}{tolerance}",
                    record.supplier, record.problem, record.answer
                );
            }
        }
        other => anyhow::bail!("unknown format '{other}', expected text or json"),
    }
    Ok(())
}
