pub mod eval;
pub mod init;
pub mod list;
pub mod practice;
pub mod sample;

use std::path::PathBuf;

use anyhow::Result;

use mathdrill_suppliers::{load_config_from, DrillConfig};

/// Load the config and apply the command-line overrides shared by the
/// drilling commands.
fn load_with_overrides(
    config_path: Option<PathBuf>,
    seed: Option<u64>,
    suppliers: Vec<String>,
) -> Result<DrillConfig> {
    let mut config = load_config_from(config_path.as_deref())?;
    if seed.is_some() {
        config.seed = seed;
    }
    if !suppliers.is_empty() {
        config.suppliers = suppliers;
    }
    Ok(config)
}
