//! The `mathdrill list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Table;

use mathdrill_suppliers::load_config_from;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let composite = config.build_composite()?;

    let mut table = Table::new();
    table.set_header(vec!["Supplier", "Setting", "Kind", "Value", "Tolerance"]);

    for supplier in composite.iter() {
        let tolerance = supplier
            .tolerance()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "exact".to_string());
        let settings = supplier.settings();
        if settings.is_empty() {
            table.add_row(vec![supplier.name(), "-", "-", "-", tolerance.as_str()]);
            continue;
        }
        for setting in settings {
            table.add_row(vec![
                supplier.name().to_string(),
                setting.name().to_string(),
                setting.kind().to_string(),
                setting.value_string(),
                tolerance.clone(),
            ]);
        }
    }

    println!("{table}");
    println!("{} supplier(s) selected.", composite.len());
    Ok(())
}
