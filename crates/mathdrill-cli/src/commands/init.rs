//! The `mathdrill init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("mathdrill.toml").exists() {
        println!("mathdrill.toml already exists, skipping.");
    } else {
        std::fs::write("mathdrill.toml", STARTER_CONFIG)?;
        println!("Created mathdrill.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit mathdrill.toml to pick suppliers and ranges");
    println!("  2. Run: mathdrill list");
    println!("  3. Run: mathdrill practice");

    Ok(())
}

pub(crate) const STARTER_CONFIG: &str = r#"# mathdrill configuration

# Fix the seed for a reproducible drill.
# seed = 42

# Suppliers to drill. Leave empty to drill everything; `mathdrill list`
# shows every name.
suppliers = ["Squares", "Multiply by 25", "Exponent approximation"]

mark_wrong_if_cleared = true
mark_wrong_if_shown_answer = true
results_tracked = 100
default_tolerance_percent = 5

[settings."Squares"]
Base = [1, 30]

[settings."Exponent approximation"]
Division = true
Terms = [1, 3]

[tolerance_percent]
"Exponent approximation" = 5
"#;
