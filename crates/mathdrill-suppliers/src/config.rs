//! Drill configuration and supplier set-up.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use mathdrill_core::statistics::DEFAULT_RESULTS_TRACKED;
use mathdrill_core::{CompositeSupplier, ProblemSupplier, SessionOptions, SettingValue, Tolerance};

use crate::exponentiation::DEFAULT_TOLERANCE_PERCENT;
use crate::registry::{all_supplier_names, create_supplier, resolve_name};

/// Top-level mathdrill configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillConfig {
    /// Fixed random seed, for reproducible sessions.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Suppliers to drill; empty means all of them.
    #[serde(default)]
    pub suppliers: Vec<String>,
    #[serde(default = "default_true")]
    pub mark_wrong_if_cleared: bool,
    #[serde(default = "default_true")]
    pub mark_wrong_if_shown_answer: bool,
    /// Number of results kept for the statistics.
    #[serde(default = "default_results_tracked")]
    pub results_tracked: usize,
    /// Tolerance of approximate problems, in percent.
    #[serde(default = "default_tolerance_percent")]
    pub default_tolerance_percent: i64,
    /// Setting values keyed by supplier name, then setting name.
    #[serde(default)]
    pub settings: BTreeMap<String, BTreeMap<String, SettingValue>>,
    /// Per-supplier tolerance overrides, in percent.
    #[serde(default)]
    pub tolerance_percent: BTreeMap<String, i64>,
}

fn default_true() -> bool {
    true
}
fn default_results_tracked() -> usize {
    DEFAULT_RESULTS_TRACKED
}
fn default_tolerance_percent() -> i64 {
    DEFAULT_TOLERANCE_PERCENT
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            seed: None,
            suppliers: Vec::new(),
            mark_wrong_if_cleared: default_true(),
            mark_wrong_if_shown_answer: default_true(),
            results_tracked: default_results_tracked(),
            default_tolerance_percent: default_tolerance_percent(),
            settings: BTreeMap::new(),
            tolerance_percent: BTreeMap::new(),
        }
    }
}

impl DrillConfig {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            mark_wrong_if_cleared: self.mark_wrong_if_cleared,
            mark_wrong_if_shown_answer: self.mark_wrong_if_shown_answer,
            results_tracked: self.results_tracked,
        }
    }

    /// Canonical names of the selected suppliers.
    pub fn selected_suppliers(&self) -> Result<Vec<&'static str>> {
        if self.suppliers.is_empty() {
            return Ok(all_supplier_names().to_vec());
        }
        self.suppliers
            .iter()
            .map(|name| {
                resolve_name(name).with_context(|| format!("unknown supplier in config: '{name}'"))
            })
            .collect()
    }

    /// Build one supplier with this configuration's settings and tolerance
    /// applied.
    pub fn build_supplier(&self, name: &str) -> Result<Box<dyn ProblemSupplier>> {
        let supplier = create_supplier(name)?;
        let canonical = supplier.name().to_string();

        if let Some(values) = self.settings_for(&canonical) {
            for (setting_name, value) in values {
                let setting = supplier.setting(setting_name).with_context(|| {
                    format!("supplier '{canonical}' has no setting named '{setting_name}'")
                })?;
                setting.apply(value).with_context(|| {
                    format!("invalid value for '{canonical}' / '{setting_name}'")
                })?;
            }
        }

        let percent = self
            .tolerance_for(&canonical)
            .unwrap_or(self.default_tolerance_percent);
        if percent < 0 {
            anyhow::bail!("tolerance for '{canonical}' must not be negative, got {percent}%");
        }
        if supplier.tolerance().is_some() {
            if percent == 0 {
                anyhow::bail!("tolerance for '{canonical}' must be above 0%");
            }
            supplier.set_tolerance(Tolerance::percent(percent));
        } else if self.tolerance_for(&canonical).is_some() {
            warn!(supplier = %canonical, "tolerance ignored; supplier only makes exact problems");
        }
        Ok(supplier)
    }

    /// Build the composite of all selected suppliers.
    pub fn build_composite(&self) -> Result<CompositeSupplier> {
        self.validate_names()?;
        let mut composite = CompositeSupplier::new();
        for name in self.selected_suppliers()? {
            let supplier = self.build_supplier(name)?;
            if !composite.add_supplier(supplier) {
                warn!(supplier = name, "supplier listed twice; keeping the first");
            }
        }
        Ok(composite)
    }

    /// Every supplier named in `settings` and `tolerance_percent` must exist.
    fn validate_names(&self) -> Result<()> {
        for name in self.settings.keys().chain(self.tolerance_percent.keys()) {
            if resolve_name(name).is_none() {
                anyhow::bail!("unknown supplier in config: '{name}'");
            }
        }
        Ok(())
    }

    fn settings_for(&self, canonical: &str) -> Option<&BTreeMap<String, SettingValue>> {
        self.settings
            .iter()
            .find(|(name, _)| resolve_name(name) == Some(canonical))
            .map(|(_, values)| values)
    }

    fn tolerance_for(&self, canonical: &str) -> Option<i64> {
        self.tolerance_percent
            .iter()
            .find(|(name, _)| resolve_name(name) == Some(canonical))
            .map(|(_, percent)| *percent)
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `mathdrill.toml` in the current directory
/// 2. `~/.config/mathdrill/config.toml`
///
/// Environment variable override: `MATHDRILL_SEED`.
pub fn load_config() -> Result<DrillConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<DrillConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("mathdrill.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<DrillConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => DrillConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

fn apply_env_overrides(
    config: &mut DrillConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(seed) = lookup("MATHDRILL_SEED") {
        let seed = seed
            .trim()
            .parse()
            .with_context(|| format!("MATHDRILL_SEED is not a valid seed: '{seed}'"))?;
        config.seed = Some(seed);
    }
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("mathdrill"))
}
