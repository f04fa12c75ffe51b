use crate::error::{ReporterError, Result};
use crate::types::config::ReporterConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "sarif-reporter.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".sarif-reporter/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/sarif-reporter/config.toml";

pub fn load_config(root: &Path) -> Result<Option<ReporterConfig>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

/// Merges global, repo and local files in that order. Nothing is loaded
/// unless the repo file exists.
pub fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<Option<ReporterConfig>> {
    let repo_path = root.join(DEFAULT_CONFIG_FILE);
    if !repo_path.exists() {
        debug!(path = %repo_path.display(), "no config file");
        return Ok(None);
    }

    let layers = [
        global_path.map(Path::to_path_buf),
        Some(repo_path),
        Some(root.join(DEFAULT_LOCAL_FILE)),
    ];
    let mut merged = Map::new();
    for path in layers.iter().flatten() {
        if let Some(layer) = read_layer(path)? {
            overlay_sections(&mut merged, layer);
        }
    }

    let cfg: ReporterConfig = Value::Table(merged).try_into().map_err(|e: toml::de::Error| {
        ReporterError::ConfigParse(format!("merged configuration: {e}"))
    })?;
    cfg.validate()?;
    Ok(Some(cfg))
}

/// Reads one layer and checks it against the schema on its own, so type
/// errors name the file that introduced them.
fn read_layer(path: &Path) -> Result<Option<Map<String, Value>>> {
    if !path.exists() {
        return Ok(None);
    }
    debug!(path = %path.display(), "reading config layer");
    let content = std::fs::read_to_string(path)?;
    let layer: Map<String, Value> = toml::from_str(&content)
        .map_err(|e| ReporterError::ConfigParse(format!("{}: {}", path.display(), e)))?;
    let _checked: ReporterConfig = Value::Table(layer.clone())
        .try_into()
        .map_err(|e: toml::de::Error| {
            ReporterError::ConfigParse(format!("{}: {}", path.display(), e))
        })?;
    Ok(Some(layer))
}

/// Later layers replace individual keys inside `[tool]`, `[paths]` and
/// `[output]`; anything that is not a section is replaced whole.
fn overlay_sections(merged: &mut Map<String, Value>, layer: Map<String, Value>) {
    for (section, value) in layer {
        let value = match (merged.get_mut(&section), value) {
            (Some(Value::Table(base)), Value::Table(fields)) => {
                for (key, field) in fields {
                    base.insert(key, field);
                }
                continue;
            }
            (_, value) => value,
        };
        merged.insert(section, value);
    }
}
