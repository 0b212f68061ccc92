//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`SkillmapSettings::default()`]
//! 2. If the settings file exists, deep-merge its values over the defaults
//! 3. Apply `SKILLMAP_*` environment variable overrides (highest priority)
//! 4. Validate the result
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{Result, SettingsError};
use crate::types::SkillmapSettings;

/// Resolve the default settings file path (`~/.skillmap/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".skillmap").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<SkillmapSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults. Invalid JSON is an error.
pub fn load_settings_from_path(path: &Path) -> Result<SkillmapSettings> {
    let mut settings = read_settings_file(path)?;
    apply_env_overrides(&mut settings);
    validate(&settings)?;
    Ok(settings)
}

/// Read and deep-merge the settings file over the defaults, without env
/// overrides.
pub fn read_settings_file(path: &Path) -> Result<SkillmapSettings> {
    let defaults = serde_json::to_value(SkillmapSettings::default())?;

    let merged = if path.exists() {
        debug!(path = %path.display(), "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(path = %path.display(), "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Reject settings the engine cannot run with.
pub fn validate(settings: &SkillmapSettings) -> Result<()> {
    if settings.corpus.marker_file.trim().is_empty() {
        return Err(SettingsError::InvalidValue(
            "corpus.markerFile must not be empty".to_string(),
        ));
    }
    if settings.corpus.index_file.trim().is_empty() {
        return Err(SettingsError::InvalidValue(
            "corpus.indexFile must not be empty".to_string(),
        ));
    }
    if settings.corpus.description_limit == 0 {
        return Err(SettingsError::InvalidValue(
            "corpus.descriptionLimit must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Apply `SKILLMAP_*` environment variable overrides.
pub fn apply_env_overrides(settings: &mut SkillmapSettings) {
    apply_overrides_from(settings, |name| std::env::var(name).ok());
}

/// Apply overrides using an arbitrary variable lookup.
///
/// Invalid values are ignored with a warning and the file/default value is
/// kept.
pub fn apply_overrides_from<F>(settings: &mut SkillmapSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let read_string = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(v) = read_string("SKILLMAP_MARKER_FILE") {
        settings.corpus.marker_file = v;
    }
    if let Some(v) = read_string("SKILLMAP_INDEX_FILE") {
        settings.corpus.index_file = v;
    }
    if let Some(v) = read_string("SKILLMAP_DEFAULT_SOURCE") {
        settings.corpus.default_source = v;
    }
    if let Some(v) = read_string("SKILLMAP_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(raw) = read_string("SKILLMAP_ENRICH_INDEX") {
        match parse_bool(&raw) {
            Some(v) => settings.corpus.enrich_index = v,
            None => warn!(key = "SKILLMAP_ENRICH_INDEX", value = %raw, "invalid boolean env var, ignoring"),
        }
    }
    if let Some(raw) = read_string("SKILLMAP_TOP_N") {
        match parse_usize_range(&raw, 0, 10_000) {
            Some(v) => settings.ranking.top_n = v,
            None => warn!(key = "SKILLMAP_TOP_N", value = %raw, "invalid count env var, ignoring"),
        }
    }
}

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `usize` within an inclusive range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}
