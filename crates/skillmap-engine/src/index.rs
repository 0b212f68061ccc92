//! JSON index loader.
//!
//! An index is a precomputed listing of a corpus:
//!
//! ```json
//! { "detectedType": "AspNetCoreApi",
//!   "skills": [ { "name": "csharp-async", "sourcePath": "csharp-async" } ] }
//! ```
//!
//! Only `skills` is read. Entries are parsed one at a time so a single bad
//! element does not discard the rest.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::{EngineError, Result};
use crate::options::EngineOptions;
use crate::parser::{extract_metadata_block, read_front_matter};
use crate::paths::normalize_host_path;
use crate::scanner::read_document;
use crate::types::SkillRecord;

#[derive(Debug, Deserialize)]
struct IndexFile {
    #[serde(default)]
    skills: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    source_path: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    categories: Vec<String>,
}

/// Outcome of re-reading a skill's marker file for an indexed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment {
    /// Front matter supplied a description or categories.
    Enriched(SkillRecord),
    /// No marker, unreadable marker, or nothing useful in it.
    Unavailable,
}

/// Load records from a JSON index file.
///
/// Unreadable or malformed files yield an empty list and a warning. When
/// [`EngineOptions::enrich_index`] is set each record is passed through
/// [`enrich`].
pub fn load_index(json_path: &Path, label: Option<&str>, options: &EngineOptions) -> Vec<SkillRecord> {
    let entries = match read_index(json_path) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "ignoring unusable skill index");
            return Vec::new();
        }
    };
    let base = json_path.parent().unwrap_or_else(|| Path::new("."));

    let mut records = Vec::with_capacity(entries.len());
    for (position, value) in entries.into_iter().enumerate() {
        let entry: IndexEntry = match serde_json::from_value(value) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(index = %json_path.display(), position, error = %e, "skipping malformed index entry");
                continue;
            }
        };
        let Some(record) = entry_to_record(entry, base) else {
            continue;
        };
        let record = record.with_origin(label);

        if !options.enrich_index {
            records.push(record);
            continue;
        }
        match enrich(&record, options) {
            Enrichment::Enriched(enriched) => records.push(enriched),
            Enrichment::Unavailable => records.push(record),
        }
    }

    debug!(index = %json_path.display(), count = records.len(), "loaded skill index");
    records
}

/// Re-read the marker file under `record.source_path`.
///
/// Front-matter description and categories replace the indexed ones when
/// present. Name, location and origin are kept.
pub fn enrich(record: &SkillRecord, options: &EngineOptions) -> Enrichment {
    let Some(dir) = record.source_path.as_deref().map(Path::new) else {
        return Enrichment::Unavailable;
    };
    let marker = dir.join(&options.marker_file);
    if !marker.is_file() {
        return Enrichment::Unavailable;
    }

    let content = match read_document(&marker, options.max_marker_bytes) {
        Ok(content) => content,
        Err(e) => {
            debug!(error = %e, "index enrichment skipped");
            return Enrichment::Unavailable;
        }
    };

    let fm = read_front_matter(&extract_metadata_block(&content));
    let description = fm.description.filter(|d| !d.trim().is_empty());
    if description.is_none() && fm.categories.is_empty() {
        return Enrichment::Unavailable;
    }

    let mut enriched = record.clone();
    if let Some(description) = description {
        enriched.description = description.trim().to_string();
    }
    if !fm.categories.is_empty() {
        enriched.categories = fm.categories;
    }
    Enrichment::Enriched(enriched)
}

fn read_index(json_path: &Path) -> Result<Vec<serde_json::Value>> {
    let raw = std::fs::read_to_string(json_path).map_err(|source| EngineError::Io {
        path: json_path.display().to_string(),
        source,
    })?;
    let file: IndexFile = serde_json::from_str(&raw).map_err(|source| EngineError::Json {
        path: json_path.display().to_string(),
        source,
    })?;
    Ok(file.skills)
}

fn entry_to_record(entry: IndexEntry, base: &Path) -> Option<SkillRecord> {
    let record = SkillRecord::new(&entry.name, entry.description.unwrap_or_default())?
        .with_categories(entry.categories);

    let location = entry
        .path
        .or(entry.source_path)
        .filter(|p| !p.trim().is_empty())
        .map(|p| resolve(&p, base));

    Some(match location {
        Some(path) => record.with_source_path(&path),
        None => record,
    })
}

fn resolve(raw: &str, base: &Path) -> PathBuf {
    let path = normalize_host_path(raw);
    if path.is_relative() {
        base.join(path)
    } else {
        path
    }
}
