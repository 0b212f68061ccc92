//! Repository merger.
//!
//! Loads sources in order and folds their records into one map keyed by
//! lowercase name. A later source replaces an earlier record wholesale.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::options::EngineOptions;
use crate::parser::parse_dictionary;
use crate::scanner::{read_document, scan_with_strategy};
use crate::types::{LoadStrategy, SkillRecord, SourceDescriptor, SourceNote};

/// Case-insensitive record map that iterates in first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct SkillMap {
    entries: Vec<SkillRecord>,
    index: HashMap<String, usize>,
}

impl SkillMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the one it replaced.
    ///
    /// A replaced record keeps its position.
    pub fn insert(&mut self, record: SkillRecord) -> Option<SkillRecord> {
        let key = record.key();
        if let Some(&slot) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[slot], record));
        }
        let _ = self.index.insert(key, self.entries.len());
        self.entries.push(record);
        None
    }

    /// Look up a record by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&SkillRecord> {
        self.index
            .get(&name.to_lowercase())
            .map(|&slot| &self.entries[slot])
    }

    /// Whether a record with this name exists, ignoring case.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&name.to_lowercase())
    }

    /// Number of distinct skills.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in first-insertion order.
    pub fn records(&self) -> &[SkillRecord] {
        &self.entries
    }

    /// Consume the map, returning its records.
    pub fn into_records(self) -> Vec<SkillRecord> {
        self.entries
    }
}

/// Everything one source produced.
#[derive(Debug, Clone)]
pub struct SourceLoad {
    /// Label applied to the records.
    pub label: String,
    /// Records in load order.
    pub records: Vec<SkillRecord>,
    /// How they were obtained.
    pub strategy: LoadStrategy,
    /// Human-readable summary.
    pub note: String,
}

impl SourceLoad {
    fn to_note(&self, path: &Path) -> SourceNote {
        SourceNote {
            label: self.label.clone(),
            path: path.display().to_string(),
            strategy: self.strategy,
            count: self.records.len(),
            note: self.note.clone(),
        }
    }
}

/// Result of merging a list of sources.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Merged records.
    pub skills: SkillMap,
    /// One note per source actually loaded.
    pub notes: Vec<SourceNote>,
    /// Whether cancellation stopped the merge before the last source.
    pub cancelled: bool,
}

/// Load one source.
///
/// Uses the explicit dictionary if it exists, else the first configured
/// dictionary file found in the source directory, else a directory scan.
pub fn load_source(source: &SourceDescriptor, options: &EngineOptions) -> SourceLoad {
    let label = source.display_label();

    if let Some(dictionary) = find_dictionary(source, options) {
        match read_document(&dictionary, u64::MAX) {
            Ok(raw) => {
                let records = parse_dictionary(&raw, &source.path, Some(&label), options);
                let note = format!(
                    "{} skills from dictionary {}",
                    records.len(),
                    dictionary.display()
                );
                return SourceLoad {
                    label,
                    records,
                    strategy: LoadStrategy::Dictionary,
                    note,
                };
            }
            Err(e) => {
                warn!(source = %label, error = %e, "dictionary unreadable, scanning directory");
            }
        }
    }

    let (strategy, records) = scan_with_strategy(&source.path, Some(&label), options);
    let note = match strategy {
        LoadStrategy::Missing => format!("directory {} not found", source.path.display()),
        LoadStrategy::Index => format!("{} skills from index", records.len()),
        LoadStrategy::Scan | LoadStrategy::Dictionary => {
            format!("{} skills from directory scan", records.len())
        }
    };
    SourceLoad {
        label,
        records,
        strategy,
        note,
    }
}

/// Merge `sources` in order, later sources winning.
///
/// With no sources the configured default source is used. `cancel` is
/// checked before each source; a source is applied only once fully loaded.
pub fn merge(
    sources: &[SourceDescriptor],
    options: &EngineOptions,
    cancel: &CancellationToken,
) -> MergeOutcome {
    let fallback;
    let sources = if sources.is_empty() {
        debug!(path = %options.default_source.display(), "no sources given, using default");
        fallback = [SourceDescriptor::new(options.default_source.clone())];
        &fallback[..]
    } else {
        sources
    };

    let mut outcome = MergeOutcome::default();
    for source in sources {
        if cancel.is_cancelled() {
            info!(merged = outcome.skills.len(), "merge cancelled");
            outcome.cancelled = true;
            break;
        }

        let load = load_source(source, options);
        debug!(source = %load.label, strategy = %load.strategy, count = load.records.len(), "source loaded");
        outcome.notes.push(load.to_note(&source.path));

        for record in load.records {
            if let Some(previous) = outcome.skills.insert(record) {
                debug!(name = %previous.name, from = ?previous.origin_label, "skill overridden by later source");
            }
        }
    }

    outcome
}

fn find_dictionary(source: &SourceDescriptor, options: &EngineOptions) -> Option<PathBuf> {
    if let Some(dictionary) = &source.dictionary {
        if dictionary.is_file() {
            return Some(dictionary.clone());
        }
        warn!(dictionary = %dictionary.display(), "dictionary not found, scanning directory");
        return None;
    }

    options
        .dictionary_files
        .iter()
        .map(|name| source.path.join(name))
        .find(|candidate| candidate.is_file())
}
