//! Directory scanner.
//!
//! Discovers skills as immediate subdirectories holding a marker file
//! (`SKILL.md` by default). A directory with a JSON index is loaded from the
//! index instead of being walked.

use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::errors::{EngineError, Result};
use crate::index::load_index;
use crate::options::EngineOptions;
use crate::parser::{extract_metadata_block, heuristic_description, read_front_matter};
use crate::types::{LoadStrategy, SkillRecord};

/// Scan `path` and return its records. See [`scan_with_strategy`].
pub fn scan_directory(path: &Path, label: Option<&str>, options: &EngineOptions) -> Vec<SkillRecord> {
    scan_with_strategy(path, label, options).1
}

/// Scan `path`, reporting how the records were obtained.
///
/// - `path` missing: the parent's index is used if present, else
///   [`LoadStrategy::Missing`] with no records.
/// - `path/<index file>` present: loaded with [`load_index`].
/// - otherwise each immediate subdirectory with a marker file becomes one
///   record named after the subdirectory. Hidden directories are skipped.
///
/// Never fails; unreadable or oversized markers are logged and skipped.
/// Symlinked skill directories are followed.
pub fn scan_with_strategy(
    path: &Path,
    label: Option<&str>,
    options: &EngineOptions,
) -> (LoadStrategy, Vec<SkillRecord>) {
    if !path.is_dir() {
        if let Some(parent_index) = path
            .parent()
            .map(|parent| parent.join(&options.index_file))
            .filter(|index| index.is_file())
        {
            debug!(path = %path.display(), index = %parent_index.display(), "source missing, using parent index");
            return (LoadStrategy::Index, load_index(&parent_index, label, options));
        }
        warn!(path = %path.display(), "skill source directory does not exist");
        return (LoadStrategy::Missing, Vec::new());
    }

    let index_path = path.join(&options.index_file);
    if index_path.is_file() {
        return (LoadStrategy::Index, load_index(&index_path, label, options));
    }

    let walker = WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    let mut records = Vec::new();
    for entry in walker
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read skill directory entry");
                continue;
            }
        };
        // follows symlinks, unlike entry.file_type()
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }

        let marker = dir.join(&options.marker_file);
        if !marker.is_file() {
            continue;
        }
        let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        match load_marker(dir, &marker, name, options) {
            Ok(Some(record)) => {
                debug!(name = %record.name, "loaded skill");
                records.push(record.with_origin(label));
            }
            Ok(None) => {}
            Err(e @ EngineError::TooLarge { .. }) => {
                warn!(error = %e, "skipping oversized marker file");
            }
            Err(e) => {
                warn!(error = %e, "skipping unreadable marker file");
            }
        }
    }

    (LoadStrategy::Scan, records)
}

/// Read a document, refusing files over `max_bytes`.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub fn read_document(path: &Path, max_bytes: u64) -> Result<String> {
    let display = || path.display().to_string();

    let size = std::fs::metadata(path)
        .map_err(|source| EngineError::Io {
            path: display(),
            source,
        })?
        .len();
    if size > max_bytes {
        return Err(EngineError::TooLarge {
            path: display(),
            size,
            max: max_bytes,
        });
    }

    let bytes = std::fs::read(path).map_err(|source| EngineError::Io {
        path: display(),
        source,
    })?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            debug!(path = %path.display(), "decoding document lossily");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    })
}

/// Build a record from one skill directory's marker file.
///
/// The front-matter description wins over the first prose line.
fn load_marker(
    dir: &Path,
    marker: &Path,
    name: &str,
    options: &EngineOptions,
) -> Result<Option<SkillRecord>> {
    let content = read_document(marker, options.max_marker_bytes)?;
    let fm = read_front_matter(&extract_metadata_block(&content));

    let description = fm
        .description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| heuristic_description(&content, options.description_limit));

    Ok(SkillRecord::new(name, description)
        .map(|record| record.with_categories(fm.categories).with_source_path(dir)))
}
