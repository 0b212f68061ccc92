//! Core types for the engine.
//!
//! All serialized types use `camelCase` field names.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::SOURCE_SPEC_SEPARATOR;
use crate::errors::{EngineError, Result};
use crate::paths::normalize_host_path;

/// One normalized skill.
///
/// Built through [`SkillRecord::new`], which rejects blank names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRecord {
    /// Skill name. Unique within a merge, compared case-insensitively.
    pub name: String,
    /// Short description, possibly empty.
    #[serde(default)]
    pub description: String,
    /// Categories in source order.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Resolved on-disk location of the skill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
    /// Label of the source that produced this record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_label: Option<String>,
}

impl SkillRecord {
    /// Create a record, or `None` if `name` is empty or whitespace-only.
    pub fn new(name: &str, description: impl Into<String>) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            description: description.into().trim().to_string(),
            categories: Vec::new(),
            source_path: None,
            origin_label: None,
        })
    }

    /// Replace the categories.
    #[must_use]
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    /// Set the on-disk location.
    #[must_use]
    pub fn with_source_path(mut self, path: &Path) -> Self {
        self.source_path = Some(path.to_string_lossy().into_owned());
        self
    }

    /// Set the origin label if one is given.
    #[must_use]
    pub fn with_origin(mut self, label: Option<&str>) -> Self {
        if let Some(label) = label {
            self.origin_label = Some(label.to_string());
        }
        self
    }

    /// Case-insensitive merge key.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// A [`SkillRecord`] scored against a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedSkill {
    /// The scored record.
    #[serde(flatten)]
    pub skill: SkillRecord,
    /// Relevance score, rounded to two decimals.
    pub score: f64,
    /// Query keywords that contributed to the score.
    pub matched_keywords: BTreeSet<String>,
}

/// One corpus of skills supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescriptor {
    /// Local directory holding the skills.
    pub path: PathBuf,
    /// Dictionary document listing the skills.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionary: Option<PathBuf>,
    /// Display label. Defaults to the directory name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Where the directory was cloned from. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
}

impl SourceDescriptor {
    /// Describe a source by its local directory.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            dictionary: None,
            label: None,
            remote: None,
        }
    }

    /// Attach a dictionary document.
    #[must_use]
    pub fn with_dictionary(mut self, dictionary: impl Into<PathBuf>) -> Self {
        self.dictionary = Some(dictionary.into());
        self
    }

    /// Attach a display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attach the remote origin.
    #[must_use]
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = Some(remote.into());
        self
    }

    /// Parse a `PATH[::DICTIONARY[::LABEL]]` specification.
    ///
    /// Paths go through [`normalize_host_path`]. A relative dictionary path
    /// is resolved against the source directory. Empty parts are treated as
    /// absent, except the path which is required.
    pub fn parse(spec: &str) -> Result<Self> {
        let parts: Vec<&str> = spec.split(SOURCE_SPEC_SEPARATOR).map(str::trim).collect();
        if parts.len() > 3 {
            return Err(EngineError::InvalidSource(format!(
                "expected PATH[::DICTIONARY[::LABEL]], got {spec:?}"
            )));
        }
        let path = parts[0];
        if path.is_empty() {
            return Err(EngineError::InvalidSource(format!(
                "missing source path in {spec:?}"
            )));
        }

        let mut source = Self::new(normalize_host_path(path));
        if let Some(dictionary) = parts.get(1).filter(|d| !d.is_empty()) {
            let dictionary = normalize_host_path(dictionary);
            source.dictionary = Some(if dictionary.is_relative() {
                source.path.join(dictionary)
            } else {
                dictionary
            });
        }
        if let Some(label) = parts.get(2).filter(|l| !l.is_empty()) {
            source.label = Some((*label).to_string());
        }
        Ok(source)
    }

    /// Label used in notes and on records: the explicit label, else the
    /// directory name, else the full path.
    pub fn display_label(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or_else(|| self.path.display().to_string(), str::to_string)
    }
}

/// How a source's records were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStrategy {
    /// Parsed from a dictionary document (plus directory backfill).
    Dictionary,
    /// Loaded from a precomputed JSON index.
    Index,
    /// Walked the skill subdirectories.
    Scan,
    /// The source directory does not exist.
    Missing,
}

impl fmt::Display for LoadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dictionary => write!(f, "dictionary"),
            Self::Index => write!(f, "index"),
            Self::Scan => write!(f, "scan"),
            Self::Missing => write!(f, "missing"),
        }
    }
}

/// Per-source description of what was loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceNote {
    /// Source label.
    pub label: String,
    /// Source directory.
    pub path: String,
    /// Strategy that produced the records.
    pub strategy: LoadStrategy,
    /// Number of records the source contributed before merging.
    pub count: usize,
    /// Human-readable summary.
    pub note: String,
}

/// A mapping request: query text plus ordered sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapRequest {
    /// Short project identifier.
    pub project: String,
    /// Free-text hints.
    #[serde(default)]
    pub hints: String,
    /// Sources from lowest to highest authority.
    #[serde(default)]
    pub sources: Vec<SourceDescriptor>,
    /// Maximum number of results. Falls back to the configured `top_n`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl MapRequest {
    /// Create a request with no sources.
    pub fn new(project: impl Into<String>, hints: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            hints: hints.into(),
            sources: Vec::new(),
            limit: None,
        }
    }

    /// Append a source. Later sources override earlier ones.
    #[must_use]
    pub fn with_source(mut self, source: SourceDescriptor) -> Self {
        self.sources.push(source);
        self
    }

    /// Cap the number of results.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Text the query keywords are extracted from.
    pub fn query_text(&self) -> String {
        format!("{} {}", self.project, self.hints)
    }
}

/// Result of one mapping request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapResult {
    /// Keywords extracted from the query.
    pub keywords: BTreeSet<String>,
    /// Ranked skills, best first.
    pub skills: Vec<RankedSkill>,
    /// Distinct categories across the returned skills.
    pub categories: BTreeSet<String>,
    /// One note per loaded source, in load order.
    pub sources: Vec<SourceNote>,
    /// Whether the request stopped early.
    pub cancelled: bool,
}
