//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]` so a settings
//! file may contain any subset of keys; missing fields keep their defaults.

use serde::{Deserialize, Serialize};

/// Root settings type.
///
/// ```json
/// {
///   "corpus": { "markerFile": "SKILL.md", "enrichIndex": false },
///   "ranking": { "topN": 10 },
///   "logging": { "level": "info" }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillmapSettings {
    /// How skill corpora are located and read.
    pub corpus: CorpusSettings,
    /// Result shaping.
    pub ranking: RankingSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

/// Corpus layout and loading behavior.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CorpusSettings {
    /// Per-skill marker file inside each skill directory.
    pub marker_file: String,
    /// Precomputed JSON index file name.
    pub index_file: String,
    /// Dictionary documents looked up in a source directory when the source
    /// does not name one explicitly. First existing file wins.
    pub dictionary_files: Vec<String>,
    /// Marker files larger than this are skipped.
    pub max_marker_bytes: u64,
    /// Re-read marker files for skills loaded from a JSON index.
    pub enrich_index: bool,
    /// Source directory used when a request names no sources.
    pub default_source: String,
    /// Maximum length of a heuristic description, in characters.
    pub description_limit: usize,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            marker_file: "SKILL.md".to_string(),
            index_file: "skills.json".to_string(),
            dictionary_files: vec!["SKILLS.md".to_string(), "skills.md".to_string()],
            max_marker_bytes: 100 * 1024,
            enrich_index: true,
            default_source: "skills".to_string(),
            description_limit: 200,
        }
    }
}

/// Result shaping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RankingSettings {
    /// Maximum number of ranked skills returned. `0` returns everything.
    pub top_n: usize,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self { top_n: 20 }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
