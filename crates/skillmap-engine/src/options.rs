//! Engine options derived from [`SkillmapSettings`].

use std::path::PathBuf;

use skillmap_settings::SkillmapSettings;

/// Knobs the loaders and the mapper read. Built from settings so the engine
/// itself never touches the settings file or the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Per-skill marker file name.
    pub marker_file: String,
    /// JSON index file name.
    pub index_file: String,
    /// Dictionary documents probed in a source directory, in order.
    pub dictionary_files: Vec<String>,
    /// Marker files larger than this are skipped.
    pub max_marker_bytes: u64,
    /// Re-read marker files for skills loaded from a JSON index.
    pub enrich_index: bool,
    /// Source used when a request names none.
    pub default_source: PathBuf,
    /// Heuristic description length, in characters.
    pub description_limit: usize,
    /// Default result cap. `0` means unlimited.
    pub top_n: usize,
}

impl From<&SkillmapSettings> for EngineOptions {
    fn from(settings: &SkillmapSettings) -> Self {
        let corpus = &settings.corpus;
        Self {
            marker_file: corpus.marker_file.clone(),
            index_file: corpus.index_file.clone(),
            dictionary_files: corpus.dictionary_files.clone(),
            max_marker_bytes: corpus.max_marker_bytes,
            enrich_index: corpus.enrich_index,
            default_source: PathBuf::from(&corpus.default_source),
            description_limit: corpus.description_limit,
            top_n: settings.ranking.top_n,
        }
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from(&SkillmapSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_settings() {
        let options = EngineOptions::default();
        assert_eq!(options.marker_file, "SKILL.md");
        assert_eq!(options.index_file, "skills.json");
        assert_eq!(options.description_limit, 200);
        assert_eq!(options.top_n, 20);
        assert!(options.enrich_index);
    }

    #[test]
    fn settings_overrides_carry_over() {
        let mut settings = SkillmapSettings::default();
        settings.corpus.marker_file = "README.md".to_string();
        settings.corpus.default_source = "/app/skills".to_string();
        settings.ranking.top_n = 0;

        let options = EngineOptions::from(&settings);
        assert_eq!(options.marker_file, "README.md");
        assert_eq!(options.default_source, PathBuf::from("/app/skills"));
        assert_eq!(options.top_n, 0);
    }
}
