//! Shared constants for the engine.

/// Info strings that mark a fenced block as skill metadata (compared
/// case-insensitively).
pub const METADATA_FENCE_TAGS: &[&str] = &["yaml", "yml", "skill", "frontmatter", "front-matter"];

/// Delimiter of a leading front-matter block.
pub const FRONT_MATTER_DELIMITER: &str = "---";

/// Appended to descriptions cut at the configured length.
pub const ELLIPSIS: &str = "...";

/// Separator between the parts of a `PATH::DICTIONARY::LABEL` source spec.
pub const SOURCE_SPEC_SEPARATOR: &str = "::";
