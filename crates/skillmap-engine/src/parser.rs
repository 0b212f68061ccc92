//! Dictionary and marker file parsing.
//!
//! A dictionary document lists many skills in one of three shapes, tried in
//! order until one produces a record:
//!
//! 1. fenced metadata blocks (```` ```yaml ```` with `name:` / `description:` /
//!    `categories:` lines)
//! 2. a markdown table (`| name | description | categories |`)
//! 3. headings carrying a hyphenated identifier, each followed by a
//!    description paragraph
//!
//! The front-matter reader is a hand-written key/value subset, not a YAML
//! parser: lines are matched by key prefix and unknown keys are ignored.
//! Nothing in this module fails; malformed input yields fewer records.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::constants::{ELLIPSIS, FRONT_MATTER_DELIMITER, METADATA_FENCE_TAGS};
use crate::options::EngineOptions;
use crate::scanner;
use crate::types::SkillRecord;

/// A pipe-delimited row with at least three pipes.
static TABLE_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\|(?:[^|]*\|){2,}[^|]*$").unwrap());

/// A table separator row such as `|---|:---:|`.
static TABLE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\s|:-]+$").unwrap());

/// A lowercase hyphenated identifier such as `git-commit`.
static HYPHENATED_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-z0-9]+(?:-[a-z0-9]+)+\b").unwrap());

/// Keys read from a front-matter block. `name` is optional here so callers
/// can fall back when only a description is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    /// `name:` value.
    pub name: Option<String>,
    /// `description:` value.
    pub description: Option<String>,
    /// `categories:` / `category:` values.
    pub categories: Vec<String>,
}

impl FrontMatter {
    /// Convert to a record; `None` without a non-blank name.
    pub fn into_record(self) -> Option<SkillRecord> {
        let name = self.name?;
        SkillRecord::new(&name, self.description.unwrap_or_default())
            .map(|record| record.with_categories(self.categories))
    }
}

type Strategy = fn(&str) -> Vec<SkillRecord>;

/// Dictionary strategies in priority order.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("front-matter", parse_fenced_blocks),
    ("table", parse_table),
    ("headings", parse_headings),
];

/// Parse a dictionary document into records.
///
/// Strategies are tried in order and the first non-empty result wins. Then
/// `base_path` is scanned and any on-disk skill the document does not
/// mention (case-insensitively) is appended.
pub fn parse_dictionary(
    raw: &str,
    base_path: &Path,
    label: Option<&str>,
    options: &EngineOptions,
) -> Vec<SkillRecord> {
    let mut records = STRATEGIES
        .iter()
        .find_map(|(name, strategy)| {
            let found = strategy(raw);
            if found.is_empty() {
                return None;
            }
            debug!(strategy = name, count = found.len(), "dictionary strategy matched");
            Some(found)
        })
        .unwrap_or_default();

    for record in &mut records {
        if let Some(label) = label {
            record.origin_label = Some(label.to_string());
        }
        if record.source_path.is_none() {
            let dir = base_path.join(&record.name);
            if dir.is_dir() {
                record.source_path = Some(dir.to_string_lossy().into_owned());
            }
        }
    }

    let mut seen: HashSet<String> = records.iter().map(SkillRecord::key).collect();
    let mut backfilled = 0_usize;
    for record in scanner::scan_directory(base_path, label, options) {
        if seen.insert(record.key()) {
            records.push(record);
            backfilled += 1;
        }
    }
    if backfilled > 0 {
        debug!(count = backfilled, path = %base_path.display(), "backfilled skills missing from dictionary");
    }

    records
}

/// Strategy 1: every fenced block tagged as metadata.
pub fn parse_fenced_blocks(raw: &str) -> Vec<SkillRecord> {
    fenced_metadata_blocks(raw)
        .iter()
        .filter_map(|block| parse_front_matter(block))
        .collect()
}

/// Strategy 2: markdown table rows after the header.
pub fn parse_table(raw: &str) -> Vec<SkillRecord> {
    let mut records = Vec::new();
    let mut header_seen = false;

    for line in raw.lines() {
        if !TABLE_ROW.is_match(line) || TABLE_SEPARATOR.is_match(line) {
            continue;
        }
        if !header_seen {
            header_seen = true;
            continue;
        }

        let cells = split_row(line);
        let name = cells
            .first()
            .map_or("", |c| c.trim_matches(|ch: char| ch == '`' || ch.is_whitespace()));
        let description = cells.get(1).copied().unwrap_or_default();
        let Some(record) = SkillRecord::new(name, description) else {
            continue;
        };

        let categories = cells
            .get(2)
            .map(|c| split_categories(c))
            .unwrap_or_default();
        records.push(record.with_categories(categories));
    }

    records
}

/// Strategy 3: headings naming a hyphenated identifier, each paired with
/// the next non-empty line that is not itself a heading.
pub fn parse_headings(raw: &str) -> Vec<SkillRecord> {
    let lines: Vec<&str> = raw.lines().collect();
    let mut records = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if !trimmed.starts_with('#') {
            continue;
        }
        let heading = trimmed.trim_start_matches('#');
        let Some(identifier) = HYPHENATED_IDENTIFIER.find(heading) else {
            continue;
        };

        let description = lines[i + 1..]
            .iter()
            .map(|l| l.trim())
            .find(|l| !l.is_empty() && !l.starts_with('#'))
            .unwrap_or_default();

        if let Some(record) = SkillRecord::new(identifier.as_str(), description) {
            records.push(record);
        }
    }

    records
}

/// Parse one front-matter block into a record.
pub fn parse_front_matter(block: &str) -> Option<SkillRecord> {
    read_front_matter(block).into_record()
}

/// Read the recognized keys of a front-matter block.
///
/// `- item` lines are taken as categories only while the most recent key
/// was an empty `categories:`; any other key ends the list.
pub fn read_front_matter(block: &str) -> FrontMatter {
    let mut fm = FrontMatter::default();
    let mut in_category_list = false;

    for line in block.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if in_category_list {
            if let Some(item) = trimmed.strip_prefix('-') {
                let item = unquote(item);
                if !item.is_empty() {
                    fm.categories.push(item);
                }
                continue;
            }
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        in_category_list = false;
        let value = value.trim();

        match key.trim().to_lowercase().as_str() {
            "name" => fm.name = Some(unquote(value)),
            "description" => fm.description = Some(unquote(value)),
            "categories" | "category" => {
                if value.is_empty() {
                    in_category_list = true;
                } else if value.starts_with('[') {
                    fm.categories.extend(parse_inline_list(value));
                } else {
                    let item = unquote(value);
                    if !item.is_empty() {
                        fm.categories.push(item);
                    }
                }
            }
            _ => {}
        }
    }

    fm
}

/// Extract the metadata section of a markdown document.
///
/// Tries the first tagged fenced block, then a leading `---` block. Returns
/// an empty string when neither exists.
pub fn extract_metadata_block(markdown: &str) -> String {
    if let Some(block) = fenced_metadata_blocks(markdown).into_iter().next() {
        return block;
    }
    split_front_matter(markdown)
        .map(|(yaml, _)| yaml.to_string())
        .unwrap_or_default()
}

/// First descriptive line of a marker file, cut to `limit` characters with
/// an ellipsis appended when longer.
///
/// Skips the leading front-matter block, fenced code, headings, blank lines
/// and horizontal rules.
pub fn heuristic_description(content: &str, limit: usize) -> String {
    let body = split_front_matter(content).map_or(content, |(_, body)| body);
    let mut in_fence = false;

    for line in body.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence
            || trimmed.is_empty()
            || trimmed.starts_with('#')
            || is_horizontal_rule(trimmed)
        {
            continue;
        }
        return truncate_chars(trimmed, limit);
    }

    String::new()
}

/// Contents of every fenced block whose info string is a metadata tag.
/// Unclosed blocks are dropped.
fn fenced_metadata_blocks(raw: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<(bool, Vec<&str>)> = None;

    for line in raw.lines() {
        let trimmed = line.trim();
        let is_fence = trimmed.starts_with("```");

        match current.as_mut() {
            None if is_fence => {
                let tag = trimmed.trim_start_matches('`').trim().to_lowercase();
                let is_metadata = METADATA_FENCE_TAGS.contains(&tag.as_str());
                current = Some((is_metadata, Vec::new()));
            }
            None => {}
            Some(_) if is_fence => {
                if let Some((true, lines)) = current.take() {
                    blocks.push(lines.join("\n"));
                }
            }
            Some((_, lines)) => lines.push(line),
        }
    }

    blocks
}

/// Split a leading `---` block from the body: `(front_matter, body)`.
fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let trimmed = content.trim_start();
    let rest = trimmed.strip_prefix(FRONT_MATTER_DELIMITER)?;
    let rest = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))?;

    let end = if rest.starts_with(FRONT_MATTER_DELIMITER) {
        0
    } else {
        rest.find("\n---")? + 1
    };
    let front_matter = rest[..end].trim_end_matches(['\n', '\r']);
    let after = &rest[end + FRONT_MATTER_DELIMITER.len()..];
    let body = after
        .strip_prefix("\r\n")
        .or_else(|| after.strip_prefix('\n'))
        .unwrap_or(after);
    Some((front_matter, body))
}

/// Split a table row into trimmed cells, without the outer pipes.
fn split_row(line: &str) -> Vec<&str> {
    let inner = line.trim();
    let inner = inner.strip_prefix('|').unwrap_or(inner);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(str::trim).collect()
}

/// Split a category cell on `,` or `;`.
fn split_categories(cell: &str) -> Vec<String> {
    cell.split([',', ';'])
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse an inline list like `[A, "B", c]`.
fn parse_inline_list(value: &str) -> Vec<String> {
    let inner = value.trim().trim_start_matches('[').trim_end_matches(']');
    inner
        .split(',')
        .map(unquote)
        .filter(|item| !item.is_empty())
        .collect()
}

/// Remove one pair of matching surrounding quotes.
fn unquote(s: &str) -> String {
    let trimmed = s.trim();
    let quoted = trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')));
    if quoted {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Whether a line is a markdown horizontal rule (3+ of `-`, `*` or `_`).
fn is_horizontal_rule(line: &str) -> bool {
    let mut chars = line.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    matches!(first, '-' | '*' | '_') && line.chars().count() >= 3 && chars.all(|c| c == first)
}

fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn names(records: &[SkillRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    // ── front matter ────────────────────────────────────────────────

    #[test]
    fn front_matter_inline_categories_and_quotes() {
        let record =
            parse_front_matter("name: Foo\ndescription: 'Bar baz'\ncategories: [A, B]").unwrap();
        assert_eq!(record.name, "Foo");
        assert_eq!(record.description, "Bar baz");
        assert_eq!(record.categories, vec!["A", "B"]);
    }

    #[test]
    fn front_matter_list_categories_end_at_next_key() {
        let fm = read_front_matter(
            "name: docker-compose\ncategories:\n  - DevOps\n  - \"Containers\"\ndescription: Compose files\n- stray",
        );
        assert_eq!(fm.categories, vec!["DevOps", "Containers"]);
        assert_eq!(fm.description.as_deref(), Some("Compose files"));
    }

    #[test]
    fn front_matter_single_category_key() {
        let record = parse_front_matter("name: lint\ncategory: Quality").unwrap();
        assert_eq!(record.categories, vec!["Quality"]);
    }

    #[test]
    fn front_matter_ignores_unknown_keys() {
        let record =
            parse_front_matter("version: 2\nname: \"csharp-async\"\nlicense: MIT\nnot a key line")
                .unwrap();
        assert_eq!(record.name, "csharp-async");
        assert!(record.description.is_empty());
        assert!(record.categories.is_empty());
    }

    #[test]
    fn front_matter_without_name_yields_nothing() {
        assert!(parse_front_matter("description: orphan").is_none());
        assert!(parse_front_matter("name: ''").is_none());
        assert!(parse_front_matter("").is_none());
    }

    #[test]
    fn front_matter_keys_are_case_insensitive() {
        let record = parse_front_matter("Name: Foo\nDescription: Bar").unwrap();
        assert_eq!(record.name, "Foo");
        assert_eq!(record.description, "Bar");
    }

    // ── strategy 1 ──────────────────────────────────────────────────

    #[test]
    fn fenced_blocks_only_metadata_tags() {
        let raw = "# Catalog\n\n```YAML\nname: one\ndescription: First\n```\n\n```bash\nname: not-a-skill\n```\n\n```skill\nname: two\n```\n";
        let records = parse_fenced_blocks(raw);
        assert_eq!(names(&records), vec!["one", "two"]);
        assert_eq!(records[0].description, "First");
    }

    #[test]
    fn fenced_block_unclosed_is_dropped() {
        assert!(parse_fenced_blocks("```yaml\nname: dangling\n").is_empty());
    }

    // ── strategy 2 ──────────────────────────────────────────────────

    #[test]
    fn table_rows_after_header() {
        let raw = "| Name | Description | Categories |\n|------|-------------|------------|\n| auth | Handles login | Security, Identity |\n| `db-tool` | Migrations | Data; Ops |\n";
        let records = parse_table(raw);
        assert_eq!(names(&records), vec!["auth", "db-tool"]);
        assert_eq!(records[0].description, "Handles login");
        assert_eq!(records[0].categories, vec!["Security", "Identity"]);
        assert_eq!(records[1].categories, vec!["Data", "Ops"]);
    }

    #[test]
    fn table_two_columns_and_blank_names() {
        let raw = "| Skill | About |\n| --- | --- |\n|  | nameless |\n| lint | Style checks |\n";
        let records = parse_table(raw);
        assert_eq!(names(&records), vec!["lint"]);
        assert!(records[0].categories.is_empty());
    }

    #[test]
    fn table_ignores_non_rows() {
        let raw = "Some prose | with a pipe\n| a | b |\n| x | y |";
        let records = parse_table(raw);
        assert_eq!(names(&records), vec!["x"]);
    }

    // ── strategy 3 ──────────────────────────────────────────────────

    #[test]
    fn headings_pair_with_next_paragraph() {
        let raw = "# Skills\n\n## git-commit\n\nWrite conventional commits.\n\n## Tools: dotnet-best-practices\nFollow .NET guidance.\n";
        let records = parse_headings(raw);
        assert_eq!(names(&records), vec!["git-commit", "dotnet-best-practices"]);
        assert_eq!(records[0].description, "Write conventional commits.");
        assert_eq!(records[1].description, "Follow .NET guidance.");
    }

    #[test]
    fn heading_description_skips_following_headings() {
        let records = parse_headings(
            "## csharp-async\n### Details\n\nTask-based patterns.\n## aspnet-minimal-api\nMinimal APIs.",
        );
        assert_eq!(records[0].description, "Task-based patterns.");
        assert_eq!(records[1].description, "Minimal APIs.");
    }

    #[test]
    fn trailing_heading_has_empty_description() {
        let records = parse_headings("Intro.\n## git-commit\n### Notes\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "");
    }

    #[test]
    fn headings_without_identifier_are_skipped() {
        assert!(parse_headings("# Overview\nText\n## Git-Commit\nText").is_empty());
    }

    // ── dictionary cascade ──────────────────────────────────────────

    #[test]
    fn dictionary_prefers_front_matter_over_table() {
        let tmp = TempDir::new().unwrap();
        let raw = "```yaml\nname: Foo\ndescription: 'Bar baz'\ncategories: [A, B]\n```\n\n| Name | Desc |\n|---|---|\n| table-only | x |\n";
        let records = parse_dictionary(raw, tmp.path(), Some("community"), &EngineOptions::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Foo");
        assert_eq!(records[0].description, "Bar baz");
        assert_eq!(records[0].categories, vec!["A", "B"]);
        assert_eq!(records[0].origin_label.as_deref(), Some("community"));
    }

    #[test]
    fn dictionary_falls_through_to_headings() {
        let tmp = TempDir::new().unwrap();
        let raw = "## conventional-commit\nCommit message format.\n";
        let records = parse_dictionary(raw, tmp.path(), None, &EngineOptions::default());
        assert_eq!(names(&records), vec!["conventional-commit"]);
    }

    #[test]
    fn dictionary_backfills_from_directory() {
        let tmp = TempDir::new().unwrap();
        for name in ["auth", "Extra-Tool"] {
            let dir = tmp.path().join(name);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("SKILL.md"), "# Heading\n\nOn-disk description.").unwrap();
        }
        let raw = "| Name | Description |\n|---|---|\n| AUTH | From dictionary |\n";

        let records = parse_dictionary(raw, tmp.path(), Some("team"), &EngineOptions::default());
        assert_eq!(names(&records), vec!["AUTH", "Extra-Tool"]);
        assert_eq!(records[0].description, "From dictionary");
        assert_eq!(records[1].description, "On-disk description.");
        assert_eq!(records[1].origin_label.as_deref(), Some("team"));
    }

    #[test]
    fn dictionary_garbage_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        let records = parse_dictionary(
            "just prose\nwith | one pipe\n```yaml\nbroken",
            tmp.path(),
            None,
            &EngineOptions::default(),
        );
        assert!(records.is_empty());
    }

    // ── metadata block extraction ───────────────────────────────────

    #[test]
    fn metadata_block_prefers_fence() {
        let md = "---\nname: dashed\n---\n```yaml\nname: fenced\n```";
        assert_eq!(extract_metadata_block(md), "name: fenced");
    }

    #[test]
    fn metadata_block_dashed() {
        let md = "---\nname: git-commit\ndescription: Commits\n---\n# Body";
        assert_eq!(
            extract_metadata_block(md),
            "name: git-commit\ndescription: Commits"
        );
    }

    #[test]
    fn metadata_block_absent() {
        assert_eq!(extract_metadata_block("# Title\n\nBody"), "");
        assert_eq!(extract_metadata_block("---\nname: unclosed"), "");
    }

    // ── heuristic description ───────────────────────────────────────

    #[test]
    fn heuristic_skips_front_matter_headings_and_code() {
        let content = "---\nname: x\n---\n# Title\n\n```\ncode\n```\n---\nActual text.";
        assert_eq!(heuristic_description(content, 200), "Actual text.");
    }

    #[test]
    fn heuristic_truncates_with_ellipsis() {
        let long = "a".repeat(250);
        let description = heuristic_description(&long, 200);
        assert_eq!(description.len(), 203);
        assert!(description.ends_with("..."));

        let exact = "b".repeat(200);
        assert_eq!(heuristic_description(&exact, 200), exact);
    }

    #[test]
    fn heuristic_truncates_on_char_boundary() {
        let text = "é".repeat(10);
        assert_eq!(heuristic_description(&text, 4), "éééé...");
    }

    #[test]
    fn heuristic_empty() {
        assert_eq!(heuristic_description("# Only a heading\n\n", 200), "");
    }

    #[test]
    fn unquote_variants() {
        assert_eq!(unquote("\"hello\""), "hello");
        assert_eq!(unquote("'world'"), "world");
        assert_eq!(unquote("\"mismatched'"), "\"mismatched'");
        assert_eq!(unquote("\""), "\"");
    }

    #[test]
    fn horizontal_rules() {
        assert!(is_horizontal_rule("---"));
        assert!(is_horizontal_rule("*****"));
        assert!(!is_horizontal_rule("--"));
        assert!(!is_horizontal_rule("-*-"));
    }
}
