//! Keyword relevance ranking.
//!
//! Each query keyword contributes at most once per record, through the
//! first tier it matches:
//!
//! | tier | match                                   | weight |
//! |------|-----------------------------------------|--------|
//! | 1    | substring of the name                   | 3.0    |
//! | 2    | substring of the description            | 2.0    |
//! | 3    | substring of a category                 | 2.5    |
//! | 4    | contains, or is contained in, a token   | 1.0    |
//!
//! All comparisons are on lowercase text.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use crate::tokenizer::tokenize;
use crate::types::{RankedSkill, SkillRecord};

/// Keyword found in the skill name.
pub const NAME_WEIGHT: f64 = 3.0;
/// Keyword found in the description.
pub const DESCRIPTION_WEIGHT: f64 = 2.0;
/// Keyword found in a category.
pub const CATEGORY_WEIGHT: f64 = 2.5;
/// Keyword overlaps a token of the combined text.
pub const TOKEN_WEIGHT: f64 = 1.0;

/// Score and order `records` against `keywords`.
///
/// With no keywords every record is returned with score 0, ordered by name.
/// Otherwise records scoring 0 are dropped and the rest are ordered by score
/// (highest first), then by name ignoring case.
pub fn rank(records: &[SkillRecord], keywords: &BTreeSet<String>) -> Vec<RankedSkill> {
    let mut ranked: Vec<RankedSkill> = if keywords.is_empty() {
        records
            .iter()
            .map(|record| RankedSkill {
                skill: record.clone(),
                score: 0.0,
                matched_keywords: BTreeSet::new(),
            })
            .collect()
    } else {
        records
            .iter()
            .filter_map(|record| score_record(record, keywords))
            .collect()
    };

    ranked.sort_by(compare);
    ranked
}

/// Score one record; `None` when nothing matched.
pub fn score_record(record: &SkillRecord, keywords: &BTreeSet<String>) -> Option<RankedSkill> {
    let name = record.name.to_lowercase();
    let description = record.description.to_lowercase();
    let categories: Vec<String> = record.categories.iter().map(|c| c.to_lowercase()).collect();
    let combined = format!("{} {} {}", record.name, record.description, record.categories.join(" "));
    let tokens: HashSet<String> = tokenize(&combined).collect();

    let mut total = 0.0;
    let mut matched = BTreeSet::new();
    for keyword in keywords {
        let keyword = keyword.as_str();
        let weight = if name.contains(keyword) {
            NAME_WEIGHT
        } else if description.contains(keyword) {
            DESCRIPTION_WEIGHT
        } else if categories.iter().any(|c| c.contains(keyword)) {
            CATEGORY_WEIGHT
        } else if tokens
            .iter()
            .any(|t| t.contains(keyword) || keyword.contains(t.as_str()))
        {
            TOKEN_WEIGHT
        } else {
            continue;
        };
        total += weight;
        let _ = matched.insert(keyword.to_string());
    }

    let score = round2(total);
    (score > 0.0).then(|| RankedSkill {
        skill: record.clone(),
        score,
        matched_keywords: matched,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn compare(a: &RankedSkill, b: &RankedSkill) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.skill.name.to_lowercase().cmp(&b.skill.name.to_lowercase()))
        .then_with(|| a.skill.name.cmp(&b.skill.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, description: &str, categories: &[&str]) -> SkillRecord {
        SkillRecord::new(name, description)
            .unwrap()
            .with_categories(categories.iter().map(|c| (*c).to_string()).collect())
    }

    fn keywords(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| (*w).to_string()).collect()
    }

    #[test]
    fn name_beats_description() {
        let records = vec![
            record("db-tool", "auth helpers", &[]),
            record("auth-service", "", &[]),
        ];
        let ranked = rank(&records, &keywords(&["auth"]));

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].skill.name, "auth-service");
        assert!((ranked[0].score - 3.0).abs() < f64::EPSILON);
        assert_eq!(ranked[1].skill.name, "db-tool");
        assert!((ranked[1].score - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ties_break_on_name_ignoring_case() {
        let records = vec![record("Beta", "", &["X"]), record("alpha", "", &["X"])];
        let ranked = rank(&records, &keywords(&["x"]));

        let names: Vec<&str> = ranked.iter().map(|r| r.skill.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "Beta"]);
        assert!(ranked.iter().all(|r| (r.score - 2.5).abs() < f64::EPSILON));
    }

    #[test]
    fn only_first_tier_counts() {
        // "docker" is in the name, description and a category; counted once.
        let records = vec![record("docker-compose", "docker files", &["Docker"])];
        let ranked = rank(&records, &keywords(&["docker"]));
        assert!((ranked[0].score - NAME_WEIGHT).abs() < f64::EPSILON);
    }

    #[test]
    fn token_tier_matches_either_direction() {
        let records = vec![record("a", "", &[]), record("ts", "", &[])];
        let ranked = rank(&records, &keywords(&["tsx"]));
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].skill.name, "ts");
        assert!((ranked[0].score - TOKEN_WEIGHT).abs() < f64::EPSILON);
    }

    #[test]
    fn scores_accumulate_across_keywords() {
        let records = vec![record(
            "aspnet-minimal-api",
            "Endpoints with validation",
            &["Web"],
        )];
        let ranked = rank(&records, &keywords(&["aspnet", "validation", "web"]));
        assert!((ranked[0].score - 7.5).abs() < f64::EPSILON);
        assert_eq!(ranked[0].matched_keywords, keywords(&["aspnet", "validation", "web"]));
    }

    #[test]
    fn unmatched_records_are_dropped() {
        let records = vec![record("kotlin-coroutines", "", &[])];
        assert!(rank(&records, &keywords(&["erp"])).is_empty());
    }

    #[test]
    fn empty_keywords_return_everything_unscored() {
        let records = vec![
            record("b", "", &[]),
            record("a", "", &[]),
            record("c", "", &[]),
            record("Alpha", "", &[]),
        ];
        let ranked = rank(&records, &BTreeSet::new());
        let names: Vec<&str> = ranked.iter().map(|r| r.skill.name.as_str()).collect();
        assert_eq!(names, vec!["a", "Alpha", "b", "c"]);
        assert!(ranked.iter().all(|r| r.score.abs() < f64::EPSILON && r.matched_keywords.is_empty()));
    }

    #[test]
    fn ordering_is_deterministic_for_case_variants() {
        let records = vec![record("Tool", "", &[]), record("TOOL", "", &[])];
        let first = rank(&records, &keywords(&["tool"]));
        let reversed: Vec<SkillRecord> = records.iter().rev().cloned().collect();
        let second = rank(&reversed, &keywords(&["tool"]));
        assert_eq!(first, second);
        assert_eq!(first[0].skill.name, "TOOL");
    }

    #[test]
    fn rounding_to_two_decimals() {
        assert!((round2(1.005_000_1) - 1.01).abs() < f64::EPSILON);
        assert!((round2(7.5) - 7.5).abs() < f64::EPSILON);
    }
}
