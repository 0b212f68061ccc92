//! Request pipeline: merge sources, extract keywords, rank, truncate.

use std::collections::BTreeSet;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::merger::merge;
use crate::options::EngineOptions;
use crate::ranker::rank;
use crate::tokenizer::extract_keywords;
use crate::types::{MapRequest, MapResult};

/// Map a request to its ranked skills.
///
/// Never fails. Per-source problems show up in [`MapResult::sources`] and in
/// the logs. The result cap is `request.limit`, else `options.top_n`; `0`
/// means unlimited.
pub fn map_skills(
    request: &MapRequest,
    options: &EngineOptions,
    cancel: &CancellationToken,
) -> MapResult {
    let outcome = merge(&request.sources, options, cancel);
    let keywords = extract_keywords(&request.query_text());

    let mut skills = rank(outcome.skills.records(), &keywords);
    let limit = request.limit.unwrap_or(options.top_n);
    if limit > 0 {
        skills.truncate(limit);
    }

    let categories: BTreeSet<String> = skills
        .iter()
        .flat_map(|ranked| ranked.skill.categories.iter().cloned())
        .collect();

    info!(
        project = %request.project,
        keywords = keywords.len(),
        candidates = outcome.skills.len(),
        returned = skills.len(),
        cancelled = outcome.cancelled,
        "skill mapping complete"
    );

    MapResult {
        keywords,
        skills,
        categories,
        sources: outcome.notes,
        cancelled: outcome.cancelled,
    }
}
