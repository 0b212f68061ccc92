//! # skillmap-engine
//!
//! Ingestion, normalization and ranking of skill corpora.
//!
//! A *source* is a local directory of skills, optionally with a dictionary
//! document listing them. Each source is loaded into [`SkillRecord`]s, the
//! sources are merged with last-write-wins precedence, and the merged records
//! are ranked against the keywords of a free-text query.
//!
//! ## Module Overview
//!
//! - [`tokenizer`]: lowercase alphanumeric tokens and stop-word filtered keywords
//! - [`parser`]: dictionary documents (fenced front matter, tables, headings)
//! - [`scanner`]: per-directory marker file discovery
//! - [`index`]: precomputed `skills.json` index loading and enrichment
//! - [`merger`]: ordered, case-insensitive, last-write-wins merging
//! - [`ranker`]: weighted keyword scoring with a deterministic tie-break
//! - [`mapper`]: one request from query to ranked result
//! - [`paths`]: host path normalization for client-supplied paths
//!
//! ## Usage
//!
//! ```rust,no_run
//! use skillmap_engine::{EngineOptions, MapRequest, SourceDescriptor, map_skills};
//! use tokio_util::sync::CancellationToken;
//!
//! let request = MapRequest::new("billing-api", "add stripe webhooks")
//!     .with_source(SourceDescriptor::new("/srv/skills/community"))
//!     .with_source(SourceDescriptor::new("/srv/skills/team"));
//! let result = map_skills(&request, &EngineOptions::default(), &CancellationToken::new());
//! for skill in &result.skills {
//!     println!("{} {:.2}", skill.skill.name, skill.score);
//! }
//! ```

#![deny(unsafe_code)]

pub mod constants;
pub mod errors;
pub mod index;
pub mod mapper;
pub mod merger;
pub mod options;
pub mod parser;
pub mod paths;
pub mod ranker;
pub mod scanner;
pub mod tokenizer;
pub mod types;

pub use errors::{EngineError, Result};
pub use index::load_index;
pub use mapper::map_skills;
pub use merger::{MergeOutcome, SkillMap, merge};
pub use options::EngineOptions;
pub use parser::parse_dictionary;
pub use ranker::rank;
pub use scanner::scan_directory;
pub use tokenizer::{extract_keywords, tokenize};
pub use types::{
    LoadStrategy, MapRequest, MapResult, RankedSkill, SkillRecord, SourceDescriptor, SourceNote,
};
