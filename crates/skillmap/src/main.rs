//! # skillmap
//!
//! Ranks the skills of one or more local corpora against a project
//! description and prints the result as JSON.

#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use skillmap_engine::{EngineOptions, MapRequest, SourceDescriptor, map_skills};
use skillmap_settings::SkillmapSettings;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Map a project description to the most relevant skills.
#[derive(Parser, Debug)]
#[command(name = "skillmap", about = "Rank skill corpora against a project description")]
struct Cli {
    /// Short project identifier, e.g. `erp-portal`.
    project: String,

    /// Free-text hints about the project.
    hints: Vec<String>,

    /// Skill source as `PATH[::DICTIONARY[::LABEL]]`. Repeatable; later
    /// sources override earlier ones.
    #[arg(long = "source", short = 's')]
    sources: Vec<String>,

    /// Settings file (defaults to `~/.skillmap/settings.json`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of skills to return (0 for all).
    #[arg(long)]
    limit: Option<usize>,

    /// Log level (overrides settings).
    #[arg(long)]
    log_level: Option<String>,

    /// Do not re-read marker files for skills listed in a JSON index.
    #[arg(long)]
    no_enrich: bool,
}

impl Cli {
    fn load_settings(&self) -> Result<SkillmapSettings> {
        let path = self
            .config
            .clone()
            .unwrap_or_else(skillmap_settings::settings_path);
        skillmap_settings::load_settings_from_path(&path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))
    }

    fn request(&self) -> Result<MapRequest> {
        let mut request = MapRequest::new(self.project.clone(), self.hints.join(" "));
        for spec in &self.sources {
            let source = SourceDescriptor::parse(spec)
                .with_context(|| format!("Invalid --source {spec:?}"))?;
            request = request.with_source(source);
        }
        request.limit = self.limit;
        Ok(request)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = cli.load_settings()?;
    let level = cli
        .log_level
        .as_deref()
        .unwrap_or(&settings.logging.level);
    skillmap_core::logging::init_subscriber(level);

    let mut options = EngineOptions::from(&settings);
    if cli.no_enrich {
        options.enrich_index = false;
    }
    let request = cli.request()?;
    debug!(sources = request.sources.len(), "mapping request");

    let result = map_skills(&request, &options, &CancellationToken::new());
    let json = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
    println!("{json}");
    Ok(())
}
