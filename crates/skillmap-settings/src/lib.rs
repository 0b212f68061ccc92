//! # skillmap-settings
//!
//! Configuration for the skillmap engine, loaded from three layers (in
//! priority order):
//! 1. **Compiled defaults**: [`SkillmapSettings::default()`]
//! 2. **Settings file**: `~/.skillmap/settings.json` or an explicit path,
//!    deep-merged over the defaults
//! 3. **Environment variables**: `SKILLMAP_*` overrides (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, deep_merge, load_settings, load_settings_from_path, settings_path,
};
pub use types::*;
