pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{MemoryPrefs, XmlFilePrefs};
pub use config::{toml_config::TomlConfig, FixerSettings, SettingsOverrides};
pub use core::{
    corrector::{Corrector, FixSummary, Outcome},
    preferences::PreferenceNode,
};
pub use domain::model::{Action, Adjuster, Adjustments, Drift, PrefValue, Report, ValueKind};
pub use utils::error::{FixerError, Result};
