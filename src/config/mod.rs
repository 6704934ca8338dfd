#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::xml_file::DEFAULT_BACKUP_KEEP;
use crate::adapters::{default_prefs_path, DEFAULT_NODE};
use crate::utils::error::{FixerError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use std::path::PathBuf;
use toml_config::TomlConfig;

pub const CONFIG_ENV_VAR: &str = "NINBOT_FIXER_CONFIG";

/// Values given on the command line; they win over the config file.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub prefs_file: Option<PathBuf>,
    pub node: Option<String>,
    pub no_backup: bool,
    pub dry_run: bool,
    pub verbose: bool,
    pub log_format: Option<LogFormat>,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct FixerSettings {
    pub prefs_file: PathBuf,
    pub node: String,
    pub backup: bool,
    pub backup_keep: usize,
    pub dry_run: bool,
    pub verbose: bool,
    pub log_format: LogFormat,
}

impl FixerSettings {
    /// CLI > config file > defaults.
    pub fn resolve(overrides: &SettingsOverrides, file: Option<&TomlConfig>) -> Result<Self> {
        let node = overrides
            .node
            .clone()
            .or_else(|| file.and_then(|f| f.node()).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_NODE.to_string());

        let prefs_file = match overrides
            .prefs_file
            .clone()
            .or_else(|| file.and_then(|f| f.prefs_file()).map(PathBuf::from))
        {
            Some(path) => path,
            None => default_prefs_path(&node).ok_or_else(|| FixerError::MissingConfigError {
                field: "store.prefs_file (HOME is not set)".to_string(),
            })?,
        };

        let file_format = match file {
            Some(f) => f.log_format()?,
            None => None,
        };

        Ok(Self {
            prefs_file,
            node,
            backup: !overrides.no_backup && file.and_then(|f| f.backup()).unwrap_or(true),
            backup_keep: file
                .and_then(|f| f.backup_keep())
                .unwrap_or(DEFAULT_BACKUP_KEEP),
            dry_run: overrides.dry_run,
            verbose: overrides.verbose || file.map(|f| f.verbose()).unwrap_or(false),
            log_format: overrides.log_format.or(file_format).unwrap_or_default(),
        })
    }
}

impl Validate for FixerSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_node_name("node", &self.node)?;
        validation::validate_path("prefs_file", &self.prefs_file.to_string_lossy())?;
        validation::validate_positive_number("backup_keep", self.backup_keep, 1)?;
        Ok(())
    }
}

/// Explicit `--config` path first, then `NINBOT_FIXER_CONFIG`.
pub fn locate_config_file(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| {
        std::env::var_os(CONFIG_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
}

/// JSON arguments are given inline, or as `@path` to a file holding them.
pub async fn read_json_arg(arg: &str) -> Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => {
            validation::validate_path("adjustments", path)?;
            tracing::debug!("Reading JSON argument from {}", path);
            Ok(tokio::fs::read_to_string(path).await?)
        }
        None => Ok(arg.to_string()),
    }
}
