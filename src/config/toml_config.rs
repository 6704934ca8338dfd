use crate::utils::error::{FixerError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub store: Option<StoreConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    pub prefs_file: Option<PathBuf>,
    pub node: Option<String>,
    pub backup: Option<bool>,
    pub backup_keep: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: Option<String>,
    pub verbose: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FixerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| FixerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HOME})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn node(&self) -> Option<&str> {
        self.store.as_ref().and_then(|s| s.node.as_deref())
    }

    pub fn prefs_file(&self) -> Option<&Path> {
        self.store.as_ref().and_then(|s| s.prefs_file.as_deref())
    }

    pub fn backup(&self) -> Option<bool> {
        self.store.as_ref().and_then(|s| s.backup)
    }

    pub fn backup_keep(&self) -> Option<usize> {
        self.store.as_ref().and_then(|s| s.backup_keep)
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn log_format(&self) -> Result<Option<LogFormat>> {
        match self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<LogFormat>()
                .map(Some)
                .map_err(|reason| FixerError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: raw.to_string(),
                    reason,
                }),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(node) = self.node() {
            validation::validate_node_name("store.node", node)?;
        }
        if let Some(path) = self.prefs_file() {
            validation::validate_path("store.prefs_file", &path.to_string_lossy())?;
        }
        if let Some(keep) = self.backup_keep() {
            validation::validate_positive_number("store.backup_keep", keep, 1)?;
        }
        self.log_format()?;
        Ok(())
    }
}
