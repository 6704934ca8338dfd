use crate::config::SettingsOverrides;
use crate::domain::model::Action;
use crate::utils::logger::LogFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "ninbot-fixer", version)]
#[command(about = "Checks and repairs Ninjabrain Bot preferences")]
pub struct CliConfig {
    /// What to do with the adjustments
    #[arg(value_enum)]
    pub action: Action,

    /// Adjustments JSON, or @path to a file containing it
    pub adjustments: String,

    /// JSON array of preference ids to fix (default: all)
    pub fixes: Option<String>,

    /// Preferences file to use instead of the Java user node
    #[arg(long)]
    pub prefs_file: Option<PathBuf>,

    /// Preferences node name under the Java user root
    #[arg(long)]
    pub node: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Show what would be written without touching the store
    #[arg(long)]
    pub dry_run: bool,

    /// Do not back up the preferences file before writing
    #[arg(long)]
    pub no_backup: bool,

    /// Log output format (compact or json)
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Usage errors exit with 1 like every other input error; `--help` and
    /// `--version` exit with 0.
    pub fn usage_exit_code(err: &clap::Error) -> i32 {
        if err.use_stderr() {
            1
        } else {
            0
        }
    }

    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            prefs_file: self.prefs_file.clone(),
            node: self.node.clone(),
            no_backup: self.no_backup,
            dry_run: self.dry_run,
            verbose: self.verbose,
            log_format: self.log_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positional_arguments() {
        let cli = CliConfig::try_parse_from([
            "ninbot-fixer",
            "fix-breaking",
            r#"{"breaking":[]}"#,
            r#"["sigma"]"#,
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(cli.action, Action::FixBreaking);
        assert_eq!(cli.fixes.as_deref(), Some(r#"["sigma"]"#));
        assert!(cli.dry_run);
        assert!(!cli.overrides().no_backup);
    }

    #[test]
    fn test_missing_adjustments_is_rejected() {
        assert!(CliConfig::try_parse_from(["ninbot-fixer", "get"]).is_err());
        assert!(CliConfig::try_parse_from(["ninbot-fixer", "repair", "{}"]).is_err());
    }

    #[test]
    fn test_usage_errors_exit_with_input_error_code() {
        let missing = CliConfig::try_parse_from(["ninbot-fixer", "get"]).unwrap_err();
        assert_eq!(CliConfig::usage_exit_code(&missing), 1);

        let unknown = CliConfig::try_parse_from(["ninbot-fixer", "repair", "{}"]).unwrap_err();
        assert_eq!(CliConfig::usage_exit_code(&unknown), 1);

        let help = CliConfig::try_parse_from(["ninbot-fixer", "--help"]).unwrap_err();
        assert_eq!(CliConfig::usage_exit_code(&help), 0);
    }

    #[test]
    fn test_log_format_flag() {
        let cli =
            CliConfig::try_parse_from(["ninbot-fixer", "get", "{}", "--log-format", "json"])
                .unwrap();
        assert_eq!(cli.log_format, Some(LogFormat::Json));
    }
}
