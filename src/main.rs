use clap::Parser;
use ninbot_fixer::config::{locate_config_file, read_json_arg};
use ninbot_fixer::domain::model::parse_fix_filter;
use ninbot_fixer::utils::{logger, validation::Validate};
use ninbot_fixer::{
    Adjustments, CliConfig, Corrector, FixerError, FixerSettings, Outcome, TomlConfig,
    XmlFilePrefs,
};

fn fail(e: &FixerError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

fn load_settings(cli: &CliConfig) -> Result<FixerSettings, FixerError> {
    let file = match locate_config_file(cli.config.clone()) {
        Some(path) => {
            let config = TomlConfig::from_file(&path)?;
            config.validate()?;
            Some(config)
        }
        None => None,
    };

    let settings = FixerSettings::resolve(&cli.overrides(), file.as_ref())?;
    settings.validate()?;
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        std::process::exit(CliConfig::usage_exit_code(&e));
    });

    // 日誌格式可能來自設定檔，所以先載入設定
    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    logger::init_cli_logger(settings.verbose, settings.log_format);
    tracing::info!("Starting ninbot-fixer {}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Settings: {:?}", settings);

    let adjustments = match read_json_arg(&cli.adjustments).await {
        Ok(content) => Adjustments::from_json(&content),
        Err(e) => Err(e),
    }
    .and_then(|a| a.validate().map(|_| a))
    .unwrap_or_else(|e| fail(&e));

    let filter = match &cli.fixes {
        Some(raw) => read_json_arg(raw)
            .await
            .and_then(|content| parse_fix_filter(&content))
            .unwrap_or_else(|e| fail(&e)),
        None => Vec::new(),
    };

    let backend = XmlFilePrefs::new(settings.prefs_file.clone())
        .with_backup(settings.backup)
        .with_backup_keep(settings.backup_keep);
    let corrector = Corrector::new(backend).with_dry_run(settings.dry_run);

    match corrector.run(cli.action, &adjustments, &filter).await {
        Ok(Outcome::Report(report)) => {
            println!("{}", serde_json::to_string(&report)?);
        }
        Ok(Outcome::Fixed(summary)) => {
            tracing::info!(
                "✅ {} completed: {} change(s), written: {}",
                cli.action,
                summary.written.len(),
                summary.flushed
            );
        }
        Err(e) => fail(&e),
    }

    Ok(())
}
