use clap::Parser;
use staff_sync::utils::{logger, validation::Validate};
use staff_sync::{CliConfig, LocalStorage, RunConfig, StaffSyncPipeline, SyncEngine, SyncError};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = CliConfig::parse();

    // 載入並合併配置；日誌尚未初始化，直接輸出到 stderr
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    // 初始化日誌
    logger::init_cli_logger(
        cli.verbose,
        config.settings.logging.level.as_deref(),
        config.settings.logging.format,
    );

    tracing::info!("Starting export_staff_records");
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = run(&cli, config).await {
        match e.downcast_ref::<SyncError>() {
            Some(sync_error) => {
                tracing::error!(
                    "❌ Reconciliation failed: {} (Category: {:?}, Severity: {:?})",
                    sync_error,
                    sync_error.category(),
                    sync_error.severity()
                );
                tracing::error!("💡 Recovery suggestion: {}", sync_error.recovery_suggestion());
                eprintln!("❌ {}", sync_error.user_friendly_message());
                std::process::exit(sync_error.exit_code());
            }
            None => {
                tracing::error!("❌ {:#}", e);
                eprintln!("❌ {:#}", e);
                std::process::exit(1);
            }
        }
    }
}

async fn run(cli: &CliConfig, config: RunConfig) -> anyhow::Result<()> {
    // 驗證配置
    config.validate()?;

    let pipeline = StaffSyncPipeline::new(LocalStorage::new(), config);
    let engine = SyncEngine::new(pipeline).with_dry_run(cli.dry_run);

    let report = engine.run().await?;

    if cli.summary {
        let summary = serde_json::json!({
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "dry_run": cli.dry_run,
            "destination": report.destination,
            "counts": report.summary,
        });
        let rendered = serde_json::to_string_pretty(&summary).map_err(SyncError::from)?;
        eprintln!("{}", rendered);
    }

    Ok(())
}
