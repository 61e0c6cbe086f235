use anyhow::Context;
use clap::Parser;
use cred_check::config::Command;
use cred_check::core::findings::import_findings_file;
use cred_check::core::report::{self, MALFORMED_EXIT_CODE};
use cred_check::utils::{logger, validation::Validate};
use cred_check::{BatchConfig, CheckEngine, CheckResult, CliConfig, CredentialEntry, Result};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting cred-check");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(MALFORMED_EXIT_CODE);
    }

    let results = match run(&config).await {
        Ok(Some(results)) => results,
        Ok(None) => return Ok(()),
        Err(e) => {
            tracing::error!("❌ cred-check failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(MALFORMED_EXIT_CODE);
        }
    };

    for suggestion in report::suggestions(&results) {
        eprintln!("💡 {}", suggestion);
    }

    let rendered = report::render(&results, config.format)?;
    match &config.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("writing report to {}", path.display()))?;
            tracing::info!("📁 Report saved to: {}", path.display());
        }
        None => print!("{}", rendered),
    }

    let exit_code = report::batch_exit_code(&results);
    if exit_code > 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

/// 依子命令收集憑證並執行檢查；dry run 回傳 None
async fn run(config: &CliConfig) -> Result<Option<Vec<Result<CheckResult>>>> {
    match &config.command {
        Command::Check(args) => {
            let engine = CheckEngine::new(&args.endpoints(), &config.http_settings())?;
            let result = engine.check(&args.to_entry()).await;
            Ok(Some(vec![result]))
        }
        Command::Batch(args) => {
            tracing::info!("📁 Loading configuration from: {}", args.config.display());
            let batch = BatchConfig::from_file(&args.config)?;
            batch.validate()?;

            let settings = config.merge_http_settings(batch.http_settings());
            let engine = CheckEngine::new(&batch.endpoints(), &settings)?;
            let entries = batch.entries()?;

            if args.dry_run {
                tracing::info!("🔍 DRY RUN MODE - no requests will be sent");
                perform_dry_run(&engine, &entries);
                return Ok(None);
            }

            Ok(Some(engine.check_all(&entries).await))
        }
        Command::Findings(args) => {
            let batch = match &args.config {
                Some(path) => {
                    let batch = BatchConfig::from_file(path)?;
                    batch.validate()?;
                    batch
                }
                None => BatchConfig::default(),
            };

            let summary = import_findings_file(&args.input, &args.only)?;
            let settings = config.merge_http_settings(batch.http_settings());
            let engine = CheckEngine::new(&batch.endpoints(), &settings)?;

            Ok(Some(engine.check_all(&summary.entries).await))
        }
    }
}

fn perform_dry_run(engine: &CheckEngine, entries: &[CredentialEntry]) {
    println!("🔍 Dry Run Analysis: {} credential(s)", entries.len());
    for entry in entries {
        let plan = match engine.plan(entry) {
            Ok(plan) => plan,
            Err(e) => format!("malformed ({})", e),
        };
        println!("📦 {:<10} {}", entry.service(), entry.label().unwrap_or("-"));
        println!("  📡 {}", plan);
    }
}
