use clap::Parser;
use interval_etl::core::ConfigProvider;
use interval_etl::utils::error::ErrorSeverity;
use interval_etl::utils::{logger, validation::Validate};
use interval_etl::{CliConfig, EtlEngine, IntervalPipeline, LocalStorage, TomlConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting interval-etl");

    // 載入設定檔（命令列參數優先）
    if let Some(path) = config.config.clone() {
        tracing::info!("Loading configuration from: {}", path);
        let file = match TomlConfig::from_file(&path).and_then(|file| {
            file.validate()?;
            Ok(file)
        }) {
            Ok(file) => file,
            Err(e) => {
                tracing::error!("Failed to load config file '{}': {}", path, e);
                eprintln!("❌ {}", e.user_friendly_message());
                std::process::exit(1);
            }
        };
        if let Err(e) = config.merge_file(&file) {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    }

    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!(
        "Interval pace {} min/km, minimum interval distance {}m",
        config.interval_pace(),
        config.min_interval_distance()
    );

    let source = LocalStorage::new(config.activity_dir.clone());
    let sink = LocalStorage::new(config.output_path().to_string());
    let pipeline = match IntervalPipeline::new(source, sink, config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Interval summary written to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
