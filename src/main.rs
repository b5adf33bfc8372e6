use clap::Parser;
use embassy_watch::utils::error::{ErrorSeverity, WatchError};
use embassy_watch::utils::{logger, validation::Validate};
use embassy_watch::{CliConfig, EmbassyPipeline, EtlEngine, LocalStorage, TomlConfig};

fn exit_code(e: &WatchError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,      // 警告，但成功
        ErrorSeverity::Medium => 2,   // 網路錯誤
        ErrorSeverity::High => 1,     // 資料或配置錯誤
        ErrorSeverity::Critical => 3, // 系統錯誤
    }
}

fn report_and_exit(context: &str, e: &WatchError) {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    let code = exit_code(e);
    if code > 0 {
        std::process::exit(code);
    }
}

fn load_config(cli: &CliConfig) -> Result<TomlConfig, WatchError> {
    let config = cli.resolve()?;
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting embassy-watch");
    tracing::debug!("CLI config: {:?}", cli);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            report_and_exit("Configuration validation failed", &e);
            return Ok(());
        }
    };

    let transport = match config.http_transport() {
        Ok(transport) => transport,
        Err(e) => {
            report_and_exit("Failed to build HTTP client", &e);
            return Ok(());
        }
    };

    let storage = LocalStorage::new(config.output.path.clone());
    let pipeline = match EmbassyPipeline::new(storage, &config, transport) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            report_and_exit("Failed to set up pipeline", &e);
            return Ok(());
        }
    };

    match EtlEngine::new(pipeline).run().await {
        Ok(output_path) => {
            tracing::info!("✅ Embassy map generated successfully!");
            println!("✅ Embassy map generated successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => report_and_exit("Embassy map generation failed", &e),
    }

    Ok(())
}
