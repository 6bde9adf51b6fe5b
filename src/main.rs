use clap::Parser;
use delivery_fee::core::ConfigProvider;
use delivery_fee::utils::logger;
use delivery_fee::{run_server, CliConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 先載入配置，日誌格式可能由配置檔決定
    let settings = cli.load_settings();
    let json_logs = settings
        .as_ref()
        .map(|s| s.json_logs())
        .unwrap_or(cli.json_logs);

    // 初始化日誌
    if json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting delivery-fee service");
    if cli.verbose {
        tracing::debug!("Resolved settings: {:?}", settings);
    }

    run_server(&settings).await?;

    Ok(())
}
