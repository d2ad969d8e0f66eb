use clap::Parser;
use pubchem_proxy::core::ConfigProvider;
use pubchem_proxy::utils::{logger, validation::Validate};
use pubchem_proxy::{build_router, AppState, CliConfig, ProxyError};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 先讀設定檔（如果有），日誌設定可能來自其中
    let toml_config = match cli.load_toml() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let (json_logs, verbose) = match &toml_config {
        Some(config) => (config.json_logs() || cli.json_logs, config.verbose() || cli.verbose),
        None => (cli.json_logs, cli.verbose),
    };
    if json_logs {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting pubchem-proxy");
    let ignored = cli.ignored_with_config();
    if !ignored.is_empty() {
        tracing::warn!(
            "⚠️ --config is set, ignoring flags: {}",
            ignored.join(", ")
        );
    }
    if verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let result = match &toml_config {
        Some(config) => run(config).await,
        None => run(&cli).await,
    };

    if let Err(e) = result {
        tracing::error!("❌ pubchem-proxy stopped: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run<C: ConfigProvider + Validate>(config: &C) -> Result<(), ProxyError> {
    config.validate()?;

    let state = AppState::from_config(config)?;
    let app = build_router(state);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("🚀 Listening on {}", config.bind_addr());
    tracing::info!("📡 Forwarding registry lookups to {}", config.base_url());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("✅ Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
