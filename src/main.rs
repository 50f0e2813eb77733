use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use tinylink::cli::{Cli, Commands};
use tinylink::config::AppConfig;
use tinylink::errors::TinylinkError;
use tinylink::runtime::run_server;
use tinylink::services::Registry;
use tinylink::storage::StorageFactory;
use tinylink::system::init_logging;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::GenerateConfig { output } => generate_config(output.as_deref()),
        Commands::Serve => {
            if let Err(e) = serve(cli.config.as_deref()).await {
                // 启动失败时在终端输出彩色错误
                match e.downcast_ref::<TinylinkError>() {
                    Some(err) => eprintln!("{}", err.format_colored()),
                    None => eprintln!("{:#}", e),
                }
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn generate_config(output: Option<&str>) -> Result<()> {
    match output {
        Some(path) => {
            AppConfig::default().save_to_file(path)?;
            println!("Configuration written to {}", path);
        }
        None => print!("{}", AppConfig::generate_sample_config()),
    }
    Ok(())
}

async fn serve(config_path: Option<&str>) -> Result<()> {
    let config = AppConfig::load(config_path)?;

    // guard 必须存活到进程结束，否则日志会丢失
    let _log_guard = init_logging(&config.logging).context("Failed to initialize logging")?;
    info!("tinylink {} starting", env!("CARGO_PKG_VERSION"));

    let storage = StorageFactory::create(&config.storage).await?;
    let registry =
        Registry::new(storage, &config.registry).with_admin_prefix(&config.api.admin_prefix);

    run_server(config, registry).await
}
