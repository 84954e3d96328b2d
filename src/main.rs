use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;

use shortspace::cli::{Cli, Commands, ConfigCommands};
use shortspace::config::{StaticConfig, get_config, init_config_from};
use shortspace::runtime::modes::run_server;
use shortspace::system::init_logging;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config {
            action: ConfigCommands::Generate { path, force },
        }) => generate_config(&path, force),
        Some(Commands::Serve) | None => {
            init_config_from(&cli.config);
            let config = get_config();

            // guard 必须活到进程结束，否则缓冲的日志会丢失
            let _guard = init_logging(&config.logging).context("Failed to initialize logging")?;
            info!("Shortspace {} starting", env!("CARGO_PKG_VERSION"));

            run_server().await
        }
    }
}

fn generate_config(path: &str, force: bool) -> Result<()> {
    if std::path::Path::new(path).exists() && !force {
        bail!("{} already exists, use --force to overwrite", path);
    }

    StaticConfig::default()
        .save_to_file(path)
        .with_context(|| format!("Failed to write {}", path))?;
    println!("Sample configuration written to {}", path);
    Ok(())
}
