use building_energy_api::{CliArgs, LoggingConfig, ServerConfig, init_logging, run_server};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::from_env())?;

    let cli = CliArgs::parse();
    let config = ServerConfig::from_args(cli)?;

    // Validate configuration before startup (fail-fast)
    config.validate()?;

    run_server(config).await
}
