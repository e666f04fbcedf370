use building_energy_api::{
    BuilderArgs, BuilderConfig, LoggingConfig, init_logging, run_builder,
};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::from_env())?;

    let args = BuilderArgs::parse();
    let config = BuilderConfig::from_args(args)?;

    run_builder(config)
}
