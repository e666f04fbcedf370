pub mod config;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod ontology;
pub mod server;
pub mod sparql;
pub mod state;

pub use config::{BuilderArgs, BuilderConfig, CliArgs, ColumnMap, ServerConfig};
pub use error::ApiError;
pub use logging::{LoggingConfig, init_logging};
pub use state::AppState;

use anyhow::Result;

/// Load the graph and serve the HTTP API until shutdown.
pub async fn run_server(config: ServerConfig) -> Result<()> {
    let state = AppState::from_config(config)?;
    server::run_server(state).await
}

/// Run the spreadsheet-to-RDF conversion end to end.
pub fn run_builder(config: BuilderConfig) -> Result<()> {
    let records = ingest::load_records(&config)?;
    tracing::info!(
        buildings = records.len(),
        input = %config.input.display(),
        sheet = %config.sheet,
        "extracted building records"
    );

    let store = graph::build_graph(&records)?;
    graph::write_turtle(&store, &config.output)?;
    Ok(())
}
