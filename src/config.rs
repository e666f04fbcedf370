use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

const DEFAULT_HTTP_BIND: &str = "127.0.0.1:5000";
const DEFAULT_RDF_FILE: &str = "buildings_energy.ttl";
const DEFAULT_SHEET: &str = "Blad1";

/// Data rows used from the municipal energy-declaration workbook, zero-based
/// and counted below the header row (pandas-style indices).
const DEFAULT_ROWS: &[u32] = &[4, 51, 52, 53, 54];

/// Zero-based column positions of the fields the graph builder consumes.
///
/// The source workbook has no machine-readable headers, so the mapping is
/// explicit configuration rather than something inferred from the sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub name: u32,
    pub address: u32,
    pub activity_type: u32,
    pub energy_class: u32,
    pub total_energy: u32,
    pub year_built: u32,
    pub floor_area: u32,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            name: 0,
            address: 1,
            activity_type: 2,
            energy_class: 3,
            total_energy: 4,
            year_built: 15,
            floor_area: 18,
        }
    }
}

/// Row markers that identify header/footer rows rather than buildings.
pub const SKIP_MARKERS: &[&str] = &["fastigheter", "Beteckning", "Energideklarationer"];

/// Resolved configuration for the graph builder run.
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    pub input: PathBuf,
    pub sheet: String,
    pub rows: Vec<u32>,
    pub columns: ColumnMap,
    pub output: PathBuf,
}

impl BuilderConfig {
    pub fn from_args(args: BuilderArgs) -> Result<Self> {
        let BuilderArgs {
            config,
            input,
            sheet: cli_sheet,
            rows: cli_rows,
            output: cli_output,
        } = args;

        let file_config = if let Some(path) = config.as_ref() {
            load_config_file(path)?
        } else {
            PartialBuilderConfig::default()
        };

        let sheet = cli_sheet
            .or(file_config.sheet)
            .unwrap_or_else(|| DEFAULT_SHEET.to_string());

        let rows = cli_rows
            .or(file_config.rows)
            .unwrap_or_else(|| DEFAULT_ROWS.to_vec());
        anyhow::ensure!(!rows.is_empty(), "at least one data row must be selected");

        let columns = file_config.columns.unwrap_or_default();

        let output = cli_output
            .or(file_config.output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RDF_FILE));

        anyhow::ensure!(input.exists(), "input workbook {:?} does not exist", input);
        anyhow::ensure!(input.is_file(), "input workbook {:?} is not a file", input);

        Ok(Self {
            input,
            sheet,
            rows,
            columns,
            output,
        })
    }
}

/// CLI arguments for the `build-graph` binary.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "build-graph",
    about = "Convert the building-energy workbook into a Turtle RDF file",
    version
)]
pub struct BuilderArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "Path to a configuration file (YAML or JSON)"
    )]
    pub config: Option<PathBuf>,

    #[arg(value_name = "WORKBOOK", help = "Input .xlsx workbook")]
    pub input: PathBuf,

    #[arg(
        long,
        env = "BUILDING_ENERGY_SHEET",
        value_name = "NAME",
        help = "Worksheet name to read"
    )]
    pub sheet: Option<String>,

    #[arg(
        long,
        value_name = "ROW",
        value_delimiter = ',',
        help = "Zero-based data rows to convert (counted below the header row)"
    )]
    pub rows: Option<Vec<u32>>,

    #[arg(
        long,
        short = 'o',
        env = "BUILDING_ENERGY_RDF",
        value_name = "FILE",
        help = "Destination Turtle file (overwritten if present)"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialBuilderConfig {
    sheet: Option<String>,
    rows: Option<Vec<u32>>,
    columns: Option<ColumnMap>,
    output: Option<PathBuf>,
}

/// Resolved configuration for the query service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub rdf_file: PathBuf,
    pub http_bind_address: SocketAddr,
}

impl ServerConfig {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let CliArgs {
            config,
            rdf_file: cli_rdf_file,
            http_bind: cli_http_bind,
        } = args;

        let file_config = if let Some(path) = config.as_ref() {
            load_config_file(path)?
        } else {
            PartialServerConfig::default()
        };

        let rdf_file = cli_rdf_file
            .or(file_config.rdf_file)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RDF_FILE));

        let http_bind_address = cli_http_bind.or(file_config.http_bind).unwrap_or_else(|| {
            DEFAULT_HTTP_BIND
                .parse()
                .expect("default bind address valid")
        });

        Ok(Self {
            rdf_file,
            http_bind_address,
        })
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.rdf_file.exists(),
            "RDF file {:?} does not exist; run build-graph first",
            self.rdf_file
        );
        anyhow::ensure!(
            self.rdf_file.is_file(),
            "RDF file {:?} is not a file",
            self.rdf_file
        );
        Ok(())
    }
}

/// CLI arguments for the query-service binary.
#[derive(Parser, Debug, Default, Clone)]
#[command(
    name = "building-energy-api",
    about = "HTTP SPARQL API over the building-energy RDF graph",
    version
)]
pub struct CliArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "Path to a configuration file (YAML or JSON)"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        env = "BUILDING_ENERGY_RDF",
        value_name = "FILE",
        help = "Turtle file produced by build-graph"
    )]
    pub rdf_file: Option<PathBuf>,

    #[arg(
        long,
        env = "BUILDING_ENERGY_HTTP_BIND",
        value_name = "ADDR",
        help = "HTTP bind address"
    )]
    pub http_bind: Option<SocketAddr>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialServerConfig {
    rdf_file: Option<PathBuf>,
    http_bind: Option<SocketAddr>,
}

fn load_config_file<T>(path: &Path) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML config {:?}", path))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON config {:?}", path))?,
        other => anyhow::bail!("unsupported config extension: {other}"),
    };
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_column_map_matches_source_layout() {
        let map = ColumnMap::default();
        assert_eq!(map.name, 0);
        assert_eq!(map.total_energy, 4);
        assert_eq!(map.year_built, 15);
        assert_eq!(map.floor_area, 18);
    }

    #[test]
    fn builder_config_merges_yaml_overrides() {
        let mut workbook = tempfile::NamedTempFile::with_suffix(".xlsx").unwrap();
        workbook.write_all(b"stub").unwrap();

        let mut config = tempfile::NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(config, "sheet: Blad2").unwrap();
        writeln!(config, "rows: [0, 1]").unwrap();
        writeln!(config, "columns:").unwrap();
        writeln!(config, "  year_built: 12").unwrap();

        let args = BuilderArgs {
            config: Some(config.path().to_path_buf()),
            input: workbook.path().to_path_buf(),
            sheet: None,
            rows: None,
            output: None,
        };
        let resolved = BuilderConfig::from_args(args).unwrap();
        assert_eq!(resolved.sheet, "Blad2");
        assert_eq!(resolved.rows, vec![0, 1]);
        assert_eq!(resolved.columns.year_built, 12);
        // untouched fields keep their defaults
        assert_eq!(resolved.columns.name, 0);
        assert_eq!(resolved.output, PathBuf::from(DEFAULT_RDF_FILE));
    }

    #[test]
    fn cli_rows_take_precedence_over_defaults() {
        let mut workbook = tempfile::NamedTempFile::with_suffix(".xlsx").unwrap();
        workbook.write_all(b"stub").unwrap();

        let args = BuilderArgs {
            config: None,
            input: workbook.path().to_path_buf(),
            sheet: None,
            rows: Some(vec![7]),
            output: Some(PathBuf::from("out.ttl")),
        };
        let resolved = BuilderConfig::from_args(args).unwrap();
        assert_eq!(resolved.rows, vec![7]);
        assert_eq!(resolved.output, PathBuf::from("out.ttl"));
        assert_eq!(resolved.sheet, DEFAULT_SHEET);
    }
}
