//! Workbook ingestion for the graph builder.
//!
//! Reads the configured rows of the energy-declaration sheet and maps the
//! positional columns to [`BuildingRecord`]s. Per-field parse failures are
//! logged and skipped; only a missing file or sheet aborts the run.

use crate::config::{BuilderConfig, SKIP_MARKERS};
use anyhow::{Context, Result, anyhow};
use std::path::Path;
use tracing::{debug, warn};
use umya_spreadsheet::reader::xlsx;
use umya_spreadsheet::{Spreadsheet, Worksheet};

/// One building row, after field mapping and numeric conversion.
///
/// Optional fields are `None` when the source cell was empty or unparsable;
/// they produce no triple at all rather than a zero-filled one.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingRecord {
    pub name: String,
    pub address: String,
    pub activity_type: String,
    pub energy_class: String,
    pub total_energy: Option<f64>,
    pub year_built: Option<i64>,
    pub floor_area: Option<f64>,
}

/// Read the workbook from disk and extract the configured rows.
pub fn load_records(config: &BuilderConfig) -> Result<Vec<BuildingRecord>> {
    let book = read_workbook(&config.input)?;
    extract_records(&book, config)
}

pub fn read_workbook(path: &Path) -> Result<Spreadsheet> {
    xlsx::read(path).with_context(|| format!("failed to parse workbook {:?}", path))
}

/// Map the configured rows of the sheet to building records.
///
/// Row indices are zero-based data rows counted below the header row; the
/// sheet itself is 1-based with the header in row 1, hence the `+ 2`.
pub fn extract_records(book: &Spreadsheet, config: &BuilderConfig) -> Result<Vec<BuildingRecord>> {
    let sheet = book
        .get_sheet_by_name(&config.sheet)
        .ok_or_else(|| anyhow!("sheet {:?} not found in workbook", config.sheet))?;

    let mut records = Vec::new();
    for &data_row in &config.rows {
        let sheet_row = data_row + 2;
        if let Some(record) = extract_row(sheet, sheet_row, config) {
            records.push(record);
        }
    }
    Ok(records)
}

fn extract_row(sheet: &Worksheet, row: u32, config: &BuilderConfig) -> Option<BuildingRecord> {
    let columns = &config.columns;
    let name = cell_text(sheet, columns.name, row);

    if name.is_empty() {
        debug!(row, "skipping row without a building name");
        return None;
    }
    if SKIP_MARKERS.iter().any(|marker| name.contains(marker)) {
        debug!(row, name = %name, "skipping header/footer marker row");
        return None;
    }

    let total_energy = parse_float(sheet, columns.total_energy, row);
    if total_energy.is_none() {
        warn!(
            building = %name,
            "missing energy consumption data, skipping energy usage entity"
        );
    }

    let year_built = match cell_text(sheet, columns.year_built, row) {
        raw if raw.is_empty() => None,
        raw => match raw.parse::<f64>() {
            Ok(year) => Some(year as i64),
            Err(_) => {
                warn!(
                    building = %name,
                    value = %raw,
                    "invalid construction year, skipping this field"
                );
                None
            }
        },
    };

    let floor_area = match cell_text(sheet, columns.floor_area, row) {
        raw if raw.is_empty() => None,
        raw => match raw.parse::<f64>() {
            Ok(area) => Some(area),
            Err(_) => {
                warn!(
                    building = %name,
                    value = %raw,
                    "invalid floor area, skipping this field"
                );
                None
            }
        },
    };

    Some(BuildingRecord {
        name,
        address: cell_text(sheet, columns.address, row),
        activity_type: cell_text(sheet, columns.activity_type, row),
        energy_class: cell_text(sheet, columns.energy_class, row),
        total_energy,
        year_built,
        floor_area,
    })
}

fn parse_float(sheet: &Worksheet, column: u32, row: u32) -> Option<f64> {
    let raw = cell_text(sheet, column, row);
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok()
}

/// Cell text at a zero-based column. umya coordinates are (col, row), 1-based.
fn cell_text(sheet: &Worksheet, column: u32, row: u32) -> String {
    sheet.get_value((column + 1, row)).trim().to_string()
}
