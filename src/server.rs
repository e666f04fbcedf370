//! HTTP surface of the query service.
//!
//! Stateless handlers over the shared read-only graph. CORS is open to all
//! origins for all routes, matching the service this API fronts for.

use crate::error::ApiError;
use crate::model::{
    ActivityTypeRow, ApiInfo, BuildingEnergyRow, BuildingRow, EnergyUsageRow, NormalizedEnergyRow,
    RecentBuildingRow, SparqlQueryRequest,
};
use crate::sparql;
use crate::state::AppState;
use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/query", post(sparql_query))
        .route("/buildings", get(buildings))
        .route("/energy_usage", get(energy_usage))
        .route("/activity_types", get(activity_types))
        .route("/normalized_energy", get(normalized_energy))
        .route("/recent_buildings", get(recent_buildings))
        .route("/building_energy", get(building_energy))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn run_server(state: AppState) -> anyhow::Result<()> {
    let bind_addr = state.config.http_bind_address;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr()?;
    info!(bind = %actual_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(error) = tokio::signal::ctrl_c().await {
                tracing::error!(?error, "failed to listen for shutdown signal");
            }
        })
        .await?;

    info!("server stopped");
    Ok(())
}

async fn index() -> Json<ApiInfo> {
    Json(ApiInfo::default())
}

/// `POST /query`: run a caller-supplied SPARQL query.
async fn sparql_query(
    State(state): State<AppState>,
    Json(request): Json<SparqlQueryRequest>,
) -> Result<Json<Value>, ApiError> {
    let query = request
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::MissingParameter("SPARQL query not provided".to_string()))?;

    let output = sparql::execute(&state.store, &query)?;
    Ok(Json(output))
}

async fn buildings(State(state): State<AppState>) -> Result<Json<Vec<BuildingRow>>, ApiError> {
    let rows = sparql::select(&state.store, sparql::BUILDINGS_QUERY)?;
    let output = rows
        .iter()
        .map(|row| BuildingRow {
            building: field(row, "building"),
            address: field(row, "address"),
        })
        .collect();
    Ok(Json(output))
}

async fn energy_usage(
    State(state): State<AppState>,
) -> Result<Json<Vec<EnergyUsageRow>>, ApiError> {
    let rows = sparql::select(&state.store, sparql::ENERGY_USAGE_QUERY)?;
    let output = rows
        .iter()
        .map(|row| EnergyUsageRow {
            building: field(row, "building"),
            total_energy: field(row, "totalEnergy"),
        })
        .collect();
    Ok(Json(output))
}

async fn activity_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<ActivityTypeRow>>, ApiError> {
    let rows = sparql::select(&state.store, sparql::ACTIVITY_TYPES_QUERY)?;
    let output = rows
        .iter()
        .map(|row| ActivityTypeRow {
            building: field(row, "building"),
            activity_type: field(row, "activityType"),
        })
        .collect();
    Ok(Json(output))
}

async fn normalized_energy(
    State(state): State<AppState>,
) -> Result<Json<Vec<NormalizedEnergyRow>>, ApiError> {
    let rows = sparql::select(&state.store, sparql::NORMALIZED_ENERGY_QUERY)?;
    let output = rows
        .iter()
        .map(|row| NormalizedEnergyRow {
            building: field(row, "building"),
            normalized_consumption: field(row, "normalizedConsumption"),
        })
        .collect();
    Ok(Json(output))
}

#[derive(Debug, Deserialize)]
struct RecentBuildingsParams {
    year: Option<String>,
}

/// `GET /recent_buildings?year=N`: buildings built strictly after `year`.
async fn recent_buildings(
    State(state): State<AppState>,
    Query(params): Query<RecentBuildingsParams>,
) -> Result<Json<Vec<RecentBuildingRow>>, ApiError> {
    let raw = params.year.ok_or_else(|| {
        ApiError::MissingParameter("Please provide a 'year' query parameter".to_string())
    })?;
    let year: i64 = raw.parse().map_err(|_| ApiError::InvalidParameter {
        parameter: "year".to_string(),
        message: format!("'{raw}' is not an integer"),
    })?;

    let rows = sparql::select(&state.store, &sparql::recent_buildings_query(year))?;
    let output = rows
        .iter()
        .map(|row| RecentBuildingRow {
            building: field(row, "building"),
            year_built: field(row, "yearBuilt"),
        })
        .collect();
    Ok(Json(output))
}

#[derive(Debug, Deserialize)]
struct BuildingEnergyParams {
    building: Option<String>,
}

/// `GET /building_energy?building=Name`: total energy for one building.
async fn building_energy(
    State(state): State<AppState>,
    Query(params): Query<BuildingEnergyParams>,
) -> Result<Json<Vec<BuildingEnergyRow>>, ApiError> {
    let building_name = params.building.ok_or_else(|| {
        ApiError::MissingParameter(
            "Please provide a building name using the 'building' query parameter".to_string(),
        )
    })?;

    let query = sparql::building_energy_query(&building_name)?;
    let rows = sparql::select(&state.store, &query)?;

    let output: Vec<BuildingEnergyRow> = rows
        .iter()
        .filter_map(|row| {
            field(row, "totalEnergy")
                .parse::<f64>()
                .ok()
                .map(|total_energy| BuildingEnergyRow {
                    building: building_name.clone(),
                    total_energy,
                })
        })
        .collect();

    if output.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No energy data found for building '{building_name}'"
        )));
    }
    Ok(Json(output))
}

fn field(row: &Map<String, Value>, name: &str) -> String {
    row.get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
