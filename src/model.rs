//! Request and response types for the HTTP surface.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /query`.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlQueryRequest {
    #[serde(default)]
    pub query: Option<String>,
}

/// Payload of `GET /`, a fixed description of the available endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ApiInfo {
    pub message: &'static str,
    pub endpoints: Map<String, Value>,
}

impl Default for ApiInfo {
    fn default() -> Self {
        let mut endpoints = Map::new();
        let routes: &[(&str, &str)] = &[
            ("/query", "POST endpoint to execute SPARQL queries"),
            ("/buildings", "GET endpoint to retrieve all buildings"),
            (
                "/energy_usage",
                "GET endpoint to retrieve total energy usage per building",
            ),
            (
                "/activity_types",
                "GET endpoint to retrieve activity types of buildings",
            ),
            (
                "/normalized_energy",
                "GET endpoint to retrieve normalized energy consumption",
            ),
            (
                "/recent_buildings?year=<year>",
                "GET endpoint to retrieve buildings constructed after a given year",
            ),
            (
                "/building_energy?building=<name>",
                "GET endpoint to retrieve total energy for a specific building",
            ),
        ];
        for (route, description) in routes {
            endpoints.insert((*route).to_string(), Value::String((*description).to_string()));
        }
        Self {
            message: "Welcome to the Building Energy API",
            endpoints,
        }
    }
}

/// One row of `GET /buildings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingRow {
    pub building: String,
    pub address: String,
}

/// One row of `GET /energy_usage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyUsageRow {
    pub building: String,
    #[serde(rename = "totalEnergy")]
    pub total_energy: String,
}

/// One row of `GET /activity_types`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityTypeRow {
    pub building: String,
    #[serde(rename = "activityType")]
    pub activity_type: String,
}

/// One row of `GET /normalized_energy`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedEnergyRow {
    pub building: String,
    #[serde(rename = "normalizedConsumption")]
    pub normalized_consumption: String,
}

/// One row of `GET /recent_buildings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentBuildingRow {
    pub building: String,
    #[serde(rename = "yearBuilt")]
    pub year_built: String,
}

/// One row of `GET /building_energy`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingEnergyRow {
    pub building: String,
    #[serde(rename = "totalEnergy")]
    pub total_energy: f64,
}
