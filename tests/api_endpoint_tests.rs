//! Endpoint-level tests driving the axum router directly.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use building_energy_api::config::ServerConfig;
use building_energy_api::graph::build_graph;
use building_energy_api::ingest::BuildingRecord;
use building_energy_api::server::router;
use building_energy_api::state::AppState;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::path::PathBuf;
use tower::ServiceExt;

fn record(
    name: &str,
    year_built: Option<i64>,
    total_energy: Option<f64>,
) -> BuildingRecord {
    BuildingRecord {
        name: name.to_string(),
        address: format!("{name} 1"),
        activity_type: "Skola".to_string(),
        energy_class: "C".to_string(),
        total_energy,
        year_built,
        floor_area: Some(1000.0),
    }
}

fn sample_state() -> AppState {
    let records = vec![
        record("Gamla Stadshuset", Some(1912), Some(200000.0)),
        record("Sörböleskolan", Some(2005), Some(150000.5)),
        record("Kulturhuset", None, None),
    ];
    let store = build_graph(&records).expect("graph builds");
    let config = ServerConfig {
        rdf_file: PathBuf::from("unused.ttl"),
        http_bind_address: "127.0.0.1:0".parse().unwrap(),
    };
    AppState::from_store(store, config)
}

async fn get(uri: &str) -> (StatusCode, Value) {
    let app = router(sample_state());
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn post_query(body: Value) -> (StatusCode, Value) {
    let app = router(sample_state());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/query")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn index_describes_the_endpoints() {
    let (status, body) = get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to the Building Energy API");
    assert!(body["endpoints"].get("/query").is_some());
    assert!(body["endpoints"].get("/buildings").is_some());
}

#[tokio::test]
async fn query_returns_one_row_per_building() {
    let (status, body) = post_query(json!({
        "query": "SELECT ?building WHERE { ?building a <https://brickschema.org/schema/1.1/Brick#Building> . }"
    }))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn query_without_query_field_is_400() {
    let (status, body) = post_query(json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "SPARQL query not provided");
}

#[tokio::test]
async fn query_with_malformed_sparql_is_500() {
    let (status, body) = post_query(json!({ "query": "SELECT WHERE {" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn query_supports_ask() {
    let (status, body) = post_query(json!({
        "query": "ASK { ?s a <https://brickschema.org/schema/1.1/Brick#Building> }"
    }))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["boolean"], true);
}

#[tokio::test]
async fn buildings_lists_every_building_with_address() {
    let (status, body) = get("/buildings").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    let buildings: Vec<&str> = rows
        .iter()
        .map(|row| row["building"].as_str().unwrap())
        .collect();
    assert!(buildings.contains(&"http://example.org/building#Gamla_Stadshuset"));
    for row in rows {
        assert!(row["address"].as_str().unwrap().ends_with(" 1"));
    }
}

#[tokio::test]
async fn energy_usage_only_covers_buildings_with_data() {
    let (status, body) = get("/energy_usage").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    // Kulturhuset has no energy usage entity
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert!(row["totalEnergy"].as_str().unwrap().parse::<f64>().is_ok());
    }
}

#[tokio::test]
async fn activity_types_returns_the_mapped_literal() {
    let (status, body) = get("/activity_types").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row["activityType"] == "Skola"));
}

#[tokio::test]
async fn normalized_energy_is_empty_for_this_dataset() {
    let (status, body) = get("/normalized_energy").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn recent_buildings_without_year_is_400() {
    let (status, body) = get("/recent_buildings").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please provide a 'year' query parameter");
}

#[tokio::test]
async fn recent_buildings_filters_strictly_after_year() {
    let (status, body) = get("/recent_buildings?year=2000").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0]["building"],
        "http://example.org/building#Sörböleskolan"
    );
    assert_eq!(rows[0]["yearBuilt"], "2005");
}

#[tokio::test]
async fn recent_buildings_rejects_non_integer_year() {
    let (status, body) = get("/recent_buildings?year=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("abc"));
}

#[tokio::test]
async fn building_energy_returns_float_total() {
    let (status, body) = get("/building_energy?building=S%C3%B6rb%C3%B6leskolan").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["building"], "Sörböleskolan");
    assert_eq!(rows[0]["totalEnergy"], 150000.5);
}

#[tokio::test]
async fn building_energy_unknown_building_is_404() {
    let (status, body) = get("/building_energy?building=NonexistentName").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["error"],
        "No energy data found for building 'NonexistentName'"
    );
}

#[tokio::test]
async fn building_energy_without_parameter_is_400() {
    let (status, _) = get("/building_energy").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn building_energy_rejects_injection_attempts() {
    // '>' and whitespace cannot appear in the instance IRI
    let (status, _) = get("/building_energy?building=x%3E%20.%20%3Fs%20%3Fp%20%3Fo").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
