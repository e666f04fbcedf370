//! SPARQL execution and safe query templating.
//!
//! Fixed queries are module constants; the two parameterized endpoints never
//! splice raw request text into query source. The year filter is templated
//! from a parsed integer and the building parameter is validated by
//! constructing the instance IRI as an `oxigraph` [`NamedNode`], which rejects
//! anything that could escape the IRI in query text.

use crate::error::ApiError;
use crate::ontology::building_iri_from_local;
use oxigraph::model::{NamedNode, Term};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use serde_json::{Map, Value, json};

pub const BUILDINGS_QUERY: &str = "\
SELECT ?building ?address WHERE {
    ?building a <https://brickschema.org/schema/1.1/Brick#Building> ;
              <https://brickschema.org/schema/1.1/Brick#hasAddress> ?address .
}";

pub const ENERGY_USAGE_QUERY: &str = "\
SELECT ?building ?totalEnergy WHERE {
    ?building a <https://brickschema.org/schema/1.1/Brick#Building> ;
              <https://brickschema.org/schema/1.1/Brick#hasPart> ?energyUsage .
    ?energyUsage a <https://brickschema.org/schema/1.1/Brick#Energy_Usage> ;
                 <https://brickschema.org/schema/1.1/Brick#totalEnergy> ?totalEnergy .
}";

pub const ACTIVITY_TYPES_QUERY: &str = "\
SELECT ?building ?activityType WHERE {
    ?building a <https://brickschema.org/schema/1.1/Brick#Building> ;
              <https://brickschema.org/schema/1.1/Brick#hasActivityType> ?activityType .
}";

pub const NORMALIZED_ENERGY_QUERY: &str = "\
SELECT ?building ?normalizedConsumption WHERE {
    ?building a <https://brickschema.org/schema/1.1/Brick#Building> ;
              <https://brickschema.org/schema/1.1/Brick#normalizedEnergyConsumption> ?normalizedConsumption .
}";

/// Query for buildings constructed strictly after `year`.
pub fn recent_buildings_query(year: i64) -> String {
    format!(
        "SELECT ?building ?yearBuilt WHERE {{
    ?building a <https://brickschema.org/schema/1.1/Brick#Building> ;
              <https://brickschema.org/schema/1.1/Brick#yearBuilt> ?yearBuilt .
    FILTER(?yearBuilt > {year})
}}"
    )
}

/// Query for the total energy of one building, identified by its sanitized
/// local name. Fails with a 400 when the name does not form a valid IRI.
pub fn building_energy_query(building_name: &str) -> Result<String, ApiError> {
    let building = validated_building_iri(building_name)?;
    Ok(format!(
        "SELECT ?totalEnergy WHERE {{
    {building} a <https://brickschema.org/schema/1.1/Brick#Building> ;
              <https://brickschema.org/schema/1.1/Brick#hasPart> ?energyUsage .
    ?energyUsage a <https://brickschema.org/schema/1.1/Brick#Energy_Usage> ;
                 <https://brickschema.org/schema/1.1/Brick#totalEnergy> ?totalEnergy .
}}"
    ))
}

/// Validate a request-supplied building name as an `ex:` instance IRI.
pub fn validated_building_iri(building_name: &str) -> Result<NamedNode, ApiError> {
    building_iri_from_local(building_name).map_err(|e| ApiError::InvalidParameter {
        parameter: "building".to_string(),
        message: e.to_string(),
    })
}

/// Escape a string for use inside a double-quoted SPARQL literal.
pub fn escape_literal(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Run a SELECT query and map each solution to `{variable: stringified value}`.
pub fn select(store: &Store, query: &str) -> Result<Vec<Map<String, Value>>, ApiError> {
    let results = store.query(query).map_err(|e| ApiError::Sparql(e.to_string()))?;
    let QueryResults::Solutions(solutions) = results else {
        return Err(ApiError::Sparql("expected a SELECT query".to_string()));
    };
    collect_rows(solutions)
}

/// Run a caller-supplied query. SELECT yields `{"results": [...]}` and ASK
/// yields `{"boolean": b}`; CONSTRUCT/DESCRIBE is rejected as unsupported.
pub fn execute(store: &Store, query: &str) -> Result<Value, ApiError> {
    let results = store.query(query).map_err(|e| ApiError::Sparql(e.to_string()))?;
    match results {
        QueryResults::Solutions(solutions) => {
            let rows = collect_rows(solutions)?;
            Ok(json!({ "results": rows }))
        }
        QueryResults::Boolean(value) => Ok(json!({ "boolean": value })),
        QueryResults::Graph(_) => Err(ApiError::InvalidParameter {
            parameter: "query".to_string(),
            message: "CONSTRUCT/DESCRIBE queries are not supported".to_string(),
        }),
    }
}

fn collect_rows(
    solutions: oxigraph::sparql::QuerySolutionIter,
) -> Result<Vec<Map<String, Value>>, ApiError> {
    let mut rows = Vec::new();
    for solution in solutions {
        let solution = solution.map_err(|e| ApiError::Sparql(e.to_string()))?;
        let mut row = Map::new();
        for (variable, term) in solution.iter() {
            row.insert(
                variable.as_str().to_string(),
                Value::String(term_to_string(term)),
            );
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Plain stringification: IRIs without angle brackets, literals as their
/// lexical form (matching the shape the API has always returned).
pub fn term_to_string(term: &Term) -> String {
    match term {
        Term::NamedNode(node) => node.as_str().to_string(),
        Term::Literal(literal) => literal.value().to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_buildings_query_embeds_the_year() {
        let query = recent_buildings_query(2000);
        assert!(query.contains("FILTER(?yearBuilt > 2000)"));
    }

    #[test]
    fn building_energy_query_uses_validated_iri() {
        let query = building_energy_query("Sörböleskolan").unwrap();
        assert!(query.contains("<http://example.org/building#Sörböleskolan>"));
    }

    #[test]
    fn injection_attempt_in_building_name_is_rejected() {
        let result = building_energy_query("x> . ?s ?p ?o . FILTER(<y");
        assert!(result.is_err());
    }

    #[test]
    fn escape_literal_neutralizes_quotes_and_newlines() {
        assert_eq!(escape_literal(r#"a"b"#), r#"a\"b"#);
        assert_eq!(escape_literal("a\nb"), "a\\nb");
        assert_eq!(escape_literal(r"a\b"), r"a\\b");
    }

    #[test]
    fn select_on_malformed_query_reports_sparql_error() {
        let store = Store::new().unwrap();
        let error = select(&store, "SELECT WHERE {").unwrap_err();
        assert_eq!(error.category(), "sparql_error");
    }
}
