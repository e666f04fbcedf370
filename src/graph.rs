//! RDF graph construction, serialization, and loading.
//!
//! The builder side turns [`BuildingRecord`]s into Brick triples in an
//! in-memory oxigraph [`Store`]; the service side loads the resulting Turtle
//! file back into a fresh store at startup.

use crate::ingest::BuildingRecord;
use crate::ontology::{BRICK_NS, EX_NS, brick, building_iri, energy_usage_iri};
use anyhow::{Context, Result};
use oxigraph::io::{RdfFormat, RdfSerializer};
use oxigraph::model::{GraphName, GraphNameRef, Literal, Quad, vocab::rdf};
use oxigraph::store::Store;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, info};

/// Build an in-memory graph from the extracted building records.
pub fn build_graph(records: &[BuildingRecord]) -> Result<Store> {
    let store = Store::new().context("failed to create in-memory store")?;

    for record in records {
        insert_building(&store, record)
            .with_context(|| format!("failed to add triples for building '{}'", record.name))?;
    }

    Ok(store)
}

fn insert_building(store: &Store, record: &BuildingRecord) -> Result<()> {
    let building = building_iri(&record.name)
        .with_context(|| format!("building name '{}' does not form a valid IRI", record.name))?;
    let graph = GraphName::DefaultGraph;

    store.insert(&Quad::new(
        building.clone(),
        rdf::TYPE,
        brick::BUILDING.into_owned(),
        graph.clone(),
    ))?;
    store.insert(&Quad::new(
        building.clone(),
        brick::HAS_ADDRESS,
        Literal::new_simple_literal(&record.address),
        graph.clone(),
    ))?;
    store.insert(&Quad::new(
        building.clone(),
        brick::HAS_ACTIVITY_TYPE,
        Literal::new_simple_literal(&record.activity_type),
        graph.clone(),
    ))?;
    store.insert(&Quad::new(
        building.clone(),
        brick::ENERGY_CLASS,
        Literal::new_simple_literal(&record.energy_class),
        graph.clone(),
    ))?;

    if let Some(year) = record.year_built {
        store.insert(&Quad::new(
            building.clone(),
            brick::YEAR_BUILT,
            Literal::from(year),
            graph.clone(),
        ))?;
    }

    if let Some(area) = record.floor_area {
        store.insert(&Quad::new(
            building.clone(),
            brick::HAS_FLOOR_AREA,
            Literal::from(area),
            graph.clone(),
        ))?;
    }

    if let Some(total) = record.total_energy {
        let usage = energy_usage_iri(&record.name).with_context(|| {
            format!("building name '{}' does not form a valid IRI", record.name)
        })?;
        store.insert(&Quad::new(
            usage.clone(),
            rdf::TYPE,
            brick::ENERGY_USAGE.into_owned(),
            graph.clone(),
        ))?;
        store.insert(&Quad::new(
            usage.clone(),
            brick::TOTAL_ENERGY,
            Literal::from(total),
            graph.clone(),
        ))?;
        store.insert(&Quad::new(building, brick::HAS_PART, usage, graph))?;
    }

    debug!(building = %record.name, "added building to graph");
    Ok(())
}

/// Serialize the default graph as Turtle, overwriting `path` unconditionally.
pub fn write_turtle(store: &Store, path: &Path) -> Result<()> {
    let serializer = RdfSerializer::from_format(RdfFormat::Turtle)
        .with_prefix("brick", BRICK_NS)
        .context("invalid brick prefix IRI")?
        .with_prefix("ex", EX_NS)
        .context("invalid ex prefix IRI")?;

    let file =
        File::create(path).with_context(|| format!("failed to create output file {:?}", path))?;
    store
        .dump_graph_to_writer(GraphNameRef::DefaultGraph, serializer, BufWriter::new(file))
        .with_context(|| format!("failed to serialize graph to {:?}", path))?;

    info!(path = %path.display(), triples = store.len()?, "RDF data written");
    Ok(())
}

/// Load a Turtle file into a fresh in-memory store.
pub fn load_turtle(path: &Path) -> Result<Store> {
    let file = File::open(path).with_context(|| format!("failed to open RDF file {:?}", path))?;
    let store = Store::new().context("failed to create in-memory store")?;
    store
        .load_from_reader(RdfFormat::Turtle, BufReader::new(file))
        .with_context(|| format!("failed to parse Turtle file {:?}", path))?;

    info!(path = %path.display(), triples = store.len()?, "RDF graph loaded");
    Ok(store)
}
