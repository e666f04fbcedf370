//! Brick vocabulary terms and instance IRI construction.
//!
//! The dataset uses a small slice of the Brick 1.1 schema for classes and
//! properties, plus a local `ex:` namespace for building instances.

use oxigraph::model::{IriParseError, NamedNode};

/// Brick 1.1 schema namespace.
pub const BRICK_NS: &str = "https://brickschema.org/schema/1.1/Brick#";

/// Local namespace for building instance IRIs.
pub const EX_NS: &str = "http://example.org/building#";

/// Brick classes and properties used by the dataset.
pub mod brick {
    use oxigraph::model::NamedNodeRef;

    pub const BUILDING: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://brickschema.org/schema/1.1/Brick#Building");
    pub const ENERGY_USAGE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://brickschema.org/schema/1.1/Brick#Energy_Usage");
    pub const HAS_ADDRESS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://brickschema.org/schema/1.1/Brick#hasAddress");
    pub const HAS_ACTIVITY_TYPE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://brickschema.org/schema/1.1/Brick#hasActivityType");
    pub const ENERGY_CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://brickschema.org/schema/1.1/Brick#energyClass");
    pub const YEAR_BUILT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://brickschema.org/schema/1.1/Brick#yearBuilt");
    pub const HAS_FLOOR_AREA: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://brickschema.org/schema/1.1/Brick#hasFloorArea");
    pub const HAS_PART: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://brickschema.org/schema/1.1/Brick#hasPart");
    pub const TOTAL_ENERGY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://brickschema.org/schema/1.1/Brick#totalEnergy");
    pub const NORMALIZED_ENERGY_CONSUMPTION: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
        "https://brickschema.org/schema/1.1/Brick#normalizedEnergyConsumption",
    );
}

/// Sanitize a building name into the local-name form used for instance IRIs.
/// Spaces become underscores; everything else passes through.
pub fn sanitize_name(name: &str) -> String {
    name.trim().replace(' ', "_")
}

/// Instance IRI for a building, e.g. `ex:Bureskolan_&_Bureå_Badhus`.
pub fn building_iri(name: &str) -> Result<NamedNode, IriParseError> {
    NamedNode::new(format!("{EX_NS}{}", sanitize_name(name)))
}

/// Instance IRI for a building's energy-usage entity.
pub fn energy_usage_iri(name: &str) -> Result<NamedNode, IriParseError> {
    NamedNode::new(format!("{EX_NS}{}_EnergyUsage", sanitize_name(name)))
}

/// Instance IRI for an already-sanitized local name, as received from request
/// parameters. Returns an error when the input does not form a valid IRI,
/// which also rejects anything that could escape the IRI in query text.
pub fn building_iri_from_local(local: &str) -> Result<NamedNode, IriParseError> {
    NamedNode::new(format!("{EX_NS}{local}"))
}
