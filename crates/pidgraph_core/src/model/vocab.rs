//! Vocabulary IRIs the persistence engine depends on.

/// RDF vocabulary.
pub mod rdf {
    /// rdf:type
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

/// RDFS vocabulary.
pub mod rdfs {
    /// rdfs:label
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
}

/// XSD datatypes.
pub mod xsd {
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
}

/// PID registry vocabulary (resources, consumer groups, templates).
pub mod pid {
    pub const NS: &str = "https://pid.example.org/kos/19050/";

    /// Business identifier of an entity. Link properties join on this.
    pub const HAS_PID: &str = "https://pid.example.org/kos/19050/hasPID";
    pub const HAS_LIFECYCLE_STATUS: &str = "https://pid.example.org/kos/19050/hasLifecycleStatus";
    pub const HAS_PID_URI_TEMPLATE: &str = "https://pid.example.org/kos/19050/hasPidUriTemplate";
    pub const HAS_BASE_URI: &str = "https://pid.example.org/kos/19050/hasBaseURI";
    pub const HAS_LATER_VERSION: &str = "https://pid.example.org/kos/19050/hasLaterVersion";

    /// Group key that marks a property as a link type.
    pub const LINK_TYPES_GROUP: &str = "https://pid.example.org/kos/19050/LinkTypes";
}

/// Predicates always written as IRI triples, whatever the schema says.
pub const REFERENCE_PREDICATES: &[&str] = &[
    rdf::TYPE,
    pid::HAS_PID,
    pid::HAS_LIFECYCLE_STATUS,
    pid::HAS_PID_URI_TEMPLATE,
    pid::HAS_BASE_URI,
];

/// Returns whether `predicate` belongs to [`REFERENCE_PREDICATES`].
pub fn is_reference_predicate(predicate: &str) -> bool {
    REFERENCE_PREDICATES.contains(&predicate)
}
