mod common;

use common::{
    graph_has_subject, single_graph_config, CURRENT_GRAPH, ENDPOINT_TYPE, HAS_ENDPOINT,
    HAS_LABEL, HAS_VERSION, RESOURCE_TYPE,
};
use chrono::{TimeZone, Utc};
use pidgraph_core::model::vocab::{pid, rdf, xsd};
use pidgraph_core::{
    DescriptorSet, Entity, EntityRepository, GraphRouter, Literal, MemoryEndpoint,
    PropertyDescriptor, RepoError, SparqlEntityRepository, Value,
};

const R1: &str = "https://pid.example.org/resource/r1";
const MODIFIED: &str = "https://pid.example.org/kos/19050/lastChangeDateTime";

fn resource_descriptors() -> DescriptorSet {
    let endpoint_descriptors = DescriptorSet::new().with(
        pid::HAS_BASE_URI,
        PropertyDescriptor::iri(),
    );
    DescriptorSet::new()
        .with(pid::HAS_PID, PropertyDescriptor::iri())
        .with(
            HAS_ENDPOINT,
            PropertyDescriptor::iri().with_nested(ENDPOINT_TYPE, endpoint_descriptors),
        )
}

#[test]
fn create_then_get_returns_the_same_properties() {
    let endpoint = MemoryEndpoint::new().unwrap();
    let mut repo = SparqlEntityRepository::new(&endpoint, single_graph_config());
    let router = GraphRouter::direct();

    let entity = Entity::new(R1)
        .with(rdf::TYPE, Value::reference(RESOURCE_TYPE))
        .with(HAS_LABEL, "Widget")
        .with(HAS_VERSION, "2");
    repo.create(&router, &entity, &DescriptorSet::new()).unwrap();

    let fetched = repo.get_by_id(&router, R1, &DescriptorSet::new()).unwrap();
    assert_eq!(fetched.id, R1);
    assert_eq!(fetched.values(HAS_LABEL), &[Value::literal("Widget")]);
    assert_eq!(fetched.values(HAS_VERSION), &[Value::literal("2")]);
    assert_eq!(fetched.type_uri(), Some(RESOURCE_TYPE));
    assert_eq!(endpoint.quad_count().unwrap(), 3);
}

#[test]
fn nested_entities_are_written_under_their_own_subject_and_read_back_as_tree() {
    let endpoint = MemoryEndpoint::new().unwrap();
    let mut repo = SparqlEntityRepository::new(&endpoint, single_graph_config());
    let router = GraphRouter::direct();
    let descriptors = resource_descriptors();

    let nested = Entity::new("https://pid.example.org/endpoint/e1")
        .with(rdf::TYPE, Value::reference(ENDPOINT_TYPE))
        .with(pid::HAS_BASE_URI, "https://widgets.example.org/");
    let entity = Entity::new(R1)
        .with(rdf::TYPE, Value::reference(RESOURCE_TYPE))
        .with(HAS_ENDPOINT, nested.clone());
    repo.create(&router, &entity, &descriptors).unwrap();

    assert!(graph_has_subject(&endpoint, CURRENT_GRAPH, &nested.id));

    let fetched = repo.get_by_id(&router, R1, &descriptors).unwrap();
    let fetched_nested = fetched.first_value(HAS_ENDPOINT).and_then(Value::as_nested).unwrap();
    assert_eq!(fetched_nested.id, nested.id);
    assert_eq!(
        fetched_nested.values(pid::HAS_BASE_URI),
        &[Value::reference("https://widgets.example.org/")]
    );
}

#[test]
fn delete_removes_only_triples_of_the_subject() {
    let endpoint = MemoryEndpoint::new().unwrap();
    let mut repo = SparqlEntityRepository::new(&endpoint, single_graph_config());
    let router = GraphRouter::direct();
    let descriptors = resource_descriptors();

    let nested = Entity::new("https://pid.example.org/endpoint/e1")
        .with(rdf::TYPE, Value::reference(ENDPOINT_TYPE));
    let entity = Entity::new(R1)
        .with(HAS_LABEL, "Widget")
        .with(HAS_ENDPOINT, nested.clone());
    repo.create(&router, &entity, &descriptors).unwrap();

    repo.delete(&router, R1).unwrap();

    assert!(!graph_has_subject(&endpoint, CURRENT_GRAPH, R1));
    assert!(graph_has_subject(&endpoint, CURRENT_GRAPH, &nested.id));
    assert!(matches!(
        repo.get_by_id(&router, R1, &descriptors),
        Err(RepoError::NotFound(id)) if id == R1
    ));
}

#[test]
fn update_replaces_previous_values() {
    let endpoint = MemoryEndpoint::new().unwrap();
    let mut repo = SparqlEntityRepository::new(&endpoint, single_graph_config());
    let router = GraphRouter::direct();

    repo.create(
        &router,
        &Entity::new(R1).with(HAS_LABEL, "Widget").with(HAS_VERSION, "1"),
        &DescriptorSet::new(),
    )
    .unwrap();
    repo.update(
        &router,
        &Entity::new(R1).with(HAS_LABEL, "Gadget"),
        &DescriptorSet::new(),
    )
    .unwrap();

    let fetched = repo.get_by_id(&router, R1, &DescriptorSet::new()).unwrap();
    assert_eq!(fetched.values(HAS_LABEL), &[Value::literal("Gadget")]);
    assert!(fetched.values(HAS_VERSION).is_empty());
}

#[test]
fn descriptors_select_typed_literals_and_unknown_predicates_fall_back() {
    let endpoint = MemoryEndpoint::new().unwrap();
    let mut repo = SparqlEntityRepository::new(&endpoint, single_graph_config());
    let router = GraphRouter::direct();
    let descriptors = DescriptorSet::new().with(
        HAS_VERSION,
        PropertyDescriptor::literal(Some(xsd::INTEGER)),
    );

    let entity = Entity::new(R1)
        .with(HAS_VERSION, "7")
        .with("https://example.org/unknown", "https://example.org/looks-like-a-uri")
        .with(pid::HAS_LIFECYCLE_STATUS, "https://pid.example.org/kos/19050/Draft")
        .with("https://example.org/blank", "   ");
    repo.create(&router, &entity, &descriptors).unwrap();

    let fetched = repo.get_by_id(&router, R1, &descriptors).unwrap();
    assert_eq!(
        fetched.values(HAS_VERSION),
        &[Value::Literal(Literal::typed("7", xsd::INTEGER))]
    );
    assert_eq!(
        fetched.values("https://example.org/unknown"),
        &[Value::literal("https://example.org/looks-like-a-uri")]
    );
    assert_eq!(
        fetched.values(pid::HAS_LIFECYCLE_STATUS),
        &[Value::reference("https://pid.example.org/kos/19050/Draft")]
    );
    assert!(fetched.values("https://example.org/blank").is_empty());
}

#[test]
fn relative_ids_are_rejected_before_any_call() {
    let endpoint = MemoryEndpoint::new().unwrap();
    let mut repo = SparqlEntityRepository::new(&endpoint, single_graph_config());
    let router = GraphRouter::direct();

    let err = repo
        .create(&router, &Entity::new("r1").with(HAS_LABEL, "x"), &DescriptorSet::new())
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidUri(value) if value == "r1"));
    assert!(matches!(
        repo.get_by_id(&router, "not a uri", &DescriptorSet::new()),
        Err(RepoError::InvalidUri(_))
    ));
    assert_eq!(endpoint.quad_count().unwrap(), 0);
}

#[test]
fn empty_entity_create_sends_nothing() {
    let endpoint = common::CountingEndpoint::new();
    let mut repo = SparqlEntityRepository::new(&endpoint, single_graph_config());
    repo.create(&GraphRouter::direct(), &Entity::new(R1), &DescriptorSet::new())
        .unwrap();
    assert_eq!(endpoint.update_calls(), 0);
}

#[test]
fn date_time_with_fractional_seconds_survives_the_store() {
    let endpoint = MemoryEndpoint::new().unwrap();
    let mut repo = SparqlEntityRepository::new(&endpoint, single_graph_config());
    let router = GraphRouter::direct();

    let tenth = Utc.timestamp_millis_opt(1_700_000_000_100).unwrap();
    let whole = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    let entity = Entity::new(R1)
        .with(MODIFIED, tenth)
        .with(
            HAS_VERSION,
            Value::Literal(Literal::typed("2023-11-14T23:13:20+01:00", xsd::DATE_TIME)),
        );
    repo.create(&router, &entity, &DescriptorSet::new()).unwrap();

    let fetched = repo.get_by_id(&router, R1, &DescriptorSet::new()).unwrap();
    assert_eq!(fetched.values(MODIFIED), &[Value::from(tenth)]);
    assert_eq!(
        fetched.values(MODIFIED),
        &[Value::Literal(Literal::typed("2023-11-14T22:13:20.1Z", xsd::DATE_TIME))]
    );
    assert_eq!(fetched.values(HAS_VERSION), &[Value::from(whole)]);
}
