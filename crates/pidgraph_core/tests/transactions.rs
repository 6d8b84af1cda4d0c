mod common;

use common::{graph_has_subject, single_graph_config, CountingEndpoint, CURRENT_GRAPH, HAS_LABEL};
use pidgraph_core::{
    DescriptorSet, Entity, EntityRepository, GraphRouter, RepoError, SparqlEntityRepository,
};

fn entity(n: usize) -> Entity {
    Entity::new(format!("https://pid.example.org/resource/r{n}")).with(HAS_LABEL, format!("R{n}"))
}

#[test]
fn writes_without_transaction_send_one_request_each() {
    let endpoint = CountingEndpoint::new();
    let mut repo = SparqlEntityRepository::new(&endpoint, single_graph_config());
    let router = GraphRouter::direct();

    for n in 0..3 {
        repo.create(&router, &entity(n), &DescriptorSet::new()).unwrap();
    }
    assert_eq!(endpoint.update_calls(), 3);
}

#[test]
fn transaction_commits_buffered_writes_in_one_request() {
    let endpoint = CountingEndpoint::new();
    let mut repo = SparqlEntityRepository::new(&endpoint, single_graph_config());
    let router = GraphRouter::direct();

    repo.begin_transaction().unwrap();
    repo.create(&router, &entity(0), &DescriptorSet::new()).unwrap();
    repo.create(&router, &entity(1), &DescriptorSet::new()).unwrap();
    repo.delete(&router, "https://pid.example.org/resource/r0").unwrap();
    assert_eq!(endpoint.update_calls(), 0);
    assert_eq!(repo.pending_statements(), 3);

    repo.commit().unwrap();
    assert_eq!(endpoint.update_calls(), 1);
    assert!(!repo.in_transaction());

    let body = endpoint.last_update().unwrap();
    assert_eq!(body.matches(" ;\n").count(), 2);
    let first_insert = body.find("resource/r0").unwrap();
    let delete = body.find("DELETE WHERE").unwrap();
    assert!(first_insert < delete);

    assert!(!graph_has_subject(endpoint.inner(), CURRENT_GRAPH, "https://pid.example.org/resource/r0"));
    assert!(graph_has_subject(endpoint.inner(), CURRENT_GRAPH, "https://pid.example.org/resource/r1"));
}

#[test]
fn empty_commit_makes_no_call() {
    let endpoint = CountingEndpoint::new();
    let mut repo = SparqlEntityRepository::new(&endpoint, single_graph_config());

    repo.begin_transaction().unwrap();
    repo.commit().unwrap();
    assert_eq!(endpoint.update_calls(), 0);
}

#[test]
fn discard_drops_buffered_writes() {
    let endpoint = CountingEndpoint::new();
    let mut repo = SparqlEntityRepository::new(&endpoint, single_graph_config());
    let router = GraphRouter::direct();

    repo.begin_transaction().unwrap();
    repo.create(&router, &entity(0), &DescriptorSet::new()).unwrap();
    repo.discard().unwrap();

    assert_eq!(endpoint.update_calls(), 0);
    assert_eq!(endpoint.inner().quad_count().unwrap(), 0);
    assert!(matches!(repo.commit(), Err(RepoError::NoOpenTransaction)));
}

#[test]
fn nested_begin_and_stray_commit_are_rejected() {
    let endpoint = CountingEndpoint::new();
    let mut repo = SparqlEntityRepository::new(&endpoint, single_graph_config());

    assert!(matches!(repo.commit(), Err(RepoError::NoOpenTransaction)));
    repo.begin_transaction().unwrap();
    assert!(matches!(
        repo.begin_transaction(),
        Err(RepoError::TransactionAlreadyOpen)
    ));
}

#[test]
fn discarded_update_leaves_store_unchanged() {
    let endpoint = CountingEndpoint::new();
    let mut repo = SparqlEntityRepository::new(&endpoint, single_graph_config());
    let router = GraphRouter::direct();

    repo.begin_transaction().unwrap();
    repo.create(&router, &entity(0), &DescriptorSet::new()).unwrap();
    repo.commit().unwrap();
    let quads_before = endpoint.inner().quad_count().unwrap();

    repo.begin_transaction().unwrap();
    repo.update(&router, &entity(0).with(HAS_LABEL, "changed"), &DescriptorSet::new())
        .unwrap();
    repo.create(
        &router,
        &Entity::new("https://pid.example.org/resource/r9")
            .with("https://pid.example.org/kos/19050/hasBaseURI", "https://base.example.org/"),
        &DescriptorSet::new(),
    )
    .unwrap();
    assert_eq!(repo.pending_statements(), 2);
    repo.discard().unwrap();

    assert_eq!(endpoint.inner().quad_count().unwrap(), quads_before);
}
