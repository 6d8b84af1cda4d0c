//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `pidgraph_core` linkage and the embedded endpoint.
//! - Print a create/get round trip as JSON for quick local checks.

use pidgraph_core::model::vocab::{pid, rdf};
use pidgraph_core::{
    core_version, DescriptorSet, Entity, EntityRepository, GraphRouter, MemoryEndpoint,
    PropertyDescriptor, RepositoryConfig, SparqlEntityRepository, Value,
};
use std::error::Error;
use std::process::ExitCode;

const GRAPH: &str = "https://pid.example.org/graphs/smoke";
const RESOURCE_TYPE: &str = "https://pid.example.org/kos/19050/PidUri";

fn main() -> ExitCode {
    println!("pidgraph_core version={}", core_version());
    match round_trip() {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("smoke round trip failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn round_trip() -> Result<String, Box<dyn Error>> {
    let endpoint = MemoryEndpoint::new()?;
    let config = RepositoryConfig::new(GRAPH, vec![GRAPH.to_string()]);
    let mut repo = SparqlEntityRepository::new(&endpoint, config);
    let router = GraphRouter::direct();

    let descriptors = DescriptorSet::new()
        .with(pid::HAS_PID, PropertyDescriptor::iri())
        .with(pid::HAS_LIFECYCLE_STATUS, PropertyDescriptor::iri());
    let entity = Entity::with_generated_id("https://pid.example.org/resource/")
        .with(rdf::TYPE, Value::reference(RESOURCE_TYPE))
        .with(pid::HAS_PID, Value::reference("https://pid.example.org/id/smoke"))
        .with(
            pid::HAS_LIFECYCLE_STATUS,
            Value::reference("https://pid.example.org/kos/19050/Published"),
        );

    repo.create(&router, &entity, &descriptors)?;
    let fetched = repo.get_by_id(&router, &entity.id, &descriptors)?;
    println!("pidgraph_core quads={}", endpoint.quad_count()?);
    Ok(serde_json::to_string_pretty(&fetched)?)
}
