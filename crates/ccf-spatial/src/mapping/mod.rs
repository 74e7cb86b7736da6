//! Record → triple mapping, one strategy per record schema version.
//!
//! The builder owns the traversal (which records exist, in what order they
//! are visited, how nested placements find their parent). A
//! [`RecordMapper`] owns the field mapping: which fields are required, which
//! properties they become, and whether measurements carry unit axioms.

pub mod common;
mod registry;
mod rui;
mod spatial;

use ccf_namespace::Term;

use crate::config::{OntologyConfig, SchemaVersion};
use crate::error::{OntologyError, Result};
use crate::graph::{Graph, Node};
use crate::record::{Record, RecordKind};

pub use registry::RegistryMapper;
pub use rui::RuiMapper;
pub use spatial::SpatialMapper;

pub trait RecordMapper {
    fn version(&self) -> SchemaVersion;

    /// Classes and properties declared up front by `new`. Empty when the
    /// vocabulary is introduced by usage only.
    fn declarations(&self) -> &'static [Term];

    fn supports(&self, kind: RecordKind) -> bool {
        kind != RecordKind::RetiredSpatialEntity
    }

    /// Emit the entity's own triples, including its `has_object_reference`
    /// and `has_placement` links. Nested records are visited by the caller.
    fn add_spatial_entity(&self, graph: &mut Graph, record: &Record<'_>) -> Result<Node>;

    fn add_object_reference(&self, graph: &mut Graph, record: &Record<'_>) -> Result<Node>;

    /// `parent` is the entity or object reference the placement is nested in.
    fn add_placement(&self, graph: &mut Graph, record: &Record<'_>, parent: Option<&Node>) -> Result<Node>;

    fn add_extraction_set(&self, graph: &mut Graph, record: &Record<'_>) -> Result<Node> {
        common::add_extraction_set(graph, record)
    }

    fn add_retired_entity(&self, _graph: &mut Graph, record: &Record<'_>) -> Result<Node> {
        Err(OntologyError::UnknownRecordType(record.kind().as_str().to_string()))
    }
}

/// Select the mapper for the configured schema version.
pub fn mapper_for(config: &OntologyConfig) -> Box<dyn RecordMapper> {
    let anatomy = config.anatomy_rewrite();
    match config.schema_version {
        SchemaVersion::V1 => Box::new(RuiMapper),
        SchemaVersion::V2 => Box::new(SpatialMapper::v2(anatomy)),
        SchemaVersion::V3 => Box::new(SpatialMapper::v3(anatomy)),
        SchemaVersion::V4 => Box::new(RegistryMapper::new(anatomy)),
    }
}

/// Target of a placement: explicit `target`, else the parent record.
pub(crate) fn placement_target(record: &Record<'_>, parent: Option<&Node>) -> Result<Node> {
    match record.opt_iri("target")? {
        Some(target) => Ok(target),
        None => parent.cloned().ok_or_else(|| OntologyError::MissingField {
            record_type: record.kind().as_str(),
            id: record.raw_id().map(str::to_string),
            field: "target",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn selects_one_mapper_per_version() {
        for version in SchemaVersion::ALL {
            let mapper = mapper_for(&OntologyConfig::for_version(version));
            assert_eq!(mapper.version(), version);
        }
    }

    #[test]
    fn only_v4_supports_retired_entities() {
        for version in SchemaVersion::ALL {
            let mapper = mapper_for(&OntologyConfig::for_version(version));
            assert_eq!(
                mapper.supports(RecordKind::RetiredSpatialEntity),
                version == SchemaVersion::V4
            );
            assert!(mapper.supports(RecordKind::SpatialEntity));
        }
    }

    #[test]
    fn nested_placement_falls_back_to_parent_target() {
        let value = json!({"@id": "#p1"});
        let record = Record::new(RecordKind::SpatialPlacement, &value).unwrap();
        let parent = Node::iri("http://example.org/e1");
        assert_eq!(placement_target(&record, Some(&parent)).unwrap(), parent);
        assert!(matches!(
            placement_target(&record, None),
            Err(OntologyError::MissingField { field: "target", .. })
        ));
    }
}
