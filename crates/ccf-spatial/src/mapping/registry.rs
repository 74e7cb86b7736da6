//! V4: the registry layout.
//!
//! Nothing is declared up front. Placements link both endpoints
//! (`placement_for` / `placement_relative_to`), anatomical references and
//! collisions are IRIs, and retired entities are recorded.

use ccf_namespace::{ccf, Term};

use super::common::{self, UnitSource};
use super::spatial::add_file_object_reference;
use super::RecordMapper;
use crate::config::SchemaVersion;
use crate::error::{OntologyError, Result};
use crate::graph::{Graph, Node};
use crate::ids::{expand_anatomical_entity_id, expand_instance_id, resolve_placement_endpoints, AnatomyRewrite};
use crate::record::{Record, RecordKind};

#[derive(Debug, Clone, Copy)]
pub struct RegistryMapper {
    anatomy: AnatomyRewrite,
}

impl RegistryMapper {
    pub fn new(anatomy: AnatomyRewrite) -> Self {
        Self { anatomy }
    }
}

impl RecordMapper for RegistryMapper {
    fn version(&self) -> SchemaVersion {
        SchemaVersion::V4
    }

    fn declarations(&self) -> &'static [Term] {
        &[]
    }

    fn supports(&self, _kind: RecordKind) -> bool {
        true
    }

    fn add_spatial_entity(&self, graph: &mut Graph, record: &Record<'_>) -> Result<Node> {
        let subject = record.subject()?;
        let label = record.opt_text("label")?;
        let first_name = record.text("creator_first_name")?;
        let last_name = record.text("creator_last_name")?;
        let orcid = record.opt_text("creator_orcid")?;
        let created = record.date("creation_date")?;
        let dimensions = common::read_dimensions(record, UnitSource::Record)?;
        let sex = record.opt_text("sex")?;
        let side = record.opt_text("side")?;
        let collisions: Vec<Node> = record
            .opt_strings("ccf_annotations")?
            .iter()
            .map(|id| Node::iri(expand_instance_id(id)))
            .collect();
        let object_reference = common::object_reference_id(record)?;
        let placements = common::placement_ids(record)?;
        let reference_organ = record.opt_iri("reference_organ")?;
        let representation_of = record
            .opt_string("representation_of")?
            .map(|id| Node::iri(expand_anatomical_entity_id(&id, self.anatomy)));
        let extraction_set = record.opt_iri("extraction_set")?;
        let rui_rank = record.opt_integer("rui_rank")?;

        common::add_individual(graph, &subject, ccf::spatial_entity);
        graph.add_opt(&subject, ccf::title, label);
        graph.add(&subject, ccf::creator_first_name, first_name);
        graph.add(&subject, ccf::creator_last_name, last_name);
        graph.add_opt(&subject, ccf::creator_orcid, orcid);
        graph.add(&subject, ccf::creation_date, created);
        common::add_links(graph, &subject, ccf::collides_with, &collisions);
        common::add_dimensions(graph, &subject, &dimensions, false);
        graph.add_opt(&subject, ccf::organ_owner_sex, sex);
        graph.add_opt(&subject, ccf::organ_side, side);

        graph.add_opt(&subject, ccf::has_object_reference, object_reference);
        common::add_links(graph, &subject, ccf::has_placement, &placements);
        graph.add_opt(&subject, ccf::has_reference_organ, reference_organ);
        graph.add_opt(&subject, ccf::representation_of, representation_of);
        graph.add_opt(&subject, ccf::has_extraction_set, extraction_set);
        graph.add_opt(&subject, ccf::rui_rank, rui_rank);
        Ok(subject)
    }

    fn add_object_reference(&self, graph: &mut Graph, record: &Record<'_>) -> Result<Node> {
        add_file_object_reference(graph, record)
    }

    fn add_placement(&self, graph: &mut Graph, record: &Record<'_>, parent: Option<&Node>) -> Result<Node> {
        let subject = record.subject()?;
        let (source, target) = resolve_placement_endpoints(
            record.opt_iri("source")?,
            record.opt_iri("target")?,
            parent.cloned(),
        )
        .ok_or_else(|| OntologyError::MissingField {
            record_type: record.kind().as_str(),
            id: record.raw_id().map(str::to_string),
            field: "target",
        })?;
        let transform = common::Transform::read(record, UnitSource::Record)?;
        let placement_date = record.date("placement_date")?;

        common::add_individual(graph, &subject, ccf::spatial_placement);
        graph.add(&subject, ccf::creation_date, placement_date);
        graph.add(&subject, ccf::placement_for, source);
        graph.add(&subject, ccf::placement_relative_to, target);
        transform.add(graph, &subject, false);
        Ok(subject)
    }

    fn add_retired_entity(&self, graph: &mut Graph, record: &Record<'_>) -> Result<Node> {
        let subject = record.subject()?;
        let representation_of = record
            .opt_string("representation_of")?
            .map(|id| Node::iri(expand_anatomical_entity_id(&id, self.anatomy)));

        common::add_individual(graph, &subject, ccf::retired_spatial_entity);
        graph.add_opt(&subject, ccf::representation_of, representation_of);
        Ok(subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Literal, Object};
    use ccf_namespace::{owl, rdf};
    use serde_json::json;

    const MAPPER: RegistryMapper = RegistryMapper {
        anatomy: AnatomyRewrite::Canonical,
    };

    fn ccf_id(local: &str) -> Node {
        Node::iri(format!("http://purl.org/ccf/latest/ccf.owl#{local}"))
    }

    fn placement(extra: serde_json::Value) -> serde_json::Value {
        let mut value = json!({
            "@id": "#p1",
            "placement_date": "2023-05-06",
            "x_scaling": 1, "y_scaling": 1, "z_scaling": 1, "scaling_units": "ratio",
            "x_rotation": 0, "y_rotation": 0, "z_rotation": 0, "rotation_units": "degree",
            "x_translation": 1, "y_translation": 2, "z_translation": 3,
            "translation_units": "millimeter"
        });
        if let (Some(base), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        value
    }

    #[test]
    fn placement_links_source_and_target() {
        let value = placement(json!({"source": "#e1", "target": "#VHFKidney"}));
        let record = Record::new(RecordKind::SpatialPlacement, &value).unwrap();
        let mut g = Graph::new();
        let s = MAPPER.add_placement(&mut g, &record, None).unwrap();
        assert!(g.contains(&s, ccf::placement_for, &ccf_id("e1").into()));
        assert!(g.contains(&s, ccf::placement_relative_to, &ccf_id("VHFKidney").into()));
        assert_eq!(g.count_predicate(ccf::has_placement_target), 0);
        assert_eq!(g.instances_of(owl::Axiom).count(), 0);
    }

    #[test]
    fn nested_placement_resolves_from_parent() {
        let value = placement(json!({}));
        let record = Record::new(RecordKind::SpatialPlacement, &value).unwrap();
        let mut g = Graph::new();
        let parent = ccf_id("e1");
        let s = MAPPER.add_placement(&mut g, &record, Some(&parent)).unwrap();
        assert!(g.contains(&s, ccf::placement_for, &Object::from(&parent)));
        assert!(g.contains(&s, ccf::placement_relative_to, &Object::from(&parent)));

        let mut g = Graph::new();
        assert!(matches!(
            MAPPER.add_placement(&mut g, &record, None),
            Err(OntologyError::MissingField { field: "target", .. })
        ));
        assert!(g.is_empty());
    }

    #[test]
    fn entity_uses_iris_for_anatomy_and_collisions() {
        let value = json!({
            "@id": "https://example.org/e1",
            "creator_first_name": "Jane",
            "creator_last_name": "Doe",
            "creation_date": "2023-05-06",
            "x_dimension": 1, "y_dimension": 2, "z_dimension": 3,
            "dimension_units": "millimeter",
            "ccf_annotations": ["http://purl.obolibrary.org/obo/UBERON_0001225"],
            "representation_of": "UBERON:0002113",
            "extraction_set": "#es1"
        });
        let record = Record::new(RecordKind::SpatialEntity, &value).unwrap();
        let mut g = Graph::new();
        let s = MAPPER.add_spatial_entity(&mut g, &record).unwrap();

        assert_eq!(s, Node::iri("https://example.org/e1"));
        assert!(g.contains(
            &s,
            ccf::collides_with,
            &Node::iri("http://purl.obolibrary.org/obo/UBERON_0001225").into()
        ));
        assert!(g.contains(
            &s,
            ccf::representation_of,
            &Node::iri("http://purl.obolibrary.org/obo/UBERON_0002113").into()
        ));
        assert!(g.contains(&s, ccf::has_extraction_set, &ccf_id("es1").into()));
        assert_eq!(g.count_predicate(ccf::rui_rank), 0);
        assert!(g.contains(&s, ccf::dimension_unit, &Literal::plain("millimeter").into()));
    }

    #[test]
    fn retired_entity_needs_only_an_id() {
        let value = json!({"@id": "#old1", "@type": "RetiredSpatialEntity"});
        let record = Record::new(RecordKind::RetiredSpatialEntity, &value).unwrap();
        let mut g = Graph::new();
        let s = MAPPER.add_retired_entity(&mut g, &record).unwrap();
        assert!(g.contains(&s, rdf::type_, &ccf::retired_spatial_entity.into()));
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn retired_entity_keeps_its_anatomical_structure() {
        let value = json!({
            "@id": "#old1",
            "@type": "RetiredSpatialEntity",
            "label": "Old kidney",
            "representation_of": "UBERON:0002113"
        });
        let record = Record::new(RecordKind::RetiredSpatialEntity, &value).unwrap();
        let mut g = Graph::new();
        let s = MAPPER.add_retired_entity(&mut g, &record).unwrap();
        assert!(g.contains(
            &s,
            ccf::representation_of,
            &Node::iri("http://purl.obolibrary.org/obo/UBERON_0002113").into()
        ));
        assert_eq!(g.count_predicate(ccf::title), 0);
        assert_eq!(g.len(), 3);
    }
}
