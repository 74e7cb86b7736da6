//! V1: the first RUI registration layout.
//!
//! Single `creator` string, constant unit tags, unit axioms on every
//! measurement, and a derived restriction class for entities that name the
//! anatomical structure they represent.

use ccf_namespace::{ccf, dc, dcterms, obo, owl, rdf, rdfs, Term};

use super::common::{self, UnitSource};
use super::RecordMapper;
use crate::config::SchemaVersion;
use crate::error::Result;
use crate::graph::{digest_blank_node, Graph, Literal, Node};
use crate::ids::snakecase;
use crate::record::Record;

const DECLARATIONS: &[Term] = &[
    ccf::extraction_set,
    ccf::spatial_entity,
    ccf::spatial_object_reference,
    ccf::spatial_placement,
    obo::UO_0000016,
    obo::UO_0000185,
    obo::UO_0010006,
    ccf::belongs_to_extraction_set,
    ccf::extraction_set_for,
    ccf::is_placement_of,
    ccf::has_reference_organ,
    ccf::has_object_reference,
    ccf::has_placement,
    ccf::title,
    ccf::x_dimension,
    ccf::y_dimension,
    ccf::z_dimension,
    ccf::dimension_unit,
    ccf::x_scaling,
    ccf::y_scaling,
    ccf::z_scaling,
    ccf::scaling_unit,
    ccf::x_rotation,
    ccf::y_rotation,
    ccf::z_rotation,
    ccf::rotation_unit,
    ccf::x_translation,
    ccf::y_translation,
    ccf::z_translation,
    ccf::translation_unit,
    ccf::file_name,
    ccf::file_subpath,
    ccf::file_format,
    ccf::rui_rank,
    ccf::unit_of_measurement,
    dc::creator,
    dcterms::created,
];

#[derive(Debug, Clone, Copy, Default)]
pub struct RuiMapper;

impl RuiMapper {
    /// `ccf:spatial_entity_of_<label>` ≡ `∃ representation_of.<anatomy>`,
    /// a subclass of `ccf:spatial_entity`.
    fn add_representation_class(&self, graph: &mut Graph, subject: &Node, label: &str, anatomy: &Node) {
        let class_iri = format!("{}spatial_entity_of_{}", ccf::BASE, snakecase(label));
        let anatomy_key = anatomy.as_iri().unwrap_or_default();
        let restriction = digest_blank_node(
            "restriction",
            &[class_iri.as_str(), ccf::representation_of.iri(), anatomy_key],
        );
        let class = Node::iri(class_iri);

        graph.add(subject, rdf::type_, &class);
        graph.add(&class, owl::equivalentClass, &restriction);
        graph.add(&restriction, rdf::type_, owl::Restriction);
        graph.add(&restriction, owl::onProperty, ccf::representation_of);
        graph.add(&restriction, owl::someValuesFrom, anatomy);
        graph.add(&class, rdfs::subClassOf, ccf::spatial_entity);
    }
}

impl RecordMapper for RuiMapper {
    fn version(&self) -> SchemaVersion {
        SchemaVersion::V1
    }

    fn declarations(&self) -> &'static [Term] {
        DECLARATIONS
    }

    fn add_spatial_entity(&self, graph: &mut Graph, record: &Record<'_>) -> Result<Node> {
        let subject = record.subject()?;
        let label = record.string("label")?;
        let dimensions = common::read_dimensions(record, UnitSource::Constant)?;
        let creator = record.text("creator")?;
        let created = record.date("creation_date")?;
        let object_reference = common::object_reference_id(record)?;
        let placements = common::placement_ids(record)?;
        let reference_organ = record.opt_iri("reference_organ")?;
        // V1 takes the anatomical reference verbatim.
        let representation_of = record.opt_string("representation_of")?.map(Node::iri);
        let extraction_set = record.opt_iri("extraction_set")?;
        let rui_rank = record.opt_integer("rui_rank")?;

        common::add_individual(graph, &subject, ccf::spatial_entity);
        graph.add(&subject, dc::creator, creator);
        graph.add(&subject, dcterms::created, created);
        if let Some(anatomy) = &representation_of {
            self.add_representation_class(graph, &subject, &label, anatomy);
        }
        graph.add(&subject, ccf::title, Literal::plain(label));
        common::add_dimensions(graph, &subject, &dimensions, true);

        graph.add_opt(&subject, ccf::has_object_reference, object_reference);
        common::add_links(graph, &subject, ccf::has_placement, &placements);
        graph.add_opt(&subject, ccf::has_reference_organ, reference_organ);
        graph.add_opt(&subject, ccf::belongs_to_extraction_set, extraction_set);
        graph.add_opt(&subject, ccf::rui_rank, rui_rank);
        Ok(subject)
    }

    fn add_object_reference(&self, graph: &mut Graph, record: &Record<'_>) -> Result<Node> {
        let subject = record.subject()?;
        let file_name = record.text("file")?;
        let file_format = record.text("file_format")?;
        let file_subpath = record.opt_text("file_subpath")?;
        let placement = common::object_placement_id(record)?;

        common::add_individual(graph, &subject, ccf::spatial_object_reference);
        graph.add(&subject, ccf::file_name, file_name);
        graph.add(&subject, ccf::file_format, file_format);
        graph.add_opt(&subject, ccf::file_subpath, file_subpath);
        graph.add_opt(&subject, ccf::has_placement, placement);
        Ok(subject)
    }

    fn add_placement(&self, graph: &mut Graph, record: &Record<'_>, parent: Option<&Node>) -> Result<Node> {
        let subject = record.subject()?;
        let target = super::placement_target(record, parent)?;
        let transform = common::Transform::read(record, UnitSource::Constant)?;
        let placement_date = record.date("placement_date")?;

        common::add_individual(graph, &subject, ccf::spatial_placement);
        graph.add(&subject, dcterms::created, placement_date);
        graph.add(&subject, ccf::is_placement_of, target);
        transform.add(graph, &subject, true);
        Ok(subject)
    }
}
