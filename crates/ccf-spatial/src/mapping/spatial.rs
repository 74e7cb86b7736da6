//! V2 and V3: split creator fields, record-supplied unit tags and
//! `has_placement_target`.
//!
//! V2 still declares classes and annotates every measurement with a unit
//! axiom. V3 declares properties only, drops the unit axioms, and adds the
//! proximity annotations and organ owner sex/side.

use ccf_namespace::{ccf, obo, Term};

use super::common::{self, UnitSource};
use super::RecordMapper;
use crate::config::SchemaVersion;
use crate::error::Result;
use crate::graph::{Graph, Literal, Node};
use crate::ids::{expand_anatomical_entity_id, file_name_from_url, AnatomyRewrite};
use crate::record::Record;

const V3_PROPERTIES: &[Term] = &[
    ccf::belongs_to_extraction_set,
    ccf::extraction_set_for,
    ccf::has_placement_target,
    ccf::has_reference_organ,
    ccf::has_object_reference,
    ccf::has_placement,
    ccf::title,
    ccf::creator_first_name,
    ccf::creator_last_name,
    ccf::creator_orcid,
    ccf::creation_date,
    ccf::organ_owner_sex,
    ccf::organ_side,
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
    ccf::rotation_order,
    ccf::rotation_unit,
    ccf::x_translation,
    ccf::y_translation,
    ccf::z_translation,
    ccf::translation_unit,
    ccf::file_url,
    ccf::file_name,
    ccf::file_subpath,
    ccf::file_format,
    ccf::rui_rank,
    ccf::representation_of,
    ccf::in_proximity_of,
];

const V2_DECLARATIONS: &[Term] = &[
    ccf::extraction_set,
    ccf::spatial_entity,
    ccf::spatial_object_reference,
    ccf::spatial_placement,
    obo::UO_0000016,
    obo::UO_0000185,
    obo::UO_0010006,
    ccf::belongs_to_extraction_set,
    ccf::extraction_set_for,
    ccf::has_placement_target,
    ccf::has_reference_organ,
    ccf::has_object_reference,
    ccf::has_placement,
    ccf::title,
    ccf::creator_first_name,
    ccf::creator_last_name,
    ccf::creator_orcid,
    ccf::creation_date,
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
    ccf::rotation_order,
    ccf::rotation_unit,
    ccf::x_translation,
    ccf::y_translation,
    ccf::z_translation,
    ccf::translation_unit,
    ccf::file_url,
    ccf::file_name,
    ccf::file_subpath,
    ccf::file_format,
    ccf::rui_rank,
    ccf::representation_of,
    ccf::unit_of_measurement,
];

#[derive(Debug, Clone, Copy)]
pub struct SpatialMapper {
    version: SchemaVersion,
    annotate_units: bool,
    dimension_units: UnitSource,
    /// `ccf_annotations`, `sex` and `side` are mapped.
    extended_entity: bool,
    anatomy: AnatomyRewrite,
}

impl SpatialMapper {
    pub fn v2(anatomy: AnatomyRewrite) -> Self {
        Self {
            version: SchemaVersion::V2,
            annotate_units: true,
            dimension_units: UnitSource::Record,
            extended_entity: false,
            anatomy,
        }
    }

    pub fn v3(anatomy: AnatomyRewrite) -> Self {
        Self {
            version: SchemaVersion::V3,
            annotate_units: false,
            dimension_units: UnitSource::Checked,
            extended_entity: true,
            anatomy,
        }
    }
}

impl RecordMapper for SpatialMapper {
    fn version(&self) -> SchemaVersion {
        self.version
    }

    fn declarations(&self) -> &'static [Term] {
        match self.version {
            SchemaVersion::V2 => V2_DECLARATIONS,
            _ => V3_PROPERTIES,
        }
    }

    fn add_spatial_entity(&self, graph: &mut Graph, record: &Record<'_>) -> Result<Node> {
        let subject = record.subject()?;
        let label = record.opt_text("label")?;
        let first_name = record.text("creator_first_name")?;
        let last_name = record.text("creator_last_name")?;
        let orcid = record.opt_text("creator_orcid")?;
        let created = record.date("creation_date")?;
        let dimensions = common::read_dimensions(record, self.dimension_units)?;
        let object_reference = common::object_reference_id(record)?;
        let placements = common::placement_ids(record)?;
        let reference_organ = record.opt_iri("reference_organ")?;
        let representation_of = record
            .opt_string("representation_of")?
            .map(|id| Literal::plain(expand_anatomical_entity_id(&id, self.anatomy)));
        let extraction_set = record.opt_iri("extraction_set")?;
        let rui_rank = record.opt_integer("rui_rank")?;
        let (annotations, sex, side) = if self.extended_entity {
            (
                record.opt_strings("ccf_annotations")?,
                record.opt_text("sex")?,
                record.opt_text("side")?,
            )
        } else {
            (Vec::new(), None, None)
        };

        common::add_individual(graph, &subject, ccf::spatial_entity);
        graph.add_opt(&subject, ccf::title, label);
        graph.add(&subject, ccf::creator_first_name, first_name);
        graph.add(&subject, ccf::creator_last_name, last_name);
        graph.add_opt(&subject, ccf::creator_orcid, orcid);
        graph.add(&subject, ccf::creation_date, created);
        for annotation in common::literal_objects(annotations) {
            graph.add(&subject, ccf::in_proximity_of, annotation);
        }
        common::add_dimensions(graph, &subject, &dimensions, self.annotate_units);
        graph.add_opt(&subject, ccf::organ_owner_sex, sex);
        graph.add_opt(&subject, ccf::organ_side, side);

        graph.add_opt(&subject, ccf::has_object_reference, object_reference);
        common::add_links(graph, &subject, ccf::has_placement, &placements);
        graph.add_opt(&subject, ccf::has_reference_organ, reference_organ);
        graph.add_opt(&subject, ccf::representation_of, representation_of);
        graph.add_opt(&subject, ccf::belongs_to_extraction_set, extraction_set);
        graph.add_opt(&subject, ccf::rui_rank, rui_rank);
        Ok(subject)
    }

    fn add_object_reference(&self, graph: &mut Graph, record: &Record<'_>) -> Result<Node> {
        add_file_object_reference(graph, record)
    }

    fn add_placement(&self, graph: &mut Graph, record: &Record<'_>, parent: Option<&Node>) -> Result<Node> {
        let subject = record.subject()?;
        let target = super::placement_target(record, parent)?;
        let transform = common::Transform::read(record, UnitSource::Record)?;
        let placement_date = record.date("placement_date")?;

        common::add_individual(graph, &subject, ccf::spatial_placement);
        graph.add(&subject, ccf::creation_date, placement_date);
        graph.add(&subject, ccf::has_placement_target, target);
        transform.add(graph, &subject, self.annotate_units);
        Ok(subject)
    }
}

/// Object reference carrying both the file URL and its last path segment.
pub(crate) fn add_file_object_reference(graph: &mut Graph, record: &Record<'_>) -> Result<Node> {
    let subject = record.subject()?;
    let file_url = record.string("file")?;
    let file_format = record.text("file_format")?;
    let file_subpath = record.opt_text("file_subpath")?;
    let placement = common::object_placement_id(record)?;

    common::add_individual(graph, &subject, ccf::spatial_object_reference);
    graph.add(&subject, ccf::file_name, Literal::plain(file_name_from_url(&file_url)));
    graph.add(&subject, ccf::file_url, Literal::plain(file_url));
    graph.add(&subject, ccf::file_format, file_format);
    graph.add_opt(&subject, ccf::file_subpath, file_subpath);
    graph.add_opt(&subject, ccf::has_placement, placement);
    Ok(subject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordKind;
    use ccf_namespace::owl;
    use serde_json::{json, Value};

    fn entity() -> Value {
        json!({
            "@id": "#e1",
            "@type": "SpatialEntity",
            "creator_first_name": "Jane",
            "creator_last_name": "Doe",
            "creation_date": "2021-03-04",
            "x_dimension": 10, "y_dimension": 20, "z_dimension": 30,
            "dimension_units": "millimeter",
            "ccf_annotations": ["http://purl.obolibrary.org/obo/UBERON_0001225"],
            "sex": "Female",
            "side": "Left",
            "representation_of": "UBERON:0002113",
            "extraction_set": "#es1"
        })
    }

    fn add(mapper: SpatialMapper, value: &Value) -> (Graph, Node) {
        let record = Record::new(RecordKind::SpatialEntity, value).unwrap();
        let mut g = Graph::new();
        let subject = mapper.add_spatial_entity(&mut g, &record).unwrap();
        (g, subject)
    }

    #[test]
    fn v2_annotates_units_and_ignores_v3_fields() {
        let (g, s) = add(SpatialMapper::v2(AnatomyRewrite::Canonical), &entity());
        assert_eq!(g.instances_of(owl::Axiom).count(), 3);
        assert_eq!(g.count_predicate(ccf::in_proximity_of), 0);
        assert_eq!(g.count_predicate(ccf::organ_owner_sex), 0);
        assert!(g.contains(
            &s,
            ccf::representation_of,
            &Literal::plain("http://purl.obolibrary.org/obo/UBERON_0002113").into()
        ));
    }

    #[test]
    fn v3_maps_proximity_and_owner_fields_without_axioms() {
        let (g, s) = add(SpatialMapper::v3(AnatomyRewrite::Legacy), &entity());
        assert_eq!(g.instances_of(owl::Axiom).count(), 0);
        assert!(g.contains(
            &s,
            ccf::in_proximity_of,
            &Literal::plain("http://purl.obolibrary.org/obo/UBERON_0001225").into()
        ));
        assert!(g.contains(&s, ccf::organ_owner_sex, &Literal::plain("Female").into()));
        assert!(g.contains(&s, ccf::organ_side, &Literal::plain("Left").into()));
        // Legacy rewrite leaves a plain UBERON short form untouched.
        assert!(g.contains(&s, ccf::representation_of, &Literal::plain("UBERON:0002113").into()));
        assert!(g.contains(
            &s,
            ccf::belongs_to_extraction_set,
            &Node::iri("http://purl.org/ccf/latest/ccf.owl#es1").into()
        ));
    }

    #[test]
    fn v3_writes_millimeter_whatever_the_record_unit() {
        let mut value = entity();
        value["dimension_units"] = json!("centimeter");
        let (g, s) = add(SpatialMapper::v3(AnatomyRewrite::Legacy), &value);
        assert!(g.contains(&s, ccf::dimension_unit, &Literal::plain("millimeter").into()));
        assert_eq!(g.count_predicate(ccf::dimension_unit), 1);

        let (g, s) = add(SpatialMapper::v2(AnatomyRewrite::Legacy), &value);
        assert!(g.contains(&s, ccf::dimension_unit, &Literal::plain("centimeter").into()));
    }

    #[test]
    fn creator_names_and_dimension_units_are_required() {
        for field in ["creator_first_name", "creator_last_name", "dimension_units"] {
            let mut value = entity();
            value.as_object_mut().unwrap().remove(field);
            let record = Record::new(RecordKind::SpatialEntity, &value).unwrap();
            let mut g = Graph::new();
            let err = SpatialMapper::v3(AnatomyRewrite::Legacy)
                .add_spatial_entity(&mut g, &record)
                .unwrap_err();
            assert!(err.to_string().contains(field), "{err}");
            assert!(g.is_empty());
        }
    }

    #[test]
    fn object_reference_derives_file_name() {
        let value = json!({
            "@id": "#o1",
            "file": "https://example.org/models/VH_F_Kidney_L.glb",
            "file_format": "model/gltf-binary",
            "file_subpath": "Kidney_L",
            "placement": {"@id": "#o1_placement"}
        });
        let record = Record::new(RecordKind::SpatialObjectReference, &value).unwrap();
        let mut g = Graph::new();
        let s = SpatialMapper::v2(AnatomyRewrite::Canonical)
            .add_object_reference(&mut g, &record)
            .unwrap();
        assert!(g.contains(&s, ccf::file_name, &Literal::plain("VH_F_Kidney_L.glb").into()));
        assert!(g.contains(
            &s,
            ccf::file_url,
            &Literal::plain("https://example.org/models/VH_F_Kidney_L.glb").into()
        ));
        assert!(g.contains(
            &s,
            ccf::has_placement,
            &Node::iri("http://purl.org/ccf/latest/ccf.owl#o1_placement").into()
        ));
    }

    #[test]
    fn placement_takes_units_from_record() {
        let value = json!({
            "@id": "#p1",
            "target": "#VHFKidney",
            "placement_date": "2021-03-04",
            "x_scaling": 1, "y_scaling": 1, "z_scaling": 1, "scaling_units": "ratio",
            "x_rotation": 0, "y_rotation": 0, "z_rotation": 0, "rotation_units": "degree",
            "x_translation": 1, "y_translation": 2, "z_translation": 3,
            "translation_units": "centimeter"
        });
        let record = Record::new(RecordKind::SpatialPlacement, &value).unwrap();
        let mut g = Graph::new();
        let s = SpatialMapper::v3(AnatomyRewrite::Legacy)
            .add_placement(&mut g, &record, None)
            .unwrap();
        assert!(g.contains(&s, ccf::translation_unit, &Literal::plain("centimeter").into()));
        assert!(g.contains(&s, ccf::creation_date, &Literal::date("2021-03-04").into()));
        assert!(g.contains(
            &s,
            ccf::has_placement_target,
            &Node::iri("http://purl.org/ccf/latest/ccf.owl#VHFKidney").into()
        ));
    }

    #[test]
    fn declarations_differ_by_version() {
        let v2 = SpatialMapper::v2(AnatomyRewrite::Canonical).declarations();
        let v3 = SpatialMapper::v3(AnatomyRewrite::Legacy).declarations();
        assert!(v2.contains(&ccf::spatial_entity));
        assert!(!v3.contains(&ccf::spatial_entity));
        assert!(v3.contains(&ccf::in_proximity_of));
    }
}
