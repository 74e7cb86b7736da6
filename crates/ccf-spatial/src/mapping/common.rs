//! Emission helpers shared by the record mappers.

use ccf_namespace::{ccf, owl, rdf, Term, TermKind, Unit};

use crate::error::Result;
use crate::graph::{digest_blank_node, Graph, Literal, Node, Object};
use crate::record::{Record, RecordKind};

/// Where unit tags come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSource {
    /// Fixed tags (`millimeter`, `degree`, `ratio`).
    Constant,
    /// `*_units` fields of the record (required).
    Record,
    /// The `*_units` field is required but the fixed tag is written.
    Checked,
}

/// One declaration triple per term, typed by its OWL kind.
pub fn declare(graph: &mut Graph, terms: &[Term]) {
    for term in terms {
        let kind = match term.kind {
            TermKind::Class => owl::Class,
            TermKind::ObjectProperty => owl::ObjectProperty,
            TermKind::DatatypeProperty => owl::DatatypeProperty,
            TermKind::AnnotationProperty => owl::AnnotationProperty,
            TermKind::Builtin => continue,
        };
        graph.add(*term, rdf::type_, kind);
    }
}

/// `subject a owl:NamedIndividual, <class>`.
pub fn add_individual(graph: &mut Graph, subject: &Node, class: Term) {
    graph.add(subject, rdf::type_, owl::NamedIndividual);
    graph.add(subject, rdf::type_, class);
}

/// Add a measurement; with `unit` also an `owl:Axiom` annotating that exact
/// assertion with its unit of measurement.
pub fn add_measurement(graph: &mut Graph, subject: &Node, property: Term, value: &Literal, unit: Option<Unit>) {
    graph.add(subject, property, value.clone());

    let Some(unit) = unit else {
        return;
    };
    let subject_key = match subject {
        Node::Iri(iri) => iri.as_str(),
        Node::Blank(label) => label.as_str(),
    };
    let axiom = digest_blank_node(
        "axiom",
        &[subject_key, property.iri(), &value.lexical, unit.term().iri()],
    );
    graph.add(&axiom, rdf::type_, owl::Axiom);
    graph.add(&axiom, owl::annotatedSource, subject);
    graph.add(&axiom, owl::annotatedProperty, property);
    graph.add(&axiom, owl::annotatedTarget, value.clone());
    graph.add(&axiom, ccf::unit_of_measurement, unit.term());
}

/// An x/y/z triple of decimal values with its unit tag.
#[derive(Debug, Clone)]
pub struct Vector3 {
    pub values: [Literal; 3],
    pub unit_tag: Literal,
}

impl Vector3 {
    pub fn read(
        record: &Record<'_>,
        fields: [&'static str; 3],
        unit_field: &'static str,
        unit: Unit,
        source: UnitSource,
    ) -> Result<Self> {
        let values = [
            record.decimal(fields[0])?,
            record.decimal(fields[1])?,
            record.decimal(fields[2])?,
        ];
        let unit_tag = match source {
            UnitSource::Constant => Literal::plain(unit.label()),
            UnitSource::Record => record.text(unit_field)?,
            UnitSource::Checked => {
                record.text(unit_field)?;
                Literal::plain(unit.label())
            }
        };
        Ok(Self { values, unit_tag })
    }

    pub fn add(
        &self,
        graph: &mut Graph,
        subject: &Node,
        properties: [Term; 3],
        unit_property: Term,
        annotate: Option<Unit>,
    ) {
        for (property, value) in properties.into_iter().zip(&self.values) {
            add_measurement(graph, subject, property, value, annotate);
        }
        graph.add(subject, unit_property, self.unit_tag.clone());
    }
}

pub fn read_dimensions(record: &Record<'_>, source: UnitSource) -> Result<Vector3> {
    Vector3::read(
        record,
        ["x_dimension", "y_dimension", "z_dimension"],
        "dimension_units",
        Unit::Millimeter,
        source,
    )
}

pub fn add_dimensions(graph: &mut Graph, subject: &Node, dimensions: &Vector3, annotate: bool) {
    dimensions.add(
        graph,
        subject,
        [ccf::x_dimension, ccf::y_dimension, ccf::z_dimension],
        ccf::dimension_unit,
        annotate.then_some(Unit::Millimeter),
    );
}

/// Scale, rotation and translation of a placement.
#[derive(Debug, Clone)]
pub struct Transform {
    pub scaling: Vector3,
    pub rotation: Vector3,
    pub rotation_order: Option<Literal>,
    pub translation: Vector3,
}

impl Transform {
    pub fn read(record: &Record<'_>, source: UnitSource) -> Result<Self> {
        Ok(Self {
            scaling: Vector3::read(
                record,
                ["x_scaling", "y_scaling", "z_scaling"],
                "scaling_units",
                Unit::Ratio,
                source,
            )?,
            rotation: Vector3::read(
                record,
                ["x_rotation", "y_rotation", "z_rotation"],
                "rotation_units",
                Unit::Degree,
                source,
            )?,
            rotation_order: record.opt_text("rotation_order")?,
            translation: Vector3::read(
                record,
                ["x_translation", "y_translation", "z_translation"],
                "translation_units",
                Unit::Millimeter,
                source,
            )?,
        })
    }

    pub fn add(&self, graph: &mut Graph, subject: &Node, annotate: bool) {
        self.scaling.add(
            graph,
            subject,
            [ccf::x_scaling, ccf::y_scaling, ccf::z_scaling],
            ccf::scaling_unit,
            annotate.then_some(Unit::Ratio),
        );
        self.rotation.add(
            graph,
            subject,
            [ccf::x_rotation, ccf::y_rotation, ccf::z_rotation],
            ccf::rotation_unit,
            annotate.then_some(Unit::Degree),
        );
        graph.add_opt(subject, ccf::rotation_order, self.rotation_order.clone());
        self.translation.add(
            graph,
            subject,
            [ccf::x_translation, ccf::y_translation, ccf::z_translation],
            ccf::translation_unit,
            annotate.then_some(Unit::Millimeter),
        );
    }
}

/// IRI of the inline `object` reference, if any.
pub fn object_reference_id(record: &Record<'_>) -> Result<Option<Node>> {
    record
        .opt_nested("object", RecordKind::SpatialObjectReference)?
        .map(|object| object.subject())
        .transpose()
}

/// IRIs of the inline placement(s), one object or a list.
pub fn placement_ids(record: &Record<'_>) -> Result<Vec<Node>> {
    record
        .nested_list("placement", RecordKind::SpatialPlacement)?
        .iter()
        .map(Record::subject)
        .collect()
}

/// IRI of the single placement nested in an object reference, if any.
pub fn object_placement_id(record: &Record<'_>) -> Result<Option<Node>> {
    record
        .opt_nested("placement", RecordKind::SpatialPlacement)?
        .map(|placement| placement.subject())
        .transpose()
}

pub fn add_links(graph: &mut Graph, subject: &Node, property: Term, targets: &[Node]) {
    for target in targets {
        graph.add(subject, property, target);
    }
}

/// ExtractionSet: identical in every schema version.
pub fn add_extraction_set(graph: &mut Graph, record: &Record<'_>) -> Result<Node> {
    let subject = record.subject()?;
    let title = record.text("label")?;
    let reference_organ = record.iri("extraction_set_for")?;
    let rui_rank = record.integer("rui_rank")?;

    add_individual(graph, &subject, ccf::extraction_set);
    graph.add(&subject, ccf::title, title);
    graph.add(&subject, ccf::extraction_set_for, reference_organ);
    graph.add(&subject, ccf::rui_rank, rui_rank);
    Ok(subject)
}

pub fn literal_objects(values: Vec<String>) -> Vec<Object> {
    values.into_iter().map(|v| Object::Literal(Literal::plain(v))).collect()
}
