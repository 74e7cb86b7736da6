//! Vocabulary tables for the CCF spatial ontology.
//!
//! Every term is a compile-time constant (`ccf::has_placement`,
//! `obo::UO_0000016`, `owl::NamedIndividual`, ...), so a misspelt name in
//! code is a build error rather than a wrong IRI in the output.
//!
//! The `ccf` table is the union of the vocabularies used by every supported
//! record schema version; each mapper picks the subset it emits.

use std::fmt;

/// OWL-level kind of a vocabulary term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TermKind {
    Class,
    ObjectProperty,
    DatatypeProperty,
    AnnotationProperty,
    /// RDF/RDFS/OWL/XSD built-ins: never declared by this crate's users.
    Builtin,
}

/// A named IRI inside a fixed namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Term {
    pub prefix: &'static str,
    pub name: &'static str,
    pub iri: &'static str,
    pub kind: TermKind,
}

impl Term {
    pub const fn iri(&self) -> &'static str {
        self.iri
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.iri)
    }
}

/// A prefix binding: the conventional prefix and its base IRI.
#[derive(Debug, Clone, Copy)]
pub struct Namespace {
    pub prefix: &'static str,
    pub base: &'static str,
}

macro_rules! vocabulary {
    ($prefix:literal, $base:literal; $( $kind:ident $name:ident $( as $local:literal )? ),* $(,)?) => {
        pub const PREFIX: &str = $prefix;
        pub const BASE: &str = $base;

        $( vocabulary!(@term $prefix, $base, $kind, $name $(, $local)?); )*

        pub const NAMESPACE: Namespace = Namespace {
            prefix: PREFIX,
            base: BASE,
        };
    };
    (@term $prefix:literal, $base:literal, $kind:ident, $name:ident) => {
        #[allow(non_upper_case_globals)]
        pub const $name: Term = Term {
            prefix: $prefix,
            name: stringify!($name),
            iri: concat!($base, stringify!($name)),
            kind: TermKind::$kind,
        };
    };
    (@term $prefix:literal, $base:literal, $kind:ident, $name:ident, $local:literal) => {
        #[allow(non_upper_case_globals)]
        pub const $name: Term = Term {
            prefix: $prefix,
            name: $local,
            iri: concat!($base, $local),
            kind: TermKind::$kind,
        };
    };
}

/// Domain vocabulary (`http://purl.org/ccf/`).
pub mod ccf {
    use super::{Namespace, Term, TermKind};

    vocabulary! {
        "ccf", "http://purl.org/ccf/";

        Class extraction_set,
        Class spatial_entity,
        Class spatial_object_reference,
        Class spatial_placement,
        Class retired_spatial_entity,

        ObjectProperty belongs_to_extraction_set,
        ObjectProperty has_extraction_set,
        ObjectProperty extraction_set_for,
        ObjectProperty is_placement_of,
        ObjectProperty has_placement_target,
        ObjectProperty placement_for,
        ObjectProperty placement_relative_to,
        ObjectProperty has_reference_organ,
        ObjectProperty has_object_reference,
        ObjectProperty has_placement,
        ObjectProperty collides_with,

        DatatypeProperty title,
        DatatypeProperty creator_first_name,
        DatatypeProperty creator_last_name,
        DatatypeProperty creator_orcid,
        DatatypeProperty creation_date,
        DatatypeProperty organ_owner_sex,
        DatatypeProperty organ_side,
        DatatypeProperty x_dimension,
        DatatypeProperty y_dimension,
        DatatypeProperty z_dimension,
        DatatypeProperty dimension_unit,
        DatatypeProperty x_scaling,
        DatatypeProperty y_scaling,
        DatatypeProperty z_scaling,
        DatatypeProperty scaling_unit,
        DatatypeProperty x_rotation,
        DatatypeProperty y_rotation,
        DatatypeProperty z_rotation,
        DatatypeProperty rotation_order,
        DatatypeProperty rotation_unit,
        DatatypeProperty x_translation,
        DatatypeProperty y_translation,
        DatatypeProperty z_translation,
        DatatypeProperty translation_unit,
        DatatypeProperty file_url,
        DatatypeProperty file_name,
        DatatypeProperty file_subpath,
        DatatypeProperty file_format,
        DatatypeProperty rui_rank,
        DatatypeProperty representation_of,
        DatatypeProperty in_proximity_of,

        AnnotationProperty unit_of_measurement,
    }

    /// Base used when expanding local `#id` identifiers.
    pub const INSTANCE_BASE: &str = "http://purl.org/ccf/latest/ccf.owl#";
}

/// Units of measurement (`http://purl.obolibrary.org/obo/`).
pub mod obo {
    use super::{Namespace, Term, TermKind};

    vocabulary! {
        "obo", "http://purl.obolibrary.org/obo/";

        Class UO_0000016, // millimeter
        Class UO_0000185, // degree
        Class UO_0010006, // ratio
    }
}

pub mod rdf {
    use super::{Namespace, Term, TermKind};

    vocabulary! {
        "rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

        Builtin type_ as "type",
    }
}

pub mod rdfs {
    use super::{Namespace, Term, TermKind};

    vocabulary! {
        "rdfs", "http://www.w3.org/2000/01/rdf-schema#";

        Builtin subClassOf,
    }
}

pub mod owl {
    use super::{Namespace, Term, TermKind};

    vocabulary! {
        "owl", "http://www.w3.org/2002/07/owl#";

        Builtin Ontology,
        Builtin NamedIndividual,
        Builtin Class,
        Builtin ObjectProperty,
        Builtin DatatypeProperty,
        Builtin AnnotationProperty,
        Builtin Axiom,
        Builtin annotatedSource,
        Builtin annotatedProperty,
        Builtin annotatedTarget,
        Builtin Restriction,
        Builtin onProperty,
        Builtin someValuesFrom,
        Builtin equivalentClass,
    }
}

pub mod xsd {
    use super::{Namespace, Term, TermKind};

    vocabulary! {
        "xsd", "http://www.w3.org/2001/XMLSchema#";

        Builtin string,
        Builtin integer,
        Builtin decimal,
        Builtin date,
    }
}

pub mod dc {
    use super::{Namespace, Term, TermKind};

    vocabulary! {
        "dc", "http://purl.org/dc/elements/1.1/";

        AnnotationProperty creator,
    }
}

pub mod dcterms {
    use super::{Namespace, Term, TermKind};

    vocabulary! {
        "dcterms", "http://purl.org/dc/terms/";

        AnnotationProperty created,
    }
}

/// Every namespace this crate knows, in prefix-binding order.
pub const NAMESPACES: &[Namespace] = &[
    ccf::NAMESPACE,
    obo::NAMESPACE,
    rdf::NAMESPACE,
    rdfs::NAMESPACE,
    owl::NAMESPACE,
    xsd::NAMESPACE,
    dc::NAMESPACE,
    dcterms::NAMESPACE,
];

/// Measurement units that appear as literal tags and as unit axioms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Millimeter,
    Degree,
    Ratio,
}

impl Unit {
    pub const fn label(self) -> &'static str {
        match self {
            Unit::Millimeter => "millimeter",
            Unit::Degree => "degree",
            Unit::Ratio => "ratio",
        }
    }

    pub const fn term(self) -> Term {
        match self {
            Unit::Millimeter => obo::UO_0000016,
            Unit::Degree => obo::UO_0000185,
            Unit::Ratio => obo::UO_0010006,
        }
    }
}
