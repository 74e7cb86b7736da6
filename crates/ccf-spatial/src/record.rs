//! Typed field access over one JSON record.
//!
//! Required accessors fail with `MissingField` when the field is absent or
//! `null`. Optional accessors return `Ok(None)` in that case; a present but
//! malformed value is still an error.

use serde_json::{Map, Value};

use crate::error::{OntologyError, Result};
use crate::graph::{Literal, Node};
use crate::ids::expand_instance_id;

/// Record type discriminators (`@type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    SpatialEntity,
    SpatialPlacement,
    SpatialObjectReference,
    ExtractionSet,
    RetiredSpatialEntity,
    Donor,
}

impl RecordKind {
    pub fn from_discriminator(s: &str) -> Option<Self> {
        match s {
            "SpatialEntity" => Some(RecordKind::SpatialEntity),
            "SpatialPlacement" => Some(RecordKind::SpatialPlacement),
            "SpatialObjectReference" => Some(RecordKind::SpatialObjectReference),
            "ExtractionSet" => Some(RecordKind::ExtractionSet),
            "RetiredSpatialEntity" => Some(RecordKind::RetiredSpatialEntity),
            "Donor" => Some(RecordKind::Donor),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::SpatialEntity => "SpatialEntity",
            RecordKind::SpatialPlacement => "SpatialPlacement",
            RecordKind::SpatialObjectReference => "SpatialObjectReference",
            RecordKind::ExtractionSet => "ExtractionSet",
            RecordKind::RetiredSpatialEntity => "RetiredSpatialEntity",
            RecordKind::Donor => "Donor",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    kind: RecordKind,
    fields: &'a Map<String, Value>,
}

impl<'a> Record<'a> {
    /// Wrap `value` as a record of `kind`. Non-objects are rejected.
    pub fn new(kind: RecordKind, value: &'a Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { kind, fields }),
            _ => Err(OntologyError::InvalidField {
                record_type: kind.as_str(),
                id: None,
                field: "(record)",
                expected: "a JSON object",
            }),
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Raw `@id`, for diagnostics.
    pub fn raw_id(&self) -> Option<&'a str> {
        self.fields.get("@id").and_then(Value::as_str)
    }

    pub fn has(&self, field: &str) -> bool {
        self.value(field).is_some()
    }

    fn value(&self, field: &str) -> Option<&'a Value> {
        self.fields.get(field).filter(|v| !v.is_null())
    }

    fn required(&self, field: &'static str) -> Result<&'a Value> {
        self.value(field).ok_or_else(|| OntologyError::MissingField {
            record_type: self.kind.as_str(),
            id: self.raw_id().map(str::to_string),
            field,
        })
    }

    fn invalid(&self, field: &'static str, expected: &'static str) -> OntologyError {
        OntologyError::InvalidField {
            record_type: self.kind.as_str(),
            id: self.raw_id().map(str::to_string),
            field,
            expected,
        }
    }

    fn scalar(&self, field: &'static str, value: &Value) -> Result<String> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            _ => Err(self.invalid(field, "a string or number")),
        }
    }

    pub fn string(&self, field: &'static str) -> Result<String> {
        let value = self.required(field)?;
        self.scalar(field, value)
    }

    pub fn opt_string(&self, field: &'static str) -> Result<Option<String>> {
        self.value(field).map(|v| self.scalar(field, v)).transpose()
    }

    pub fn text(&self, field: &'static str) -> Result<Literal> {
        self.string(field).map(Literal::plain)
    }

    pub fn opt_text(&self, field: &'static str) -> Result<Option<Literal>> {
        Ok(self.opt_string(field)?.map(Literal::plain))
    }

    pub fn decimal(&self, field: &'static str) -> Result<Literal> {
        self.string(field).map(Literal::decimal)
    }

    pub fn integer(&self, field: &'static str) -> Result<Literal> {
        self.string(field).map(Literal::integer)
    }

    pub fn opt_integer(&self, field: &'static str) -> Result<Option<Literal>> {
        Ok(self.opt_string(field)?.map(Literal::integer))
    }

    pub fn date(&self, field: &'static str) -> Result<Literal> {
        self.string(field).map(Literal::date)
    }

    /// Identifier field expanded into an IRI node.
    pub fn iri(&self, field: &'static str) -> Result<Node> {
        Ok(Node::iri(expand_instance_id(&self.string(field)?)))
    }

    pub fn opt_iri(&self, field: &'static str) -> Result<Option<Node>> {
        Ok(self
            .opt_string(field)?
            .map(|id| Node::iri(expand_instance_id(&id))))
    }

    /// The record's own subject IRI.
    pub fn subject(&self) -> Result<Node> {
        self.iri("@id")
    }

    /// A list of scalars; a single scalar counts as a one-element list.
    pub fn opt_strings(&self, field: &'static str) -> Result<Vec<String>> {
        match self.value(field) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .filter(|v| !v.is_null())
                .map(|v| self.scalar(field, v))
                .collect(),
            Some(other) => Ok(vec![self.scalar(field, other)?]),
        }
    }

    /// Nested record (an inline JSON object).
    pub fn opt_nested(&self, field: &'static str, kind: RecordKind) -> Result<Option<Record<'a>>> {
        match self.value(field) {
            None => Ok(None),
            Some(v @ Value::Object(_)) => Record::new(kind, v).map(Some),
            Some(_) => Err(self.invalid(field, "a JSON object")),
        }
    }

    /// Nested records given either as one object or as a list of objects.
    pub fn nested_list(&self, field: &'static str, kind: RecordKind) -> Result<Vec<Record<'a>>> {
        match self.value(field) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .filter(|v| !v.is_null())
                .map(|v| Record::new(kind, v).map_err(|_| self.invalid(field, "JSON objects")))
                .collect(),
            Some(v @ Value::Object(_)) => Ok(vec![Record::new(kind, v)?]),
            Some(_) => Err(self.invalid(field, "a JSON object or a list of objects")),
        }
    }
}
