//! The ontology builder: one graph, grown by successive `mutate` calls.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ccf_namespace::{owl, rdf, NAMESPACES};
use serde_json::Value;

use crate::config::{OntologyConfig, UnknownTypePolicy};
use crate::error::{OntologyError, Result};
use crate::graph::{Graph, Node};
use crate::mapping::{common, mapper_for, RecordMapper};
use crate::record::{Record, RecordKind};
use crate::turtle;

/// Per-call counters, reported once the batch is done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub records: usize,
    pub skipped: usize,
    pub triples_added: usize,
}

pub struct SpatialOntology {
    iri: String,
    config: OntologyConfig,
    mapper: Box<dyn RecordMapper>,
    graph: Graph,
    last_batch: BatchStats,
}

impl std::fmt::Debug for SpatialOntology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialOntology")
            .field("iri", &self.iri)
            .field("config", &self.config)
            .field("triples", &self.graph.len())
            .finish()
    }
}

impl SpatialOntology {
    /// Empty ontology for the newest record schema.
    pub fn new(ontology_iri: &str) -> Result<Self> {
        Self::with_config(ontology_iri, OntologyConfig::default())
    }

    /// Ontology header plus the declaration axioms of the configured schema
    /// version. The IRI must be absolute.
    pub fn with_config(ontology_iri: &str, config: OntologyConfig) -> Result<Self> {
        url::Url::parse(ontology_iri).map_err(|e| OntologyError::InvalidOntologyIri {
            iri: ontology_iri.to_string(),
            reason: e.to_string(),
        })?;

        let mapper = mapper_for(&config);
        let mut graph = Graph::new();
        for ns in NAMESPACES {
            graph.bind_namespace(ns);
        }

        graph.add(Node::iri(ontology_iri), rdf::type_, owl::Ontology);
        common::declare(&mut graph, mapper.declarations());

        tracing::debug!(
            iri = ontology_iri,
            schema_version = %config.schema_version,
            triples = graph.len(),
            "created ontology"
        );

        Ok(Self {
            iri: ontology_iri.to_string(),
            config,
            mapper,
            graph,
            last_batch: BatchStats::default(),
        })
    }

    pub fn iri(&self) -> &str {
        &self.iri
    }

    pub fn config(&self) -> &OntologyConfig {
        &self.config
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Counters of the most recent `mutate` call.
    pub fn last_batch(&self) -> BatchStats {
        self.last_batch
    }

    /// Add the triples for one batch of records.
    ///
    /// Accepts a list of records, a `{"@graph": [...]}` document (donor
    /// records contribute their samples' `rui_location`), or a single record.
    /// On error the call stops at the failing record; triples of records
    /// processed before it stay in the graph.
    pub fn mutate(&mut self, data: &Value) -> Result<&mut Self> {
        let before = self.graph.len();
        self.last_batch = BatchStats::default();

        let outcome = match data {
            Value::Array(records) => self.add_records(records),
            Value::Object(fields) if fields.contains_key("@graph") => match &fields["@graph"] {
                Value::Array(records) => self.add_records(records),
                _ => Err(OntologyError::UnsupportedInput("`@graph` must be an array")),
            },
            Value::Object(fields) if fields.contains_key("@type") => self.add_record(data),
            Value::Object(_) => self.unrecognized(OntologyError::MissingTypeDiscriminator),
            _ => self.unrecognized(OntologyError::UnsupportedInput(
                "expected a record, a list of records or an `@graph` document",
            )),
        };

        self.last_batch.triples_added = self.graph.len() - before;
        match &outcome {
            Ok(()) => tracing::info!(
                records = self.last_batch.records,
                skipped = self.last_batch.skipped,
                triples_added = self.last_batch.triples_added,
                triples = self.graph.len(),
                "mutated ontology"
            ),
            Err(err) => tracing::warn!(
                error = %err,
                records = self.last_batch.records,
                triples_added = self.last_batch.triples_added,
                "mutation stopped at a failing record"
            ),
        }
        outcome.map(|()| self)
    }

    fn add_records(&mut self, records: &[Value]) -> Result<()> {
        records.iter().try_for_each(|record| self.add_record(record))
    }

    fn add_record(&mut self, value: &Value) -> Result<()> {
        let Some(discriminator) = value.get("@type") else {
            return self.unrecognized(OntologyError::MissingTypeDiscriminator);
        };
        let kind = discriminator
            .as_str()
            .and_then(RecordKind::from_discriminator)
            .filter(|kind| self.mapper.supports(*kind));
        let Some(kind) = kind else {
            return self.unrecognized(OntologyError::UnknownRecordType(discriminator_text(discriminator)));
        };

        let record = Record::new(kind, value)?;
        tracing::debug!(kind = kind.as_str(), id = record.raw_id(), "adding record");

        match kind {
            RecordKind::Donor => return self.add_donor(&record, value),
            RecordKind::SpatialEntity => self.add_spatial_entity(&record)?,
            RecordKind::SpatialObjectReference => {
                self.add_object_reference(&record)?;
            }
            RecordKind::SpatialPlacement => {
                self.mapper.add_placement(&mut self.graph, &record, None)?;
            }
            RecordKind::ExtractionSet => {
                self.mapper.add_extraction_set(&mut self.graph, &record)?;
            }
            RecordKind::RetiredSpatialEntity => {
                self.mapper.add_retired_entity(&mut self.graph, &record)?;
            }
        }
        self.last_batch.records += 1;
        Ok(())
    }

    /// The entity, then its object reference (and the placement nested in
    /// it), then the entity's own placements.
    fn add_spatial_entity(&mut self, record: &Record<'_>) -> Result<()> {
        let entity = self.mapper.add_spatial_entity(&mut self.graph, record)?;

        if let Some(object) = record.opt_nested("object", RecordKind::SpatialObjectReference)? {
            self.add_object_reference(&object)?;
        }
        for placement in record.nested_list("placement", RecordKind::SpatialPlacement)? {
            self.mapper.add_placement(&mut self.graph, &placement, Some(&entity))?;
        }
        Ok(())
    }

    fn add_object_reference(&mut self, record: &Record<'_>) -> Result<Node> {
        let object = self.mapper.add_object_reference(&mut self.graph, record)?;
        if let Some(placement) = record.opt_nested("placement", RecordKind::SpatialPlacement)? {
            self.mapper.add_placement(&mut self.graph, &placement, Some(&object))?;
        }
        Ok(object)
    }

    fn add_donor(&mut self, record: &Record<'_>, value: &Value) -> Result<()> {
        let samples = match value.get("samples") {
            None | Some(Value::Null) => return Ok(()),
            Some(Value::Array(samples)) => samples,
            Some(_) => {
                return Err(OntologyError::InvalidField {
                    record_type: RecordKind::Donor.as_str(),
                    id: record.raw_id().map(str::to_string),
                    field: "samples",
                    expected: "a list of samples",
                })
            }
        };

        for location in samples.iter().filter_map(rui_location) {
            self.add_record(location)?;
        }
        Ok(())
    }

    /// Apply the unknown-type policy to a record that cannot be mapped.
    fn unrecognized(&mut self, err: OntologyError) -> Result<()> {
        match self.config.unknown_type_policy() {
            UnknownTypePolicy::Reject => Err(err),
            UnknownTypePolicy::Skip => {
                tracing::warn!(reason = %err, "skipping record");
                self.last_batch.skipped += 1;
                Ok(())
            }
        }
    }

    /// Write the whole graph as Turtle to `destination`.
    pub fn serialize(&self, destination: impl AsRef<Path>) -> Result<()> {
        let destination = destination.as_ref();
        let mut out = BufWriter::new(File::create(destination)?);
        self.write_turtle(&mut out)?;
        out.flush()?;
        tracing::info!(
            path = %destination.display(),
            triples = self.graph.len(),
            "wrote ontology"
        );
        Ok(())
    }

    pub fn write_turtle<W: Write>(&self, out: &mut W) -> Result<()> {
        turtle::write_turtle(&self.graph, out)
    }

    pub fn to_turtle(&self) -> Result<String> {
        turtle::to_turtle(&self.graph)
    }
}

fn rui_location(sample: &Value) -> Option<&Value> {
    sample.get("rui_location").filter(|location| !location.is_null())
}

fn discriminator_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
