//! CCF spatial ontology builder.
//!
//! Turns spatial registration records (JSON-LD) into an OWL ontology graph
//! and writes it as Turtle:
//!
//! ```no_run
//! use ccf_spatial::SpatialOntology;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let records: serde_json::Value = serde_json::from_str(r##"[{
//!     "@id": "#es1", "@type": "ExtractionSet", "label": "Kidney Set",
//!     "extraction_set_for": "#VHMKidney", "rui_rank": 1
//! }]"##)?;
//!
//! let mut ontology = SpatialOntology::new("http://purl.org/ccf/ccf-spatial.owl")?;
//! ontology.mutate(&records)?;
//! ontology.serialize("ccf-spatial.ttl")?;
//! # Ok(())
//! # }
//! ```
//!
//! Records come in one of several schema versions (see [`SchemaVersion`]);
//! the version picked at construction decides the field mapping.

pub mod config;
pub mod error;
pub mod graph;
pub mod ids;
pub mod mapping;
pub mod ontology;
pub mod record;
pub mod turtle;
pub mod verify;

pub use config::{OntologyConfig, SchemaVersion, UnknownTypePolicy};
pub use error::{OntologyError, Result};
pub use graph::{Graph, Literal, Node, Object, Triple};
pub use ids::AnatomyRewrite;
pub use ontology::{BatchStats, SpatialOntology};
