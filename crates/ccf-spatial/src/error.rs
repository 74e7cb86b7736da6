pub type Result<T, E = OntologyError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum OntologyError {
    #[error("{record_type} {} is missing required field `{field}`", display_id(.id))]
    MissingField {
        record_type: &'static str,
        id: Option<String>,
        field: &'static str,
    },

    #[error("{record_type} {} has an invalid `{field}`: expected {expected}", display_id(.id))]
    InvalidField {
        record_type: &'static str,
        id: Option<String>,
        field: &'static str,
        expected: &'static str,
    },

    #[error("record has no `@type` discriminator")]
    MissingTypeDiscriminator,

    #[error("unrecognized record type `{0}`")]
    UnknownRecordType(String),

    #[error("unsupported input shape: {0}")]
    UnsupportedInput(&'static str),

    #[error("invalid ontology IRI `{iri}`: {reason}")]
    InvalidOntologyIri { iri: String, reason: String },

    /// An IRI or blank node label that Turtle cannot express.
    #[error("cannot write `{term}` as Turtle: {reason}")]
    UnwritableTerm { term: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_id(id: &Option<String>) -> String {
    match id {
        Some(id) => format!("`{id}`"),
        None => "(no @id)".to_string(),
    }
}
