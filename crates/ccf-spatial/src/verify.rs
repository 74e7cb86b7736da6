//! Re-read written Turtle with an independent parser.
//!
//! Used after serialization to check that the document parses and carries
//! exactly the triples of the in-memory graph.

use anyhow::{anyhow, bail, Result};
use sophia::api::source::TripleSource;
use sophia::api::term::{Term, TermKind as SophiaTermKind};
use sophia::api::triple::Triple as _;
use std::collections::BTreeSet;

use ccf_namespace::xsd;

use crate::graph::{Graph, Literal, Node, Object, Triple};

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct VerifySinkError {
    message: String,
}

impl VerifySinkError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Parse a Turtle document into triples.
pub fn parse_turtle(text: &str) -> Result<Vec<Triple>> {
    let reader = std::io::BufReader::new(std::io::Cursor::new(text.as_bytes()));
    let mut out: Vec<Triple> = Vec::new();
    let mut parser = sophia::turtle::parser::turtle::parse_bufread(reader);
    parser
        .try_for_each_triple(|t| -> std::result::Result<(), VerifySinkError> {
            let subject = to_node(t.s())?;
            let Node::Iri(predicate) = to_node(t.p())? else {
                return Err(VerifySinkError::new("blank node in predicate position"));
            };
            let object = to_object(t.o())?;
            out.push(Triple {
                subject,
                predicate,
                object,
            });
            Ok(())
        })
        .map_err(|e| anyhow!("failed to parse Turtle: {e}"))?;
    Ok(out)
}

fn to_node<T: Term>(term: T) -> std::result::Result<Node, VerifySinkError> {
    match term.kind() {
        SophiaTermKind::Iri => term
            .iri()
            .map(|iri| Node::Iri(iri.as_str().to_string()))
            .ok_or_else(|| VerifySinkError::new("IRI term without an IRI")),
        SophiaTermKind::BlankNode => term
            .bnode_id()
            .map(|id| Node::Blank(id.as_str().to_string()))
            .ok_or_else(|| VerifySinkError::new("blank node without a label")),
        other => Err(VerifySinkError::new(format!("unexpected {other:?} in node position"))),
    }
}

fn to_object<T: Term>(term: T) -> std::result::Result<Object, VerifySinkError> {
    if term.kind() != SophiaTermKind::Literal {
        return to_node(term).map(Object::Node);
    }
    let lexical = term
        .lexical_form()
        .map(|lex| lex.to_string())
        .ok_or_else(|| VerifySinkError::new("literal without a lexical form"))?;
    let datatype = term
        .datatype()
        .map(|dt| dt.as_str().to_string())
        .filter(|dt| dt != xsd::string.iri());
    Ok(Object::Literal(Literal { lexical, datatype }))
}

/// Parse `text` and compare it against `graph`: same number of triples, and
/// every triple without blank nodes present verbatim. Blank node labels may
/// be renamed by the parser, so those triples are only counted.
///
/// Returns the number of parsed triples.
pub fn check_round_trip(graph: &Graph, text: &str) -> Result<usize> {
    let parsed = parse_turtle(text)?;
    let parsed_set: BTreeSet<&Triple> = parsed.iter().collect();

    if parsed_set.len() != graph.len() {
        bail!(
            "re-read {} distinct triples, expected {}",
            parsed_set.len(),
            graph.len()
        );
    }

    let missing = graph
        .iter()
        .filter(|t| !has_blank_node(t))
        .filter(|t| !parsed_set.contains(t))
        .count();
    if missing > 0 {
        bail!("{missing} triples did not survive the round trip");
    }
    Ok(parsed.len())
}

fn has_blank_node(triple: &Triple) -> bool {
    matches!(triple.subject, Node::Blank(_)) || matches!(triple.object, Object::Node(Node::Blank(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::digest_blank_node;
    use ccf_namespace::{ccf, owl, rdf};

    fn graph() -> Graph {
        let mut g = Graph::new();
        for ns in ccf_namespace::NAMESPACES {
            g.bind_namespace(ns);
        }
        let s = Node::iri("http://purl.org/ccf/latest/ccf.owl#es1");
        g.add(&s, rdf::type_, owl::NamedIndividual);
        g.add(&s, rdf::type_, ccf::extraction_set);
        g.add(&s, ccf::title, Literal::plain("Kidney \"Set\"\nline two"));
        g.add(&s, ccf::rui_rank, Literal::integer("1"));
        let axiom = digest_blank_node("axiom", &["es1"]);
        g.add(&axiom, rdf::type_, owl::Axiom);
        g.add(&axiom, owl::annotatedSource, &s);
        g
    }

    #[test]
    fn written_turtle_round_trips() {
        let g = graph();
        let text = crate::turtle::to_turtle(&g).unwrap();
        assert_eq!(check_round_trip(&g, &text).unwrap(), g.len());
    }

    #[test]
    fn parsed_literals_keep_datatypes() {
        let triples = parse_turtle(&crate::turtle::to_turtle(&graph()).unwrap()).unwrap();
        assert!(triples
            .iter()
            .any(|t| t.object == Object::Literal(Literal::integer("1"))));
        assert!(triples
            .iter()
            .any(|t| t.object == Object::Literal(Literal::plain("Kidney \"Set\"\nline two"))));
    }

    #[test]
    fn count_mismatch_is_reported() {
        let g = graph();
        let mut text = crate::turtle::to_turtle(&g).unwrap();
        text.push_str("<http://example.org/x> a <http://example.org/Y> .\n");
        assert!(check_round_trip(&g, &text).is_err());
    }

    #[test]
    fn spo_accessors_feed_the_conversion() {
        let triples = parse_turtle(
            "PREFIX ccf: <http://purl.org/ccf/>\n<http://purl.org/ccf/latest/ccf.owl#e1> ccf:x_dimension 12.0, 3.\n",
        )
        .unwrap();
        assert_eq!(triples.len(), 2);
        assert!(triples.iter().all(|t| t.predicate == ccf::x_dimension.iri()));
        assert!(triples
            .iter()
            .any(|t| t.object == Object::Literal(Literal::decimal("12"))));
    }

    #[test]
    fn malformed_turtle_is_an_error() {
        assert!(parse_turtle("<http://example.org/x> a .").is_err());
    }
}
