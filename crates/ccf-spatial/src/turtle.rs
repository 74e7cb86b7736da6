//! Turtle output through sophia's pretty serializer.
//!
//! The prefix map is the graph's bindings narrowed to the ones some written
//! IRI falls under, sorted by prefix. Subjects come out grouped, `rdf:type`
//! first (written `a`); blank nodes referenced once are written inline.

use std::fmt::Display;
use std::io;

use sophia::api::prefix::{Prefix, PrefixMapPair};
use sophia::api::serializer::TripleSerializer;
use sophia::api::source::StreamError;
use sophia::api::term::{BnodeId, SimpleTerm};
use sophia::api::MownStr;
use sophia::iri::{Iri, IriRef};
use sophia::turtle::serializer::turtle::{TurtleConfig, TurtleSerializer};

use ccf_namespace::{rdf, xsd};

use crate::error::{OntologyError, Result};
use crate::graph::{Graph, Literal, Node, Object};

type SophiaTriple = [SimpleTerm<'static>; 3];

pub fn write_turtle<W: io::Write>(graph: &Graph, out: W) -> Result<()> {
    let triples = graph
        .iter()
        .map(|t| -> Result<SophiaTriple> {
            Ok([
                node_term(&t.subject)?,
                iri_term(&t.predicate)?,
                object_term(&t.object)?,
            ])
        })
        .collect::<Result<Vec<_>>>()?;

    let config = TurtleConfig::new()
        .with_pretty(true)
        .with_own_prefix_map(prefix_map(graph)?);
    TurtleSerializer::new_with_config(out, config)
        .serialize_graph(&triples)
        .map_err(|err| match err {
            StreamError::SourceError(never) => match never {},
            StreamError::SinkError(err) => OntologyError::Io(err),
        })?;
    Ok(())
}

pub fn to_turtle(graph: &Graph) -> Result<String> {
    let mut buf = Vec::new();
    write_turtle(graph, &mut buf)?;
    String::from_utf8(buf).map_err(|e| OntologyError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

fn prefix_map(graph: &Graph) -> Result<Vec<PrefixMapPair>> {
    let mut bindings: Vec<(&str, &str)> = graph
        .prefixes()
        .filter(|(_, base)| written_iris(graph).any(|iri| iri.len() > base.len() && iri.starts_with(base)))
        .collect();
    bindings.sort_unstable();

    bindings
        .into_iter()
        .map(|(prefix, base)| {
            let p = Prefix::new(Box::<str>::from(prefix)).map_err(|e| unwritable(prefix, e))?;
            let ns = Iri::new(Box::<str>::from(base)).map_err(|e| unwritable(base, e))?;
            Ok((p, ns))
        })
        .collect()
}

/// IRIs that appear in the text: `rdf:type` is written `a`, and `xsd:string`
/// is never written.
fn written_iris(graph: &Graph) -> impl Iterator<Item = &str> {
    graph.iter().flat_map(|t| {
        let predicate = (t.predicate != rdf::type_.iri()).then_some(t.predicate.as_str());
        let object = match &t.object {
            Object::Node(node) => node.as_iri(),
            Object::Literal(literal) => literal.datatype.as_deref(),
        };
        [t.subject.as_iri(), predicate, object].into_iter().flatten()
    })
}

fn iri_ref(iri: &str) -> Result<IriRef<MownStr<'static>>> {
    // Relative references would be resolved against the reader's base.
    Iri::new(iri).map_err(|e| unwritable(iri, e))?;
    IriRef::new(MownStr::from(iri.to_string())).map_err(|e| unwritable(iri, e))
}

fn iri_term(iri: &str) -> Result<SimpleTerm<'static>> {
    iri_ref(iri).map(SimpleTerm::Iri)
}

fn node_term(node: &Node) -> Result<SimpleTerm<'static>> {
    match node {
        Node::Iri(iri) => iri_term(iri),
        Node::Blank(label) => BnodeId::new(MownStr::from(label.clone()))
            .map(SimpleTerm::BlankNode)
            .map_err(|e| unwritable(label, e)),
    }
}

fn object_term(object: &Object) -> Result<SimpleTerm<'static>> {
    match object {
        Object::Node(node) => node_term(node),
        Object::Literal(literal) => literal_term(literal),
    }
}

fn literal_term(literal: &Literal) -> Result<SimpleTerm<'static>> {
    let datatype = iri_ref(literal.datatype.as_deref().unwrap_or(xsd::string.iri()))?;
    Ok(SimpleTerm::LiteralDatatype(
        MownStr::from(literal.lexical.clone()),
        datatype,
    ))
}

fn unwritable(term: &str, reason: impl Display) -> OntologyError {
    OntologyError::UnwritableTerm {
        term: term.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccf_namespace::{ccf, owl};

    fn sample_graph() -> Graph {
        let mut g = Graph::new();
        g.bind_namespace(&ccf::NAMESPACE);
        g.bind_namespace(&owl::NAMESPACE);
        g.bind_namespace(&xsd::NAMESPACE);
        g.bind_namespace(&rdf::NAMESPACE);
        g
    }

    #[test]
    fn writes_only_used_prefixes() {
        let mut g = sample_graph();
        g.add(Node::iri("http://example.org/o"), rdf::type_, owl::Ontology);
        assert_eq!(
            to_turtle(&g).unwrap(),
            "PREFIX owl: <http://www.w3.org/2002/07/owl#>\n\n<http://example.org/o> a owl:Ontology.\n"
        );
    }

    #[test]
    fn groups_predicates_and_puts_type_first() {
        let mut g = sample_graph();
        let s = Node::iri("http://purl.org/ccf/latest/ccf.owl#es1");
        g.add(&s, ccf::title, Literal::plain("Kidney \"Set\""));
        g.add(&s, rdf::type_, owl::NamedIndividual);
        g.add(&s, rdf::type_, ccf::extraction_set);
        g.add(&s, ccf::rui_rank, Literal::integer("1"));
        g.add(&s, ccf::x_dimension, Literal::decimal("10"));

        let ttl = to_turtle(&g).unwrap();
        assert!(ttl.contains("\n<http://purl.org/ccf/latest/ccf.owl#es1> a "), "{ttl}");
        assert!(ttl.contains("ccf:extraction_set"), "{ttl}");
        assert!(ttl.contains("ccf:title \"Kidney \\\"Set\\\"\""), "{ttl}");
        assert!(ttl.contains("ccf:rui_rank 1"), "{ttl}");
        assert!(ttl.contains("ccf:x_dimension 10.0"), "{ttl}");
        assert!(!ttl.contains("PREFIX rdf:"), "{ttl}");
        assert!(ttl.trim_end().ends_with('.'), "{ttl}");
    }

    #[test]
    fn typed_literals_use_the_xsd_prefix() {
        let mut g = sample_graph();
        let s = Node::iri("http://purl.org/ccf/latest/ccf.owl#e1");
        g.add(&s, ccf::creation_date, Literal::date("2022-02-02"));
        let ttl = to_turtle(&g).unwrap();
        assert!(ttl.contains("PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>"), "{ttl}");
        assert!(ttl.contains("\"2022-02-02\"^^xsd:date"), "{ttl}");
    }

    #[test]
    fn iris_that_are_not_absolute_are_rejected() {
        let mut g = sample_graph();
        g.add(Node::iri("http://example.org/a b"), rdf::type_, owl::NamedIndividual);
        assert!(matches!(
            to_turtle(&g),
            Err(OntologyError::UnwritableTerm { ref term, .. }) if term == "http://example.org/a b"
        ));

        let mut g = sample_graph();
        g.add(Node::iri("VHMKidney"), rdf::type_, owl::NamedIndividual);
        assert!(matches!(to_turtle(&g), Err(OntologyError::UnwritableTerm { .. })));
    }

    #[test]
    fn blank_node_subjects_are_written_anonymously() {
        let mut g = sample_graph();
        g.add(Node::Blank("axiom0001".into()), rdf::type_, owl::Axiom);
        assert!(to_turtle(&g).unwrap().contains("[] a owl:Axiom."));
    }

    #[test]
    fn empty_graph_writes_nothing() {
        assert_eq!(to_turtle(&Graph::new()).unwrap(), "");
    }
}
