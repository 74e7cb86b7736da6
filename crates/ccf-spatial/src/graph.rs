//! In-memory RDF graph.
//!
//! A set of triples (re-adding a triple is a no-op) plus the prefix bindings
//! used when writing Turtle. Ordering is total, so iteration and
//! serialization are deterministic.

use ccf_namespace::{xsd, Namespace, Term};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    Iri(String),
    Blank(String),
}

impl Node {
    pub fn iri(iri: impl Into<String>) -> Self {
        Node::Iri(iri.into())
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Node::Iri(iri) => Some(iri),
            Node::Blank(_) => None,
        }
    }
}

impl From<Term> for Node {
    fn from(term: Term) -> Self {
        Node::Iri(term.iri().to_string())
    }
}

impl From<&Node> for Node {
    fn from(node: &Node) -> Self {
        node.clone()
    }
}

/// A literal; `datatype: None` is a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub lexical: String,
    pub datatype: Option<String>,
}

impl Literal {
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
        }
    }

    pub fn typed(lexical: impl Into<String>, datatype: Term) -> Self {
        let datatype = (datatype != xsd::string).then(|| datatype.iri().to_string());
        Self {
            lexical: lexical.into(),
            datatype,
        }
    }

    pub fn integer(lexical: impl Into<String>) -> Self {
        Self::typed(lexical, xsd::integer)
    }

    /// Integer-shaped values get a `.0` so the lexical form is the
    /// canonical `xsd:decimal` one (`12` and `12.0` are the same value).
    pub fn decimal(lexical: impl Into<String>) -> Self {
        let mut lexical = lexical.into();
        let digits = lexical.strip_prefix(['+', '-']).unwrap_or(&lexical);
        let whole = !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit());
        if whole {
            lexical.push_str(".0");
        }
        Self::typed(lexical, xsd::decimal)
    }

    pub fn date(lexical: impl Into<String>) -> Self {
        Self::typed(lexical, xsd::date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Object {
    Node(Node),
    Literal(Literal),
}

impl From<Node> for Object {
    fn from(node: Node) -> Self {
        Object::Node(node)
    }
}

impl From<&Node> for Object {
    fn from(node: &Node) -> Self {
        Object::Node(node.clone())
    }
}

impl From<Literal> for Object {
    fn from(literal: Literal) -> Self {
        Object::Literal(literal)
    }
}

impl From<Term> for Object {
    fn from(term: Term) -> Self {
        Object::Node(term.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    pub subject: Node,
    pub predicate: String,
    pub object: Object,
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: BTreeSet<Triple>,
    prefixes: BTreeMap<String, String>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` to `base` for serialization. Rebinding replaces.
    pub fn bind(&mut self, prefix: &str, base: &str) {
        self.prefixes.insert(prefix.to_string(), base.to_string());
    }

    pub fn bind_namespace(&mut self, ns: &Namespace) {
        self.bind(ns.prefix, ns.base);
    }

    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, b)| (p.as_str(), b.as_str()))
    }

    /// Add one triple. Returns `false` if it was already present.
    ///
    /// Predicates are vocabulary terms, so an undefined property cannot be
    /// written at all.
    pub fn add(&mut self, subject: impl Into<Node>, predicate: Term, object: impl Into<Object>) -> bool {
        self.insert(Triple {
            subject: subject.into(),
            predicate: predicate.iri().to_string(),
            object: object.into(),
        })
    }

    pub fn add_opt<O: Into<Object>>(&mut self, subject: &Node, predicate: Term, object: Option<O>) -> bool {
        match object {
            Some(object) => self.add(subject, predicate, object),
            None => false,
        }
    }

    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn contains(&self, subject: &Node, predicate: Term, object: &Object) -> bool {
        self.triples.contains(&Triple {
            subject: subject.clone(),
            predicate: predicate.iri().to_string(),
            object: object.clone(),
        })
    }

    /// Objects of `(subject, predicate, ?)`.
    pub fn objects<'a>(&'a self, subject: &'a Node, predicate: Term) -> impl Iterator<Item = &'a Object> + 'a {
        self.triples
            .iter()
            .filter(move |t| &t.subject == subject && t.predicate == predicate.iri())
            .map(|t| &t.object)
    }

    /// Subjects of `(?, rdf:type, class)`.
    pub fn instances_of(&self, class: Term) -> impl Iterator<Item = &Node> + '_ {
        let class = Object::from(class);
        self.triples
            .iter()
            .filter(move |t| t.predicate == ccf_namespace::rdf::type_.iri() && t.object == class)
            .map(|t| &t.subject)
    }

    pub fn count_predicate(&self, predicate: Term) -> usize {
        self.triples
            .iter()
            .filter(|t| t.predicate == predicate.iri())
            .count()
    }
}

/// Deterministic blank node whose label is an FNV-1a digest of `parts`.
///
/// The same content always yields the same node, so re-adding an axiom for
/// an existing assertion does not create a second one.
pub fn digest_blank_node(kind: &str, parts: &[&str]) -> Node {
    const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x00000100000001b3;

    let mut hash = FNV_OFFSET_BASIS;
    for part in parts {
        // NUL separator keeps ["ab", "c"] and ["a", "bc"] apart.
        for b in part.bytes().chain([0u8]) {
            hash ^= b as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    }

    Node::Blank(format!("{kind}{hash:016x}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccf_namespace::{ccf, owl, rdf};

    #[test]
    fn triples_are_a_set() {
        let mut g = Graph::new();
        let s = Node::iri("http://example.org/s");
        assert!(g.add(&s, rdf::type_, owl::NamedIndividual));
        assert!(!g.add(&s, rdf::type_, owl::NamedIndividual));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn add_opt_skips_none() {
        let mut g = Graph::new();
        let s = Node::iri("http://example.org/s");
        assert!(!g.add_opt::<Literal>(&s, ccf::title, None));
        assert!(g.add_opt(&s, ccf::title, Some(Literal::plain("t"))));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn xsd_string_literal_is_plain() {
        assert_eq!(Literal::typed("a", xsd::string), Literal::plain("a"));
        assert_eq!(
            Literal::integer("1").datatype.as_deref(),
            Some("http://www.w3.org/2001/XMLSchema#integer")
        );
    }

    #[test]
    fn decimals_always_carry_a_fraction() {
        assert_eq!(Literal::decimal("12").lexical, "12.0");
        assert_eq!(Literal::decimal("-4").lexical, "-4.0");
        assert_eq!(Literal::decimal("890.25").lexical, "890.25");
        assert_eq!(Literal::decimal("1e-5").lexical, "1e-5");
    }

    #[test]
    fn digest_blank_nodes_are_stable_and_distinct() {
        let a = digest_blank_node("axiom", &["s", "p", "1"]);
        let b = digest_blank_node("axiom", &["s", "p", "1"]);
        let c = digest_blank_node("axiom", &["s", "p1", ""]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(matches!(a, Node::Blank(ref label) if label.starts_with("axiom")));
    }

    #[test]
    fn queries_by_type_and_predicate() {
        let mut g = Graph::new();
        let s = Node::iri("http://example.org/s");
        g.add(&s, rdf::type_, ccf::spatial_entity);
        g.add(&s, ccf::title, Literal::plain("x"));
        assert_eq!(g.instances_of(ccf::spatial_entity).collect::<Vec<_>>(), vec![&s]);
        assert_eq!(g.objects(&s, ccf::title).count(), 1);
        assert_eq!(g.count_predicate(rdf::type_), 1);
    }
}
