//! Identifier rules shared by every schema version.

use ccf_namespace::ccf;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const OBO_BASE: &str = "http://purl.obolibrary.org/obo/";
const UBERON_BASE: &str = "http://purl.obolibrary.org/obo/UBERON_";
const FMA_OBO_BASE: &str = "http://purl.obolibrary.org/obo/FMA_";
const FMA_BASE: &str = "http://purl.org/sig/ont/fma/fma";

/// Expand a record identifier into an absolute IRI.
///
/// `#id` (any number of leading `#`) becomes
/// `http://purl.org/ccf/latest/ccf.owl#id`; anything that already carries a
/// scheme is returned unchanged. No further validation is done.
pub fn expand_instance_id(id: &str) -> String {
    if id.contains("://") {
        id.to_string()
    } else {
        format!("{}{}", ccf::INSTANCE_BASE, id.trim_start_matches('#'))
    }
}

/// How `UBERON:` short forms are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnatomyRewrite {
    /// `UBERON:x` → `http://purl.obolibrary.org/obo/UBERON_x`.
    Canonical,
    /// `UBERON:` is detected but only `CL:` occurrences are substituted, as
    /// existing V3 graphs were produced. `UBERON:x` therefore passes through.
    Legacy,
}

/// Rewrite a `representation_of` value into an absolute anatomical IRI.
///
/// Prefixes are matched case-insensitively; unrecognized forms pass through.
pub fn expand_anatomical_entity_id(id: &str, mode: AnatomyRewrite) -> String {
    if let Some(rest) = strip_prefix_ignore_case(id, "obo:") {
        return format!("{OBO_BASE}{rest}");
    }
    if let Some(rest) = strip_prefix_ignore_case(id, "UBERON:") {
        return match mode {
            AnatomyRewrite::Canonical => format!("{UBERON_BASE}{rest}"),
            AnatomyRewrite::Legacy => legacy_cl_pattern()
                .replace_all(id, UBERON_BASE)
                .into_owned(),
        };
    }
    if let Some(rest) = strip_prefix_ignore_case(id, FMA_OBO_BASE) {
        return format!("{FMA_BASE}{rest}");
    }
    id.to_string()
}

fn legacy_cl_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("(?i)CL:").expect("literal pattern"))
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

/// Display file name: the last `/`-separated segment of the file URL.
pub fn file_name_from_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Resolve a placement's `(source, target)`.
///
/// A missing target falls back to the record the placement is nested in; a
/// missing source falls back to the resolved target.
pub fn resolve_placement_endpoints<T: Clone>(
    source: Option<T>,
    target: Option<T>,
    parent: Option<T>,
) -> Option<(T, T)> {
    let target = target.or(parent)?;
    let source = source.unwrap_or_else(|| target.clone());
    Some((source, target))
}

/// Snake-case a label the way derived class names have always been built:
/// `-`, `.` and whitespace become `_`, the first character is lowercased,
/// and every later uppercase letter becomes `_` plus its lowercase form.
///
/// `"Kidney Set"` → `"kidney__set"`.
pub fn snakecase(label: &str) -> String {
    let replaced: String = label
        .chars()
        .map(|c| if c == '-' || c == '.' || c.is_whitespace() { '_' } else { c })
        .collect();

    let mut chars = replaced.chars();
    let mut out = String::with_capacity(replaced.len() + 4);
    if let Some(first) = chars.next() {
        out.extend(first.to_lowercase());
    }
    for c in chars {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
