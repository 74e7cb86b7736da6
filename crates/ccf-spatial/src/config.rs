//! Builder configuration.
//!
//! A run targets exactly one record schema version. The version decides the
//! field mapping, and supplies defaults for the two policies that older and
//! newer producers disagree on (unknown record types, the legacy `UBERON:`
//! rewrite). Both defaults can be overridden.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ids::AnatomyRewrite;

/// Registration record schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    /// Single `creator`, constant unit tags, unit axioms, derived restriction classes.
    V1,
    /// Split creator names, unit tags from the record, unit axioms.
    V2,
    /// No unit axioms; proximity annotations, organ owner sex/side.
    V3,
    /// Placement source/target edges, collisions, retired entities.
    V4,
}

impl Default for SchemaVersion {
    fn default() -> Self {
        SchemaVersion::V4
    }
}

impl SchemaVersion {
    pub const ALL: [SchemaVersion; 4] = [
        SchemaVersion::V1,
        SchemaVersion::V2,
        SchemaVersion::V3,
        SchemaVersion::V4,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SchemaVersion::V1 => "v1",
            SchemaVersion::V2 => "v2",
            SchemaVersion::V3 => "v3",
            SchemaVersion::V4 => "v4",
        }
    }

    pub fn default_unknown_types(self) -> UnknownTypePolicy {
        match self {
            SchemaVersion::V4 => UnknownTypePolicy::Reject,
            _ => UnknownTypePolicy::Skip,
        }
    }

    pub fn default_anatomy_rewrite(self) -> AnatomyRewrite {
        match self {
            SchemaVersion::V3 => AnatomyRewrite::Legacy,
            _ => AnatomyRewrite::Canonical,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(SchemaVersion::V1),
            "v2" | "2" => Ok(SchemaVersion::V2),
            "v3" | "3" => Ok(SchemaVersion::V3),
            "v4" | "4" | "latest" => Ok(SchemaVersion::V4),
            other => Err(format!("unknown schema version `{other}` (expected v1..v4)")),
        }
    }
}

/// What `mutate` does with a record whose `@type` it does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownTypePolicy {
    /// Fail the whole call.
    Reject,
    /// Log and move on.
    Skip,
}

impl FromStr for UnknownTypePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reject" | "strict" => Ok(UnknownTypePolicy::Reject),
            "skip" | "ignore" => Ok(UnknownTypePolicy::Skip),
            other => Err(format!("unknown policy `{other}` (expected reject or skip)")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OntologyConfig {
    pub schema_version: SchemaVersion,
    /// `None` means the version's default.
    pub unknown_types: Option<UnknownTypePolicy>,
    /// `None` means the version's default.
    pub legacy_uberon_rewrite: Option<bool>,
}

impl OntologyConfig {
    pub fn for_version(schema_version: SchemaVersion) -> Self {
        Self {
            schema_version,
            ..Self::default()
        }
    }

    pub fn with_unknown_types(mut self, policy: UnknownTypePolicy) -> Self {
        self.unknown_types = Some(policy);
        self
    }

    pub fn with_legacy_uberon_rewrite(mut self, legacy: bool) -> Self {
        self.legacy_uberon_rewrite = Some(legacy);
        self
    }

    pub fn unknown_type_policy(&self) -> UnknownTypePolicy {
        self.unknown_types
            .unwrap_or_else(|| self.schema_version.default_unknown_types())
    }

    pub fn anatomy_rewrite(&self) -> AnatomyRewrite {
        match self.legacy_uberon_rewrite {
            Some(true) => AnatomyRewrite::Legacy,
            Some(false) => AnatomyRewrite::Canonical,
            None => self.schema_version.default_anatomy_rewrite(),
        }
    }

    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
