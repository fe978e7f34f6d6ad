// shared vocabulary for the identifier graph
use serde::{Deserialize, Serialize};

/// The single corpus-root anchor key. The knowledge-graph export spelled this
/// two different ways; everything here goes through this one constant.
pub const ANCHOR_NODE_ID: &str = "corpus_root";

/// Ordered CPE 2.3 field names, positional after the `cpe:2.3:` prefix.
pub const CPE_FIELDS: [&str; 11] = [
    "part",
    "vendor",
    "product",
    "version",
    "update",
    "edition",
    "language",
    "sw_edition",
    "target_sw",
    "target_hw",
    "other",
];

/// Index of the product field inside [`CPE_FIELDS`]. The product names the
/// software artifact itself; every other field is descriptive.
pub const PRODUCT_FIELD: usize = 2;

/// The CPE wildcard value. Wildcard fields carry no information and never
/// produce nodes or edges.
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    ArtifactIdentity,
    Label,
    Root,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    Connector,
    ToLabel,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Connector => "connector",
            LinkType::ToLabel => "to_label",
        }
    }
}

/// Identifier schemes the builder knows about. Only CPE is parsed today;
/// PURL is the filter-level extension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierScheme {
    Cpe,
    Purl,
}

impl IdentifierScheme {
    /// Metadata-record key this scheme arrives under.
    pub fn metadata_key(&self) -> &'static str {
        match self {
            IdentifierScheme::Cpe => "cpe",
            IdentifierScheme::Purl => "purl",
        }
    }

    pub fn from_metadata_key(key: &str) -> Option<Self> {
        match key {
            "cpe" => Some(IdentifierScheme::Cpe),
            "purl" => Some(IdentifierScheme::Purl),
            _ => None,
        }
    }
}

/// One builder, one config: the previous copies of the builder (with and
/// without mode parameters) collapse into this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderConfig {
    /// When true, never cross-link nodes across identifier schemes.
    pub fragmented: bool,
    pub include_cpe: bool,
    pub include_purl: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        BuilderConfig {
            fragmented: true,
            include_cpe: true,
            include_purl: false,
        }
    }
}

impl BuilderConfig {
    /// Filter predicate applied to metadata keys before any parsing.
    pub fn accepts(&self, key: &str) -> bool {
        match IdentifierScheme::from_metadata_key(key) {
            Some(IdentifierScheme::Cpe) => self.include_cpe,
            Some(IdentifierScheme::Purl) => self.include_purl,
            None => false,
        }
    }
}
