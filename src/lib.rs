//! Identifier resolution graph builder.
//!
//! Ingests heterogeneous software-identifier records from a supply-chain
//! knowledge graph export, parses CPE 2.3 strings into positional fields, and
//! derives a deduplicated directed graph linking canonical artifact identities
//! to the structured attributes extracted from their identifiers. The finished
//! graph is the substrate for downstream ranking, rendering, and embedding
//! collaborators.

pub mod core;
pub mod ingest;
pub mod report;

pub use crate::core::assemble::IdentifierGraph;
pub use crate::core::builder::{
    IdentifierGraphBuilder, NodeMap, build_identifier_graph, build_identifier_graph_tolerant,
};
pub use crate::core::cpe::parse_cpe;
pub use crate::core::error::BuildError;
pub use crate::core::model::{Attributes, IdentifierEdge, IdentifierNode};
pub use crate::core::types::{
    ANCHOR_NODE_ID, BuilderConfig, CPE_FIELDS, IdentifierScheme, LinkType, NodeType,
};
pub use crate::ingest::{ArtifactRecord, IngestError, MetadataRecord, PackageRecord};
