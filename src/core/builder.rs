// dedup + linking policy: identifier records -> node map + edge list
use std::collections::BTreeMap;

use serde_json::Value;
use tracing::warn;

use crate::core::cpe::parse_cpe;
use crate::core::error::BuildError;
use crate::core::model::{IdentifierEdge, IdentifierNode, label_key};
use crate::core::types::{
    ANCHOR_NODE_ID, BuilderConfig, CPE_FIELDS, IdentifierScheme, NodeType, PRODUCT_FIELD, WILDCARD,
};
use crate::ingest::{ArtifactRecord, MetadataRecord, PackageRecord};

/// Node mapping keyed by node id. BTreeMap so a rebuild from the same inputs
/// iterates identically.
pub type NodeMap = BTreeMap<String, IdentifierNode>;

/// Accumulates nodes and edges from identifier records.
///
/// Policy, in order of precedence:
/// 1. Node ids are globally unique; registration is first-write-wins and a
///    duplicate insert is a no-op (attributes of the dropped duplicate are lost).
/// 2. A node always exists before any edge referencing it, including the
///    anchor, which is seeded at construction.
/// 3. At most one artifact-identity node per distinct product value, with
///    exactly one connector edge from the anchor.
/// 4. Wildcard fields produce no nodes and no edges.
/// 5. Duplicate (source, target) edges are allowed here; the assembly layer
///    collapses them on insert. That collapse is the intended final state.
pub struct IdentifierGraphBuilder {
    config: BuilderConfig,
    nodes: NodeMap,
    edges: Vec<IdentifierEdge>,
}

impl IdentifierGraphBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        let mut nodes = NodeMap::new();
        let root = IdentifierNode::root();
        nodes.insert(root.id.clone(), root);
        IdentifierGraphBuilder {
            config,
            nodes,
            edges: Vec::new(),
        }
    }

    /// Feed one metadata record through the key filter and, if it carries a
    /// parseable identifier scheme, into the graph. Returns whether the record
    /// participated. Records under unknown keys are skipped, not an error.
    pub fn ingest_metadata(&mut self, record: &MetadataRecord) -> Result<bool, BuildError> {
        if !self.config.accepts(&record.key) {
            return Ok(false);
        }
        match IdentifierScheme::from_metadata_key(&record.key) {
            Some(IdentifierScheme::Cpe) => {
                self.ingest_cpe(&record.value)?;
                Ok(true)
            }
            // purl records pass the filter but have no parser yet
            Some(IdentifierScheme::Purl) | None => Ok(false),
        }
    }

    fn ingest_cpe(&mut self, value: &str) -> Result<(), BuildError> {
        let fields = parse_cpe(value)?;
        if fields.len() < CPE_FIELDS.len() {
            return Err(BuildError::FieldCount {
                expected: CPE_FIELDS.len(),
                found: fields.len(),
                value: value.to_string(),
            });
        }

        // the product field names the software artifact itself
        let product = fields[PRODUCT_FIELD];
        if product == WILDCARD {
            // no artifact identity to hang labels from
            return Ok(());
        }

        if !self.nodes.contains_key(product) {
            self.nodes.insert(
                product.to_string(),
                IdentifierNode::artifact(product, IdentifierScheme::Cpe),
            );
            self.edges
                .push(IdentifierEdge::connector(ANCHOR_NODE_ID, product));
        }

        for (index, field_value) in fields.iter().enumerate() {
            if index == PRODUCT_FIELD || *field_value == WILDCARD {
                continue;
            }
            // segments past the schema tail are attributed to the last field
            let field_name = CPE_FIELDS[index.min(CPE_FIELDS.len() - 1)];
            let key = label_key(field_name, field_value);
            if !self.nodes.contains_key(&key) {
                self.nodes.insert(
                    key.clone(),
                    IdentifierNode::label(field_name, field_value, IdentifierScheme::Cpe),
                );
            }
            // appended even when the label already existed: label sharing is
            // what turns the forest into a graph with converging paths
            self.edges.push(IdentifierEdge::to_label(product, &key));
        }

        Ok(())
    }

    /// Connected-mode pass: link distinct artifact-identity nodes that carry
    /// the same artifact name under different originating schemes. Purely
    /// additive, so connected output is always a superset of fragmented
    /// output for the same inputs.
    fn cross_link_same_names(&mut self) {
        let mut by_name: BTreeMap<&str, Vec<&IdentifierNode>> = BTreeMap::new();
        for node in self.nodes.values() {
            if node.node_type != NodeType::ArtifactIdentity {
                continue;
            }
            if let Some(name) = node.attributes.get("artifact_name").and_then(Value::as_str) {
                by_name.entry(name).or_default().push(node);
            }
        }

        let mut linked = Vec::new();
        for aliases in by_name.values() {
            for (i, a) in aliases.iter().enumerate() {
                for b in &aliases[i + 1..] {
                    if a.scheme_key() != b.scheme_key() {
                        linked.push(IdentifierEdge::connector(&a.id, &b.id));
                    }
                }
            }
        }
        self.edges.extend(linked);
    }

    /// Finalize: run the connected-mode cross-link pass if configured, then
    /// hand over the accumulated node map and edge list.
    pub fn finish(mut self) -> (NodeMap, Vec<IdentifierEdge>) {
        if !self.config.fragmented {
            self.cross_link_same_names();
        }
        (self.nodes, self.edges)
    }
}

/// Whole-run entry point, strict: the first malformed identifier aborts the
/// build. `packages` and `artifacts` are accepted for interface symmetry with
/// future identifier schemes; the CPE pass does not consume them.
pub fn build_identifier_graph(
    _packages: &[PackageRecord],
    _artifacts: &[ArtifactRecord],
    metadata: &[MetadataRecord],
    config: BuilderConfig,
) -> Result<(NodeMap, Vec<IdentifierEdge>), BuildError> {
    let mut builder = IdentifierGraphBuilder::new(config);
    for record in metadata {
        builder.ingest_metadata(record)?;
    }
    Ok(builder.finish())
}

/// Batch-tolerant variant: malformed identifiers abort only their own record.
/// Returns the skipped-record count alongside the graph. Recommended default
/// for a corpus of independently-sourced identifier documents.
pub fn build_identifier_graph_tolerant(
    _packages: &[PackageRecord],
    _artifacts: &[ArtifactRecord],
    metadata: &[MetadataRecord],
    config: BuilderConfig,
) -> (NodeMap, Vec<IdentifierEdge>, usize) {
    let mut builder = IdentifierGraphBuilder::new(config);
    let mut skipped = 0;
    for record in metadata {
        if let Err(err) = builder.ingest_metadata(record) {
            warn!(record_id = %record.id, error = %err, "skipping unparseable identifier record");
            skipped += 1;
        }
    }
    let (nodes, edges) = builder.finish();
    (nodes, edges, skipped)
}
