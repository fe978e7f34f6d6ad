// node/edge record types shared by the builder and the assembly layer
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::types::{ANCHOR_NODE_ID, IdentifierScheme, LinkType, NodeType};

/// Attribute maps hold arbitrary scalars; BTreeMap keeps iteration order
/// deterministic across rebuilds.
pub type Attributes = BTreeMap<String, Value>;

/// A node in the identifier-resolution graph.
///
/// `id` is the globally unique key in the node mapping: the raw product name
/// for artifact identities, `field|value` composites for labels, or the fixed
/// anchor key for the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub attributes: Attributes,
}

impl IdentifierNode {
    /// The single process-wide anchor node.
    pub fn root() -> Self {
        IdentifierNode {
            id: ANCHOR_NODE_ID.to_string(),
            node_type: NodeType::Root,
            attributes: Attributes::new(),
        }
    }

    /// Canonical artifact node for one distinct product value.
    pub fn artifact(name: &str, scheme: IdentifierScheme) -> Self {
        let mut attributes = Attributes::new();
        attributes.insert(
            "from_identifier_type".to_string(),
            Value::String(scheme.metadata_key().to_string()),
        );
        attributes.insert("artifact_name".to_string(), Value::String(name.to_string()));
        IdentifierNode {
            id: name.to_string(),
            node_type: NodeType::ArtifactIdentity,
            attributes,
        }
    }

    /// Label node for one non-product field value, keyed `field|value`.
    pub fn label(field: &str, value: &str, scheme: IdentifierScheme) -> Self {
        let mut attributes = Attributes::new();
        attributes.insert(
            "from_identifier_type".to_string(),
            Value::String(scheme.metadata_key().to_string()),
        );
        IdentifierNode {
            id: label_key(field, value),
            node_type: NodeType::Label,
            attributes,
        }
    }

    pub fn scheme_key(&self) -> Option<&str> {
        self.attributes.get("from_identifier_type").and_then(Value::as_str)
    }
}

/// Composite key for a label node.
pub fn label_key(field: &str, value: &str) -> String {
    format!("{field}|{value}")
}

/// A directed edge between two node ids.
///
/// Edges reference nodes by id only and never own them. The `id` is a
/// deterministic `source||target`-style string kept for traceability; graph
/// semantics come from `(source, target)` and `link_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub attributes: Attributes,
}

impl IdentifierEdge {
    fn new(source: &str, target: &str, link_type: LinkType) -> Self {
        let mut attributes = Attributes::new();
        attributes.insert(
            "link_type".to_string(),
            Value::String(link_type.as_str().to_string()),
        );
        IdentifierEdge {
            id: format!("{source}||{target}"),
            source: source.to_string(),
            target: target.to_string(),
            attributes,
        }
    }

    /// Anchor -> artifact-identity edge.
    pub fn connector(source: &str, target: &str) -> Self {
        IdentifierEdge::new(source, target, LinkType::Connector)
    }

    /// Artifact-identity -> label edge.
    pub fn to_label(source: &str, target: &str) -> Self {
        IdentifierEdge::new(source, target, LinkType::ToLabel)
    }

    pub fn link_type(&self) -> Option<&str> {
        self.attributes.get("link_type").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_node_records_its_scheme() {
        let n = IdentifierNode::artifact("httpd", IdentifierScheme::Cpe);
        assert_eq!(n.id, "httpd");
        assert_eq!(n.node_type, NodeType::ArtifactIdentity);
        assert_eq!(n.scheme_key(), Some("cpe"));
    }

    #[test]
    fn label_node_uses_composite_key() {
        let n = IdentifierNode::label("vendor", "apache", IdentifierScheme::Cpe);
        assert_eq!(n.id, "vendor|apache");
        assert_eq!(n.node_type, NodeType::Label);
    }

    #[test]
    fn edge_ids_are_built_from_endpoints() {
        let e = IdentifierEdge::connector(ANCHOR_NODE_ID, "httpd");
        assert_eq!(e.id, "corpus_root||httpd");
        assert_eq!(e.link_type(), Some("connector"));

        let e = IdentifierEdge::to_label("httpd", "vendor|apache");
        assert_eq!(e.id, "httpd||vendor|apache");
        assert_eq!(e.link_type(), Some("to_label"));
    }

    #[test]
    fn node_serializes_with_plain_type_tag() {
        let n = IdentifierNode::label("version", "2.4.54", IdentifierScheme::Cpe);
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "label");
        assert_eq!(json["attributes"]["from_identifier_type"], "cpe");
    }
}
