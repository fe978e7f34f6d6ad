// materializes the builder's node/edge collections into a directed graph
use std::collections::BTreeMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::warn;

use crate::core::model::{Attributes, IdentifierEdge, IdentifierNode};

/// Directed identifier graph with attribute maps on nodes and edges.
///
/// Nodes are deduplicated by id on insert; repeated edges between the same
/// ordered pair collapse to one edge with last-write attribute semantics.
/// Once assembled the graph is treated as immutable by downstream consumers
/// (rendering, ranking, embedding) apart from the explicit self-loop pass.
pub struct IdentifierGraph {
    graph: DiGraph<IdentifierNode, Attributes>,
    index: BTreeMap<String, NodeIndex>,
}

impl IdentifierGraph {
    /// Add every node, then every edge. Edge endpoints must already exist in
    /// the node collection; the builder guarantees that, and an edge whose
    /// endpoint is missing anyway is dropped with a warning rather than
    /// invented.
    pub fn assemble<N, E>(nodes: N, edges: E) -> Self
    where
        N: IntoIterator<Item = IdentifierNode>,
        E: IntoIterator<Item = IdentifierEdge>,
    {
        let mut graph = DiGraph::new();
        let mut index = BTreeMap::new();

        for node in nodes {
            if index.contains_key(&node.id) {
                continue;
            }
            let id = node.id.clone();
            let idx = graph.add_node(node);
            index.insert(id, idx);
        }

        for edge in edges {
            let (Some(&source), Some(&target)) =
                (index.get(&edge.source), index.get(&edge.target))
            else {
                warn!(edge_id = %edge.id, "dropping edge with unknown endpoint");
                continue;
            };
            match graph.find_edge(source, target) {
                Some(existing) => graph[existing] = edge.attributes,
                None => {
                    graph.add_edge(source, target, edge.attributes);
                }
            }
        }

        IdentifierGraph { graph, index }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, id: &str) -> Option<&IdentifierNode> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    /// Node ids in stable (sorted) order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Edge triples `(source id, target id, attributes)`.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &Attributes)> {
        self.graph.edge_indices().filter_map(|e| {
            let (a, b) = self.graph.edge_endpoints(e)?;
            Some((
                self.graph[a].id.as_str(),
                self.graph[b].id.as_str(),
                &self.graph[e],
            ))
        })
    }

    pub fn in_degree(&self, id: &str) -> usize {
        self.index
            .get(id)
            .map(|&idx| {
                self.graph
                    .edges_directed(idx, Direction::Incoming)
                    .count()
            })
            .unwrap_or(0)
    }

    /// Top-K node ids ranked by in-degree, descending; ties break by
    /// ascending node id so the ranking is stable across runs.
    pub fn top_by_in_degree(&self, k: usize) -> Vec<(String, usize)> {
        let mut ranking: Vec<(String, usize)> = self
            .index
            .keys()
            .map(|id| (id.clone(), self.in_degree(id)))
            .collect();
        ranking.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranking.truncate(k);
        ranking
    }

    /// Explicit post-processing pass dropping self-loop edges. The builder
    /// never produces one, but anything reaching this layer must be removable.
    pub fn remove_self_loops(&mut self) {
        let loops: Vec<_> = self
            .graph
            .edge_indices()
            .filter(|&e| matches!(self.graph.edge_endpoints(e), Some((a, b)) if a == b))
            .collect();
        // reverse order keeps the remaining indices valid under swap-removal
        for e in loops.into_iter().rev() {
            self.graph.remove_edge(e);
        }
    }
}
