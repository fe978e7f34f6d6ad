// textual ranking report used as a smoke-test of graph shape
use std::io;

use crate::core::assemble::IdentifierGraph;

pub fn write_summary<W: io::Write>(graph: &IdentifierGraph, out: &mut W) -> io::Result<()> {
    writeln!(out, "Total Nodes: {}", graph.node_count())?;
    writeln!(out, "Total Edges: {}", graph.edge_count())?;
    Ok(())
}

/// Top-K nodes by in-degree, one `node id<TAB>in-degree` line each. Field
/// order is load-bearing for downstream scenario checks.
pub fn write_ranking<W: io::Write>(
    graph: &IdentifierGraph,
    k: usize,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "Top {k} nodes by in-degree:")?;
    for (id, in_degree) in graph.top_by_in_degree(k) {
        writeln!(out, "{id}\t{in_degree}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::build_identifier_graph;
    use crate::core::types::BuilderConfig;
    use crate::ingest::MetadataRecord;
    use serde_json::Value;

    fn mk_meta(value: &str) -> MetadataRecord {
        MetadataRecord {
            id: format!("meta-{value}"),
            subject: Value::Null,
            key: "cpe".to_string(),
            value: value.to_string(),
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            justification: "test".to_string(),
            origin: "test".to_string(),
            collector: "test".to_string(),
            document_ref: "doc".to_string(),
        }
    }

    #[test]
    fn ranking_lines_are_id_then_degree() {
        let metadata = vec![
            mk_meta("cpe:2.3:a:apache:httpd:2.4.54:*:*:*:*:*:*:*"),
            mk_meta("cpe:2.3:a:apache:nginx:1.21:*:*:*:*:*:*:*"),
        ];
        let (nodes, edges) =
            build_identifier_graph(&[], &[], &metadata, BuilderConfig::default()).unwrap();
        let graph = IdentifierGraph::assemble(nodes.into_values(), edges);

        let mut buf = Vec::new();
        write_ranking(&graph, 2, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Top 2 nodes by in-degree:");
        assert_eq!(lines[1], "part|a\t2");
        assert_eq!(lines[2], "vendor|apache\t2");
    }

    #[test]
    fn summary_reports_totals() {
        let metadata = vec![mk_meta("cpe:2.3:a:apache:httpd:2.4.54:*:*:*:*:*:*:*")];
        let (nodes, edges) =
            build_identifier_graph(&[], &[], &metadata, BuilderConfig::default()).unwrap();
        let graph = IdentifierGraph::assemble(nodes.into_values(), edges);

        let mut buf = Vec::new();
        write_summary(&graph, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "Total Nodes: 5\nTotal Edges: 4\n");
    }
}
