use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use idgraph_core::core::builder::{build_identifier_graph, build_identifier_graph_tolerant};
use idgraph_core::core::types::BuilderConfig;
use idgraph_core::ingest::{
    load_artifacts, load_metadata, load_metadata_tolerant, load_packages,
};
use idgraph_core::{IdentifierGraph, report};

/// Build and rank the identifier resolution graph from knowledge-graph JSON exports.
#[derive(Parser)]
#[command(name = "idgraph", version)]
struct Cli {
    /// HasMetadata JSON export (array of metadata records)
    #[arg(long)]
    metadata: PathBuf,

    /// Packages JSON export
    #[arg(long)]
    packages: Option<PathBuf>,

    /// Artifacts JSON export
    #[arg(long)]
    artifacts: Option<PathBuf>,

    /// How many nodes to list in the in-degree ranking
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Cross-link artifact nodes across identifier schemes
    #[arg(long)]
    connected: bool,

    /// Also admit purl-keyed metadata records
    #[arg(long)]
    include_purl: bool,

    /// Drop cpe-keyed metadata records
    #[arg(long)]
    exclude_cpe: bool,

    /// Abort on the first malformed record instead of skipping it
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let packages = match &cli.packages {
        Some(path) => load_packages(path).context("loading packages")?,
        None => Vec::new(),
    };
    let artifacts = match &cli.artifacts {
        Some(path) => load_artifacts(path).context("loading artifacts")?,
        None => Vec::new(),
    };

    let metadata = if cli.strict {
        load_metadata(&cli.metadata).context("loading metadata")?
    } else {
        let (records, skipped) =
            load_metadata_tolerant(&cli.metadata).context("loading metadata")?;
        if skipped > 0 {
            info!(skipped, "skipped malformed metadata records during ingestion");
        }
        records
    };

    let config = BuilderConfig {
        fragmented: !cli.connected,
        include_cpe: !cli.exclude_cpe,
        include_purl: cli.include_purl,
    };

    let (nodes, edges) = if cli.strict {
        build_identifier_graph(&packages, &artifacts, &metadata, config)
            .context("building identifier graph")?
    } else {
        let (nodes, edges, skipped) =
            build_identifier_graph_tolerant(&packages, &artifacts, &metadata, config);
        if skipped > 0 {
            info!(skipped, "skipped unparseable identifier records during build");
        }
        (nodes, edges)
    };

    let mut graph = IdentifierGraph::assemble(nodes.into_values(), edges);
    graph.remove_self_loops();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report::write_summary(&graph, &mut out)?;
    writeln!(out)?;
    report::write_ranking(&graph, cli.top, &mut out)?;

    Ok(())
}
