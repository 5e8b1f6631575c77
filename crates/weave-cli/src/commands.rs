//! CLI command implementations.

use crate::config::{Config, PolicyKind, WEAVE_DIR};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use weave_core::{decode, encode, Identifier};
use weave_graph::{Graph, GraphStats, GraphStore, IntegrityPolicy, MergeOptions, Merger};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Graph documents carry arbitrary JSON payloads.
pub type Document = Graph<Value, Value>;

/// Flags for `weave merge`.
pub struct MergeArgs {
    pub files: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub policy: Option<PolicyKind>,
    pub integrity: Option<IntegrityPolicy>,
    pub snapshot: Option<String>,
}

/// Initialize Weave in a directory.
pub fn init(path: &Path) -> Result<()> {
    let config_path = Config::path(path);

    if config_path.exists() {
        println!("{} Already initialized", "✓".green());
        return Ok(());
    }

    fs::create_dir_all(path.join(WEAVE_DIR))?;
    fs::write(
        &config_path,
        serde_json::to_string_pretty(&Config::default())?,
    )?;

    println!("{} Initialized Weave in {}", "✓".green(), path.display());
    println!("  Run {} to combine graphs", "weave merge".cyan());

    Ok(())
}

/// Merge graph documents left to right.
pub fn merge(root: &Path, args: MergeArgs) -> Result<()> {
    if args.files.is_empty() {
        return Err("no graph files given".into());
    }

    let config = Config::load(root)?;
    let policy = args.policy.unwrap_or(config.policy);
    let options = MergeOptions {
        integrity: args.integrity.unwrap_or(config.integrity),
    };
    debug!(%policy, integrity = %options.integrity, files = args.files.len(), "merging");

    let progress = ProgressBar::new(args.files.len() as u64);
    progress.set_style(ProgressStyle::default_bar().template("{bar:30.cyan} {pos}/{len} {msg}")?);

    let mut graphs = Vec::with_capacity(args.files.len());
    for file in &args.files {
        progress.set_message(file.display().to_string());
        graphs.push(load_document(file)?);
        progress.inc(1);
    }
    progress.finish_and_clear();

    let merged = match policy {
        PolicyKind::Consistent => Merger::consistent().with_options(options).merge(graphs)?,
        PolicyKind::Arbitrary => Merger::arbitrary().with_options(options).merge(graphs)?,
    };

    eprintln!(
        "{} Merged {} graphs ({} nodes, {} edges) with {} policy",
        "✓".green(),
        args.files.len().to_string().cyan(),
        merged.node_count().to_string().cyan(),
        merged.edge_count().to_string().cyan(),
        policy
    );

    if let Some(name) = &args.snapshot {
        let store = GraphStore::open(config.store_path(root))?;
        store.save(name, &merged)?;
        eprintln!("{} Saved snapshot {}", "✓".green(), name.cyan());
    }

    let json = serde_json::to_string_pretty(&merged)?;
    match &args.output {
        Some(out) => {
            fs::write(out, json)?;
            eprintln!("{} Wrote {}", "✓".green(), out.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Report edges whose endpoints are missing.
pub fn check(file: &Path) -> Result<()> {
    let graph = load_document(file)?;
    let dangling = graph.dangling_edges();

    if dangling.is_empty() {
        println!(
            "{} {} edges, all endpoints resolve",
            "✓".green(),
            graph.edge_count()
        );
        return Ok(());
    }

    println!("{} {} dangling endpoints:", "⚠".yellow(), dangling.len());
    for d in dangling.iter().take(20) {
        println!(
            "  {} {} {}",
            d.edge.cyan(),
            d.role.to_string().yellow(),
            d.endpoint.to_string().red()
        );
    }
    if dangling.len() > 20 {
        println!("  ... and {} more", dangling.len() - 20);
    }

    Err(format!("{} dangling edge endpoints", dangling.len()).into())
}

/// Show counts for a graph file or a stored snapshot.
pub fn stats(root: &Path, file: Option<&Path>, snapshot: Option<&str>) -> Result<()> {
    let graph = match (file, snapshot) {
        (Some(file), None) => load_document(file)?,
        (None, Some(name)) => {
            let config = Config::load(root)?;
            let store = GraphStore::open(config.store_path(root))?;
            store
                .load::<Value, Value>(name)?
                .ok_or_else(|| format!("no snapshot named {}", name))?
        }
        _ => return Err("give either a file or --snapshot".into()),
    };

    print_stats(&graph.stats());
    Ok(())
}

fn print_stats(stats: &GraphStats) {
    println!("{}", "Graph".cyan().bold());
    println!("  Nodes: {}", stats.node_count);
    println!("  Edges: {}", stats.edge_count);

    if stats.plugins.is_empty() {
        return;
    }

    println!("{}", "Plugins".cyan().bold());
    for (plugin, counts) in &stats.plugins {
        println!(
            "  {:<20} {} nodes, {} edges",
            plugin.yellow(),
            counts.nodes,
            counts.edges
        );
    }
}

/// Print the token for an identifier.
pub fn encode_id(plugin: &str, source: &str, local: &str) -> Result<()> {
    let id = Identifier::new(plugin, source, local)?;
    println!("{}", encode(&id)?);
    Ok(())
}

/// Print the parts of a token.
pub fn decode_token(token: &str) -> Result<()> {
    let id = decode(token)?;
    println!("{} {}", "plugin:".dimmed(), id.plugin());
    println!("{} {}", "source:".dimmed(), id.source());
    println!("{} {}", "local: ".dimmed(), id.local());
    Ok(())
}

/// Reads a graph document and checks its keys and edge weights.
pub fn load_document(path: &Path) -> Result<Document> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    let graph: Document = serde_json::from_str(&text)
        .map_err(|e| format!("invalid graph document {}: {}", path.display(), e))?;
    graph.validate()?;
    Ok(graph)
}
