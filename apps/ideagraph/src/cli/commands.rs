//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//! Each command loads the canvas document, runs one engine operation
//! through [`Canvas`], and either prints a result or writes the document
//! back.

use ideagraph_core::{
    Canvas, CanvasConfig, CanvasDocument, CanvasError, Node, NodeId, WorkspaceId,
    check_document_size,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub file: PathBuf,
    pub config: CanvasConfig,
    pub json_mode: bool,
}

fn write_err(e: std::io::Error) -> CanvasError {
    CanvasError::Io(format!("Cannot write output: {}", e))
}

/// Print `value` as pretty JSON.
fn emit_json(out: &mut dyn Write, value: &serde_json::Value) -> Result<(), CanvasError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CanvasError::Serialization(e.to_string()))?;
    writeln!(out, "{}", text).map_err(write_err)
}

// =============================================================================
// DOCUMENT I/O
// =============================================================================

/// Read and parse a canvas document, checking its size first.
pub fn load_document(path: &Path) -> Result<CanvasDocument, CanvasError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        CanvasError::Io(format!("Cannot read '{}': {}", path.display(), e))
    })?;
    if !metadata.is_file() {
        return Err(CanvasError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }
    check_document_size(metadata.len())?;

    let text = std::fs::read_to_string(path)
        .map_err(|e| CanvasError::Io(format!("Cannot read '{}': {}", path.display(), e)))?;
    serde_json::from_str(&text).map_err(|e| CanvasError::Deserialization(e.to_string()))
}

/// Serialize a canvas document to `path`.
pub fn save_document(document: &CanvasDocument, path: &Path) -> Result<(), CanvasError> {
    let text = serde_json::to_string_pretty(document)
        .map_err(|e| CanvasError::Serialization(e.to_string()))?;
    std::fs::write(path, text)
        .map_err(|e| CanvasError::Io(format!("Cannot write '{}': {}", path.display(), e)))?;
    tracing::debug!(path = %path.display(), "canvas document written");
    Ok(())
}

/// Load the document named by the context into a canvas.
pub fn load_canvas(ctx: &Context) -> Result<Canvas, CanvasError> {
    load_document(&ctx.file)?.into_canvas(ctx.config.clone())
}

fn save_canvas(
    canvas: &Canvas,
    ctx: &Context,
    output: Option<&Path>,
) -> Result<PathBuf, CanvasError> {
    let target = output.unwrap_or(ctx.file.as_path());
    save_document(&CanvasDocument::from_canvas(canvas), target)?;
    Ok(target.to_path_buf())
}

/// Ids of edges whose source or target is not a node.
fn dangling_edges(canvas: &Canvas) -> Vec<String> {
    canvas
        .edges()
        .iter()
        .filter(|e| !canvas.contains_node(&e.source) || !canvas.contains_node(&e.target))
        .map(|e| e.id.to_string())
        .collect()
}

// =============================================================================
// STATS COMMAND
// =============================================================================

/// Summary numbers for one canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanvasStats {
    pub workspace_id: Option<String>,
    pub node_count: usize,
    pub edge_count: usize,
    /// Nodes with no incoming edge.
    pub root_count: usize,
    pub dangling_edges: usize,
    pub generating: usize,
    pub pinned: usize,
}

impl CanvasStats {
    pub fn from_canvas(canvas: &Canvas) -> Self {
        let targets: BTreeSet<&NodeId> = canvas.edges().iter().map(|e| &e.target).collect();
        let count = |pred: fn(&Node) -> bool| canvas.nodes().iter().filter(|n| pred(n)).count();

        Self {
            workspace_id: canvas.workspace_id().map(ToString::to_string),
            node_count: canvas.node_count(),
            edge_count: canvas.edge_count(),
            root_count: canvas
                .nodes()
                .iter()
                .filter(|n| !targets.contains(&n.id))
                .count(),
            dangling_edges: dangling_edges(canvas).len(),
            generating: count(|n| n.data.is_generating),
            pinned: count(|n| n.data.pinned),
        }
    }
}

/// Show canvas statistics.
pub fn cmd_stats(ctx: &Context, out: &mut dyn Write) -> Result<(), CanvasError> {
    let canvas = load_canvas(ctx)?;
    let stats = CanvasStats::from_canvas(&canvas);

    if ctx.json_mode {
        let value = serde_json::to_value(&stats)
            .map_err(|e| CanvasError::Serialization(e.to_string()))?;
        return emit_json(out, &value);
    }

    let workspace = stats.workspace_id.as_deref().unwrap_or("-");
    let lines = [
        "Canvas Statistics".to_string(),
        "=================".to_string(),
        format!("Document:       {}", ctx.file.display()),
        format!("Workspace:      {}", workspace),
        String::new(),
        format!("Nodes:          {}", stats.node_count),
        format!("Edges:          {}", stats.edge_count),
        format!("Roots:          {}", stats.root_count),
        format!("Dangling edges: {}", stats.dangling_edges),
        format!("Generating:     {}", stats.generating),
        format!("Pinned:         {}", stats.pinned),
    ];
    for line in lines {
        writeln!(out, "{}", line).map_err(write_err)?;
    }
    Ok(())
}

// =============================================================================
// VALIDATE COMMAND
// =============================================================================

/// Check a document. Structural errors fail the command; dangling edges
/// are reported but allowed.
pub fn cmd_validate(ctx: &Context, out: &mut dyn Write) -> Result<(), CanvasError> {
    let canvas = load_canvas(ctx)?;
    let dangling = dangling_edges(&canvas);
    if !dangling.is_empty() {
        tracing::warn!(count = dangling.len(), "document has dangling edges");
    }

    if ctx.json_mode {
        return emit_json(
            out,
            &serde_json::json!({
                "valid": true,
                "nodes": canvas.node_count(),
                "edges": canvas.edge_count(),
                "dangling_edges": dangling,
            }),
        );
    }

    writeln!(
        out,
        "OK: {} nodes, {} edges",
        canvas.node_count(),
        canvas.edge_count()
    )
    .map_err(write_err)?;
    for id in dangling {
        writeln!(out, "warning: edge {} has a missing endpoint", id).map_err(write_err)?;
    }
    Ok(())
}

// =============================================================================
// QUERY COMMANDS
// =============================================================================

fn print_nodes(
    ctx: &Context,
    out: &mut dyn Write,
    key: &str,
    nodes: &[Node],
) -> Result<(), CanvasError> {
    if ctx.json_mode {
        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        return emit_json(out, &serde_json::json!({ key: ids }));
    }
    for node in nodes {
        let label = if node.data.prompt.is_empty() {
            node.data.output.lines().next().unwrap_or("")
        } else {
            node.data.prompt.as_str()
        };
        writeln!(out, "{}\t{}", node.id, label).map_err(write_err)?;
    }
    Ok(())
}

/// List the ancestors of a node, closest first.
pub fn cmd_upstream(
    ctx: &Context,
    out: &mut dyn Write,
    node: &str,
    depth: Option<usize>,
) -> Result<(), CanvasError> {
    let canvas = load_canvas(ctx)?;
    let id = NodeId::from(node);
    if !canvas.contains_node(&id) {
        tracing::warn!(node_id = %id, "node not found");
    }
    let upstream = match depth {
        Some(depth) => canvas.upstream_nodes_within(&id, depth),
        None => canvas.upstream_nodes(&id),
    };
    print_nodes(ctx, out, "upstream", &upstream)
}

/// List the direct neighbours of a node.
pub fn cmd_connected(ctx: &Context, out: &mut dyn Write, node: &str) -> Result<(), CanvasError> {
    let canvas = load_canvas(ctx)?;
    let ids = canvas.connected_nodes(&NodeId::from(node));

    if ctx.json_mode {
        let ids: Vec<&str> = ids.iter().map(NodeId::as_str).collect();
        return emit_json(out, &serde_json::json!({ "connected": ids }));
    }
    for id in ids {
        writeln!(out, "{}", id).map_err(write_err)?;
    }
    Ok(())
}

// =============================================================================
// MUTATING COMMANDS
// =============================================================================

/// Apply the masonry layout and save.
pub fn cmd_arrange(
    ctx: &Context,
    out: &mut dyn Write,
    output: Option<&Path>,
) -> Result<(), CanvasError> {
    let mut canvas = load_canvas(ctx)?;
    let moved = canvas.arrange_all();
    let target = save_canvas(&canvas, ctx, output)?;
    tracing::info!(moved, path = %target.display(), "arranged");

    if ctx.json_mode {
        return emit_json(out, &serde_json::json!({ "moved": moved }));
    }
    writeln!(out, "Moved {} of {} nodes", moved, canvas.node_count()).map_err(write_err)
}

/// Duplicate a node and save.
pub fn cmd_duplicate(
    ctx: &Context,
    out: &mut dyn Write,
    node: &str,
    output: Option<&Path>,
) -> Result<(), CanvasError> {
    let mut canvas = load_canvas(ctx)?;
    let Some(copy) = canvas.duplicate_node(&NodeId::from(node)) else {
        tracing::warn!(node_id = node, "node not found, nothing duplicated");
        if ctx.json_mode {
            return emit_json(out, &serde_json::json!({ "duplicate": null }));
        }
        return writeln!(out, "Node {} not found", node).map_err(write_err);
    };
    save_canvas(&canvas, ctx, output)?;

    if ctx.json_mode {
        return emit_json(out, &serde_json::json!({ "duplicate": copy.as_str() }));
    }
    writeln!(out, "Created {}", copy).map_err(write_err)
}

/// Delete a node with its edges and save.
pub fn cmd_delete(
    ctx: &Context,
    out: &mut dyn Write,
    node: &str,
    output: Option<&Path>,
) -> Result<(), CanvasError> {
    let mut canvas = load_canvas(ctx)?;
    let edges_before = canvas.edge_count();
    let existed = canvas.contains_node(&NodeId::from(node));

    canvas.delete_node(&NodeId::from(node));
    let removed_edges = edges_before - canvas.edge_count();
    save_canvas(&canvas, ctx, output)?;

    if ctx.json_mode {
        return emit_json(
            out,
            &serde_json::json!({ "deleted": existed, "removed_edges": removed_edges }),
        );
    }
    writeln!(
        out,
        "Deleted {} ({} edges removed)",
        if existed { node } else { "nothing" },
        removed_edges
    )
    .map_err(write_err)
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Write an empty document.
pub fn cmd_init(
    ctx: &Context,
    out: &mut dyn Write,
    output: &Path,
    workspace: Option<String>,
    force: bool,
) -> Result<(), CanvasError> {
    if output.exists() && !force {
        return Err(CanvasError::Io(format!(
            "'{}' already exists. Use --force to overwrite.",
            output.display()
        )));
    }

    let document = CanvasDocument {
        workspace_id: workspace.map(WorkspaceId::new),
        ..CanvasDocument::default()
    };
    save_document(&document, output)?;

    if ctx.json_mode {
        return emit_json(
            out,
            &serde_json::json!({ "initialized": output.to_string_lossy() }),
        );
    }
    writeln!(out, "Initialized empty canvas at {}", output.display()).map_err(write_err)
}
