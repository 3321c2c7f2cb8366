//! # ideagraph CLI Module
//!
//! This module implements the CLI interface for ideagraph.
//!
//! ## Available Commands
//!
//! - `stats` - Show canvas statistics
//! - `validate` - Check a canvas document
//! - `upstream` - List the ancestors of a node
//! - `connected` - List the direct neighbours of a node
//! - `arrange` - Apply the masonry layout
//! - `duplicate` - Copy a node
//! - `delete` - Delete a node and its edges
//! - `init` - Write an empty canvas document

mod commands;

use clap::{Parser, Subcommand};
use ideagraph_core::CanvasError;
use std::io::Write;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// ideagraph - idea canvas engine
///
/// Runs canvas operations against a JSON canvas document.
#[derive(Parser, Debug)]
#[command(name = "ideagraph")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the canvas document
    #[arg(short, long, global = true, default_value = "canvas.json")]
    pub file: PathBuf,

    /// Path to a TOML config file (falls back to $IDEAGRAPH_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show canvas statistics
    Stats,

    /// Check a canvas document for structural problems
    Validate,

    /// List the transitive ancestors of a node, closest first
    Upstream {
        /// Node ID
        #[arg(short, long)]
        node: String,

        /// Maximum number of hops
        #[arg(short, long)]
        depth: Option<usize>,
    },

    /// List nodes sharing an edge with a node
    Connected {
        /// Node ID
        #[arg(short, long)]
        node: String,
    },

    /// Apply the masonry layout to every node
    Arrange {
        /// Write the result here instead of back to the document
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Duplicate a node
    Duplicate {
        /// Node ID
        #[arg(short, long)]
        node: String,

        /// Write the result here instead of back to the document
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete a node and every edge touching it
    Delete {
        /// Node ID
        #[arg(short, long)]
        node: String,

        /// Write the result here instead of back to the document
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write an empty canvas document
    Init {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Workspace ID to record in the document
        #[arg(short, long)]
        workspace: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments, writing results to stdout.
pub fn execute(cli: Cli) -> Result<(), CanvasError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute_to(cli, &mut out)
}

/// Execute the CLI with parsed arguments, writing results to `out`.
pub fn execute_to(cli: Cli, out: &mut dyn Write) -> Result<(), CanvasError> {
    let ctx = Context {
        file: cli.file,
        config: crate::config::load_config(cli.config.as_deref())?,
        json_mode: cli.json_mode,
    };

    match cli.command {
        Some(Commands::Stats) | None => cmd_stats(&ctx, out),
        Some(Commands::Validate) => cmd_validate(&ctx, out),
        Some(Commands::Upstream { node, depth }) => cmd_upstream(&ctx, out, &node, depth),
        Some(Commands::Connected { node }) => cmd_connected(&ctx, out, &node),
        Some(Commands::Arrange { output }) => cmd_arrange(&ctx, out, output.as_deref()),
        Some(Commands::Duplicate { node, output }) => {
            cmd_duplicate(&ctx, out, &node, output.as_deref())
        }
        Some(Commands::Delete { node, output }) => cmd_delete(&ctx, out, &node, output.as_deref()),
        Some(Commands::Init {
            output,
            workspace,
            force,
        }) => cmd_init(&ctx, out, &output, workspace, force),
    }
}
