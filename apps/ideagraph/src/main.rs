//! # ideagraph
//!
//! Command-line front end for the ideagraph canvas engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │           apps/ideagraph (THE BINARY)         │
//! │                                              │
//! │   ┌───────────┐          ┌──────────────┐    │
//! │   │   CLI     │          │  TOML config │    │
//! │   │  (clap)   │          │    (toml)    │    │
//! │   └─────┬─────┘          └──────┬───────┘    │
//! │         └──────────┬────────────┘            │
//! │                    ▼                         │
//! │           ┌────────────────┐                 │
//! │           │ ideagraph-core │                 │
//! │           │  (THE LOGIC)   │                 │
//! │           └────────────────┘                 │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! ideagraph init -o canvas.json --workspace research
//! ideagraph -f canvas.json stats
//! ideagraph -f canvas.json upstream --node n4 --depth 3
//! ideagraph -f canvas.json arrange -o arranged.json
//! ```

use clap::Parser;
use ideagraph::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    // IDEAGRAPH_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("IDEAGRAPH_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "ideagraph=debug,ideagraph_core=debug"
    } else {
        "ideagraph=info,ideagraph_core=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // Logs go to stderr so stdout stays parseable in --json-mode.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
