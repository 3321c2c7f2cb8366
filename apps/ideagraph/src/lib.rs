//! # ideagraph
//!
//! Library half of the `ideagraph` binary: CLI definitions, command
//! implementations and config loading, exposed so integration tests can
//! drive them without spawning a process.

pub mod cli;
pub mod config;
