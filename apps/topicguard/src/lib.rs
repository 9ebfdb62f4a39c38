//! Topicguard core library.
//!
//! This crate exposes programmatic APIs for finding Go event-log filter
//! queries that constrain topics without constraining the emitting contract.
//!
//! High-level modules:
//! - `go`: tree-sitter parsing of Go units and node helpers.
//! - `scanner`: Discovery of filter-query literals in a parsed unit.
//! - `classify`: Static emptiness evaluation of field values and the verdict.
//! - `emit`: Findings from flagged sites, honoring `ok:` suppressions.
//! - `lint`: Unit discovery and parallel scan runs.
//! - `fixture`: `ruleid:`-annotated fixture verification.
//! - `config`: Discovery and effective configuration resolution.
//! - `models`: Report structs and the filter-query signature.
//! - `output`: Human/JSON printers.
//! - `cli`, `logging`, `utils`: binary plumbing.
pub mod classify;
pub mod cli;
pub mod config;
pub mod emit;
pub mod error;
pub mod fixture;
pub mod go;
pub mod lint;
pub mod logging;
pub mod markers;
pub mod models;
pub mod output;
pub mod rule;
pub mod scanner;
pub mod utils;
