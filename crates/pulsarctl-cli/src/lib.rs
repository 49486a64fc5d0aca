#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions, clippy::redundant_pub_crate)]

//! Administrative CLI for Pulsar clusters.
//!
//! Layout:
//! - `args.rs`: arity validation of positional names
//! - `verb.rs`: verb definition, help metadata, and handler trait
//! - `registry.rs`: resource groups and (noun, verb) lookup
//! - `classify.rs`: categorisation of administrative call failures
//! - `client.rs`: CLI errors, client wiring, and telemetry helpers
//! - `output.rs`: renderer writing results to stdout or stderr
//! - `cli.rs`: argument parsing and command dispatch
//! - `commands/`: verbs grouped by resource
//! - `main.rs`: thin entrypoint delegating to `run()`

pub mod args;
pub mod classify;
pub mod cli;
pub mod client;
pub mod commands;
pub mod output;
pub mod registry;
pub mod verb;

pub use cli::{run, run_with};
