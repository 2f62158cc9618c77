//! gdpr-corpus - the GDPR legal text as an in-memory corpus.
//!
//! The corpus (recitals, chapters, articles and article paragraphs) is read
//! once from a directory tree of JSON documents and then served read-only
//! through point lookups, from the command line or as MCP tools.
//!
//! # Modules
//!
//! - [`corpus`] - Document types, the concurrent loader and the consistency audit
//! - [`store`] - Snapshot store with copy-on-read accessors
//! - [`repository`] - Lookups by ID and by article paragraph index
//! - [`commands`] - High-level operations (open, lookups, stats, check)
//! - [`config`] - Configuration loading
//! - [`cli`] - Command-line interface definitions

pub mod cli;
pub mod commands;
pub mod config;
pub mod corpus;
pub mod repository;
pub mod store;

#[cfg(feature = "mcp")]
pub mod mcp;
