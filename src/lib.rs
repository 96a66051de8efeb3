//! Kilo Search Library
//!
//! This library contains the core components of Kilo Search: the
//! branch-parallel prefix trie, dictionary loading, configuration, error
//! types and the timing utility used by the command-line front end.
//!
//! # Architecture
//!
//! Kilo Search is designed with the following principles in mind:
//! - The traversal core knows nothing about files, terminals or timing
//! - Fan-out happens only at branch points, bounded by a fixed worker pool
//! - Results are delivered once per search, by callback or by polling
//! - Comprehensive error handling and propagation

pub mod config;
pub mod data_structures;
pub mod dictionary;
pub mod error;
pub mod utils;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

/// Version information for Kilo Search.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
