//! Error types for the Kilo Trie.
//!
//! This module defines the errors that can occur while building the trie or
//! dispatching search workers.

/// Errors that can occur in Kilo Trie operations.
#[derive(Debug, thiserror::Error)]
pub enum KiloTrieError {
    /// Error when an empty word is inserted.
    #[error("Empty word not allowed")]
    EmptyWord,

    /// Error when the OS refuses to start a worker thread.
    #[error("Failed to spawn worker {worker}: {source}")]
    WorkerSpawn {
        /// The worker slot that could not be started.
        worker: usize,
        /// The underlying spawn error.
        #[source]
        source: std::io::Error,
    },
}
