//! Data structures for Kilo Search.
//!
//! This module contains the concurrent prefix trie and its worker pool.
//! The implementation follows the project requirements:
//! - No unsafe code
//! - Locks held only for O(1) bookkeeping, never across recursion
//! - Read-only sharing of the dictionary during searches

pub mod kilo_trie;

// Re-export common data structures
pub use kilo_trie::{KiloTrie, KiloTrieConfig, KiloTrieError, KiloTrieResult, SessionStart};
