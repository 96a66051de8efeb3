//! Test modules for Kilo Search.
//!
//! This module contains the crate-level test suites:
//! - Search session scenarios for the Kilo Trie
//! - Configuration loading and validation
//! - Error types and reporting
//! - Dictionary loading and the timing utility
//! - Shared fixtures and proptest strategies


pub use test_utils::{
    build_trie, create_test_dir, dense_words, dictionary_strategy, expected_matches,
    prefix_strategy, search_via_callback, search_via_polling, word_strategy, TestFixture,
};
