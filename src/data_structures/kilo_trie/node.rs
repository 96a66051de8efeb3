// Copyright (c) 2025 Kilo Search Authors
//
// Licensed under the MIT License (LICENSE or https://opensource.org/licenses/MIT)

//! Node implementation for the Kilo Trie.
//!
//! Each node owns its children by value, so the whole dictionary is a plain
//! tree that can be shared read-only with worker threads behind a single
//! `Arc` of the root.

use fnv::FnvHashMap;

/// A node in the Kilo Trie.
///
/// Each node represents one character position of a word. Leaf nodes mark
/// the end of a complete dictionary word.
#[derive(Debug, Clone, Default)]
pub struct TrieNode {
    /// Map of edge characters to owned child nodes
    pub children: FnvHashMap<char, TrieNode>,

    /// Whether a complete word ends at this node
    pub is_leaf: bool,
}

impl TrieNode {
    /// Creates a new empty trie node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Follows `path` from this node, one character per edge.
    ///
    /// Returns `None` as soon as a character has no matching child.
    pub fn descend(&self, path: &str) -> Option<&TrieNode> {
        path.chars()
            .try_fold(self, |node, c| node.children.get(&c))
    }

    /// Returns the children sorted by edge character.
    ///
    /// Fan-out walks children in this order so that the hand-off sequence
    /// is stable across runs.
    pub fn sorted_children(&self) -> Vec<(char, &TrieNode)> {
        let mut children: Vec<(char, &TrieNode)> =
            self.children.iter().map(|(c, node)| (*c, node)).collect();
        children.sort_unstable_by_key(|(c, _)| *c);
        children
    }

    /// Whether this node has two or more children.
    pub fn is_branch_point(&self) -> bool {
        self.children.len() > 1
    }
}
