// Copyright (c) 2025 Kilo Search Authors
//
// Licensed under the MIT License (LICENSE or https://opensource.org/licenses/MIT)

//! Property-based tests for the Kilo Trie.

use proptest::prelude::*;
use std::collections::BTreeSet;

use crate::tests::test_utils::{
    build_trie, dictionary_strategy, expected_matches, prefix_strategy, search_via_callback,
    search_via_polling,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Property: the matches are exactly the dictionary words starting with the prefix
    #[test]
    fn prop_matches_equal_filtered_dictionary(
        words in dictionary_strategy(),
        prefix in prefix_strategy(),
        workers in 1usize..=8,
    ) {
        let trie = build_trie(&words, workers);
        let found = search_via_callback(&trie, &prefix);

        let found_set: BTreeSet<String> = found.iter().cloned().collect();
        prop_assert_eq!(found_set.len(), found.len(), "duplicate matches: {:?}", found);
        prop_assert_eq!(found_set, expected_matches(&words, &prefix));
    }

    // Property: polling after the pool drains sees the same set as the callback
    #[test]
    fn prop_polling_agrees_with_callback(
        words in dictionary_strategy(),
        prefix in prefix_strategy(),
    ) {
        let trie = build_trie(&words, 4);
        let by_callback = search_via_callback(&trie, &prefix);
        let by_polling = search_via_polling(&trie, &prefix);
        prop_assert_eq!(by_callback, by_polling);
    }

    // Property: the degree of parallelism never changes the answer
    #[test]
    fn prop_worker_count_does_not_matter(
        words in dictionary_strategy(),
        prefix in prefix_strategy(),
    ) {
        let single = build_trie(&words, 1);
        let expected = search_via_callback(&single, &prefix);
        for workers in [2, 8] {
            let trie = build_trie(&words, workers);
            prop_assert_eq!(&search_via_callback(&trie, &prefix), &expected);
        }
    }

    // Property: every completed session leaves the whole pool idle
    #[test]
    fn prop_pool_idle_after_session(
        words in dictionary_strategy(),
        prefixes in proptest::collection::vec(prefix_strategy(), 1..5),
        workers in 1usize..=8,
    ) {
        let trie = build_trie(&words, workers);
        for prefix in &prefixes {
            search_via_callback(&trie, prefix);
            trie.wait_until_idle();
            prop_assert_eq!(trie.idle_workers(), workers);
        }
    }

    // Property: word count tracks distinct insertions
    #[test]
    fn prop_len_counts_distinct_words(words in dictionary_strategy()) {
        let trie = build_trie(&words, 1);
        let distinct: BTreeSet<&String> = words.iter().collect();
        prop_assert_eq!(trie.len(), distinct.len());
        for word in &words {
            prop_assert!(trie.contains(word));
        }
    }
}
