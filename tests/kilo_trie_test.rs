// Copyright (c) 2025 Kilo Search Authors
//
// Licensed under the MIT License (LICENSE or https://opensource.org/licenses/MIT)

//! Integration tests for the Kilo Trie public API.
//! Drives searches the way the command-line front end does: a completion
//! handler feeding a channel, and batch polling.

use std::io::Cursor;
use std::sync::mpsc;
use std::time::Duration;

use kilo_search_lib::config::search::SearchConfig;
use kilo_search_lib::data_structures::kilo_trie::{KiloTrie, KiloTrieConfig, SessionStart};
use kilo_search_lib::dictionary::Dictionary;
use parking_lot::Mutex;

const TIMEOUT: Duration = Duration::from_secs(10);

fn dickens_sample() -> KiloTrie {
    let words = "\
the\nthey\nthem\nthere\nthese\nthought\nthrough\ntime\nto\ntold\n\
was\nwere\nwhat\nwhen\nwhere\nwhich\nwho\nwill\nwith\nwould\n";
    let search = SearchConfig {
        worker_count: 4,
        case_sensitive: true,
    };
    let (trie, report) = Dictionary::default()
        .load_reader(Cursor::new(words), &search)
        .unwrap();
    assert_eq!(report.words_inserted, 20);
    trie
}

#[test]
fn test_callback_driven_prompt_loop() {
    let trie = dickens_sample();
    let (tx, rx) = mpsc::channel::<Vec<String>>();
    let tx = Mutex::new(tx);
    trie.set_on_complete(move |words: &[String]| {
        let _ = tx.lock().send(words.to_vec());
    });

    let cases: [(&str, &[&str]); 4] = [
        ("th", &["the", "them", "there", "these", "they", "thought", "through"]),
        ("whe", &["when", "where"]),
        ("x", &[]),
        ("wou", &["would"]),
    ];

    for (prefix, expected) in cases {
        trie.find_prefix_matches(prefix).unwrap();
        let mut words = rx.recv_timeout(TIMEOUT).expect("no completion");
        words.sort();
        assert_eq!(words, expected, "prefix {prefix:?}");
    }

    assert_eq!(trie.idle_workers(), trie.worker_count());
}

#[test]
fn test_polling_without_callback() {
    let trie = dickens_sample();

    let start = trie.find_prefix_matches("w").unwrap();
    assert!(matches!(start, SessionStart::Dispatched { .. }));
    trie.wait_until_idle();
    assert_eq!(trie.request_result().len(), 10);

    assert_eq!(trie.find_prefix_matches("q").unwrap(), SessionStart::NoMatch);
    assert!(trie.request_result().is_empty());
}

#[test]
fn test_replacing_the_handler_between_sessions() {
    let mut trie = KiloTrie::with_config(KiloTrieConfig::new().with_worker_count(2));
    for word in ["red", "rose", "ruby"] {
        trie.insert(word).unwrap();
    }

    let (first_tx, first_rx) = mpsc::channel::<usize>();
    let first_tx = Mutex::new(first_tx);
    trie.set_on_complete(move |words: &[String]| {
        let _ = first_tx.lock().send(words.len());
    });
    trie.find_prefix_matches("r").unwrap();
    assert_eq!(first_rx.recv_timeout(TIMEOUT).unwrap(), 3);

    let (second_tx, second_rx) = mpsc::channel::<usize>();
    let second_tx = Mutex::new(second_tx);
    trie.set_on_complete(move |words: &[String]| {
        let _ = second_tx.lock().send(words.len());
    });
    trie.find_prefix_matches("ro").unwrap();
    assert_eq!(second_rx.recv_timeout(TIMEOUT).unwrap(), 1);
    assert!(first_rx.try_recv().is_err());
}
