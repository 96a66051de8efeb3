//! Kilo Search Benchmarks
//!
//! Measures prefix search latency on a synthetic dictionary for different
//! worker pool sizes. The benchmarks are implemented using the Criterion
//! framework.
//!
//! To run the benchmarks:
//! ```bash
//! cargo bench --features benchmarking
//! ```

use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkId, Criterion, SamplingMode, Throughput,
};
use std::time::Duration;

use kilo_search_lib::data_structures::kilo_trie::{KiloTrie, KiloTrieConfig};

/// Every word over `alphabet` with length `1..=max_len`.
fn dense_words(alphabet: &str, max_len: usize) -> Vec<String> {
    let mut words = Vec::new();
    let mut frontier = vec![String::new()];
    for _ in 0..max_len {
        let mut next = Vec::new();
        for stem in &frontier {
            for c in alphabet.chars() {
                let mut word = stem.clone();
                word.push(c);
                words.push(word.clone());
                next.push(word);
            }
        }
        frontier = next;
    }
    words
}

fn build_trie(words: &[String], workers: usize) -> KiloTrie {
    let mut trie = KiloTrie::with_config(KiloTrieConfig::new().with_worker_count(workers));
    for word in words {
        trie.insert(word).expect("insert failed");
    }
    trie
}

/// Benchmark full prefix sessions across pool sizes
fn bench_prefix_search(c: &mut Criterion) {
    let words = dense_words("abcdefgh", 5);

    let mut group = c.benchmark_group("kilo_trie_search");
    group.sampling_mode(SamplingMode::Flat);
    group.measurement_time(Duration::from_secs(3));
    group.warm_up_time(Duration::from_secs(1));
    group.sample_size(50);

    for workers in [1usize, 2, 4, 8].iter() {
        let trie = build_trie(&words, *workers);
        for prefix in ["", "a", "abc"] {
            let matches = words.iter().filter(|w| w.starts_with(prefix)).count();
            group.throughput(Throughput::Elements(matches as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("workers_{workers}"), format!("prefix_{prefix:?}")),
                &prefix,
                |b, prefix| {
                    b.iter(|| {
                        trie.find_prefix_matches(black_box(prefix)).unwrap();
                        trie.wait_until_idle();
                        black_box(trie.request_result().len())
                    });
                },
            );
        }
    }

    group.finish();
}

/// Benchmark dictionary construction
fn bench_insert(c: &mut Criterion) {
    let words = dense_words("abcdefgh", 4);

    let mut group = c.benchmark_group("kilo_trie_insert");
    group.throughput(Throughput::Elements(words.len() as u64));
    group.bench_function("dense_alphabet_8_depth_4", |b| {
        b.iter(|| build_trie(black_box(&words), 1));
    });
    group.finish();
}

criterion_group!(benches, bench_prefix_search, bench_insert);
criterion_main!(benches);
