//! Dictionary loading.
//!
//! Builds a [`KiloTrie`] from a word list with one word per line. Loading is
//! sequential and finishes before any search starts.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::dictionary::DictionaryConfig;
use crate::config::search::SearchConfig;
use crate::data_structures::kilo_trie::KiloTrie;
use crate::error::{KiloError, KiloResult};

/// Summary of one dictionary load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Lines read from the source
    pub lines_read: usize,

    /// Words that were new to the trie
    pub words_inserted: usize,

    /// Lines that repeated a word already in the trie
    pub duplicates: usize,

    /// Lines that were empty after trimming
    pub blank_lines: usize,
}

/// Loads word lists into a trie.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    options: DictionaryConfig,
}

impl Dictionary {
    /// Creates a loader with the given line-handling options.
    pub fn new(options: DictionaryConfig) -> Self {
        Self { options }
    }

    /// Loads the dictionary named in the options into a new trie.
    pub fn load(&self, search: &SearchConfig) -> KiloResult<(KiloTrie, LoadReport)> {
        let path = self
            .options
            .path
            .as_deref()
            .ok_or_else(|| KiloError::Custom("No dictionary path configured".to_string()))?;
        self.load_path(path, search)
    }

    /// Loads the word list at `path` into a new trie.
    pub fn load_path<P: AsRef<Path>>(
        &self,
        path: P,
        search: &SearchConfig,
    ) -> KiloResult<(KiloTrie, LoadReport)> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let result = self.load_reader(BufReader::new(file), search)?;
        tracing::info!(
            path = %path.display(),
            words = result.1.words_inserted,
            duplicates = result.1.duplicates,
            "Dictionary loaded"
        );
        Ok(result)
    }

    /// Reads words from `reader` into a new trie.
    pub fn load_reader<R: BufRead>(
        &self,
        reader: R,
        search: &SearchConfig,
    ) -> KiloResult<(KiloTrie, LoadReport)> {
        let mut trie = KiloTrie::with_config(search.trie_config());
        let report = self.extend(&mut trie, reader)?;
        Ok((trie, report))
    }

    /// Inserts every word from `reader` into an existing trie.
    pub fn extend<R: BufRead>(&self, trie: &mut KiloTrie, reader: R) -> KiloResult<LoadReport> {
        let mut report = LoadReport::default();

        for line in reader.lines() {
            let line = line?;
            report.lines_read += 1;

            let word = if self.options.trim_whitespace {
                line.trim()
            } else {
                line.as_str()
            };
            if word.is_empty() {
                report.blank_lines += 1;
                continue;
            }

            if trie.insert(word)? {
                report.words_inserted += 1;
            } else {
                report.duplicates += 1;
            }
        }

        tracing::debug!(
            lines = report.lines_read,
            blank = report.blank_lines,
            "Finished reading word list"
        );
        Ok(report)
    }
}
