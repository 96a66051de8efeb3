// Copyright (c) 2025 Kilo Search Authors
//
// Licensed under the MIT License (LICENSE or https://opensource.org/licenses/MIT)

//! Kilo Trie: prefix search with branch-parallel traversal.
//!
//! The trie stores a static word dictionary and answers prefix queries by
//! walking the subtree below the prefix node. Work is split only at branch
//! points (nodes with two or more children): each branch tries to claim an
//! idle slot from a fixed [`WorkerPool`], and when none is free the current
//! worker walks that branch itself. Unbranching chains are followed inline,
//! so a skewed trie degrades to a single depth-first worker instead of
//! exhausting the pool.
//!
//! # Sessions
//!
//! Every [`KiloTrie::find_prefix_matches`] call is one session. Starting a
//! session cancels and drains the previous one, clears the result buffer,
//! and dispatches a single worker at the prefix node. The worker whose
//! release leaves the pool fully idle delivers the accumulated matches to the
//! registered completion handler, exactly once.
//!
//! # Concurrency Safety
//!
//! * **Idle list**: claim and release are serialized by the pool mutex, and
//!   completion delivery happens under that same lock.
//! * **Results**: appends go through a separate mutex and are never done
//!   while the idle lock is held.
//! * **Nodes**: read-only during a session and shared through an `Arc` of the
//!   root; workers hold no node locks.
//! * **Cancellation**: a relaxed-ordering flag re-checked before every fan-out
//!   decision. In-flight subtrees are never aborted, and a cancelled session
//!   still completes and is delivered with whatever it collected.
//!
//! # Example
//!
//! ```
//! use kilo_search_lib::data_structures::kilo_trie::{KiloTrie, KiloTrieConfig};
//! use std::sync::{mpsc, Mutex};
//!
//! let mut trie = KiloTrie::with_config(KiloTrieConfig::new().with_worker_count(2));
//! for word in ["cat", "car", "cart", "dog"] {
//!     trie.insert(word).unwrap();
//! }
//!
//! let (tx, rx) = mpsc::channel();
//! let tx = Mutex::new(tx);
//! trie.set_on_complete(move |words: &[String]| {
//!     let _ = tx.lock().unwrap().send(words.to_vec());
//! });
//!
//! trie.find_prefix_matches("ca").unwrap();
//! let mut words = rx.recv().unwrap();
//! words.sort();
//! assert_eq!(words, vec!["car", "cart", "cat"]);
//! ```

mod error;
mod node;
mod pool;

#[cfg(test)]
mod tests;

use parking_lot::{Mutex, RwLock};
use std::borrow::Cow;
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};

pub use error::KiloTrieError;
pub use node::TrieNode;
pub use pool::{WorkerId, WorkerPool};

/// Result type for Kilo Trie operations
pub type KiloTrieResult<T> = Result<T, KiloTrieError>;

/// Handler invoked with the complete match list of a finished session.
pub type CompletionHandler = Arc<dyn Fn(&[String]) + Send + Sync>;

/// Configuration options for the Kilo Trie
#[derive(Debug, Clone)]
pub struct KiloTrieConfig {
    /// Number of worker slots in the traversal pool (minimum 1)
    pub worker_count: usize,

    /// Whether words and prefixes are matched case-sensitively
    pub case_sensitive: bool,
}

impl KiloTrieConfig {
    /// Create a new default configuration.
    ///
    /// Default values:
    /// - worker_count: number of logical CPUs
    /// - case_sensitive: true
    pub fn new() -> Self {
        Self {
            worker_count: num_cpus::get(),
            case_sensitive: true,
        }
    }

    /// Set the number of worker slots. Zero is raised to one.
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count.max(1);
        self
    }

    /// Set whether matching is case-sensitive.
    ///
    /// When disabled, words and prefixes are lowercased before use.
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }
}

impl Default for KiloTrieConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// How a call to [`KiloTrie::find_prefix_matches`] started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStart {
    /// A worker was dispatched; completion arrives through the handler.
    Dispatched {
        /// Identifier of the new session
        session: u64,
    },

    /// No word starts with the prefix; the handler already ran with an
    /// empty list.
    NoMatch,

    /// No idle worker was available, so nothing was started and the handler
    /// will not run for this call.
    PoolExhausted,
}

/// State shared between the driving thread and every worker thread.
struct SearchState {
    /// Worker slots and the idle free list
    pool: WorkerPool,

    /// Matches accumulated by the current session
    results: Mutex<Vec<String>>,

    /// Set while a session is being cancelled
    cancel: AtomicBool,

    /// Handler receiving each completed session's matches
    on_complete: RwLock<CompletionHandler>,

    /// Identifier of the most recently started session
    session: AtomicU64,

    /// Helper workers handed a branch during the current session
    handoffs: AtomicUsize,
}

impl SearchState {
    fn new(worker_count: usize) -> Self {
        Self {
            pool: WorkerPool::new(worker_count),
            results: Mutex::new(Vec::new()),
            cancel: AtomicBool::new(false),
            on_complete: RwLock::new(Arc::new(|_: &[String]| {})),
            session: AtomicU64::new(0),
            handoffs: AtomicUsize::new(0),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    fn push_result(&self, word: String) {
        self.results.lock().push(word);
    }

    fn deliver(&self, results: &[String]) {
        let handler = Arc::clone(&self.on_complete.read());
        handler(results);
    }

    /// Returns `worker` to the pool and delivers the session if it was the
    /// last one out.
    fn release_worker(&self, worker: WorkerId, session: u64) {
        let drained = self.pool.release(worker, || {
            let results = self.results.lock().clone();
            debug!(
                session,
                matches = results.len(),
                helpers = self.handoffs.load(Ordering::Relaxed),
                cancelled = self.is_cancelled(),
                "Session complete"
            );
            self.deliver(&results);
        });
        trace!(session, worker, drained, "Worker released");
    }
}

impl fmt::Debug for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchState")
            .field("pool", &self.pool)
            .field("results", &self.results.lock().len())
            .field("cancel", &self.is_cancelled())
            .field("session", &self.session.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Releases a reserved worker slot when dropped, including on unwind.
struct WorkerLease {
    state: Arc<SearchState>,
    worker: WorkerId,
    session: u64,
}

impl Drop for WorkerLease {
    fn drop(&mut self) {
        self.state.release_worker(self.worker, self.session);
    }
}

/// Everything a worker thread needs to walk part of one session.
#[derive(Clone)]
struct Traversal {
    state: Arc<SearchState>,
    root: Arc<TrieNode>,
    session: u64,
}

impl Traversal {
    /// Starts a thread on the reserved slot `worker`, walking the subtree
    /// reached by `path`.
    fn hand_off(&self, worker: WorkerId, path: String) -> io::Result<()> {
        trace!(session = self.session, worker, path = %path, "Dispatching worker");
        let traversal = self.clone();
        self.state
            .pool
            .spawn(worker, move || traversal.run(worker, path))
    }

    /// Like [`hand_off`](Self::hand_off), for a helper claimed at a branch.
    fn hand_off_branch(&self, worker: WorkerId, path: String) -> io::Result<()> {
        self.hand_off(worker, path)?;
        self.state.handoffs.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Worker thread body.
    fn run(self, worker: WorkerId, path: String) {
        let lease = WorkerLease {
            state: Arc::clone(&self.state),
            worker,
            session: self.session,
        };
        if let Some(node) = self.root.descend(&path) {
            self.traverse(node, path, worker);
        }
        // The root handle must be gone before the slot is released, so a
        // drained pool implies the trie is uniquely owned again.
        drop(self);
        drop(lease);
    }

    fn traverse(&self, mut node: &TrieNode, mut path: String, worker: WorkerId) {
        loop {
            if node.is_leaf {
                self.state.push_result(path.clone());
            }

            if node.is_branch_point() {
                self.fan_out(node, &path, worker);
                return;
            }

            // Single child: keep going on this worker.
            let Some((c, child)) = node.children.iter().next() else {
                return;
            };
            path.push(*c);
            node = child;
        }
    }

    fn fan_out(&self, node: &TrieNode, path: &str, worker: WorkerId) {
        for (c, child) in node.sorted_children() {
            if self.state.is_cancelled() {
                trace!(session = self.session, worker, "Fan-out stopped by cancellation");
                break;
            }

            let mut child_path = String::with_capacity(path.len() + c.len_utf8());
            child_path.push_str(path);
            child_path.push(c);

            let Some(helper) = self.state.pool.reserve() else {
                self.traverse(child, child_path, worker);
                continue;
            };

            if let Err(err) = self.hand_off_branch(helper, child_path.clone()) {
                warn!(
                    session = self.session,
                    worker = helper,
                    error = %err,
                    "Failed to spawn helper, walking branch inline"
                );
                self.state.release_worker(helper, self.session);
                self.traverse(child, child_path, worker);
            }
        }
    }
}

/// Kilo Trie is a word dictionary with concurrent prefix search.
///
/// Key features:
/// * Fan-out only at branch points, bounded by a fixed worker pool
/// * Overflow branches absorbed by the current worker when the pool is busy
/// * Cooperative cancellation of the previous session on every new query
/// * Completion delivered once per session, by callback or by polling
#[derive(Debug)]
pub struct KiloTrie {
    /// The root node of the trie
    root: Arc<TrieNode>,

    /// Pool, results and completion handler shared with workers
    state: Arc<SearchState>,

    /// Number of distinct words stored
    word_count: usize,

    /// Configuration options
    config: KiloTrieConfig,
}

impl KiloTrie {
    /// Creates a new empty `KiloTrie` with default configuration.
    pub fn new() -> Self {
        Self::with_config(KiloTrieConfig::default())
    }

    /// Creates a new empty `KiloTrie` with the specified configuration.
    pub fn with_config(config: KiloTrieConfig) -> Self {
        let config = KiloTrieConfig {
            worker_count: config.worker_count.max(1),
            ..config
        };
        Self {
            root: Arc::new(TrieNode::new()),
            state: Arc::new(SearchState::new(config.worker_count)),
            word_count: 0,
            config,
        }
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &KiloTrieConfig {
        &self.config
    }

    fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.config.case_sensitive {
            Cow::Borrowed(text)
        } else {
            Cow::Owned(text.to_lowercase())
        }
    }

    /// Inserts a word into the trie.
    ///
    /// Waits for any running session to finish before mutating, so it is
    /// safe to call between searches.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The word was new.
    /// * `Ok(false)` - The word was already present; the trie is unchanged.
    /// * `Err(KiloTrieError::EmptyWord)` - The word was empty.
    pub fn insert<W>(&mut self, word: W) -> KiloTrieResult<bool>
    where
        W: AsRef<str>,
    {
        let word = self.normalize(word.as_ref());
        if word.is_empty() {
            return Err(KiloTrieError::EmptyWord);
        }

        self.state.pool.wait_until_idle();

        let root = Arc::make_mut(&mut self.root);
        let node = word
            .chars()
            .fold(root, |node, c| node.children.entry(c).or_default());

        let is_new = !node.is_leaf;
        node.is_leaf = true;
        if is_new {
            self.word_count += 1;
        }
        Ok(is_new)
    }

    /// Checks whether `word` is stored as a complete word.
    pub fn contains<W>(&self, word: W) -> bool
    where
        W: AsRef<str>,
    {
        let word = self.normalize(word.as_ref());
        self.root
            .descend(&word)
            .map_or(false, |node| node.is_leaf)
    }

    /// Returns the number of distinct words in the trie.
    pub fn len(&self) -> usize {
        self.word_count
    }

    /// Checks if the trie holds no words.
    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    /// Number of worker slots in the pool.
    pub fn worker_count(&self) -> usize {
        self.state.pool.size()
    }

    /// Number of worker slots currently idle.
    pub fn idle_workers(&self) -> usize {
        self.state.pool.idle_count()
    }

    /// Registers the handler that receives each completed session's matches.
    ///
    /// The handler runs on whichever worker finishes last, while the pool
    /// lock is held. It must not start a new search or query the pool from
    /// inside the call. Hand the words off (for example over a channel)
    /// instead.
    pub fn set_on_complete<F>(&self, handler: F)
    where
        F: Fn(&[String]) + Send + Sync + 'static,
    {
        *self.state.on_complete.write() = Arc::new(handler);
    }

    /// Starts a prefix search session.
    ///
    /// Any running session is cancelled and drained first, and the result
    /// buffer is cleared. Matches are delivered asynchronously to the
    /// handler registered with [`set_on_complete`](Self::set_on_complete),
    /// or can be polled with [`request_result`](Self::request_result) after
    /// [`wait_until_idle`](Self::wait_until_idle).
    ///
    /// # Returns
    ///
    /// * `Ok(SessionStart)` - How the session started.
    /// * `Err(KiloTrieError::WorkerSpawn)` - The first worker thread could
    ///   not be started.
    pub fn find_prefix_matches<P>(&self, prefix: P) -> KiloTrieResult<SessionStart>
    where
        P: AsRef<str>,
    {
        let prefix = self.normalize(prefix.as_ref());

        self.stop_all_workers();
        self.state.results.lock().clear();
        self.state.handoffs.store(0, Ordering::Relaxed);
        let session = self.state.session.fetch_add(1, Ordering::Relaxed) + 1;

        if self.root.descend(&prefix).is_none() {
            debug!(session, prefix = %prefix, "Prefix not found");
            self.state.deliver(&[]);
            return Ok(SessionStart::NoMatch);
        }

        let Some(worker) = self.state.pool.reserve() else {
            warn!(session, prefix = %prefix, "No idle worker to start session");
            return Ok(SessionStart::PoolExhausted);
        };

        debug!(session, prefix = %prefix, worker, "Starting session");
        let traversal = Traversal {
            state: Arc::clone(&self.state),
            root: Arc::clone(&self.root),
            session,
        };
        if let Err(source) = traversal.hand_off(worker, prefix.into_owned()) {
            self.state.pool.release(worker, || {});
            return Err(KiloTrieError::WorkerSpawn { worker, source });
        }

        Ok(SessionStart::Dispatched { session })
    }

    /// Returns a snapshot of the matches collected so far.
    pub fn request_result(&self) -> Vec<String> {
        self.state.results.lock().clone()
    }

    /// Cancels the running session and blocks until every worker is idle.
    ///
    /// Workers stop handing off new branches as soon as they see the flag,
    /// but subtrees already claimed run to completion. The cancelled session
    /// still reaches the completion handler once, with the matches collected
    /// before the cut-off.
    pub fn stop_all_workers(&self) {
        self.state.cancel.store(true, Ordering::Relaxed);
        self.state.pool.wait_until_idle();
        self.state.cancel.store(false, Ordering::Relaxed);
    }

    /// Blocks until the running session (if any) has finished, without
    /// cancelling it.
    pub fn wait_until_idle(&self) {
        self.state.pool.wait_until_idle();
    }
}

impl Default for KiloTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for KiloTrie {
    fn drop(&mut self) {
        self.stop_all_workers();
        self.state.pool.join_all();
    }
}
