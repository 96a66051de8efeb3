// Copyright (c) 2025 Kilo Search Authors
//
// Licensed under the MIT License (LICENSE or https://opensource.org/licenses/MIT)

//! Fixed-size worker pool with an idle-slot free list.
//!
//! The pool never creates more than `size` concurrent workers. Slots are
//! plain integer ids; a slot is either sitting in the idle queue or owned by
//! exactly one running traversal. All claim and release bookkeeping is
//! serialized through one mutex, and a condition variable wakes anyone
//! waiting for the pool to drain.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::io;
use std::thread::{self, JoinHandle};

/// Identifier of a worker slot, in `0..size`.
pub type WorkerId = usize;

/// A fixed collection of worker slots plus the queue of idle ones.
#[derive(Debug)]
pub struct WorkerPool {
    /// Total number of slots
    size: usize,

    /// Slots not currently running a traversal
    idle: Mutex<VecDeque<WorkerId>>,

    /// Signalled whenever the idle queue becomes full
    drained: Condvar,

    /// Join handle of the thread most recently started in each slot
    handles: Vec<Mutex<Option<JoinHandle<()>>>>,
}

impl WorkerPool {
    /// Creates a pool with `size` idle slots. A size of zero is raised to one.
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            size,
            idle: Mutex::new((0..size).collect()),
            drained: Condvar::new(),
            handles: (0..size).map(|_| Mutex::new(None)).collect(),
        }
    }

    /// Total number of slots in the pool.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of slots currently idle.
    ///
    /// In a concurrent environment this value may be immediately outdated.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    /// Claims one idle slot, or returns `None` if every slot is busy.
    ///
    /// Safe under concurrent callers: a given id is handed to exactly one of
    /// them.
    pub fn reserve(&self) -> Option<WorkerId> {
        self.idle.lock().pop_front()
    }

    /// Returns a slot to the idle queue.
    ///
    /// If this release makes the pool fully idle, `on_drained` runs while
    /// the idle lock is still held, so exactly one releaser observes the
    /// transition. Returns `true` for that releaser.
    ///
    /// Waiters are notified before `on_drained` runs. They wake once the
    /// lock is dropped, even if `on_drained` panics.
    pub fn release<F>(&self, id: WorkerId, on_drained: F) -> bool
    where
        F: FnOnce(),
    {
        let mut idle = self.idle.lock();
        debug_assert!(id < self.size, "worker id {id} out of range");
        debug_assert!(!idle.contains(&id), "worker {id} released twice");
        idle.push_back(id);

        if idle.len() == self.size {
            self.drained.notify_all();
            on_drained();
            true
        } else {
            false
        }
    }

    /// Blocks until every slot is back in the idle queue.
    pub fn wait_until_idle(&self) {
        let mut idle = self.idle.lock();
        while idle.len() < self.size {
            self.drained.wait(&mut idle);
        }
    }

    /// Starts `task` on a new thread bound to slot `id`.
    ///
    /// The caller must have reserved `id`. Any thread previously started in
    /// this slot has already released it, so joining it here only waits for
    /// that thread to unwind.
    pub fn spawn<F>(&self, id: WorkerId, task: F) -> io::Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut slot = self.handles[id].lock();
        if let Some(previous) = slot.take() {
            if previous.join().is_err() {
                tracing::warn!(worker = id, "Previous worker thread panicked");
            }
        }

        let handle = thread::Builder::new()
            .name(format!("kilo-worker-{id}"))
            .spawn(task)?;
        *slot = Some(handle);
        Ok(())
    }

    /// Joins every thread the pool has started.
    ///
    /// Callers should wait for the pool to drain first; joining a slot that
    /// is still traversing blocks until it finishes.
    pub fn join_all(&self) {
        for (id, slot) in self.handles.iter().enumerate() {
            if let Some(handle) = slot.lock().take() {
                if handle.join().is_err() {
                    tracing::warn!(worker = id, "Worker thread panicked");
                }
            }
        }
    }
}
