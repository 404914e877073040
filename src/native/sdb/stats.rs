//! Call counters shared by a library and every file it opens.

use std::sync::atomic::{AtomicIsize, AtomicUsize, Ordering};

/// Counts native entry-point invocations.
///
/// Lets callers confirm that rejected arguments never reached the library
/// and that every returned struct was freed.
#[derive(Debug, Default)]
pub struct CallStats {
    puts: AtomicUsize,
    gets: AtomicUsize,
    tocs: AtomicUsize,
    frees: AtomicUsize,
    live: AtomicIsize,
}

impl CallStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_put(&self) {
        self.puts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_get(&self, found: bool) {
        self.gets.fetch_add(1, Ordering::Relaxed);
        if found {
            self.live.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_toc(&self) {
        self.tocs.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_free(&self) {
        self.frees.fetch_add(1, Ordering::Relaxed);
        self.live.fetch_sub(1, Ordering::Relaxed);
    }

    /// Put calls that reached the library, successful or not.
    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::Relaxed)
    }

    /// Getter calls, including ones that found nothing.
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::Relaxed)
    }

    pub fn tocs(&self) -> usize {
        self.tocs.load(Ordering::Relaxed)
    }

    /// Structs released through a free routine.
    pub fn frees(&self) -> usize {
        self.frees.load(Ordering::Relaxed)
    }

    /// Structs handed out and not yet freed.
    pub fn live(&self) -> isize {
        self.live.load(Ordering::Relaxed)
    }

    /// Every counted call on file handles.
    pub fn calls(&self) -> usize {
        self.puts() + self.gets() + self.tocs()
    }
}
