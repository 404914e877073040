//! Fixed-capacity byte arena backing option values.
//!
//! The native option list stores raw pointers to option values rather than
//! copies, so the bytes must never move once written. The arena allocates
//! its buffer exactly once and only ever appends.

use std::ptr::NonNull;

use crate::util::{Error, Result};

/// Append-only byte storage with a hard capacity.
///
/// All pointers handed out by [`OptionArena::push`] are derived from one
/// base pointer and stay valid until the arena is dropped.
pub struct OptionArena {
    base: NonNull<u8>,
    capacity: usize,
    occupied: usize,
}

impl OptionArena {
    /// Allocate an arena of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        let buf: Box<[u8]> = vec![0u8; capacity].into_boxed_slice();
        let raw = Box::into_raw(buf) as *mut u8;
        // Box never yields a null pointer, even for zero-length slices.
        let base = NonNull::new(raw).unwrap_or(NonNull::dangling());
        Self {
            base,
            capacity,
            occupied: 0,
        }
    }

    /// Total capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes written so far.
    #[inline]
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    /// Bytes still available.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.occupied
    }

    /// Check whether `len` more bytes would fit.
    #[inline]
    pub fn fits(&self, len: usize) -> bool {
        len <= self.remaining()
    }

    /// Copy `bytes` to the end of the arena and return a pointer to them.
    ///
    /// Fails without writing anything if the bytes do not fit.
    pub fn push(&mut self, bytes: &[u8]) -> Result<NonNull<u8>> {
        if !self.fits(bytes.len()) {
            return Err(Error::ArenaExhausted {
                requested: bytes.len(),
                occupied: self.occupied,
                capacity: self.capacity,
            });
        }

        // SAFETY: occupied + len <= capacity, so the destination range lies
        // inside the allocation, and it does not overlap the caller's slice.
        let dest = unsafe {
            let dest = self.base.as_ptr().add(self.occupied);
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), dest, bytes.len());
            NonNull::new_unchecked(dest)
        };
        self.occupied += bytes.len();
        Ok(dest)
    }

    /// The occupied prefix of the arena.
    pub fn contents(&self) -> &[u8] {
        // SAFETY: the first `occupied` bytes are initialised and in bounds.
        unsafe { std::slice::from_raw_parts(self.base.as_ptr(), self.occupied) }
    }
}

impl Drop for OptionArena {
    fn drop(&mut self) {
        // SAFETY: base/capacity describe the boxed slice leaked in `new`.
        unsafe {
            let slice = std::ptr::slice_from_raw_parts_mut(self.base.as_ptr(), self.capacity);
            drop(Box::from_raw(slice));
        }
    }
}

impl std::fmt::Debug for OptionArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionArena")
            .field("capacity", &self.capacity)
            .field("occupied", &self.occupied)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_push_until_full() {
        let mut arena = OptionArena::new(16);
        arena.push(&1i32.to_ne_bytes()).unwrap();
        arena.push(&2i32.to_ne_bytes()).unwrap();
        assert_eq!(arena.occupied(), 8);

        let err = arena.push(&[0u8; 12]).unwrap_err();
        assert!(matches!(
            err,
            Error::ArenaExhausted { requested: 12, occupied: 8, capacity: 16 }
        ));
        assert_eq!(arena.occupied(), 8);

        arena.push(&[7u8; 8]).unwrap();
        assert_eq!(arena.remaining(), 0);
    }

    #[test]
    fn test_pointers_stay_valid() {
        let mut arena = OptionArena::new(64);
        let first = arena.push(b"label\0").unwrap();
        for _ in 0..10 {
            arena.push(&[0xAB; 4]).unwrap();
        }
        let read = unsafe { std::slice::from_raw_parts(first.as_ptr(), 6) };
        assert_eq!(read, b"label\0");
        assert_eq!(&arena.contents()[..6], b"label\0");
    }

    #[test]
    fn test_zero_capacity() {
        let mut arena = OptionArena::new(0);
        assert!(arena.push(&[]).is_ok());
        assert!(arena.push(&[1]).is_err());
    }

    proptest! {
        #[test]
        fn prop_occupied_never_exceeds_capacity(
            capacity in 0usize..256,
            sizes in proptest::collection::vec(0usize..40, 0..20),
        ) {
            let mut arena = OptionArena::new(capacity);
            for size in sizes {
                let before = arena.occupied();
                match arena.push(&vec![1u8; size]) {
                    Ok(_) => prop_assert_eq!(arena.occupied(), before + size),
                    Err(_) => {
                        prop_assert!(before + size > capacity);
                        prop_assert_eq!(arena.occupied(), before);
                    }
                }
                prop_assert!(arena.occupied() <= capacity);
            }
        }
    }
}
