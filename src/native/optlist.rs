//! Native option list: `(key, pointer)` entries referencing caller storage.

use std::ffi::CStr;
use std::ptr::NonNull;

use super::codes::E_BADARGS;
use super::NativeResult;

#[derive(Clone, Copy, Debug)]
struct OptEntry {
    key: i32,
    ptr: NonNull<u8>,
    len: usize,
}

/// Fixed-size list of options, each pointing at a value owned elsewhere.
///
/// The list never copies values. Whoever adds an entry guarantees the bytes
/// stay valid and unmoved for as long as this list is alive.
#[derive(Debug)]
pub struct NativeOptlist {
    max: usize,
    entries: Vec<OptEntry>,
}

impl NativeOptlist {
    /// Allocate a list of at most `max` options. Returns `None` for `max == 0`.
    pub fn new(max: usize) -> Option<Self> {
        if max == 0 {
            return None;
        }
        Some(Self {
            max,
            entries: Vec::with_capacity(max),
        })
    }

    /// Maximum number of entries.
    #[inline]
    pub fn max_options(&self) -> usize {
        self.max
    }

    /// Number of entries added.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.max
    }

    /// Record an option pointing at `len` bytes at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `len` bytes, and must stay valid and
    /// unmodified for the whole lifetime of this list.
    pub unsafe fn add_option(&mut self, key: i32, ptr: NonNull<u8>, len: usize) -> NativeResult {
        if self.is_full() {
            return Err(E_BADARGS);
        }
        self.entries.push(OptEntry { key, ptr, len });
        Ok(())
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = i32> + '_ {
        self.entries.iter().map(|e| e.key)
    }

    /// Raw bytes stored for `key` (first match wins).
    pub fn get_raw(&self, key: i32) -> Option<&[u8]> {
        let entry = self.entries.iter().find(|e| e.key == key)?;
        // SAFETY: guaranteed by the `add_option` contract.
        Some(unsafe { std::slice::from_raw_parts(entry.ptr.as_ptr(), entry.len) })
    }

    pub fn get_int(&self, key: i32) -> Option<i32> {
        let raw = self.get_raw(key)?;
        Some(i32::from_ne_bytes(raw.get(..4)?.try_into().ok()?))
    }

    pub fn get_float(&self, key: i32) -> Option<f32> {
        let raw = self.get_raw(key)?;
        Some(f32::from_ne_bytes(raw.get(..4)?.try_into().ok()?))
    }

    pub fn get_double(&self, key: i32) -> Option<f64> {
        let raw = self.get_raw(key)?;
        Some(f64::from_ne_bytes(raw.get(..8)?.try_into().ok()?))
    }

    /// NUL-terminated string stored for `key`.
    pub fn get_str(&self, key: i32) -> Option<String> {
        let raw = self.get_raw(key)?;
        let s = CStr::from_bytes_until_nul(raw).ok()?;
        Some(s.to_string_lossy().into_owned())
    }

    pub fn get_ints(&self, key: i32) -> Option<Vec<i32>> {
        let raw = self.get_raw(key)?;
        Some(
            raw.chunks_exact(4)
                .map(|c| i32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        )
    }
}
