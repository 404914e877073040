//! Option lists - typed auxiliary metadata attached to put operations.
//!
//! An [`OptionList`] pairs a [`NativeOptlist`] with the [`OptionArena`] its
//! entries point into. Values are encoded at the width the native library
//! reads them with; see [`OptionList::add`].

mod arena;
pub mod keys;

pub use arena::OptionArena;
pub use keys::*;

use smallvec::SmallVec;

use crate::native::codes::{E_BADARGS, E_NOMEM};
use crate::native::NativeOptlist;
use crate::util::{Error, Result};

/// A value accepted by [`OptionList::add`].
#[derive(Clone, Debug, PartialEq)]
pub enum OptionValue {
    Int(i32),
    Float(f64),
    Str(String),
    Ints(Vec<i32>),
}

impl OptionValue {
    /// Encode the value the way the native list expects it under `key`.
    fn encode(&self, key: i32) -> SmallVec<[u8; 32]> {
        match self {
            Self::Int(v) => SmallVec::from_slice(&v.to_ne_bytes()),
            Self::Float(v) if key == DOUBLE_PRECISION_KEY => SmallVec::from_slice(&v.to_ne_bytes()),
            Self::Float(v) => SmallVec::from_slice(&(*v as f32).to_ne_bytes()),
            Self::Str(s) => {
                let mut bytes = SmallVec::with_capacity(s.len() + 1);
                bytes.extend_from_slice(s.as_bytes());
                bytes.push(0);
                bytes
            }
            Self::Ints(vs) => vs.iter().flat_map(|v| v.to_ne_bytes()).collect(),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Ints(_) => "int tuple",
        }
    }
}

impl From<i32> for OptionValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for OptionValue {
    fn from(v: f32) -> Self {
        Self::Float(v as f64)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<i32>> for OptionValue {
    fn from(v: Vec<i32>) -> Self {
        Self::Ints(v)
    }
}

impl From<&[i32]> for OptionValue {
    fn from(v: &[i32]) -> Self {
        Self::Ints(v.to_vec())
    }
}

impl<const N: usize> From<[i32; N]> for OptionValue {
    fn from(v: [i32; N]) -> Self {
        Self::Ints(v.to_vec())
    }
}

/// Option list plus the storage its entries point into.
///
/// Pass `&OptionList` to put operations; borrowing guarantees the storage
/// outlives the native call that reads it.
pub struct OptionList {
    // Declared before `arena` so the pointer list is dropped first.
    native: NativeOptlist,
    arena: OptionArena,
}

impl OptionList {
    /// Per-option arena budget used by [`OptionList::from_pairs`].
    pub const BYTES_PER_OPTION: usize = 150;

    /// Create a list of at most `max_options` entries backed by
    /// `arena_bytes` bytes of value storage.
    pub fn new(max_options: usize, arena_bytes: usize) -> Result<Self> {
        let native = NativeOptlist::new(max_options).ok_or(Error::native("DBMakeOptlist", E_NOMEM))?;
        Ok(Self {
            native,
            arena: OptionArena::new(arena_bytes),
        })
    }

    /// Build a list from `(key, value)` pairs, sized generously: one spare
    /// slot and [`Self::BYTES_PER_OPTION`] bytes per slot.
    pub fn from_pairs<I, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (i32, V)>,
        V: Into<OptionValue>,
    {
        let pairs: Vec<(i32, OptionValue)> = pairs.into_iter().map(|(k, v)| (k, v.into())).collect();
        let count = pairs.len() + 1;
        let mut list = Self::new(count, count * Self::BYTES_PER_OPTION)?;
        for (key, value) in pairs {
            list.add(key, value)?;
        }
        Ok(list)
    }

    /// Add an option. Fails without side effects if the list is full or the
    /// encoded value does not fit the remaining arena space.
    ///
    /// Floating values are stored as `f32`, except under
    /// [`DOUBLE_PRECISION_KEY`], which keeps `f64`.
    pub fn add(&mut self, key: i32, value: impl Into<OptionValue>) -> Result<()> {
        let value = value.into();
        if self.native.is_full() {
            return Err(Error::native("DBAddOption", E_BADARGS));
        }
        let bytes = value.encode(key);
        let ptr = self.arena.push(&bytes)?;

        // SAFETY: the arena never moves or rewrites pushed bytes and is
        // dropped after `native`.
        unsafe { self.native.add_option(key, ptr, bytes.len()) }
            .map_err(|code| Error::native("DBAddOption", code))?;

        tracing::trace!(
            key,
            kind = value.kind_name(),
            expected = ?kind_of(key),
            bytes = bytes.len(),
            "option added"
        );
        Ok(())
    }

    /// The native list handed to put operations.
    #[inline]
    pub fn native(&self) -> &NativeOptlist {
        &self.native
    }

    /// Number of options added.
    #[inline]
    pub fn len(&self) -> usize {
        self.native.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.native.is_empty()
    }

    #[inline]
    pub fn max_options(&self) -> usize {
        self.native.max_options()
    }

    /// Arena capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Arena bytes in use.
    #[inline]
    pub fn occupied(&self) -> usize {
        self.arena.occupied()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.arena.remaining()
    }
}

impl std::fmt::Debug for OptionList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionList")
            .field("len", &self.len())
            .field("max_options", &self.max_options())
            .field("arena", &self.arena)
            .finish()
    }
}

/// Native list of an optional option list.
pub(crate) fn native_of(optlist: Option<&OptionList>) -> Option<&NativeOptlist> {
    optlist.map(OptionList::native)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_options_then_exhausted() {
        let mut ol = OptionList::new(5, 16).unwrap();
        ol.add(DBOPT_CYCLE, 10).unwrap();
        ol.add(DBOPT_ORIGIN, 1).unwrap();
        assert_eq!(ol.occupied(), 8);

        let err = ol.add(DBOPT_BASEINDEX, [0, 0, 0]).unwrap_err();
        assert!(matches!(err, Error::ArenaExhausted { requested: 12, .. }));
        assert_eq!(ol.occupied(), 8);
        assert_eq!(ol.len(), 2);
    }

    #[test]
    fn test_float_narrowing() {
        let mut ol = OptionList::new(4, 64).unwrap();
        ol.add(DBOPT_TIME, 1.5f64).unwrap();
        assert_eq!(ol.occupied(), 4);
        ol.add(DBOPT_DTIME, 0.1f64).unwrap();
        assert_eq!(ol.occupied(), 12);

        assert_eq!(ol.native().get_float(DBOPT_TIME), Some(1.5));
        assert_eq!(ol.native().get_double(DBOPT_DTIME), Some(0.1));
    }

    #[test]
    fn test_string_includes_nul() {
        let mut ol = OptionList::new(2, 32).unwrap();
        ol.add(DBOPT_XLABEL, "time").unwrap();
        assert_eq!(ol.occupied(), 5);
        assert_eq!(ol.native().get_str(DBOPT_XLABEL).as_deref(), Some("time"));
    }

    #[test]
    fn test_int_tuple() {
        let mut ol = OptionList::new(2, 32).unwrap();
        ol.add(DBOPT_BASEINDEX, vec![1, 2, 3]).unwrap();
        assert_eq!(ol.occupied(), 12);
        assert_eq!(ol.native().get_ints(DBOPT_BASEINDEX), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_full_list_is_atomic() {
        let mut ol = OptionList::new(1, 64).unwrap();
        ol.add(DBOPT_CYCLE, 1).unwrap();
        let err = ol.add(DBOPT_ORIGIN, 0).unwrap_err();
        assert!(matches!(err, Error::NativeCallFailed { entry: "DBAddOption", .. }));
        assert_eq!(ol.occupied(), 4);
    }

    #[test]
    fn test_from_pairs() {
        let ol = OptionList::from_pairs([
            (DBOPT_CYCLE, OptionValue::Int(5)),
            (DBOPT_UNITS, OptionValue::from("cm")),
        ])
        .unwrap();
        assert_eq!(ol.max_options(), 3);
        assert_eq!(ol.capacity(), 3 * OptionList::BYTES_PER_OPTION);
        assert_eq!(ol.native().get_int(DBOPT_CYCLE), Some(5));
        assert_eq!(ol.native().get_str(DBOPT_UNITS).as_deref(), Some("cm"));
    }

    #[test]
    fn test_zero_max_options() {
        assert!(matches!(
            OptionList::new(0, 16),
            Err(Error::NativeCallFailed { entry: "DBMakeOptlist", .. })
        ));
    }
}
