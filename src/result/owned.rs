//! Ownership of native-allocated result structs.

use std::mem::ManuallyDrop;
use std::sync::Arc;

use crate::native::{
    Capabilities, NativeBuffer, NativeCurve, NativeLibrary, NativeQuadmesh, NativeQuadvar, NativeResult,
};
use crate::util::{DataType, Result};

/// A struct returned by a native getter, with its matching free routine.
pub trait NativeStruct: Send + Sync + Sized + 'static {
    /// Object kind, for diagnostics.
    const KIND: &'static str;

    /// Release through the library's free routine for this kind.
    fn free(library: &dyn NativeLibrary, this: Box<Self>) -> NativeResult;

    /// Payload buffer number `slot`.
    fn payload(&self, slot: usize) -> Option<&NativeBuffer>;
}

impl NativeStruct for NativeCurve {
    const KIND: &'static str = "Curve";

    fn free(library: &dyn NativeLibrary, this: Box<Self>) -> NativeResult {
        library.free_curve(this)
    }

    fn payload(&self, slot: usize) -> Option<&NativeBuffer> {
        match slot {
            0 => Some(&self.x),
            1 => Some(&self.y),
            _ => None,
        }
    }
}

impl NativeStruct for NativeQuadmesh {
    const KIND: &'static str = "Quadmesh";

    fn free(library: &dyn NativeLibrary, this: Box<Self>) -> NativeResult {
        library.free_quadmesh(this)
    }

    fn payload(&self, slot: usize) -> Option<&NativeBuffer> {
        self.coords.get(slot)
    }
}

impl NativeStruct for NativeQuadvar {
    const KIND: &'static str = "Quadvar";

    fn free(library: &dyn NativeLibrary, this: Box<Self>) -> NativeResult {
        library.free_quadvar(this)
    }

    fn payload(&self, slot: usize) -> Option<&NativeBuffer> {
        self.vals.get(slot)
    }
}

/// Exclusive owner of one native struct. Frees it exactly once, on drop.
pub struct Owned<S: NativeStruct> {
    data: ManuallyDrop<Box<S>>,
    library: Arc<dyn NativeLibrary>,
}

impl<S: NativeStruct> Owned<S> {
    pub fn new(data: Box<S>, library: Arc<dyn NativeLibrary>) -> Self {
        Self {
            data: ManuallyDrop::new(data),
            library,
        }
    }

    #[inline]
    pub fn get(&self) -> &S {
        &self.data
    }

    /// Element type for a datatype tag of this struct, as far as the
    /// library that allocated it can store it.
    pub fn element_type(&self, tag: i32) -> Result<DataType> {
        let dtype = DataType::from_tag(tag)?;
        Capabilities::from_version(self.library.version()).check_type(dtype)?;
        Ok(dtype)
    }
}

impl<S: NativeStruct> Drop for Owned<S> {
    fn drop(&mut self) {
        // SAFETY: `data` is taken exactly once, here, and never touched again.
        let data = unsafe { ManuallyDrop::take(&mut self.data) };
        match S::free(self.library.as_ref(), data) {
            Ok(()) => tracing::trace!(kind = S::KIND, "native struct freed"),
            Err(code) => tracing::warn!(kind = S::KIND, code, "native free failed"),
        }
    }
}

/// Type-erased access to payload buffers, held by aliases.
pub(crate) trait PayloadOwner: Send + Sync {
    fn payload(&self, slot: usize) -> &[u8];
}

impl<S: NativeStruct> PayloadOwner for Owned<S> {
    fn payload(&self, slot: usize) -> &[u8] {
        self.get().payload(slot).map(NativeBuffer::as_bytes).unwrap_or_default()
    }
}
