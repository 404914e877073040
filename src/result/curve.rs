//! Curve results.

use std::sync::Arc;

use super::{ArrayAlias, Owned, PayloadOwner};
use crate::native::{NativeCurve, NativeLibrary};
use crate::util::{DataType, Dimensions, MajorOrder, Result};

/// A curve read back from a database: `npts` (x, y) pairs plus labels.
///
/// Cloning is cheap; clones share the native struct.
#[derive(Clone)]
pub struct Curve {
    inner: Arc<Owned<NativeCurve>>,
}

impl Curve {
    pub(crate) fn new(data: Box<NativeCurve>, library: Arc<dyn NativeLibrary>) -> Self {
        Self {
            inner: Arc::new(Owned::new(data, library)),
        }
    }

    fn raw(&self) -> &NativeCurve {
        self.inner.get()
    }

    pub fn id(&self) -> i32 {
        self.raw().id
    }

    pub fn origin(&self) -> i32 {
        self.raw().origin
    }

    pub fn title(&self) -> Option<&str> {
        self.raw().title.as_deref()
    }

    pub fn xvarname(&self) -> Option<&str> {
        self.raw().xvarname.as_deref()
    }

    pub fn yvarname(&self) -> Option<&str> {
        self.raw().yvarname.as_deref()
    }

    pub fn xlabel(&self) -> Option<&str> {
        self.raw().xlabel.as_deref()
    }

    pub fn ylabel(&self) -> Option<&str> {
        self.raw().ylabel.as_deref()
    }

    pub fn xunits(&self) -> Option<&str> {
        self.raw().xunits.as_deref()
    }

    pub fn yunits(&self) -> Option<&str> {
        self.raw().yunits.as_deref()
    }

    pub fn reference(&self) -> Option<&str> {
        self.raw().reference.as_deref()
    }

    /// Element type of both coordinate arrays.
    pub fn datatype(&self) -> Result<DataType> {
        self.inner.element_type(self.raw().datatype)
    }

    pub fn npts(&self) -> usize {
        self.raw().npts.max(0) as usize
    }

    /// X values, aliasing the native buffer.
    pub fn x(&self) -> Result<ArrayAlias> {
        self.alias(0)
    }

    /// Y values, aliasing the native buffer.
    pub fn y(&self) -> Result<ArrayAlias> {
        self.alias(1)
    }

    fn alias(&self, slot: usize) -> Result<ArrayAlias> {
        let owner: Arc<dyn PayloadOwner> = self.inner.clone();
        ArrayAlias::new(
            owner,
            slot,
            self.datatype()?,
            Dimensions::d1(self.npts()),
            MajorOrder::RowMajor,
        )
    }
}

impl std::fmt::Debug for Curve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Curve")
            .field("npts", &self.npts())
            .field("title", &self.title())
            .field("xlabel", &self.xlabel())
            .field("ylabel", &self.ylabel())
            .finish_non_exhaustive()
    }
}
