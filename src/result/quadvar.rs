//! Structured-grid variable results.

use std::sync::Arc;

use super::{ArrayAlias, Owned, PayloadOwner};
use crate::native::{Centering, NativeLibrary, NativeQuadvar};
use crate::util::{DataType, Dimensions, Error, MajorOrder, Result};

/// A variable on a structured mesh read back from a database.
#[derive(Clone)]
pub struct QuadVar {
    inner: Arc<Owned<NativeQuadvar>>,
}

impl QuadVar {
    pub(crate) fn new(data: Box<NativeQuadvar>, library: Arc<dyn NativeLibrary>) -> Self {
        Self {
            inner: Arc::new(Owned::new(data, library)),
        }
    }

    fn raw(&self) -> &NativeQuadvar {
        self.inner.get()
    }

    pub fn id(&self) -> i32 {
        self.raw().id
    }

    pub fn name(&self) -> Option<&str> {
        self.raw().name.as_deref()
    }

    pub fn units(&self) -> Option<&str> {
        self.raw().units.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.raw().label.as_deref()
    }

    pub fn cycle(&self) -> i32 {
        self.raw().cycle
    }

    pub fn meshid(&self) -> i32 {
        self.raw().meshid
    }

    pub fn meshname(&self) -> Option<&str> {
        self.raw().meshname.as_deref()
    }

    pub fn datatype(&self) -> Result<DataType> {
        self.inner.element_type(self.raw().datatype)
    }

    /// Elements per component.
    pub fn nels(&self) -> i32 {
        self.raw().nels
    }

    /// Number of components.
    pub fn nvals(&self) -> usize {
        self.raw().nvals.max(0) as usize
    }

    pub fn ndims(&self) -> usize {
        self.raw().ndims.clamp(0, 3) as usize
    }

    pub fn dims(&self) -> Vec<usize> {
        self.raw().dims[..self.ndims()].iter().map(|&d| d.max(0) as usize).collect()
    }

    pub fn major_order(&self) -> MajorOrder {
        MajorOrder::from_raw(self.raw().major_order)
    }

    pub fn stride(&self) -> [i32; 3] {
        self.raw().stride
    }

    pub fn min_index(&self) -> [i32; 3] {
        self.raw().min_index
    }

    pub fn max_index(&self) -> [i32; 3] {
        self.raw().max_index
    }

    pub fn origin(&self) -> i32 {
        self.raw().origin
    }

    pub fn time(&self) -> f32 {
        self.raw().time
    }

    pub fn dtime(&self) -> f64 {
        self.raw().dtime
    }

    pub fn align(&self) -> [f32; 3] {
        self.raw().align
    }

    pub fn mixlen(&self) -> i32 {
        self.raw().mixlen
    }

    pub fn use_specmf(&self) -> i32 {
        self.raw().use_specmf
    }

    pub fn ascii_labels(&self) -> i32 {
        self.raw().ascii_labels
    }

    pub fn guihide(&self) -> i32 {
        self.raw().guihide
    }

    pub fn centering(&self) -> Option<Centering> {
        Centering::from_raw(self.raw().centering)
    }

    /// Component arrays shaped `dims`, aliasing the native buffers.
    pub fn vals(&self) -> Result<Vec<ArrayAlias>> {
        let dtype = self.datatype()?;
        let shape = Dimensions::from_slice(&self.dims());
        let order = self.major_order();
        let nvals = self.nvals();
        if self.raw().vals.len() < nvals {
            return Err(Error::other(format!(
                "variable declares {nvals} components but holds {}",
                self.raw().vals.len()
            )));
        }

        (0..nvals)
            .map(|slot| {
                let owner: Arc<dyn PayloadOwner> = self.inner.clone();
                ArrayAlias::new(owner, slot, dtype, shape.clone(), order)
            })
            .collect()
    }
}

impl std::fmt::Debug for QuadVar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuadVar")
            .field("name", &self.name())
            .field("meshname", &self.meshname())
            .field("dims", &self.dims())
            .field("nvals", &self.nvals())
            .finish_non_exhaustive()
    }
}
