//! Structured-grid mesh results.

use std::sync::Arc;

use super::{ArrayAlias, Owned, PayloadOwner};
use crate::native::{CoordSystem, CoordType, NativeLibrary, NativeQuadmesh};
use crate::util::{DataType, Dimensions, Error, MajorOrder, Result};

/// A structured (quad) mesh read back from a database.
#[derive(Clone)]
pub struct QuadMesh {
    inner: Arc<Owned<NativeQuadmesh>>,
}

impl QuadMesh {
    pub(crate) fn new(data: Box<NativeQuadmesh>, library: Arc<dyn NativeLibrary>) -> Self {
        Self {
            inner: Arc::new(Owned::new(data, library)),
        }
    }

    fn raw(&self) -> &NativeQuadmesh {
        self.inner.get()
    }

    pub fn id(&self) -> i32 {
        self.raw().id
    }

    pub fn block_no(&self) -> i32 {
        self.raw().block_no
    }

    pub fn group_no(&self) -> i32 {
        self.raw().group_no
    }

    pub fn name(&self) -> Option<&str> {
        self.raw().name.as_deref()
    }

    pub fn cycle(&self) -> i32 {
        self.raw().cycle
    }

    pub fn coord_sys(&self) -> Option<CoordSystem> {
        CoordSystem::from_raw(self.raw().coord_sys)
    }

    pub fn major_order(&self) -> MajorOrder {
        MajorOrder::from_raw(self.raw().major_order)
    }

    pub fn stride(&self) -> [i32; 3] {
        self.raw().stride
    }

    pub fn coordtype(&self) -> Option<CoordType> {
        CoordType::from_raw(self.raw().coordtype)
    }

    pub fn facetype(&self) -> i32 {
        self.raw().facetype
    }

    pub fn planar(&self) -> i32 {
        self.raw().planar
    }

    pub fn datatype(&self) -> Result<DataType> {
        self.inner.element_type(self.raw().datatype)
    }

    pub fn time(&self) -> f32 {
        self.raw().time
    }

    pub fn dtime(&self) -> f64 {
        self.raw().dtime
    }

    pub fn min_extents(&self) -> [f32; 3] {
        self.raw().min_extents
    }

    pub fn max_extents(&self) -> [f32; 3] {
        self.raw().max_extents
    }

    /// Axis labels; unset entries are `None`.
    pub fn labels(&self) -> [Option<&str>; 3] {
        let labels = &self.raw().labels;
        [labels[0].as_deref(), labels[1].as_deref(), labels[2].as_deref()]
    }

    pub fn units(&self) -> [Option<&str>; 3] {
        let units = &self.raw().units;
        [units[0].as_deref(), units[1].as_deref(), units[2].as_deref()]
    }

    pub fn ndims(&self) -> usize {
        self.raw().ndims.clamp(0, 3) as usize
    }

    pub fn nspace(&self) -> i32 {
        self.raw().nspace
    }

    pub fn nnodes(&self) -> i32 {
        self.raw().nnodes
    }

    /// Nodes per axis, `ndims` entries.
    pub fn dims(&self) -> Vec<usize> {
        self.raw().dims[..self.ndims()].iter().map(|&d| d.max(0) as usize).collect()
    }

    pub fn origin(&self) -> i32 {
        self.raw().origin
    }

    pub fn min_index(&self) -> [i32; 3] {
        self.raw().min_index
    }

    pub fn max_index(&self) -> [i32; 3] {
        self.raw().max_index
    }

    pub fn base_index(&self) -> [i32; 3] {
        self.raw().base_index
    }

    pub fn start_index(&self) -> [i32; 3] {
        self.raw().start_index
    }

    pub fn size_index(&self) -> [i32; 3] {
        self.raw().size_index
    }

    pub fn guihide(&self) -> i32 {
        self.raw().guihide
    }

    pub fn mrgtree_name(&self) -> Option<&str> {
        self.raw().mrgtree_name.as_deref()
    }

    /// Coordinate arrays, one per axis, aliasing the native buffers.
    ///
    /// Collinear meshes yield one 1-D array of `dims[i]` values per axis;
    /// non-collinear meshes yield arrays shaped like the whole grid.
    pub fn coords(&self) -> Result<Vec<ArrayAlias>> {
        let dtype = self.datatype()?;
        let dims = self.dims();
        let order = self.major_order();
        let coordtype = self
            .coordtype()
            .ok_or_else(|| Error::other(format!("unknown coordinate type {}", self.raw().coordtype)))?;
        if self.raw().coords.len() < dims.len() {
            return Err(Error::other(format!(
                "mesh has {} coordinate arrays for {} axes",
                self.raw().coords.len(),
                dims.len()
            )));
        }

        (0..dims.len())
            .map(|axis| {
                let shape = match coordtype {
                    CoordType::Collinear => Dimensions::d1(dims[axis]),
                    CoordType::NonCollinear => Dimensions::from_slice(&dims),
                };
                let owner: Arc<dyn PayloadOwner> = self.inner.clone();
                ArrayAlias::new(owner, axis, dtype, shape, order)
            })
            .collect()
    }
}

impl std::fmt::Debug for QuadMesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuadMesh")
            .field("name", &self.name())
            .field("dims", &self.dims())
            .field("coordtype", &self.coordtype())
            .field("cycle", &self.cycle())
            .finish_non_exhaustive()
    }
}
