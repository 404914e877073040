//! Argument blocks for native put entry points.
//!
//! Every array argument is a [`NativeArray`]: a borrowed start pointer, an
//! element count and a type tag. Nothing here owns array contents.

use crate::util::{DataType, Element};

use super::types::{Centering, CoordType};
use super::NativeOptlist;

/// Borrowed, contiguous run of elements handed to the native library.
#[derive(Clone, Copy, Debug)]
pub struct NativeArray<'a> {
    dtype: DataType,
    len: usize,
    bytes: &'a [u8],
}

impl<'a> NativeArray<'a> {
    /// View a typed slice.
    pub fn from_slice<T: Element>(data: &'a [T]) -> Self {
        Self {
            dtype: T::DATA_TYPE,
            len: data.len(),
            bytes: bytemuck::cast_slice(data),
        }
    }

    /// View raw bytes holding `len` elements of `dtype`.
    ///
    /// Returns `None` if the byte count does not match.
    pub fn from_bytes(dtype: DataType, len: usize, bytes: &'a [u8]) -> Option<Self> {
        (bytes.len() == len * dtype.num_bytes()).then_some(Self { dtype, len, bytes })
    }

    #[inline]
    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Address of the first element.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr()
    }
}

/// `DBPutZonelist`
#[derive(Clone, Copy, Debug)]
pub struct ZonelistArgs<'a> {
    pub name: &'a str,
    pub nzones: i32,
    pub ndims: i32,
    pub nodelist: &'a [i32],
    pub origin: i32,
    pub shapesize: &'a [i32],
    pub shapecounts: &'a [i32],
}

/// `DBPutZonelist2` - zonelist with shape types and ghost-zone offsets.
#[derive(Clone, Copy, Debug)]
pub struct Zonelist2Args<'a> {
    pub name: &'a str,
    pub nzones: i32,
    pub ndims: i32,
    pub nodelist: &'a [i32],
    pub origin: i32,
    pub lo_offset: i32,
    pub hi_offset: i32,
    pub shapetype: &'a [i32],
    pub shapesize: &'a [i32],
    pub shapecounts: &'a [i32],
}

/// `DBPutUcdmesh`
#[derive(Clone, Copy, Debug)]
pub struct UcdmeshArgs<'a> {
    pub name: &'a str,
    pub coordnames: &'a [&'a str],
    pub coords: &'a [NativeArray<'a>],
    pub nnodes: i32,
    pub nzones: i32,
    pub zonel_name: Option<&'a str>,
    pub facel_name: Option<&'a str>,
    pub datatype: DataType,
}

/// `DBPutUcdvar` / `DBPutUcdvar1`
#[derive(Clone, Copy, Debug)]
pub struct UcdvarArgs<'a> {
    pub name: &'a str,
    pub meshname: &'a str,
    pub varnames: &'a [&'a str],
    pub vars: &'a [NativeArray<'a>],
    pub nels: i32,
    pub datatype: DataType,
    pub centering: Centering,
}

/// `DBPutPointmesh`
#[derive(Clone, Copy, Debug)]
pub struct PointmeshArgs<'a> {
    pub name: &'a str,
    pub coords: &'a [NativeArray<'a>],
    pub npoints: i32,
    pub datatype: DataType,
}

/// `DBPutPointvar` / `DBPutPointvar1`
#[derive(Clone, Copy, Debug)]
pub struct PointvarArgs<'a> {
    pub name: &'a str,
    pub meshname: &'a str,
    pub vars: &'a [NativeArray<'a>],
    pub nels: i32,
    pub datatype: DataType,
}

/// `DBPutQuadmesh`
#[derive(Clone, Copy, Debug)]
pub struct QuadmeshArgs<'a> {
    pub name: &'a str,
    pub coordnames: &'a [&'a str],
    pub coords: &'a [NativeArray<'a>],
    pub dims: &'a [i32],
    pub datatype: DataType,
    pub coordtype: CoordType,
}

/// `DBPutQuadvar` / `DBPutQuadvar1`
#[derive(Clone, Copy, Debug)]
pub struct QuadvarArgs<'a> {
    pub name: &'a str,
    pub meshname: &'a str,
    pub varnames: &'a [&'a str],
    pub vars: &'a [NativeArray<'a>],
    pub dims: &'a [i32],
    pub datatype: DataType,
    pub centering: Centering,
}

/// `DBPutCurve`
#[derive(Clone, Copy, Debug)]
pub struct CurveArgs<'a> {
    pub name: &'a str,
    pub x: NativeArray<'a>,
    pub y: NativeArray<'a>,
    pub datatype: DataType,
    pub npts: i32,
}

/// `DBPutMultimesh` / `DBPutMultivar`
#[derive(Clone, Copy, Debug)]
pub struct MultiArgs<'a> {
    pub name: &'a str,
    pub names: &'a [&'a str],
    pub types: &'a [i32],
}

/// `DBPutDefvars`
#[derive(Clone, Copy, Debug)]
pub struct DefvarsArgs<'a> {
    pub name: &'a str,
    pub names: &'a [&'a str],
    pub types: &'a [i32],
    pub defs: &'a [&'a str],
    pub opts: &'a [Option<&'a NativeOptlist>],
}
