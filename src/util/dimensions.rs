//! Array shapes and memory layout.
//!
//! [`Dimensions`] describes the shape of an array view or a result alias;
//! [`MajorOrder`] says which index varies fastest in memory.

use smallvec::SmallVec;

/// Inline capacity for shape/stride vectors. Structured grids are at most 3-D.
pub type ShapeVec = SmallVec<[usize; 4]>;

/// Memory layout of a multi-dimensional array.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MajorOrder {
    /// Last index varies fastest (C order)
    #[default]
    RowMajor,
    /// First index varies fastest (Fortran order)
    ColumnMajor,
}

/// Option value selecting row-major layout.
pub const DB_ROWMAJOR: i32 = 0;
/// Option value selecting column-major layout.
pub const DB_COLMAJOR: i32 = 1;

impl MajorOrder {
    /// Layout for the `major_order` value stored in native structs and
    /// passed through `DBOPT_MAJORORDER`.
    pub fn from_raw(v: i32) -> Self {
        if v == DB_COLMAJOR {
            Self::ColumnMajor
        } else {
            Self::RowMajor
        }
    }

    pub const fn as_raw(self) -> i32 {
        match self {
            Self::RowMajor => DB_ROWMAJOR,
            Self::ColumnMajor => DB_COLMAJOR,
        }
    }
}

/// Dimensions of a multi-dimensional array.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dimensions {
    /// Size of each dimension. Empty means scalar (rank 0).
    dims: ShapeVec,
}

impl Dimensions {
    /// Create scalar dimensions (rank 0).
    pub fn scalar() -> Self {
        Self { dims: SmallVec::new() }
    }

    /// Create 1D dimensions.
    pub fn d1(size: usize) -> Self {
        Self { dims: smallvec::smallvec![size] }
    }

    /// Create 2D dimensions.
    pub fn d2(rows: usize, cols: usize) -> Self {
        Self { dims: smallvec::smallvec![rows, cols] }
    }

    /// Create from a slice of sizes.
    pub fn from_slice(sizes: &[usize]) -> Self {
        Self { dims: SmallVec::from_slice(sizes) }
    }

    /// Get the rank (number of dimensions).
    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Get the size of a specific dimension.
    pub fn size(&self, dim: usize) -> Option<usize> {
        self.dims.get(dim).copied()
    }

    /// Get all dimension sizes as a slice.
    pub fn sizes(&self) -> &[usize] {
        &self.dims
    }

    /// Total number of elements (product of all dimensions), saturating at
    /// `usize::MAX`.
    pub fn num_elements(&self) -> usize {
        self.checked_num_elements().unwrap_or(usize::MAX)
    }

    /// Total number of elements, or `None` if it does not fit in `usize`.
    /// Any zero extent makes the count zero.
    pub fn checked_num_elements(&self) -> Option<usize> {
        if self.dims.contains(&0) {
            return Some(0);
        }
        self.dims.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n))
    }

    /// Check if this represents a scalar (rank 0).
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }

    /// Element strides of a dense array of this shape in the given layout.
    pub fn dense_strides(&self, order: MajorOrder) -> ShapeVec {
        let mut strides: ShapeVec = smallvec::smallvec![0; self.dims.len()];
        let mut acc = 1usize;
        match order {
            MajorOrder::RowMajor => {
                for (stride, &size) in strides.iter_mut().zip(&self.dims).rev() {
                    *stride = acc;
                    acc = acc.saturating_mul(size);
                }
            }
            MajorOrder::ColumnMajor => {
                for (stride, &size) in strides.iter_mut().zip(&self.dims) {
                    *stride = acc;
                    acc = acc.saturating_mul(size);
                }
            }
        }
        strides
    }
}

impl From<usize> for Dimensions {
    fn from(size: usize) -> Self {
        Self::d1(size)
    }
}

impl From<(usize, usize)> for Dimensions {
    fn from((r, c): (usize, usize)) -> Self {
        Self::d2(r, c)
    }
}

impl From<&[usize]> for Dimensions {
    fn from(v: &[usize]) -> Self {
        Self::from_slice(v)
    }
}

impl From<Vec<usize>> for Dimensions {
    fn from(v: Vec<usize>) -> Self {
        Self { dims: SmallVec::from_vec(v) }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, s) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, " x ")?;
            }
            write!(f, "{}", s)?;
        }
        write!(f, "]")
    }
}
