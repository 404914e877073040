//! Dynamically typed, borrowed views over caller-owned numeric storage.

use crate::native::NativeArray;
use crate::util::{host_matches, DataType, Dimensions, Element, Error, MajorOrder, Result, ShapeVec};

/// Read-only view over a slice of numeric elements with a shape and
/// element strides.
///
/// Views never own or copy their elements; they are the host-side input of
/// every put operation.
#[derive(Clone, Debug)]
pub struct ArrayView<'a> {
    dtype: DataType,
    shape: Dimensions,
    strides: ShapeVec,
    bytes: &'a [u8],
}

impl<'a> ArrayView<'a> {
    /// One-dimensional view of a whole slice.
    pub fn from_slice<T: Element>(data: &'a [T]) -> Self {
        Self {
            dtype: T::DATA_TYPE,
            shape: Dimensions::d1(data.len()),
            strides: smallvec::smallvec![1],
            bytes: bytemuck::cast_slice(data),
        }
    }

    /// Dense C-order view of `data` with the given shape.
    pub fn with_shape<T: Element>(data: &'a [T], shape: impl Into<Dimensions>) -> Result<Self> {
        let shape = shape.into();
        if shape.checked_num_elements() != Some(data.len()) || shape.is_scalar() {
            return Err(Error::shape(format!(
                "shape {} does not match {} elements",
                shape,
                data.len()
            )));
        }
        let strides = shape.dense_strides(MajorOrder::RowMajor);
        Ok(Self {
            dtype: T::DATA_TYPE,
            shape,
            strides,
            bytes: bytemuck::cast_slice(data),
        })
    }

    /// View with explicit element strides. Every addressed element must lie
    /// inside `data`.
    pub fn strided<T: Element>(data: &'a [T], shape: impl Into<Dimensions>, strides: &[usize]) -> Result<Self> {
        let shape = shape.into();
        if shape.is_scalar() || strides.len() != shape.rank() {
            return Err(Error::shape(format!(
                "{} strides given for shape {}",
                strides.len(),
                shape
            )));
        }
        let count = shape
            .checked_num_elements()
            .ok_or_else(|| Error::shape(format!("shape {} overflows", shape)))?;
        if count > 0 {
            let last = shape
                .sizes()
                .iter()
                .zip(strides)
                .try_fold(0usize, |acc, (&n, &s)| (n - 1).checked_mul(s)?.checked_add(acc))
                .ok_or_else(|| Error::shape(format!("strides {:?} overflow for shape {}", strides, shape)))?;
            if last >= data.len() {
                return Err(Error::shape(format!(
                    "strided view of shape {} reaches element {} of {}",
                    shape,
                    last,
                    data.len()
                )));
            }
        }
        Ok(Self {
            dtype: T::DATA_TYPE,
            shape,
            strides: strides.iter().copied().collect(),
            bytes: bytemuck::cast_slice(data),
        })
    }

    /// Dense C-order view over raw bytes of a known element type.
    pub fn from_bytes(dtype: DataType, shape: impl Into<Dimensions>, bytes: &'a [u8]) -> Result<Self> {
        let shape = shape.into();
        if dtype == DataType::NoType || shape.is_scalar() {
            return Err(Error::shape(format!("cannot view {} bytes as {} {}", bytes.len(), shape, dtype)));
        }
        let expected = shape
            .checked_num_elements()
            .and_then(|n| n.checked_mul(dtype.num_bytes()));
        if expected != Some(bytes.len()) {
            return Err(Error::shape(format!(
                "{} bytes do not hold {} {} elements",
                bytes.len(),
                shape,
                dtype
            )));
        }
        let strides = shape.dense_strides(MajorOrder::RowMajor);
        Ok(Self { dtype, shape, strides, bytes })
    }

    #[inline]
    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    #[inline]
    pub fn shape(&self) -> &Dimensions {
        &self.shape
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Element strides, one per axis.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Number of addressed elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.shape.num_elements()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if the addressed elements are a dense C-order prefix of storage.
    pub fn is_c_contiguous(&self) -> bool {
        let dense = self.shape.dense_strides(MajorOrder::RowMajor);
        self.shape
            .sizes()
            .iter()
            .zip(self.strides.iter().zip(&dense))
            .all(|(&n, (&s, &d))| n <= 1 || s == d)
    }

    /// Elements as a typed slice, if `T` matches and the view is dense.
    pub fn typed<T: Element>(&self) -> Option<&'a [T]> {
        if !host_matches::<T>(self.dtype) || !self.is_c_contiguous() {
            return None;
        }
        let bytes = self.bytes.get(..self.len() * T::SIZE)?;
        bytemuck::try_cast_slice(bytes).ok()
    }

    /// The whole view as one native array. Requires dense storage.
    pub fn as_native(&self) -> Result<NativeArray<'a>> {
        if !self.is_c_contiguous() {
            return Err(Error::shape(format!("array of shape {} is not contiguous", self.shape)));
        }
        self.span(0, self.len())
    }

    /// Native array over `len` elements starting at element `offset`.
    pub(crate) fn span(&self, offset: usize, len: usize) -> Result<NativeArray<'a>> {
        let size = self.dtype.num_bytes();
        let range = offset
            .checked_mul(size)
            .and_then(|start| Some(start..start.checked_add(len.checked_mul(size)?)?));
        let bytes = range
            .and_then(|range| self.bytes.get(range))
            .ok_or_else(|| Error::shape(format!("elements {offset}..{} out of bounds", offset + len)))?;
        NativeArray::from_bytes(self.dtype, len, bytes)
            .ok_or_else(|| Error::other("element span size mismatch"))
    }
}

impl<'a, T: Element> From<&'a [T]> for ArrayView<'a> {
    fn from(data: &'a [T]) -> Self {
        Self::from_slice(data)
    }
}

impl<'a, T: Element> From<&'a Vec<T>> for ArrayView<'a> {
    fn from(data: &'a Vec<T>) -> Self {
        Self::from_slice(data)
    }
}

impl<'a, T: Element, const N: usize> From<&'a [T; N]> for ArrayView<'a> {
    fn from(data: &'a [T; N]) -> Self {
        Self::from_slice(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice() {
        let data = [1.0f32, 2.0, 3.0];
        let view = ArrayView::from_slice(&data);
        assert_eq!(view.dtype(), DataType::Float);
        assert_eq!(view.rank(), 1);
        assert_eq!(view.len(), 3);
        assert!(view.is_c_contiguous());
        assert_eq!(view.typed::<f32>(), Some(&data[..]));
        assert_eq!(view.typed::<f64>(), None);
    }

    #[test]
    fn test_with_shape_checks_count() {
        let data = [0i32; 6];
        let view = ArrayView::with_shape(&data, (2, 3)).unwrap();
        assert_eq!(view.strides(), &[3, 1]);
        assert!(matches!(
            ArrayView::with_shape(&data, (4, 2)),
            Err(Error::InvalidShape(_))
        ));
    }

    #[test]
    fn test_strided_bounds() {
        let data = [0.0f64; 10];
        // every other element of 5
        let view = ArrayView::strided(&data, 5usize, &[2]).unwrap();
        assert!(!view.is_c_contiguous());
        assert!(view.as_native().is_err());
        assert!(view.typed::<f64>().is_none());
        assert!(ArrayView::strided(&data, 6usize, &[2]).is_err());
    }

    #[test]
    fn test_strided_overflow_is_rejected() {
        let data = [0.0f64; 4];
        assert!(matches!(
            ArrayView::strided(&data, 3usize, &[usize::MAX]),
            Err(Error::InvalidShape(_))
        ));
        assert!(matches!(
            ArrayView::strided(&data, (3, 2), &[usize::MAX / 2 + 1, 1]),
            Err(Error::InvalidShape(_))
        ));
        // a single element never advances by its stride
        assert!(ArrayView::strided(&data, 1usize, &[usize::MAX]).is_ok());
    }

    #[test]
    fn test_shape_overflow() {
        let empty: &[f64] = &[];
        let view = ArrayView::with_shape(empty, vec![usize::MAX, 2, 0]).unwrap();
        assert!(view.is_empty());

        let data = [0.0f64; 2];
        assert!(matches!(
            ArrayView::with_shape(&data, vec![usize::MAX, 2]),
            Err(Error::InvalidShape(_))
        ));
        assert!(matches!(
            ArrayView::from_bytes(DataType::Double, vec![usize::MAX / 4, 1], &[0u8; 8]),
            Err(Error::InvalidShape(_))
        ));
    }

    #[test]
    fn test_span_points_into_storage() {
        let data = [1.0f64, 2.0, 3.0, 4.0];
        let view = ArrayView::with_shape(&data, (2, 2)).unwrap();
        let second_row = view.span(2, 2).unwrap();
        assert_eq!(second_row.as_ptr(), data[2..].as_ptr() as *const u8);
        assert_eq!(second_row.len(), 2);
    }

    #[test]
    fn test_from_bytes() {
        let bytes = [0u8; 16];
        let view = ArrayView::from_bytes(DataType::Float, 4usize, &bytes).unwrap();
        assert_eq!(view.len(), 4);
        assert!(ArrayView::from_bytes(DataType::Double, 4usize, &bytes).is_err());
    }
}
