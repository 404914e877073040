//! Turning host arrays into per-axis / per-component native arrays.
//!
//! Nothing here copies element data. Each helper validates shapes and types
//! and returns borrowed [`NativeArray`]s that point into the caller's storage.

use smallvec::SmallVec;

use super::ArrayView;
use crate::native::NativeArray;
use crate::util::{DataType, Dimensions, Element, Error, Result};

/// Start arrays of the rows of a `(ndims, count)` coordinate array.
#[derive(Clone, Debug)]
pub struct CoordRows<'a> {
    /// Number of spatial axes (size of axis 0)
    pub ndims: usize,
    /// Nodes or points per axis (size of axis 1)
    pub count: usize,
    pub dtype: DataType,
    pub rows: SmallVec<[NativeArray<'a>; 3]>,
}

/// Validated components of one field.
#[derive(Clone, Debug)]
pub struct Components<'a> {
    pub dtype: DataType,
    /// Elements per component
    pub count: usize,
    pub arrays: SmallVec<[NativeArray<'a>; 4]>,
}

impl Components<'_> {
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }
}

/// Split a 2-D coordinate array into one native array per axis.
///
/// Row `d` starts at element `d * stride[0]`; rows themselves must be
/// contiguous.
pub fn decompose_coords<'a>(field: &str, view: &ArrayView<'a>) -> Result<CoordRows<'a>> {
    if view.rank() != 2 {
        return Err(Error::shape(format!(
            "{field}: coordinate array must have exactly 2 dimensions, got {}",
            view.rank()
        )));
    }
    let sizes = view.shape().sizes();
    let (ndims, count) = (sizes[0], sizes[1]);
    let strides = view.strides();
    if count > 1 && strides[1] != 1 {
        return Err(Error::shape(format!(
            "{field}: coordinate rows must be contiguous (row stride {})",
            strides[1]
        )));
    }

    let rows = (0..ndims)
        .map(|d| view.span(d * strides[0], count))
        .collect::<Result<_>>()?;
    Ok(CoordRows {
        ndims,
        count,
        dtype: view.dtype(),
        rows,
    })
}

/// Common element type of a list of components.
///
/// Returns `None` for an empty list.
pub fn component_dtype(field: &str, components: &[ArrayView<'_>]) -> Result<Option<DataType>> {
    let Some(first) = components.first() else {
        return Ok(None);
    };
    let expected = first.dtype();
    if let Some(other) = components.iter().find(|c| c.dtype() != expected) {
        return Err(Error::TypeMismatch {
            field: field.to_string(),
            expected,
            actual: other.dtype(),
        });
    }
    Ok(Some(expected))
}

/// Validate the components of one field as arrays of `T` and borrow their
/// storage.
///
/// All components must have `T`'s element type and the element count of the
/// first component. An empty list yields an empty [`Components`].
pub fn decompose_components<'a, T: Element>(field: &str, components: &[ArrayView<'a>]) -> Result<Components<'a>> {
    if let Some(dtype) = component_dtype(field, components)? {
        if dtype != T::DATA_TYPE {
            return Err(Error::TypeMismatch {
                field: field.to_string(),
                expected: T::DATA_TYPE,
                actual: dtype,
            });
        }
    }

    let count = components.first().map_or(0, ArrayView::len);
    let mut arrays = SmallVec::with_capacity(components.len());
    for component in components {
        if component.len() != count {
            return Err(Error::length(field, count, component.len()));
        }
        arrays.push(component.as_native().map_err(|_| {
            Error::shape(format!("{field}: components must be contiguous"))
        })?);
    }

    Ok(Components {
        dtype: T::DATA_TYPE,
        count,
        arrays,
    })
}

/// Check a structured-grid dims sequence against its data array and convert
/// it to native ints.
pub fn validate_dims(field: &str, dims: &[usize], data: &ArrayView<'_>) -> Result<SmallVec<[i32; 3]>> {
    if dims.is_empty() || dims.len() > 3 {
        return Err(Error::shape(format!(
            "{field}: dims must have 1 to 3 entries, got {}",
            dims.len()
        )));
    }
    if data.rank() > 1 && data.rank() != dims.len() {
        return Err(Error::shape(format!(
            "{field}: dims has {} entries but data has {} dimensions",
            dims.len(),
            data.rank()
        )));
    }
    let product = Dimensions::from_slice(dims)
        .checked_num_elements()
        .ok_or_else(|| Error::shape(format!("{field}: dims {:?} overflow", dims)))?;
    if product != data.len() {
        return Err(Error::shape(format!(
            "{field}: dims {:?} describe {} elements, data has {}",
            dims,
            product,
            data.len()
        )));
    }
    dims.iter().map(|&d| native_count(field, d)).collect()
}

/// Element count as a native int.
pub fn native_count(field: &str, n: usize) -> Result<i32> {
    i32::try_from(n).map_err(|_| Error::shape(format!("{field}: count {n} exceeds native int range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coords_rows_point_into_storage() {
        // 2 axes x 4 nodes
        let data = [0.0f64, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0];
        let view = ArrayView::with_shape(&data, (2, 4)).unwrap();
        let rows = decompose_coords("coords", &view).unwrap();
        assert_eq!(rows.ndims, 2);
        assert_eq!(rows.count, 4);
        assert_eq!(rows.rows[0].as_ptr(), data.as_ptr() as *const u8);
        assert_eq!(rows.rows[1].as_ptr(), data[4..].as_ptr() as *const u8);
    }

    #[test]
    fn test_coords_rank_checked() {
        let data = [0.0f32; 6];
        let flat = ArrayView::from_slice(&data);
        assert!(matches!(decompose_coords("coords", &flat), Err(Error::InvalidShape(_))));

        let cube = ArrayView::with_shape(&data, vec![1, 2, 3]).unwrap();
        assert!(matches!(decompose_coords("coords", &cube), Err(Error::InvalidShape(_))));
    }

    #[test]
    fn test_coords_strided_rows_rejected() {
        let data = [0.0f32; 8];
        // 2 rows of 4 with column stride 2: transposed storage
        let view = ArrayView::strided(&data, (2, 4), &[1, 2]).unwrap();
        assert!(decompose_coords("coords", &view).is_err());
    }

    #[test]
    fn test_component_length_mismatch() {
        let a = [1.0f32; 10];
        let b = [2.0f32; 9];
        let comps = [ArrayView::from_slice(&a), ArrayView::from_slice(&b)];
        match decompose_components::<f32>("velocity", &comps) {
            Err(Error::LengthMismatch { field, expected, actual }) => {
                assert_eq!(field, "velocity");
                assert_eq!(expected, 10);
                assert_eq!(actual, 9);
            }
            other => panic!("expected length mismatch, got {other:?}"),
        };
    }

    #[test]
    fn test_component_type_mismatch() {
        let a = [1.0f32; 3];
        let b = [2.0f64; 3];
        let comps = [ArrayView::from_slice(&a), ArrayView::from_slice(&b)];
        assert!(matches!(
            component_dtype("v", &comps),
            Err(Error::TypeMismatch { expected: DataType::Float, actual: DataType::Double, .. })
        ));
        assert!(component_dtype("v", &[]).unwrap().is_none());
    }

    #[test]
    fn test_components_borrow() {
        let a = [1.0f64, 2.0];
        let b = [3.0f64, 4.0];
        let comps = [ArrayView::from_slice(&a), ArrayView::from_slice(&b)];
        let c = decompose_components::<f64>("v", &comps).unwrap();
        assert_eq!(c.count, 2);
        assert_eq!(c.len(), 2);
        assert_eq!(c.arrays[1].as_ptr(), b.as_ptr() as *const u8);

        let empty = decompose_components::<f64>("v", &[]).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_validate_dims() {
        let data = [0.0f32; 12];
        let flat = ArrayView::from_slice(&data);
        assert_eq!(validate_dims("q", &[3, 4], &flat).unwrap().as_slice(), &[3, 4]);
        assert!(validate_dims("q", &[3, 5], &flat).is_err());
        assert!(validate_dims("q", &[], &flat).is_err());
        assert!(validate_dims("q", &[1, 1, 3, 4], &flat).is_err());

        let grid = ArrayView::with_shape(&data, (3, 4)).unwrap();
        assert!(validate_dims("q", &[12], &grid).is_err());
        assert!(validate_dims("q", &[3, 4], &grid).is_ok());

        assert!(matches!(
            validate_dims("q", &[usize::MAX, 2, 2], &flat),
            Err(Error::InvalidShape(_))
        ));
    }
}
