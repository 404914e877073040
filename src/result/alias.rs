//! Zero-copy views into native result payloads.

use std::sync::Arc;

use super::owned::PayloadOwner;
use crate::util::{host_matches, DataType, Dimensions, Element, Error, MajorOrder, Result, ShapeVec};

/// Typed array aliasing a payload buffer of a native result struct.
///
/// Each alias keeps its owner alive: the struct is freed only after the
/// wrapper it came from and every alias of it are gone.
#[derive(Clone)]
pub struct ArrayAlias {
    owner: Arc<dyn PayloadOwner>,
    slot: usize,
    dtype: DataType,
    shape: Dimensions,
    order: MajorOrder,
}

impl ArrayAlias {
    pub(crate) fn new(
        owner: Arc<dyn PayloadOwner>,
        slot: usize,
        dtype: DataType,
        shape: Dimensions,
        order: MajorOrder,
    ) -> Result<Self> {
        let actual = owner.payload(slot).len();
        let expected = shape
            .checked_num_elements()
            .and_then(|n| n.checked_mul(dtype.num_bytes()));
        if expected != Some(actual) {
            return Err(Error::shape(format!(
                "payload {slot} holds {actual} bytes, not {} {} elements",
                shape, dtype
            )));
        }
        Ok(Self {
            owner,
            slot,
            dtype,
            shape,
            order,
        })
    }

    /// Raw element bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        self.owner.payload(self.slot)
    }

    #[inline]
    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    #[inline]
    pub fn shape(&self) -> &Dimensions {
        &self.shape
    }

    /// Memory layout declared by the owning struct.
    #[inline]
    pub fn order(&self) -> MajorOrder {
        self.order
    }

    /// Element strides for the declared layout.
    pub fn strides(&self) -> ShapeVec {
        self.shape.dense_strides(self.order)
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.shape.num_elements()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements in storage order.
    pub fn as_slice<T: Element>(&self) -> Result<&[T]> {
        if !host_matches::<T>(self.dtype) {
            return Err(Error::TypeMismatch {
                field: format!("payload {}", self.slot),
                expected: self.dtype,
                actual: T::DATA_TYPE,
            });
        }
        bytemuck::try_cast_slice(self.bytes()).map_err(|e| Error::other(format!("payload cast: {e}")))
    }

    /// Copy of the elements in storage order.
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        Ok(self.as_slice::<T>()?.to_vec())
    }

    /// Element at a multi-dimensional index.
    pub fn get<T: Element>(&self, index: &[usize]) -> Result<T> {
        if index.len() != self.shape.rank() {
            return Err(Error::shape(format!(
                "index of rank {} for array of shape {}",
                index.len(),
                self.shape
            )));
        }
        let mut offset = 0;
        for ((&i, &n), s) in index.iter().zip(self.shape.sizes()).zip(self.strides()) {
            if i >= n {
                return Err(Error::shape(format!("index {:?} out of bounds for shape {}", index, self.shape)));
            }
            offset += i * s;
        }
        Ok(self.as_slice::<T>()?[offset])
    }
}

impl std::fmt::Debug for ArrayAlias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayAlias")
            .field("slot", &self.slot)
            .field("dtype", &self.dtype)
            .field("shape", &self.shape)
            .field("order", &self.order)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::NativeBuffer;

    struct Fixed(Vec<NativeBuffer>);

    impl PayloadOwner for Fixed {
        fn payload(&self, slot: usize) -> &[u8] {
            self.0.get(slot).map(NativeBuffer::as_bytes).unwrap_or_default()
        }
    }

    fn owner(values: &[f64]) -> Arc<dyn PayloadOwner> {
        Arc::new(Fixed(vec![NativeBuffer::from_bytes(bytemuck::cast_slice(values))]))
    }

    #[test]
    fn test_alias_reads_in_place() {
        let owner = owner(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let alias = ArrayAlias::new(owner, 0, DataType::Double, Dimensions::d2(2, 3), MajorOrder::RowMajor).unwrap();
        assert_eq!(alias.len(), 6);
        assert_eq!(alias.as_slice::<f64>().unwrap()[5], 6.0);
        assert_eq!(alias.get::<f64>(&[1, 0]).unwrap(), 4.0);
        assert!(alias.get::<f64>(&[2, 0]).is_err());
        assert!(matches!(alias.as_slice::<f32>(), Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn test_column_major_indexing() {
        let owner = owner(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let alias = ArrayAlias::new(owner, 0, DataType::Double, Dimensions::d2(2, 3), MajorOrder::ColumnMajor).unwrap();
        assert_eq!(alias.strides().as_slice(), &[1, 2]);
        assert_eq!(alias.get::<f64>(&[1, 0]).unwrap(), 2.0);
        assert_eq!(alias.get::<f64>(&[0, 2]).unwrap(), 5.0);
    }

    #[test]
    fn test_size_checked() {
        let owner = owner(&[1.0, 2.0]);
        assert!(ArrayAlias::new(owner.clone(), 0, DataType::Double, Dimensions::d1(3), MajorOrder::RowMajor).is_err());

        let huge = Dimensions::from_slice(&[usize::MAX / 4, 2]);
        assert!(matches!(
            ArrayAlias::new(owner, 0, DataType::Double, huge, MajorOrder::RowMajor),
            Err(Error::InvalidShape(_))
        ));
    }
}
