//! Host array views and their decomposition into native arguments.
//!
//! - [`ArrayView`] - borrowed, typed, shaped view over caller storage
//! - [`decompose_coords`] - `(ndims, count)` coordinate array to per-axis rows
//! - [`decompose_components`] - component list to per-component arrays
//! - [`validate_dims`] - structured-grid dims against data

mod decompose;
mod view;

pub use decompose::*;
pub use view::ArrayView;
