//! Utility types shared by every layer.
//!
//! - [`DataType`] / [`Element`] - element type bridge
//! - [`Dimensions`] / [`MajorOrder`] - shapes and layout
//! - [`Error`] / [`Result`] - error handling

mod dtype;
mod error;
mod dimensions;

pub use dtype::*;
pub use error::*;
pub use dimensions::*;
