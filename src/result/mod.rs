//! Owned results read back from a database.
//!
//! Result wrappers own the native struct they came from and release it
//! through the library exactly once. Array accessors hand out
//! [`ArrayAlias`] views that reference the native payloads in place.

mod alias;
mod curve;
mod owned;
mod quadmesh;
mod quadvar;
mod toc;

pub use alias::ArrayAlias;
pub use curve::Curve;
pub use owned::{NativeStruct, Owned};
pub(crate) use owned::PayloadOwner;
pub use quadmesh::QuadMesh;
pub use quadvar::QuadVar;
pub use toc::{TableOfContents, TocList};
