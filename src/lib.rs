//! # visfile
//!
//! Marshalling layer between Rust numeric data and a native mesh/field
//! database library: meshes, variables, curves and multi-block indirection
//! are written from borrowed arrays without copying, and objects read back
//! are exposed as zero-copy views that keep the native struct alive.
//!
//! ## Modules
//!
//! - [`util`] - element types, shapes, errors
//! - [`options`] - option lists and their fixed-capacity value arena
//! - [`array`] - typed array views and their decomposition
//! - [`native`] - native library traits and the bundled SDB library
//! - [`result`] - curves, meshes, variables and tables of contents read back
//! - [`db`] - database sessions
//! - [`logging`] - subscriber setup
//!
//! ## Example
//!
//! ```no_run
//! use visfile::prelude::*;
//!
//! # fn main() -> visfile::Result<()> {
//! let mut db = DbFile::create("curves.sdb", &CreateOptions::new().clobber())?;
//!
//! let mut opts = OptionList::new(4, 64)?;
//! opts.add(DBOPT_XLABEL, "time")?;
//! db.put_curve("c1", &[0.0f64, 1.0, 2.0, 3.0], &[0.0f64, 1.0, 4.0, 9.0], Some(&opts))?;
//! db.close()?;
//!
//! let mut db = DbFile::open("curves.sdb", &OpenOptions::read_only())?;
//! let curve = db.get_curve("c1")?;
//! assert_eq!(curve.y()?.as_slice::<f64>()?, &[0.0, 1.0, 4.0, 9.0]);
//! # Ok(())
//! # }
//! ```

pub mod array;
pub mod db;
pub mod logging;
pub mod native;
pub mod options;
pub mod result;
pub mod util;

// Re-export commonly used types
pub use array::ArrayView;
pub use db::{initialize, library_version, set_deprecate_warnings, CreateOptions, DbFile, OpenOptions, ParallelDbFile};
pub use options::{OptionList, OptionValue};
pub use util::{DataType, Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::array::ArrayView;
    pub use crate::db::{CreateOptions, DbFile, DefVar, OpenOptions, ParallelDbFile};
    pub use crate::native::{Centering, CoordSystem, CoordType, ObjectType, VarType, ZoneType};
    pub use crate::options::keys::*;
    pub use crate::options::{OptionList, OptionValue};
    pub use crate::result::{ArrayAlias, Curve, QuadMesh, QuadVar, TableOfContents, TocList};
    pub use crate::util::{DataType, Error, MajorOrder, Result};
}
