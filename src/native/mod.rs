//! Boundary with the native database library.
//!
//! The marshalling layer never touches file bytes itself. It talks to a
//! [`NativeLibrary`] (open/create, free routines, version) and to the
//! [`NativeFile`] handles it returns (put/get/toc/close). Every entry point
//! reports failure as a native error code (see [`codes`]).
//!
//! [`sdb`] is the library shipped with this crate. Other implementations
//! (bindings to a system library, test doubles) plug in through the same
//! traits.

mod args;
pub mod codes;
mod optlist;
pub mod sdb;
mod structs;
mod types;
mod version;

pub use args::*;
pub use optlist::NativeOptlist;
pub use structs::*;
pub use types::*;
pub use version::*;

use std::path::Path;

/// Result of a native call: `Err` carries the native error code.
pub type NativeResult<T = ()> = std::result::Result<T, i32>;

/// Process-level entry points of a native library.
pub trait NativeLibrary: Send + Sync {
    /// Version of the library implementation.
    fn version(&self) -> Version;

    /// `DBOpen`
    fn open(&self, path: &Path, filetype: FileType, mode: OpenMode) -> NativeResult<Box<dyn NativeFile>>;

    /// `DBCreate`
    fn create(
        &self,
        path: &Path,
        mode: CreateMode,
        target: Target,
        info: &str,
        filetype: FileType,
    ) -> NativeResult<Box<dyn NativeFile>>;

    /// `DBFreeCurve`
    fn free_curve(&self, curve: Box<NativeCurve>) -> NativeResult;

    /// `DBFreeQuadmesh`
    fn free_quadmesh(&self, mesh: Box<NativeQuadmesh>) -> NativeResult;

    /// `DBFreeQuadvar`
    fn free_quadvar(&self, var: Box<NativeQuadvar>) -> NativeResult;

    /// `DBSetDeprecateWarnings`; returns the previous level.
    fn set_deprecate_warnings(&self, _level: i32) -> i32 {
        0
    }
}

/// Entry points on one open file handle.
///
/// Handles may move between threads but are used from one at a time;
/// callers serialise access.
pub trait NativeFile: Send {
    /// `DBClose`
    fn close(&mut self) -> NativeResult;

    /// `DBPutZonelist`
    fn put_zonelist(&mut self, args: &ZonelistArgs<'_>) -> NativeResult;

    /// `DBPutZonelist2`
    fn put_zonelist2(&mut self, args: &Zonelist2Args<'_>, opts: Option<&NativeOptlist>) -> NativeResult;

    /// `DBPutUcdmesh`
    fn put_ucdmesh(&mut self, args: &UcdmeshArgs<'_>, opts: Option<&NativeOptlist>) -> NativeResult;

    /// `DBPutUcdvar`
    fn put_ucdvar(&mut self, args: &UcdvarArgs<'_>, opts: Option<&NativeOptlist>) -> NativeResult;

    /// `DBPutUcdvar1` - single-component form.
    fn put_ucdvar1(&mut self, args: &UcdvarArgs<'_>, opts: Option<&NativeOptlist>) -> NativeResult {
        self.put_ucdvar(args, opts)
    }

    /// `DBPutPointmesh`
    fn put_pointmesh(&mut self, args: &PointmeshArgs<'_>, opts: Option<&NativeOptlist>) -> NativeResult;

    /// `DBPutPointvar`
    fn put_pointvar(&mut self, args: &PointvarArgs<'_>, opts: Option<&NativeOptlist>) -> NativeResult;

    /// `DBPutPointvar1` - single-component form.
    fn put_pointvar1(&mut self, args: &PointvarArgs<'_>, opts: Option<&NativeOptlist>) -> NativeResult {
        self.put_pointvar(args, opts)
    }

    /// `DBPutQuadmesh`
    fn put_quadmesh(&mut self, args: &QuadmeshArgs<'_>, opts: Option<&NativeOptlist>) -> NativeResult;

    /// `DBPutQuadvar`
    fn put_quadvar(&mut self, args: &QuadvarArgs<'_>, opts: Option<&NativeOptlist>) -> NativeResult;

    /// `DBPutQuadvar1` - single-component form.
    fn put_quadvar1(&mut self, args: &QuadvarArgs<'_>, opts: Option<&NativeOptlist>) -> NativeResult {
        self.put_quadvar(args, opts)
    }

    /// `DBPutCurve`
    fn put_curve(&mut self, args: &CurveArgs<'_>, opts: Option<&NativeOptlist>) -> NativeResult;

    /// `DBPutMultimesh`
    fn put_multimesh(&mut self, args: &MultiArgs<'_>, opts: Option<&NativeOptlist>) -> NativeResult;

    /// `DBPutMultivar`
    fn put_multivar(&mut self, args: &MultiArgs<'_>, opts: Option<&NativeOptlist>) -> NativeResult;

    /// `DBPutDefvars`
    fn put_defvars(&mut self, args: &DefvarsArgs<'_>) -> NativeResult;

    /// `DBGetCurve`; `None` if there is no such curve.
    fn get_curve(&mut self, name: &str) -> Option<Box<NativeCurve>>;

    /// `DBGetQuadmesh`
    fn get_quadmesh(&mut self, name: &str) -> Option<Box<NativeQuadmesh>>;

    /// `DBGetQuadvar`
    fn get_quadvar(&mut self, name: &str) -> Option<Box<NativeQuadvar>>;

    /// `DBGetToc`. The listing belongs to the file and is only valid until
    /// the next call on this handle.
    fn get_toc(&mut self) -> Option<&NativeToc>;
}
