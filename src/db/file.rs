//! Database session: one open native file handle.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use smallvec::SmallVec;

use super::config::{CreateOptions, OpenOptions};
use super::library::initialize;
use crate::array::{
    component_dtype, decompose_components, decompose_coords, native_count, validate_dims, ArrayView,
};
use crate::native::codes::E_INTERNAL;
use crate::native::{
    Capabilities, Centering, CoordType, CurveArgs, DefvarsArgs, MultiArgs, NativeArray, NativeFile,
    NativeLibrary, NativeOptlist, NativeResult, ObjectType, PointmeshArgs, PointvarArgs, QuadmeshArgs,
    QuadvarArgs, UcdmeshArgs, UcdvarArgs, VarType, Zonelist2Args, ZonelistArgs,
};
use crate::options::{native_of, OptionList};
use crate::result::{Curve, QuadMesh, QuadVar, TableOfContents};
use crate::util::{DataType, Error, FloatElement, FloatKind, Result};

/// One derived-variable definition for [`DbFile::put_defvars`].
#[derive(Clone, Copy, Debug)]
pub struct DefVar<'a> {
    pub name: &'a str,
    /// Expression in terms of other variables
    pub definition: &'a str,
    pub kind: VarType,
    pub options: Option<&'a OptionList>,
}

impl<'a> DefVar<'a> {
    /// A scalar definition without options.
    pub fn new(name: &'a str, definition: &'a str) -> Self {
        Self {
            name,
            definition,
            kind: VarType::Scalar,
            options: None,
        }
    }

    pub fn with_kind(mut self, kind: VarType) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_options(mut self, options: &'a OptionList) -> Self {
        self.options = Some(options);
        self
    }
}

/// Dispatch arm of a list of value arrays. An empty list goes down the
/// double arm and lets the library judge it.
fn values_kind(field: &str, values: &[ArrayView<'_>]) -> Result<FloatKind> {
    match component_dtype(field, values)? {
        Some(dtype) => FloatKind::of(dtype),
        None => Ok(FloatKind::F64),
    }
}

/// Non-empty connectivity array.
fn require_entries(name: &str, what: &str, values: &[i32]) -> Result<()> {
    if values.is_empty() {
        return Err(Error::shape(format!("{name}: {what} must not be empty")));
    }
    Ok(())
}

/// Native variant of a variable put: `DBPut*var1` or the multi-component
/// form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Arity {
    Single,
    Multi,
}

impl Arity {
    fn entry(self, single: &'static str, multi: &'static str) -> &'static str {
        match self {
            Arity::Single => single,
            Arity::Multi => multi,
        }
    }
}

#[inline]
fn call(entry: &'static str, result: NativeResult) -> Result<()> {
    result.map_err(|code| Error::native(entry, code))
}

/// An open database.
///
/// Created with [`DbFile::create`] or [`DbFile::open`]; every operation
/// after [`DbFile::close`] fails with [`Error::DatabaseClosed`]. Dropping an
/// open file closes it.
///
/// A session is used from one thread at a time.
pub struct DbFile {
    path: PathBuf,
    handle: Option<Box<dyn NativeFile>>,
    library: Arc<dyn NativeLibrary>,
    caps: Capabilities,
}

impl DbFile {
    /// Create a new database with the default library.
    pub fn create(path: impl AsRef<Path>, options: &CreateOptions) -> Result<Self> {
        Self::create_with(initialize(), path, options)
    }

    /// Create a new database through `library`.
    pub fn create_with(
        library: Arc<dyn NativeLibrary>,
        path: impl AsRef<Path>,
        options: &CreateOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        let handle = library
            .create(path, options.mode, options.target, &options.info, options.filetype)
            .map_err(|code| Error::CreateFailed {
                path: path.to_path_buf(),
                code,
            })?;
        tracing::debug!(path = %path.display(), mode = ?options.mode, filetype = ?options.filetype, "DBCreate");
        Ok(Self::from_handle(library, path, handle))
    }

    /// Open an existing database with the default library.
    pub fn open(path: impl AsRef<Path>, options: &OpenOptions) -> Result<Self> {
        Self::open_with(initialize(), path, options)
    }

    /// Open an existing database through `library`.
    pub fn open_with(library: Arc<dyn NativeLibrary>, path: impl AsRef<Path>, options: &OpenOptions) -> Result<Self> {
        let path = path.as_ref();
        let handle = library
            .open(path, options.filetype, options.mode)
            .map_err(|code| Error::OpenFailed {
                path: path.to_path_buf(),
                code,
            })?;
        tracing::debug!(path = %path.display(), mode = ?options.mode, "DBOpen");
        Ok(Self::from_handle(library, path, handle))
    }

    fn from_handle(library: Arc<dyn NativeLibrary>, path: &Path, handle: Box<dyn NativeFile>) -> Self {
        let caps = Capabilities::from_version(library.version());
        Self {
            path: path.to_path_buf(),
            handle: Some(handle),
            library,
            caps,
        }
    }

    /// Path the database was created or opened with.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Capabilities of the library behind this session.
    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    pub fn library(&self) -> &Arc<dyn NativeLibrary> {
        &self.library
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Close the database. A second call fails with [`Error::AlreadyClosed`].
    pub fn close(&mut self) -> Result<()> {
        let mut handle = self.handle.take().ok_or(Error::AlreadyClosed)?;
        tracing::debug!(path = %self.path.display(), "DBClose");
        call("DBClose", handle.close())
    }

    fn handle(&mut self) -> Result<&mut dyn NativeFile> {
        match self.handle.as_deref_mut() {
            Some(handle) => Ok(handle),
            None => Err(Error::DatabaseClosed),
        }
    }

    // === Zonelists ===

    /// Write unstructured-mesh connectivity.
    ///
    /// `shapesize[i]` nodes per zone for `shapecounts[i]` zones.
    pub fn put_zonelist(
        &mut self,
        name: &str,
        nzones: usize,
        ndims: usize,
        nodelist: &[i32],
        shapesize: &[i32],
        shapecounts: &[i32],
    ) -> Result<()> {
        let handle = self.handle()?;
        require_entries(name, "nodelist", nodelist)?;
        require_entries(name, "shapesize", shapesize)?;
        require_entries(name, "shapecounts", shapecounts)?;
        if shapecounts.len() != shapesize.len() {
            return Err(Error::length(name, shapesize.len(), shapecounts.len()));
        }

        let args = ZonelistArgs {
            name,
            nzones: native_count(name, nzones)?,
            ndims: native_count(name, ndims)?,
            nodelist,
            origin: 0,
            shapesize,
            shapecounts,
        };
        tracing::debug!(name, nzones, nshapes = shapesize.len(), "DBPutZonelist");
        call("DBPutZonelist", handle.put_zonelist(&args))
    }

    /// Write connectivity with per-shape zone types and ghost-zone offsets.
    ///
    /// Needs a library with ghost-zone zonelists; older ones fail with
    /// [`Error::Unavailable`].
    #[allow(clippy::too_many_arguments)]
    pub fn put_zonelist_2(
        &mut self,
        name: &str,
        nzones: usize,
        ndims: usize,
        nodelist: &[i32],
        lo_offset: i32,
        hi_offset: i32,
        shapetype: &[i32],
        shapesize: &[i32],
        shapecounts: &[i32],
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        let caps = self.caps;
        let handle = self.handle()?;
        if !caps.zonelist_ghosts {
            return Err(caps.unavailable("DBPutZonelist2"));
        }
        require_entries(name, "nodelist", nodelist)?;
        require_entries(name, "shapesize", shapesize)?;
        require_entries(name, "shapecounts", shapecounts)?;
        for other in [shapetype.len(), shapecounts.len()] {
            if other != shapesize.len() {
                return Err(Error::length(name, shapesize.len(), other));
            }
        }

        let args = Zonelist2Args {
            name,
            nzones: native_count(name, nzones)?,
            ndims: native_count(name, ndims)?,
            nodelist,
            origin: 0,
            lo_offset,
            hi_offset,
            shapetype,
            shapesize,
            shapecounts,
        };
        tracing::debug!(name, nzones, lo_offset, hi_offset, "DBPutZonelist2");
        call("DBPutZonelist2", handle.put_zonelist2(&args, native_of(optlist)))
    }

    // === Unstructured meshes ===

    /// Write an unstructured mesh from a `(ndims, nnodes)` coordinate array.
    #[allow(clippy::too_many_arguments)]
    pub fn put_ucdmesh<'a>(
        &mut self,
        name: &str,
        coordnames: &[&str],
        coords: impl Into<ArrayView<'a>>,
        nzones: usize,
        zonel_name: Option<&str>,
        facel_name: Option<&str>,
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        let coords = coords.into();
        self.handle()?;
        match FloatKind::of(coords.dtype())? {
            FloatKind::F32 => self.ucdmesh_as::<f32>(name, coordnames, &coords, nzones, zonel_name, facel_name, optlist),
            FloatKind::F64 => self.ucdmesh_as::<f64>(name, coordnames, &coords, nzones, zonel_name, facel_name, optlist),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn ucdmesh_as<T: FloatElement>(
        &mut self,
        name: &str,
        coordnames: &[&str],
        coords: &ArrayView<'_>,
        nzones: usize,
        zonel_name: Option<&str>,
        facel_name: Option<&str>,
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        let rows = decompose_coords(name, coords)?;
        if !coordnames.is_empty() && coordnames.len() != rows.ndims {
            return Err(Error::length(name, rows.ndims, coordnames.len()));
        }
        let args = UcdmeshArgs {
            name,
            coordnames,
            coords: &rows.rows,
            nnodes: native_count(name, rows.count)?,
            nzones: native_count(name, nzones)?,
            zonel_name,
            facel_name,
            datatype: T::DATA_TYPE,
        };
        tracing::debug!(name, ndims = rows.ndims, nnodes = rows.count, dtype = %T::DATA_TYPE, "DBPutUcdmesh");
        call("DBPutUcdmesh", self.handle()?.put_ucdmesh(&args, native_of(optlist)))
    }

    /// Write a single-component variable on an unstructured mesh.
    pub fn put_ucdvar1<'a>(
        &mut self,
        name: &str,
        meshname: &str,
        var: impl Into<ArrayView<'a>>,
        centering: Centering,
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        let vars = [var.into()];
        self.handle()?;
        match FloatKind::of(vars[0].dtype())? {
            FloatKind::F32 => self.ucdvar_as::<f32>(Arity::Single, name, meshname, &[name], &vars, centering, optlist),
            FloatKind::F64 => self.ucdvar_as::<f64>(Arity::Single, name, meshname, &[name], &vars, centering, optlist),
        }
    }

    /// Write a multi-component variable on an unstructured mesh; one name
    /// per component.
    pub fn put_ucdvar(
        &mut self,
        name: &str,
        meshname: &str,
        varnames: &[&str],
        vars: &[ArrayView<'_>],
        centering: Centering,
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        self.handle()?;
        if varnames.len() != vars.len() {
            return Err(Error::length(name, vars.len(), varnames.len()));
        }
        match values_kind(name, vars)? {
            FloatKind::F32 => self.ucdvar_as::<f32>(Arity::Multi, name, meshname, varnames, vars, centering, optlist),
            FloatKind::F64 => self.ucdvar_as::<f64>(Arity::Multi, name, meshname, varnames, vars, centering, optlist),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn ucdvar_as<T: FloatElement>(
        &mut self,
        arity: Arity,
        name: &str,
        meshname: &str,
        varnames: &[&str],
        vars: &[ArrayView<'_>],
        centering: Centering,
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        let components = decompose_components::<T>(name, vars)?;
        let args = UcdvarArgs {
            name,
            meshname,
            varnames,
            vars: &components.arrays,
            nels: native_count(name, components.count)?,
            datatype: T::DATA_TYPE,
            centering,
        };
        let entry = arity.entry("DBPutUcdvar1", "DBPutUcdvar");
        tracing::debug!(name, meshname, nvals = components.len(), nels = components.count, "{entry}");
        let handle = self.handle()?;
        let opts = native_of(optlist);
        let result = match arity {
            Arity::Single => handle.put_ucdvar1(&args, opts),
            Arity::Multi => handle.put_ucdvar(&args, opts),
        };
        call(entry, result)
    }

    // === Point meshes ===

    /// Write a point mesh from a `(ndims, npoints)` coordinate array.
    pub fn put_pointmesh<'a>(
        &mut self,
        name: &str,
        coords: impl Into<ArrayView<'a>>,
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        let coords = coords.into();
        self.handle()?;
        match FloatKind::of(coords.dtype())? {
            FloatKind::F32 => self.pointmesh_as::<f32>(name, &coords, optlist),
            FloatKind::F64 => self.pointmesh_as::<f64>(name, &coords, optlist),
        }
    }

    fn pointmesh_as<T: FloatElement>(&mut self, name: &str, coords: &ArrayView<'_>, optlist: Option<&OptionList>) -> Result<()> {
        let rows = decompose_coords(name, coords)?;
        let args = PointmeshArgs {
            name,
            coords: &rows.rows,
            npoints: native_count(name, rows.count)?,
            datatype: T::DATA_TYPE,
        };
        tracing::debug!(name, ndims = rows.ndims, npoints = rows.count, dtype = %T::DATA_TYPE, "DBPutPointmesh");
        call("DBPutPointmesh", self.handle()?.put_pointmesh(&args, native_of(optlist)))
    }

    /// Write a single-component variable on a point mesh.
    pub fn put_pointvar1<'a>(
        &mut self,
        name: &str,
        meshname: &str,
        var: impl Into<ArrayView<'a>>,
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        let vars = [var.into()];
        self.handle()?;
        match FloatKind::of(vars[0].dtype())? {
            FloatKind::F32 => self.pointvar_as::<f32>(Arity::Single, name, meshname, &vars, optlist),
            FloatKind::F64 => self.pointvar_as::<f64>(Arity::Single, name, meshname, &vars, optlist),
        }
    }

    /// Write a multi-component variable on a point mesh.
    pub fn put_pointvar(
        &mut self,
        name: &str,
        meshname: &str,
        vars: &[ArrayView<'_>],
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        self.handle()?;
        match values_kind(name, vars)? {
            FloatKind::F32 => self.pointvar_as::<f32>(Arity::Multi, name, meshname, vars, optlist),
            FloatKind::F64 => self.pointvar_as::<f64>(Arity::Multi, name, meshname, vars, optlist),
        }
    }

    fn pointvar_as<T: FloatElement>(
        &mut self,
        arity: Arity,
        name: &str,
        meshname: &str,
        vars: &[ArrayView<'_>],
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        let components = decompose_components::<T>(name, vars)?;
        let args = PointvarArgs {
            name,
            meshname,
            vars: &components.arrays,
            nels: native_count(name, components.count)?,
            datatype: T::DATA_TYPE,
        };
        let entry = arity.entry("DBPutPointvar1", "DBPutPointvar");
        tracing::debug!(name, meshname, nvals = components.len(), nels = components.count, "{entry}");
        let handle = self.handle()?;
        let opts = native_of(optlist);
        let result = match arity {
            Arity::Single => handle.put_pointvar1(&args, opts),
            Arity::Multi => handle.put_pointvar(&args, opts),
        };
        call(entry, result)
    }

    // === Structured meshes ===

    /// Write a structured mesh, one coordinate array per axis.
    ///
    /// Collinear coordinates are 1-D and the mesh dims are their lengths.
    /// Non-collinear coordinates all share one shape of rank
    /// `coords.len()`, which becomes the mesh dims.
    pub fn put_quadmesh(
        &mut self,
        name: &str,
        coords: &[ArrayView<'_>],
        coordtype: CoordType,
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        self.handle()?;
        match values_kind(name, coords)? {
            FloatKind::F32 => self.quadmesh_as::<f32>(name, coords, coordtype, optlist),
            FloatKind::F64 => self.quadmesh_as::<f64>(name, coords, coordtype, optlist),
        }
    }

    fn quadmesh_as<T: FloatElement>(
        &mut self,
        name: &str,
        coords: &[ArrayView<'_>],
        coordtype: CoordType,
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        let (arrays, dims): (SmallVec<[NativeArray<'_>; 3]>, SmallVec<[i32; 3]>) = match coordtype {
            CoordType::Collinear => {
                let mut arrays = SmallVec::new();
                let mut dims = SmallVec::new();
                for coord in coords {
                    if coord.dtype() != T::DATA_TYPE {
                        return Err(Error::TypeMismatch {
                            field: name.to_string(),
                            expected: T::DATA_TYPE,
                            actual: coord.dtype(),
                        });
                    }
                    if coord.rank() > 1 {
                        return Err(Error::shape(format!(
                            "{name}: collinear coordinates must be 1-D, got shape {}",
                            coord.shape()
                        )));
                    }
                    arrays.push(coord.as_native()?);
                    dims.push(native_count(name, coord.len())?);
                }
                (arrays, dims)
            }
            CoordType::NonCollinear => {
                let components = decompose_components::<T>(name, coords)?;
                let shape = coords.first().map(|c| c.shape().clone()).unwrap_or_default();
                if let Some(other) = coords.iter().find(|c| c.shape() != &shape) {
                    return Err(Error::shape(format!(
                        "{name}: non-collinear coordinates must share one shape, got {} and {}",
                        shape,
                        other.shape()
                    )));
                }
                if !coords.is_empty() && shape.rank() != coords.len() {
                    return Err(Error::shape(format!(
                        "{name}: {} coordinate arrays of rank {}",
                        coords.len(),
                        shape.rank()
                    )));
                }
                let dims = shape
                    .sizes()
                    .iter()
                    .map(|&d| native_count(name, d))
                    .collect::<Result<_>>()?;
                (components.arrays.into_iter().collect(), dims)
            }
        };

        let args = QuadmeshArgs {
            name,
            coordnames: &[],
            coords: &arrays,
            dims: &dims,
            datatype: T::DATA_TYPE,
            coordtype,
        };
        tracing::debug!(name, ?dims, ?coordtype, dtype = %T::DATA_TYPE, "DBPutQuadmesh");
        call("DBPutQuadmesh", self.handle()?.put_quadmesh(&args, native_of(optlist)))
    }

    /// Write a single-component variable on a structured mesh.
    pub fn put_quadvar1<'a>(
        &mut self,
        name: &str,
        meshname: &str,
        var: impl Into<ArrayView<'a>>,
        dims: &[usize],
        centering: Centering,
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        let vars = [var.into()];
        self.handle()?;
        match FloatKind::of(vars[0].dtype())? {
            FloatKind::F32 => {
                self.quadvar_as::<f32>(Arity::Single, name, meshname, &[name], &vars, dims, centering, optlist)
            }
            FloatKind::F64 => {
                self.quadvar_as::<f64>(Arity::Single, name, meshname, &[name], &vars, dims, centering, optlist)
            }
        }
    }

    /// Write a multi-component variable on a structured mesh.
    #[allow(clippy::too_many_arguments)]
    pub fn put_quadvar(
        &mut self,
        name: &str,
        meshname: &str,
        varnames: &[&str],
        vars: &[ArrayView<'_>],
        dims: &[usize],
        centering: Centering,
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        self.handle()?;
        if varnames.len() != vars.len() {
            return Err(Error::length(name, vars.len(), varnames.len()));
        }
        match values_kind(name, vars)? {
            FloatKind::F32 => {
                self.quadvar_as::<f32>(Arity::Multi, name, meshname, varnames, vars, dims, centering, optlist)
            }
            FloatKind::F64 => {
                self.quadvar_as::<f64>(Arity::Multi, name, meshname, varnames, vars, dims, centering, optlist)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn quadvar_as<T: FloatElement>(
        &mut self,
        arity: Arity,
        name: &str,
        meshname: &str,
        varnames: &[&str],
        vars: &[ArrayView<'_>],
        dims: &[usize],
        centering: Centering,
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        let components = decompose_components::<T>(name, vars)?;
        let native_dims: SmallVec<[i32; 3]> = match vars.first() {
            Some(first) => validate_dims(name, dims, first)?,
            None => dims.iter().map(|&d| native_count(name, d)).collect::<Result<_>>()?,
        };
        for var in vars.iter().skip(1) {
            validate_dims(name, dims, var)?;
        }

        let args = QuadvarArgs {
            name,
            meshname,
            varnames,
            vars: &components.arrays,
            dims: &native_dims,
            datatype: T::DATA_TYPE,
            centering,
        };
        let entry = arity.entry("DBPutQuadvar1", "DBPutQuadvar");
        tracing::debug!(name, meshname, ?dims, nvals = components.len(), ?centering, "{entry}");
        let handle = self.handle()?;
        let opts = native_of(optlist);
        let result = match arity {
            Arity::Single => handle.put_quadvar1(&args, opts),
            Arity::Multi => handle.put_quadvar(&args, opts),
        };
        call(entry, result)
    }

    // === Curves ===

    /// Write an (x, y) curve. Both arrays must have the same element type
    /// and length.
    pub fn put_curve<'a>(
        &mut self,
        name: &str,
        x: impl Into<ArrayView<'a>>,
        y: impl Into<ArrayView<'a>>,
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        let (x, y) = (x.into(), y.into());
        self.handle()?;
        if x.dtype() != y.dtype() {
            return Err(Error::TypeMismatch {
                field: name.to_string(),
                expected: x.dtype(),
                actual: y.dtype(),
            });
        }
        if x.len() != y.len() {
            return Err(Error::length(name, x.len(), y.len()));
        }
        match FloatKind::of(x.dtype())? {
            FloatKind::F32 => self.curve_as::<f32>(name, &x, &y, optlist),
            FloatKind::F64 => self.curve_as::<f64>(name, &x, &y, optlist),
        }
    }

    fn curve_as<T: FloatElement>(
        &mut self,
        name: &str,
        x: &ArrayView<'_>,
        y: &ArrayView<'_>,
        optlist: Option<&OptionList>,
    ) -> Result<()> {
        let args = CurveArgs {
            name,
            x: x.as_native()?,
            y: y.as_native()?,
            datatype: T::DATA_TYPE,
            npts: native_count(name, x.len())?,
        };
        tracing::debug!(name, npts = x.len(), dtype = %T::DATA_TYPE, "DBPutCurve");
        call("DBPutCurve", self.handle()?.put_curve(&args, native_of(optlist)))
    }

    // === Multi-block indirection ===

    /// Write a multi-block mesh from `(block name, block type)` entries.
    pub fn put_multimesh(&mut self, name: &str, blocks: &[(&str, ObjectType)], optlist: Option<&OptionList>) -> Result<()> {
        let handle = self.handle()?;
        let (names, types) = split_blocks(blocks);
        let args = MultiArgs {
            name,
            names: &names,
            types: &types,
        };
        tracing::debug!(name, nblocks = blocks.len(), "DBPutMultimesh");
        call("DBPutMultimesh", handle.put_multimesh(&args, native_of(optlist)))
    }

    /// Write a multi-block variable from `(block name, block type)` entries.
    pub fn put_multivar(&mut self, name: &str, blocks: &[(&str, ObjectType)], optlist: Option<&OptionList>) -> Result<()> {
        let handle = self.handle()?;
        let (names, types) = split_blocks(blocks);
        let args = MultiArgs {
            name,
            names: &names,
            types: &types,
        };
        tracing::debug!(name, nblocks = blocks.len(), "DBPutMultivar");
        call("DBPutMultivar", handle.put_multivar(&args, native_of(optlist)))
    }

    /// Write derived-variable definitions.
    pub fn put_defvars(&mut self, name: &str, defs: &[DefVar<'_>]) -> Result<()> {
        let handle = self.handle()?;
        let names: Vec<&str> = defs.iter().map(|d| d.name).collect();
        let exprs: Vec<&str> = defs.iter().map(|d| d.definition).collect();
        let types: Vec<i32> = defs.iter().map(|d| d.kind.as_raw()).collect();
        let opts: Vec<Option<&NativeOptlist>> = defs.iter().map(|d| native_of(d.options)).collect();
        let args = DefvarsArgs {
            name,
            names: &names,
            types: &types,
            defs: &exprs,
            opts: &opts,
        };
        tracing::debug!(name, ndefs = defs.len(), "DBPutDefvars");
        call("DBPutDefvars", handle.put_defvars(&args))
    }

    // === Reading ===

    /// Read a curve.
    pub fn get_curve(&mut self, name: &str) -> Result<Curve> {
        tracing::debug!(name, "DBGetCurve");
        let raw = self.handle()?.get_curve(name).ok_or_else(|| not_found("Curve", name))?;
        Ok(Curve::new(raw, self.library.clone()))
    }

    /// Read a structured mesh.
    pub fn get_quadmesh(&mut self, name: &str) -> Result<QuadMesh> {
        tracing::debug!(name, "DBGetQuadmesh");
        let raw = self.handle()?.get_quadmesh(name).ok_or_else(|| not_found("Quadmesh", name))?;
        Ok(QuadMesh::new(raw, self.library.clone()))
    }

    /// Read a structured-mesh variable.
    pub fn get_quadvar(&mut self, name: &str) -> Result<QuadVar> {
        tracing::debug!(name, "DBGetQuadvar");
        let raw = self.handle()?.get_quadvar(name).ok_or_else(|| not_found("Quadvar", name))?;
        Ok(QuadVar::new(raw, self.library.clone()))
    }

    /// Snapshot of every object name in the database.
    pub fn get_toc(&mut self) -> Result<TableOfContents> {
        let caps = self.caps;
        let toc = self
            .handle()?
            .get_toc()
            .ok_or(Error::native("DBGetToc", E_INTERNAL))?;
        let toc = TableOfContents::from_native(toc, &caps);
        tracing::debug!(total = toc.total(), "DBGetToc");
        Ok(toc)
    }

    /// Element type a value array would be written with, if supported.
    pub fn write_type(values: &ArrayView<'_>) -> Result<DataType> {
        FloatKind::of(values.dtype()).map(FloatKind::data_type)
    }
}

fn split_blocks<'a>(blocks: &[(&'a str, ObjectType)]) -> (Vec<&'a str>, Vec<i32>) {
    blocks.iter().map(|&(name, kind)| (name, kind.as_raw())).unzip()
}

fn not_found(kind: &'static str, name: &str) -> Error {
    Error::NotFound {
        kind,
        name: name.to_string(),
    }
}

impl Drop for DbFile {
    fn drop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            if let Err(code) = handle.close() {
                tracing::warn!(path = %self.path.display(), code, "DBClose on drop failed");
            }
        }
    }
}

impl std::fmt::Debug for DbFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbFile")
            .field("path", &self.path)
            .field("open", &self.is_open())
            .field("version", &self.caps.version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::sdb::SdbLibrary;
    use crate::native::Version;

    fn session(dir: &tempfile::TempDir, library: SdbLibrary) -> (DbFile, Arc<SdbLibrary>) {
        let library = Arc::new(library);
        let db = DbFile::create_with(library.clone(), dir.path().join("t.sdb"), &CreateOptions::default()).unwrap();
        (db, library)
    }

    #[test]
    fn test_close_state_machine() {
        let dir = tempfile::tempdir().unwrap();
        let (mut db, _) = session(&dir, SdbLibrary::new());
        assert!(db.is_open());
        db.close().unwrap();
        assert!(matches!(db.close(), Err(Error::AlreadyClosed)));
        assert!(matches!(db.get_toc(), Err(Error::DatabaseClosed)));
        assert!(matches!(
            db.put_curve("c", &[0.0f64][..], &[1.0f64][..], None),
            Err(Error::DatabaseClosed)
        ));
    }

    #[test]
    fn test_unsupported_type_never_reaches_library() {
        let dir = tempfile::tempdir().unwrap();
        let (mut db, library) = session(&dir, SdbLibrary::new());
        let ints = [1i32, 2, 3];
        let err = db.put_ucdvar1("v", "m", &ints, Centering::Node, None).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
        assert_eq!(library.stats().puts(), 0);
    }

    #[test]
    fn test_variable_entry_names() {
        assert_eq!(Arity::Single.entry("DBPutUcdvar1", "DBPutUcdvar"), "DBPutUcdvar1");
        assert_eq!(Arity::Multi.entry("DBPutUcdvar1", "DBPutUcdvar"), "DBPutUcdvar");

        let dir = tempfile::tempdir().unwrap();
        let (mut db, _) = session(&dir, SdbLibrary::new());
        let vals = [1.0f64, 2.0];
        let views = [ArrayView::from_slice(&vals)];
        db.put_ucdvar1("u", "m", &vals, Centering::Node, None).unwrap();
        db.put_pointvar1("p", "m", &vals, None).unwrap();
        db.put_quadvar1("q", "m", &vals, &[2], Centering::Node, None).unwrap();

        let err = db.put_ucdvar1("u", "m", &vals, Centering::Node, None).unwrap_err();
        assert!(matches!(err, Error::NativeCallFailed { entry: "DBPutUcdvar1", .. }));
        let err = db.put_ucdvar("u", "m", &["u"], &views, Centering::Node, None).unwrap_err();
        assert!(matches!(err, Error::NativeCallFailed { entry: "DBPutUcdvar", .. }));
        let err = db.put_pointvar1("p", "m", &vals, None).unwrap_err();
        assert!(matches!(err, Error::NativeCallFailed { entry: "DBPutPointvar1", .. }));
        let err = db.put_pointvar("p", "m", &views, None).unwrap_err();
        assert!(matches!(err, Error::NativeCallFailed { entry: "DBPutPointvar", .. }));
        let err = db.put_quadvar1("q", "m", &vals, &[2], Centering::Node, None).unwrap_err();
        assert!(matches!(err, Error::NativeCallFailed { entry: "DBPutQuadvar1", .. }));
        let err = db
            .put_quadvar("q", "m", &["q"], &views, &[2], Centering::Node, None)
            .unwrap_err();
        assert!(matches!(err, Error::NativeCallFailed { entry: "DBPutQuadvar", .. }));
    }

    #[test]
    fn test_zonelist_2_needs_capability() {
        let dir = tempfile::tempdir().unwrap();
        let (mut db, library) = session(&dir, SdbLibrary::with_version(Version::new(4, 5, 0)));
        let err = db
            .put_zonelist_2("zl", 1, 2, &[0, 1, 2], 0, 0, &[12], &[3], &[1], None)
            .unwrap_err();
        assert!(matches!(err, Error::Unavailable { entry: "DBPutZonelist2", .. }));
        assert_eq!(library.stats().puts(), 0);
    }

    #[test]
    fn test_empty_zonelist_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let (mut db, _) = session(&dir, SdbLibrary::new());
        assert!(matches!(
            db.put_zonelist("zl", 0, 2, &[], &[3], &[1]),
            Err(Error::InvalidShape(_))
        ));
        assert!(matches!(
            db.put_zonelist("zl", 1, 2, &[0, 1, 2], &[3], &[1, 1]),
            Err(Error::LengthMismatch { .. })
        ));
        db.put_zonelist("zl", 1, 2, &[0, 1, 2], &[3], &[1]).unwrap();
    }

    #[test]
    fn test_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (mut db, _) = session(&dir, SdbLibrary::new());
        let err = db.get_curve("missing").unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: "Curve", .. }));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_write_type() {
        let data = [1.0f32, 2.0];
        assert_eq!(DbFile::write_type(&ArrayView::from_slice(&data)).unwrap(), DataType::Float);
        let ints = [1i16];
        assert!(DbFile::write_type(&ArrayView::from_slice(&ints)).is_err());
    }
}
