//! SDB: the self-describing binary database shipped with this crate.
//!
//! An SDB file is a header followed by object records and an index. Each
//! object is a named group of typed attributes and typed payload arrays.
//! Open files are loaded into memory and written back on close.
//!
//! ## File Structure
//!
//! ```text
//! +------------------+
//! | Magic: "SDB\0"   |  4 bytes
//! +------------------+
//! | Frozen flag      |  1 byte (0x00 or 0xFF), 1 byte padding
//! +------------------+
//! | Version          |  2 bytes (u16 LE)
//! +------------------+
//! | Index Pos        |  8 bytes (u64 LE)
//! +------------------+
//! | Object records   |
//! +------------------+
//! | Index            |  u32 count, u64 position per object
//! +------------------+
//! ```

mod format;
mod reader;
mod stats;
mod store;
mod writer;

pub use format::*;
pub use reader::{parse_header, read_store};
pub use stats::CallStats;
pub use store::{Attr, Payload, SdbObject, Store};
pub use writer::write_store;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use super::codes::*;
use super::*;
use crate::util::{DataType, Dimensions, Error, MajorOrder, DB_ROWMAJOR};

/// Reference native library backed by SDB files.
#[derive(Debug)]
pub struct SdbLibrary {
    version: Version,
    stats: Arc<CallStats>,
    deprecate_level: AtomicI32,
}

impl SdbLibrary {
    /// Version reported by default.
    pub const VERSION: Version = Version::new(4, 10, 2);

    pub fn new() -> Self {
        Self::with_version(Self::VERSION)
    }

    /// A library reporting `version` and following that generation's
    /// conventions (toc count spelling, accepted drivers).
    pub fn with_version(version: Version) -> Self {
        Self {
            version,
            stats: Arc::new(CallStats::new()),
            deprecate_level: AtomicI32::new(1),
        }
    }

    /// Counters shared with every file opened through this library.
    pub fn stats(&self) -> &Arc<CallStats> {
        &self.stats
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::from_version(self.version)
    }

    fn check_filetype(&self, filetype: FileType) -> NativeResult {
        if filetype.is_extended_hdf5() && !self.capabilities().hdf5_drivers {
            return Err(E_BADFTYPE);
        }
        Ok(())
    }

    fn file(&self, path: &Path, store: Store, writable: bool) -> SdbFile {
        SdbFile {
            path: path.to_path_buf(),
            store,
            writable,
            dirty: false,
            open: true,
            singular_toc: self.capabilities().toc_singular_counts,
            stats: self.stats.clone(),
            toc: None,
        }
    }
}

impl Default for SdbLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Native code for a failed load.
fn load_error(err: &Error) -> i32 {
    match err {
        Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound => E_NOFILE,
        Error::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied => E_FILENOREAD,
        Error::Io(_) => E_SYSTEMERR,
        _ => E_BADFTYPE,
    }
}

impl NativeLibrary for SdbLibrary {
    fn version(&self) -> Version {
        self.version
    }

    fn open(&self, path: &Path, filetype: FileType, mode: OpenMode) -> NativeResult<Box<dyn NativeFile>> {
        self.check_filetype(filetype)?;
        if path.is_dir() {
            return Err(E_FILEISDIR);
        }
        let store = read_store(path).map_err(|e| {
            tracing::debug!(path = %path.display(), error = %e, "sdb open failed");
            load_error(&e)
        })?;
        Ok(Box::new(self.file(path, store, mode == OpenMode::Append)))
    }

    fn create(
        &self,
        path: &Path,
        mode: CreateMode,
        target: Target,
        info: &str,
        filetype: FileType,
    ) -> NativeResult<Box<dyn NativeFile>> {
        match filetype {
            FileType::Unknown => return Err(E_BADFTYPE),
            FileType::Taurus => return Err(E_NOTIMP),
            other => self.check_filetype(other)?,
        }
        if path.is_dir() {
            return Err(E_FILEISDIR);
        }
        if mode == CreateMode::NoClobber && path.exists() {
            return Err(E_FEXIST);
        }

        let mut store = Store::new();
        if !info.is_empty() {
            let mut fileinfo = SdbObject::new(FILEINFO_NAME, ObjectType::Variable);
            fileinfo.set("value", Attr::Str(info.to_string()));
            store.insert(fileinfo).map_err(|_| E_INTERNAL)?;
        }
        write_store(path, &store).map_err(|e| {
            tracing::debug!(path = %path.display(), error = %e, "sdb create failed");
            load_error(&e)
        })?;
        tracing::debug!(path = %path.display(), ?target, ?filetype, "sdb created");

        Ok(Box::new(self.file(path, store, true)))
    }

    fn free_curve(&self, curve: Box<NativeCurve>) -> NativeResult {
        drop(curve);
        self.stats.record_free();
        Ok(())
    }

    fn free_quadmesh(&self, mesh: Box<NativeQuadmesh>) -> NativeResult {
        drop(mesh);
        self.stats.record_free();
        Ok(())
    }

    fn free_quadvar(&self, var: Box<NativeQuadvar>) -> NativeResult {
        drop(var);
        self.stats.record_free();
        Ok(())
    }

    fn set_deprecate_warnings(&self, level: i32) -> i32 {
        self.deprecate_level.swap(level, Ordering::Relaxed)
    }
}

/// Open SDB file.
pub struct SdbFile {
    path: PathBuf,
    store: Store,
    writable: bool,
    dirty: bool,
    open: bool,
    singular_toc: bool,
    stats: Arc<CallStats>,
    toc: Option<NativeToc>,
}

fn count(n: i32) -> NativeResult<usize> {
    usize::try_from(n).map_err(|_| E_BADARGS)
}

/// Element count of a grid, rejecting counts that do not fit.
fn grid_count(dims: &[usize]) -> NativeResult<usize> {
    dims.iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .filter(|&n| i32::try_from(n).is_ok())
        .ok_or(E_BADARGS)
}

/// Every array has `len` elements of `dtype`, and there is at least one.
fn check_arrays(arrays: &[NativeArray<'_>], len: usize, dtype: DataType) -> NativeResult {
    if arrays.is_empty() {
        return Err(E_BADARGS);
    }
    if arrays.iter().any(|a| a.len() != len || a.dtype() != dtype) {
        return Err(E_BADARGS);
    }
    Ok(())
}

fn names_attr(names: &[&str]) -> Attr {
    Attr::Strs(names.iter().map(|s| s.to_string()).collect())
}

fn pad3<T: Copy>(values: impl IntoIterator<Item = T>, fill: T) -> [T; 3] {
    let mut out = [fill; 3];
    for (slot, v) in out.iter_mut().zip(values) {
        *slot = v;
    }
    out
}

/// Index of the toc list an object kind is listed under.
fn toc_slot(kind: ObjectType) -> usize {
    use ObjectType::*;
    match kind {
        Curve => 0,
        MultiMesh => 1,
        MultiMeshAdj => 2,
        MultiVar => 3,
        MultiMat => 4,
        MultiMatSpecies => 5,
        CsgMesh => 6,
        CsgVar => 7,
        Defvars => 8,
        QuadMesh => 9,
        QuadVar => 10,
        UcdMesh => 11,
        UcdVar => 12,
        PointMesh => 13,
        PointVar => 14,
        Material => 15,
        MatSpecies => 16,
        Variable => 17,
        Dir => 19,
        Array => 20,
        MrgTree => 21,
        GroupElMap => 22,
        MrgVar => 23,
        _ => 18,
    }
}

impl SdbFile {
    /// Path this file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn begin_put(&mut self, name: &str) -> NativeResult {
        self.stats.record_put();
        if !self.open {
            return Err(E_NOFILE);
        }
        if !self.writable {
            return Err(E_FILENOWRITE);
        }
        if name.is_empty() || name.contains(['/', ':']) {
            return Err(E_INVALIDNAME);
        }
        if self.store.contains(name) {
            return Err(E_NOOVERWRITE);
        }
        Ok(())
    }

    fn commit(&mut self, obj: SdbObject) -> NativeResult {
        tracing::trace!(name = %obj.name, kind = ?obj.kind, "sdb object stored");
        self.store.insert(obj).map_err(|_| E_NOOVERWRITE)?;
        self.dirty = true;
        self.toc = None;
        Ok(())
    }

    fn lookup(&self, name: &str, kind: ObjectType) -> Option<&SdbObject> {
        if !self.open {
            return None;
        }
        self.store.get_kind(name, kind)
    }

    fn hand_out<T>(&self, value: Option<T>) -> Option<Box<T>> {
        self.stats.record_get(value.is_some());
        value.map(Box::new)
    }

    fn flush(&mut self) -> NativeResult {
        if self.dirty {
            write_store(&self.path, &self.store).map_err(|e| {
                tracing::warn!(path = %self.path.display(), error = %e, "sdb flush failed");
                E_SYSTEMERR
            })?;
            self.dirty = false;
        }
        Ok(())
    }

    fn build_toc(&self) -> NativeToc {
        let mut lists: Vec<Vec<String>> = vec![Vec::new(); TOC_FIELDS.len()];
        for obj in self.store.iter() {
            lists[toc_slot(obj.kind)].push(obj.name.clone());
        }
        let mut toc = NativeToc::new();
        for (field, names) in TOC_FIELDS.iter().zip(lists) {
            toc.set(field.count_for(self.singular_toc), field.list, names);
        }
        toc
    }
}

#[allow(clippy::too_many_arguments)]
fn component_object(
    kind: ObjectType,
    name: &str,
    meshname: &str,
    varnames: &[&str],
    vars: &[NativeArray<'_>],
    nels: i32,
    datatype: DataType,
    opts: Option<&NativeOptlist>,
) -> SdbObject {
    let mut obj = SdbObject::new(name, kind);
    obj.set("meshname", Attr::Str(meshname.to_string()));
    obj.set("varnames", names_attr(varnames));
    obj.set("nvals", Attr::Int(vars.len() as i32));
    obj.set("nels", Attr::Int(nels));
    obj.set("datatype", Attr::Int(datatype.tag()));
    obj.apply_options(opts);
    for (i, var) in vars.iter().enumerate() {
        obj.push_array(format!("val{i}"), Payload::from_native(var));
    }
    obj
}

fn put_multi(file: &mut SdbFile, kind: ObjectType, args: &MultiArgs<'_>, opts: Option<&NativeOptlist>) -> NativeResult {
    if args.names.is_empty() || args.types.len() != args.names.len() {
        return Err(E_BADARGS);
    }
    let mut obj = SdbObject::new(args.name, kind);
    obj.set("nblocks", Attr::Int(args.names.len() as i32));
    obj.set("names", names_attr(args.names));
    obj.set("types", Attr::Ints(args.types.to_vec()));
    obj.apply_options(opts);
    file.commit(obj)
}

// === Getter struct assembly ===

fn mesh_dims(obj: &SdbObject) -> (Vec<usize>, MajorOrder) {
    let dims = obj
        .ints("dims")
        .unwrap_or(&[])
        .iter()
        .map(|&d| d.max(0) as usize)
        .collect();
    let order = MajorOrder::from_raw(obj.int("major_order").unwrap_or(DB_ROWMAJOR));
    (dims, order)
}

/// Real-zone index ranges after stripping ghost layers.
fn index_ranges(obj: &SdbObject, dims: &[usize]) -> ([i32; 3], [i32; 3]) {
    let lo = obj.ints("lo_offset").unwrap_or(&[]);
    let hi = obj.ints("hi_offset").unwrap_or(&[]);
    let min = pad3((0..dims.len()).map(|i| lo.get(i).copied().unwrap_or(0)), 0);
    let max = pad3(
        dims.iter()
            .enumerate()
            .map(|(i, &d)| d as i32 - 1 - hi.get(i).copied().unwrap_or(0)),
        0,
    );
    (min, max)
}

fn strides(dims: &[usize], order: MajorOrder) -> [i32; 3] {
    let strides = Dimensions::from_slice(dims).dense_strides(order);
    pad3(strides.iter().map(|&s| s as i32), 0)
}

fn curve_of(obj: &SdbObject) -> Option<NativeCurve> {
    Some(NativeCurve {
        id: 0,
        origin: obj.int("origin").unwrap_or(0),
        title: obj.string("label"),
        xvarname: obj.string("xvarname"),
        yvarname: obj.string("yvarname"),
        xlabel: obj.string("xlabel"),
        ylabel: obj.string("ylabel"),
        xunits: obj.string("xunits"),
        yunits: obj.string("yunits"),
        reference: obj.string("reference"),
        datatype: obj.int("datatype")?,
        npts: obj.int("npts")?,
        x: obj.array("x")?.data.clone(),
        y: obj.array("y")?.data.clone(),
    })
}

fn quadmesh_of(obj: &SdbObject) -> Option<NativeQuadmesh> {
    let (dims, order) = mesh_dims(obj);
    let ndims = dims.len();
    let coords: Vec<&Payload> = (0..ndims)
        .map(|i| obj.array(&format!("coord{i}")))
        .collect::<Option<_>>()?;
    let (min_index, max_index) = index_ranges(obj, &dims);
    let ranges: Vec<(f64, f64)> = coords.iter().map(|c| c.range().unwrap_or((0.0, 0.0))).collect();

    Some(NativeQuadmesh {
        id: 0,
        block_no: obj.int("block_origin").unwrap_or(-1),
        group_no: obj.int("group_no").unwrap_or(-1),
        name: Some(obj.name.clone()),
        cycle: obj.int("cycle").unwrap_or(0),
        coord_sys: obj.int("coord_sys").unwrap_or(CoordSystem::Cartesian.as_raw()),
        major_order: order.as_raw(),
        stride: strides(&dims, order),
        coordtype: obj.int("coordtype")?,
        facetype: obj.int("facetype").unwrap_or(0),
        planar: obj.int("planar").unwrap_or(0),
        datatype: obj.int("datatype")?,
        time: obj.float("time").unwrap_or(0.0) as f32,
        dtime: obj.float("dtime").unwrap_or(0.0),
        min_extents: pad3(ranges.iter().map(|r| r.0 as f32), 0.0),
        max_extents: pad3(ranges.iter().map(|r| r.1 as f32), 0.0),
        labels: [obj.string("xlabel"), obj.string("ylabel"), obj.string("zlabel")],
        units: [obj.string("xunits"), obj.string("yunits"), obj.string("zunits")],
        ndims: ndims as i32,
        nspace: obj.int("nspace").unwrap_or(ndims as i32),
        nnodes: dims.iter().product::<usize>() as i32,
        dims: pad3(dims.iter().map(|&d| d as i32), 0),
        origin: obj.int("origin").unwrap_or(0),
        min_index,
        max_index,
        base_index: pad3(obj.ints("base_index").unwrap_or(&[]).iter().copied(), 0),
        start_index: [0; 3],
        size_index: pad3(dims.iter().map(|&d| d as i32), 0),
        guihide: obj.int("guihide").unwrap_or(0),
        mrgtree_name: None,
        coords: coords.iter().map(|c| c.data.clone()).collect(),
    })
}

fn quadvar_of(obj: &SdbObject) -> Option<NativeQuadvar> {
    let (dims, order) = mesh_dims(obj);
    let nvals = obj.int("nvals")?;
    let vals: Vec<&Payload> = (0..nvals)
        .map(|i| obj.array(&format!("val{i}")))
        .collect::<Option<_>>()?;
    let (min_index, max_index) = index_ranges(obj, &dims);
    let centering = obj.int("centering").unwrap_or(Centering::Node.as_raw());
    let align = if centering == Centering::Zone.as_raw() { 0.5 } else { 0.0 };

    Some(NativeQuadvar {
        id: 0,
        name: Some(obj.name.clone()),
        units: obj.string("units"),
        label: obj.string("label"),
        cycle: obj.int("cycle").unwrap_or(0),
        meshid: 0,
        datatype: obj.int("datatype")?,
        nels: obj.int("nels")?,
        nvals,
        ndims: dims.len() as i32,
        dims: pad3(dims.iter().map(|&d| d as i32), 0),
        major_order: order.as_raw(),
        stride: strides(&dims, order),
        min_index,
        max_index,
        origin: obj.int("origin").unwrap_or(0),
        time: obj.float("time").unwrap_or(0.0) as f32,
        dtime: obj.float("dtime").unwrap_or(0.0),
        align: pad3(dims.iter().map(|_| align), 0.0),
        mixlen: 0,
        use_specmf: obj.int("use_specmf").unwrap_or(0),
        ascii_labels: obj.int("ascii_labels").unwrap_or(0),
        meshname: obj.string("meshname"),
        guihide: obj.int("guihide").unwrap_or(0),
        centering,
        vals: vals.iter().map(|v| v.data.clone()).collect(),
    })
}

impl NativeFile for SdbFile {
    fn close(&mut self) -> NativeResult {
        if !self.open {
            return Err(E_NOFILE);
        }
        let result = self.flush();
        self.open = false;
        self.toc = None;
        tracing::debug!(path = %self.path.display(), "sdb closed");
        result
    }

    fn put_zonelist(&mut self, args: &ZonelistArgs<'_>) -> NativeResult {
        self.begin_put(args.name)?;
        count(args.nzones)?;
        if args.nodelist.is_empty() || args.shapesize.len() != args.shapecounts.len() {
            return Err(E_BADARGS);
        }
        let mut obj = SdbObject::new(args.name, ObjectType::Zonelist);
        obj.set("nzones", Attr::Int(args.nzones));
        obj.set("ndims", Attr::Int(args.ndims));
        obj.set("origin", Attr::Int(args.origin));
        obj.set("nshapes", Attr::Int(args.shapesize.len() as i32));
        obj.push_array("nodelist", Payload::from_ints(args.nodelist));
        obj.push_array("shapesize", Payload::from_ints(args.shapesize));
        obj.push_array("shapecnt", Payload::from_ints(args.shapecounts));
        self.commit(obj)
    }

    fn put_zonelist2(&mut self, args: &Zonelist2Args<'_>, opts: Option<&NativeOptlist>) -> NativeResult {
        self.begin_put(args.name)?;
        count(args.nzones)?;
        let nshapes = args.shapesize.len();
        if args.nodelist.is_empty() || args.shapecounts.len() != nshapes || args.shapetype.len() != nshapes {
            return Err(E_BADARGS);
        }
        let mut obj = SdbObject::new(args.name, ObjectType::Zonelist);
        obj.set("nzones", Attr::Int(args.nzones));
        obj.set("ndims", Attr::Int(args.ndims));
        obj.set("origin", Attr::Int(args.origin));
        obj.set("nshapes", Attr::Int(nshapes as i32));
        obj.set("lo_offset", Attr::Ints(vec![args.lo_offset]));
        obj.set("hi_offset", Attr::Ints(vec![args.hi_offset]));
        obj.apply_options(opts);
        obj.push_array("nodelist", Payload::from_ints(args.nodelist));
        obj.push_array("shapetype", Payload::from_ints(args.shapetype));
        obj.push_array("shapesize", Payload::from_ints(args.shapesize));
        obj.push_array("shapecnt", Payload::from_ints(args.shapecounts));
        self.commit(obj)
    }

    fn put_ucdmesh(&mut self, args: &UcdmeshArgs<'_>, opts: Option<&NativeOptlist>) -> NativeResult {
        self.begin_put(args.name)?;
        let nnodes = count(args.nnodes)?;
        count(args.nzones)?;
        check_arrays(args.coords, nnodes, args.datatype)?;
        if !args.coordnames.is_empty() && args.coordnames.len() != args.coords.len() {
            return Err(E_BADARGS);
        }
        let mut obj = SdbObject::new(args.name, ObjectType::UcdMesh);
        obj.set("ndims", Attr::Int(args.coords.len() as i32));
        obj.set("nnodes", Attr::Int(args.nnodes));
        obj.set("nzones", Attr::Int(args.nzones));
        obj.set("datatype", Attr::Int(args.datatype.tag()));
        obj.set("coordnames", names_attr(args.coordnames));
        if let Some(zl) = args.zonel_name {
            obj.set("zonelist", Attr::Str(zl.to_string()));
        }
        if let Some(fl) = args.facel_name {
            obj.set("facelist", Attr::Str(fl.to_string()));
        }
        obj.apply_options(opts);
        for (i, coord) in args.coords.iter().enumerate() {
            obj.push_array(format!("coord{i}"), Payload::from_native(coord));
        }
        self.commit(obj)
    }

    fn put_ucdvar(&mut self, args: &UcdvarArgs<'_>, opts: Option<&NativeOptlist>) -> NativeResult {
        self.begin_put(args.name)?;
        let nels = count(args.nels)?;
        check_arrays(args.vars, nels, args.datatype)?;
        let mut obj = component_object(
            ObjectType::UcdVar,
            args.name,
            args.meshname,
            args.varnames,
            args.vars,
            args.nels,
            args.datatype,
            opts,
        );
        obj.set("centering", Attr::Int(args.centering.as_raw()));
        self.commit(obj)
    }

    fn put_pointmesh(&mut self, args: &PointmeshArgs<'_>, opts: Option<&NativeOptlist>) -> NativeResult {
        self.begin_put(args.name)?;
        let npoints = count(args.npoints)?;
        check_arrays(args.coords, npoints, args.datatype)?;
        let mut obj = SdbObject::new(args.name, ObjectType::PointMesh);
        obj.set("ndims", Attr::Int(args.coords.len() as i32));
        obj.set("nels", Attr::Int(args.npoints));
        obj.set("datatype", Attr::Int(args.datatype.tag()));
        obj.apply_options(opts);
        for (i, coord) in args.coords.iter().enumerate() {
            obj.push_array(format!("coord{i}"), Payload::from_native(coord));
        }
        self.commit(obj)
    }

    fn put_pointvar(&mut self, args: &PointvarArgs<'_>, opts: Option<&NativeOptlist>) -> NativeResult {
        self.begin_put(args.name)?;
        let nels = count(args.nels)?;
        check_arrays(args.vars, nels, args.datatype)?;
        let obj = component_object(
            ObjectType::PointVar,
            args.name,
            args.meshname,
            &[],
            args.vars,
            args.nels,
            args.datatype,
            opts,
        );
        self.commit(obj)
    }

    fn put_quadmesh(&mut self, args: &QuadmeshArgs<'_>, opts: Option<&NativeOptlist>) -> NativeResult {
        self.begin_put(args.name)?;
        let ndims = args.coords.len();
        if ndims == 0 || ndims > 3 || args.dims.len() != ndims {
            return Err(E_BADARGS);
        }
        let dims = args.dims.iter().map(|&d| count(d)).collect::<NativeResult<Vec<_>>>()?;
        match args.coordtype {
            CoordType::Collinear => {
                for (coord, &d) in args.coords.iter().zip(&dims) {
                    check_arrays(std::slice::from_ref(coord), d, args.datatype)?;
                }
            }
            CoordType::NonCollinear => {
                check_arrays(args.coords, grid_count(&dims)?, args.datatype)?;
            }
        }
        let mut obj = SdbObject::new(args.name, ObjectType::QuadMesh);
        obj.set("ndims", Attr::Int(ndims as i32));
        obj.set("dims", Attr::Ints(args.dims.to_vec()));
        obj.set("coordtype", Attr::Int(args.coordtype.as_raw()));
        obj.set("datatype", Attr::Int(args.datatype.tag()));
        obj.set("coordnames", names_attr(args.coordnames));
        obj.apply_options(opts);
        for (i, coord) in args.coords.iter().enumerate() {
            obj.push_array(format!("coord{i}"), Payload::from_native(coord));
        }
        self.commit(obj)
    }

    fn put_quadvar(&mut self, args: &QuadvarArgs<'_>, opts: Option<&NativeOptlist>) -> NativeResult {
        self.begin_put(args.name)?;
        if args.dims.is_empty() || args.dims.len() > 3 {
            return Err(E_BADARGS);
        }
        let dims = args.dims.iter().map(|&d| count(d)).collect::<NativeResult<Vec<_>>>()?;
        let nels = grid_count(&dims)?;
        check_arrays(args.vars, nels, args.datatype)?;
        let mut obj = component_object(
            ObjectType::QuadVar,
            args.name,
            args.meshname,
            args.varnames,
            args.vars,
            nels as i32,
            args.datatype,
            opts,
        );
        obj.set("ndims", Attr::Int(dims.len() as i32));
        obj.set("dims", Attr::Ints(args.dims.to_vec()));
        obj.set("centering", Attr::Int(args.centering.as_raw()));
        self.commit(obj)
    }

    fn put_curve(&mut self, args: &CurveArgs<'_>, opts: Option<&NativeOptlist>) -> NativeResult {
        self.begin_put(args.name)?;
        let npts = count(args.npts)?;
        check_arrays(&[args.x, args.y], npts, args.datatype)?;
        let mut obj = SdbObject::new(args.name, ObjectType::Curve);
        obj.set("npts", Attr::Int(args.npts));
        obj.set("datatype", Attr::Int(args.datatype.tag()));
        obj.apply_options(opts);
        obj.push_array("x", Payload::from_native(&args.x));
        obj.push_array("y", Payload::from_native(&args.y));
        self.commit(obj)
    }

    fn put_multimesh(&mut self, args: &MultiArgs<'_>, opts: Option<&NativeOptlist>) -> NativeResult {
        self.begin_put(args.name)?;
        put_multi(self, ObjectType::MultiMesh, args, opts)
    }

    fn put_multivar(&mut self, args: &MultiArgs<'_>, opts: Option<&NativeOptlist>) -> NativeResult {
        self.begin_put(args.name)?;
        put_multi(self, ObjectType::MultiVar, args, opts)
    }

    fn put_defvars(&mut self, args: &DefvarsArgs<'_>) -> NativeResult {
        self.begin_put(args.name)?;
        let n = args.names.len();
        if n == 0 || args.types.len() != n || args.defs.len() != n || args.opts.len() != n {
            return Err(E_BADARGS);
        }
        let guihide = args
            .opts
            .iter()
            .map(|o| o.and_then(|o| o.get_int(crate::options::DBOPT_HIDE_FROM_GUI)).unwrap_or(0))
            .collect();
        let mut obj = SdbObject::new(args.name, ObjectType::Defvars);
        obj.set("ndefs", Attr::Int(n as i32));
        obj.set("names", names_attr(args.names));
        obj.set("types", Attr::Ints(args.types.to_vec()));
        obj.set("defns", names_attr(args.defs));
        obj.set("guihides", Attr::Ints(guihide));
        self.commit(obj)
    }

    fn get_curve(&mut self, name: &str) -> Option<Box<NativeCurve>> {
        let curve = self.lookup(name, ObjectType::Curve).and_then(curve_of);
        self.hand_out(curve)
    }

    fn get_quadmesh(&mut self, name: &str) -> Option<Box<NativeQuadmesh>> {
        let mesh = self.lookup(name, ObjectType::QuadMesh).and_then(quadmesh_of);
        self.hand_out(mesh)
    }

    fn get_quadvar(&mut self, name: &str) -> Option<Box<NativeQuadvar>> {
        let var = self.lookup(name, ObjectType::QuadVar).and_then(quadvar_of);
        self.hand_out(var)
    }

    fn get_toc(&mut self) -> Option<&NativeToc> {
        self.stats.record_toc();
        if !self.open {
            return None;
        }
        let toc = self.build_toc();
        Some(&*self.toc.insert(toc))
    }
}

impl Drop for SdbFile {
    fn drop(&mut self) {
        if self.open {
            if let Err(code) = self.close() {
                tracing::warn!(path = %self.path.display(), code, "sdb close on drop failed");
            }
        }
    }
}
