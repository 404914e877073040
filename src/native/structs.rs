//! Structs allocated by the native library and returned from getters.
//!
//! Getters hand these out boxed; each kind goes back through its own free
//! routine on [`NativeLibrary`](super::NativeLibrary).

/// Heap buffer with 8-byte alignment, so any element type can be viewed
/// in place.
#[derive(Clone, Default, PartialEq)]
pub struct NativeBuffer {
    words: Vec<u64>,
    len: usize,
}

impl NativeBuffer {
    /// Allocate `len` zero bytes.
    pub fn zeroed(len: usize) -> Self {
        Self {
            words: vec![0u64; len.div_ceil(8)],
            len,
        }
    }

    /// Copy `bytes` into a new aligned buffer.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut buf = Self::zeroed(bytes.len());
        buf.as_bytes_mut().copy_from_slice(bytes);
        buf
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<u64, u8>(self.words.as_slice())[..self.len]
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut::<u64, u8>(self.words.as_mut_slice())[..self.len]
    }

    /// Length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl std::fmt::Debug for NativeBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NativeBuffer({} bytes)", self.len)
    }
}

/// `DBcurve`
#[derive(Clone, Debug, Default)]
pub struct NativeCurve {
    pub id: i32,
    pub origin: i32,
    pub title: Option<String>,
    pub xvarname: Option<String>,
    pub yvarname: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub xunits: Option<String>,
    pub yunits: Option<String>,
    pub reference: Option<String>,
    pub datatype: i32,
    pub npts: i32,
    pub x: NativeBuffer,
    pub y: NativeBuffer,
}

/// `DBquadmesh`
#[derive(Clone, Debug, Default)]
pub struct NativeQuadmesh {
    pub id: i32,
    pub block_no: i32,
    pub group_no: i32,
    pub name: Option<String>,
    pub cycle: i32,
    pub coord_sys: i32,
    pub major_order: i32,
    pub stride: [i32; 3],
    pub coordtype: i32,
    pub facetype: i32,
    pub planar: i32,
    pub datatype: i32,
    pub time: f32,
    pub dtime: f64,
    pub min_extents: [f32; 3],
    pub max_extents: [f32; 3],
    pub labels: [Option<String>; 3],
    pub units: [Option<String>; 3],
    pub ndims: i32,
    pub nspace: i32,
    pub nnodes: i32,
    pub dims: [i32; 3],
    pub origin: i32,
    pub min_index: [i32; 3],
    pub max_index: [i32; 3],
    pub base_index: [i32; 3],
    pub start_index: [i32; 3],
    pub size_index: [i32; 3],
    pub guihide: i32,
    pub mrgtree_name: Option<String>,
    /// One buffer per axis; `ndims` entries.
    pub coords: Vec<NativeBuffer>,
}

/// `DBquadvar`
#[derive(Clone, Debug, Default)]
pub struct NativeQuadvar {
    pub id: i32,
    pub name: Option<String>,
    pub units: Option<String>,
    pub label: Option<String>,
    pub cycle: i32,
    pub meshid: i32,
    pub datatype: i32,
    pub nels: i32,
    pub nvals: i32,
    pub ndims: i32,
    pub dims: [i32; 3],
    pub major_order: i32,
    pub stride: [i32; 3],
    pub min_index: [i32; 3],
    pub max_index: [i32; 3],
    pub origin: i32,
    pub time: f32,
    pub dtime: f64,
    pub align: [f32; 3],
    pub mixlen: i32,
    pub use_specmf: i32,
    pub ascii_labels: i32,
    pub meshname: Option<String>,
    pub guihide: i32,
    pub centering: i32,
    /// One buffer per component; `nvals` entries.
    pub vals: Vec<NativeBuffer>,
}

/// One name list of a table of contents and its count field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TocField {
    /// Name-list field, e.g. `curve_names`
    pub list: &'static str,
    /// Count field in current libraries
    pub count: &'static str,
    /// Count field in libraries before 4.9.0, where it differs
    pub legacy_count: Option<&'static str>,
}

impl TocField {
    const fn new(list: &'static str, count: &'static str) -> Self {
        Self { list, count, legacy_count: None }
    }

    const fn renamed(list: &'static str, count: &'static str, legacy: &'static str) -> Self {
        Self { list, count, legacy_count: Some(legacy) }
    }

    /// Count field spelling for a library generation.
    pub fn count_for(&self, singular: bool) -> &'static str {
        match self.legacy_count {
            Some(legacy) if !singular => legacy,
            _ => self.count,
        }
    }
}

/// All name lists of a table of contents, in listing order.
pub const TOC_FIELDS: [TocField; 24] = [
    TocField::new("curve_names", "ncurve"),
    TocField::new("multimesh_names", "nmultimesh"),
    TocField::new("multimeshadj_names", "nmultimeshadj"),
    TocField::new("multivar_names", "nmultivar"),
    TocField::new("multimat_names", "nmultimat"),
    TocField::new("multimatspecies_names", "nmultimatspecies"),
    TocField::new("csgmesh_names", "ncsgmesh"),
    TocField::new("csgvar_names", "ncsgvar"),
    TocField::new("defvars_names", "ndefvars"),
    TocField::new("qmesh_names", "nqmesh"),
    TocField::new("qvar_names", "nqvar"),
    TocField::new("ucdmesh_names", "nucdmesh"),
    TocField::new("ucdvar_names", "nucdvar"),
    TocField::new("ptmesh_names", "nptmesh"),
    TocField::new("ptvar_names", "nptvar"),
    TocField::new("mat_names", "nmat"),
    TocField::new("matspecies_names", "nmatspecies"),
    TocField::new("var_names", "nvar"),
    TocField::new("obj_names", "nobj"),
    TocField::new("dir_names", "ndir"),
    TocField::renamed("array_names", "narray", "narrays"),
    TocField::renamed("mrgtree_names", "nmrgtree", "nmrgtrees"),
    TocField::renamed("groupelmap_names", "ngroupelmap", "ngroupelmaps"),
    TocField::renamed("mrgvar_names", "nmrgvar", "nmrgvars"),
];

/// `DBtoc` - directory listing owned by an open file.
///
/// Count fields are looked up by name because their spelling changed
/// between library generations.
#[derive(Clone, Debug, Default)]
pub struct NativeToc {
    counts: Vec<(&'static str, usize)>,
    lists: Vec<(&'static str, Vec<String>)>,
}

impl NativeToc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name list `list` and its count field `count_field`.
    pub fn set(&mut self, count_field: &'static str, list: &'static str, names: Vec<String>) {
        self.counts.retain(|(f, _)| *f != count_field);
        self.lists.retain(|(l, _)| *l != list);
        self.counts.push((count_field, names.len()));
        self.lists.push((list, names));
    }

    /// Overwrite a count field independently of its list.
    pub fn set_count(&mut self, count_field: &'static str, count: usize) {
        match self.counts.iter_mut().find(|(f, _)| *f == count_field) {
            Some((_, n)) => *n = count,
            None => self.counts.push((count_field, count)),
        }
    }

    /// Value of a count field, if this toc has a field of that name.
    pub fn count(&self, field: &str) -> Option<usize> {
        self.counts.iter().find(|(f, _)| *f == field).map(|(_, n)| *n)
    }

    /// Name list by field name.
    pub fn names(&self, list: &str) -> Option<&[String]> {
        self.lists
            .iter()
            .find(|(l, _)| *l == list)
            .map(|(_, names)| names.as_slice())
    }
}
