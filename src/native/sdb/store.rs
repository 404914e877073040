//! In-memory object store of an open SDB file.

use std::collections::HashMap;

use crate::native::{NativeArray, NativeBuffer, NativeOptlist, ObjectType};
use crate::options::{self, OptionKind};
use crate::util::DataType;

/// Typed attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum Attr {
    Int(i32),
    Float(f64),
    Str(String),
    Ints(Vec<i32>),
    Strs(Vec<String>),
}

/// Typed payload array, stored aligned so getters can hand it out directly.
#[derive(Clone, Debug, PartialEq)]
pub struct Payload {
    pub dtype: DataType,
    pub count: usize,
    pub data: NativeBuffer,
}

impl Payload {
    /// Copy the elements of a native array argument.
    pub fn from_native(arr: &NativeArray<'_>) -> Self {
        Self {
            dtype: arr.dtype(),
            count: arr.len(),
            data: NativeBuffer::from_bytes(arr.bytes()),
        }
    }

    /// Copy a slice of ints.
    pub fn from_ints(values: &[i32]) -> Self {
        Self {
            dtype: DataType::Int,
            count: values.len(),
            data: NativeBuffer::from_bytes(bytemuck::cast_slice(values)),
        }
    }

    /// Smallest and largest element, widened to `f64`.
    pub fn range(&self) -> Option<(f64, f64)> {
        let bytes = self.data.as_bytes();
        let values: Vec<f64> = match self.dtype {
            DataType::Float => bytemuck::try_cast_slice::<u8, f32>(bytes).ok()?.iter().map(|&v| v as f64).collect(),
            DataType::Double => bytemuck::try_cast_slice::<u8, f64>(bytes).ok()?.to_vec(),
            DataType::Int => bytemuck::try_cast_slice::<u8, i32>(bytes).ok()?.iter().map(|&v| v as f64).collect(),
            _ => return None,
        };
        values.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Option keys persisted on objects, with the attribute name they map to.
const OPTION_ATTRS: &[(i32, &str)] = &[
    (options::DBOPT_CYCLE, "cycle"),
    (options::DBOPT_TIME, "time"),
    (options::DBOPT_DTIME, "dtime"),
    (options::DBOPT_LABEL, "label"),
    (options::DBOPT_XLABEL, "xlabel"),
    (options::DBOPT_YLABEL, "ylabel"),
    (options::DBOPT_ZLABEL, "zlabel"),
    (options::DBOPT_UNITS, "units"),
    (options::DBOPT_XUNITS, "xunits"),
    (options::DBOPT_YUNITS, "yunits"),
    (options::DBOPT_ZUNITS, "zunits"),
    (options::DBOPT_XVARNAME, "xvarname"),
    (options::DBOPT_YVARNAME, "yvarname"),
    (options::DBOPT_ZVARNAME, "zvarname"),
    (options::DBOPT_REFERENCE, "reference"),
    (options::DBOPT_MAJORORDER, "major_order"),
    (options::DBOPT_COORDSYS, "coord_sys"),
    (options::DBOPT_ORIGIN, "origin"),
    (options::DBOPT_PLANAR, "planar"),
    (options::DBOPT_FACETYPE, "facetype"),
    (options::DBOPT_NSPACE, "nspace"),
    (options::DBOPT_BASEINDEX, "base_index"),
    (options::DBOPT_LO_OFFSET, "lo_offset"),
    (options::DBOPT_HI_OFFSET, "hi_offset"),
    (options::DBOPT_HIDE_FROM_GUI, "guihide"),
    (options::DBOPT_USESPECMF, "use_specmf"),
    (options::DBOPT_ASCII_LABEL, "ascii_labels"),
    (options::DBOPT_BLOCKORIGIN, "block_origin"),
    (options::DBOPT_GROUPNUM, "group_no"),
];

/// One named object: a group of attributes and payload arrays.
#[derive(Clone, Debug, PartialEq)]
pub struct SdbObject {
    pub name: String,
    pub kind: ObjectType,
    pub attrs: Vec<(String, Attr)>,
    pub arrays: Vec<(String, Payload)>,
}

impl SdbObject {
    pub fn new(name: &str, kind: ObjectType) -> Self {
        Self {
            name: name.to_string(),
            kind,
            attrs: Vec::new(),
            arrays: Vec::new(),
        }
    }

    /// Set an attribute, replacing any previous value.
    pub fn set(&mut self, key: &str, value: Attr) {
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = value,
            None => self.attrs.push((key.to_string(), value)),
        }
    }

    pub fn push_array(&mut self, name: impl Into<String>, payload: Payload) {
        self.arrays.push((name.into(), payload));
    }

    /// Copy the recognised options of `opts` into attributes.
    pub fn apply_options(&mut self, opts: Option<&NativeOptlist>) {
        let Some(opts) = opts else { return };
        for &(key, attr) in OPTION_ATTRS {
            let value = match options::kind_of(key) {
                Some(OptionKind::Int) => opts.get_int(key).map(Attr::Int),
                Some(OptionKind::Float) => opts.get_float(key).map(|v| Attr::Float(v as f64)),
                Some(OptionKind::Double) => opts.get_double(key).map(Attr::Float),
                Some(OptionKind::Str) => opts.get_str(key).map(Attr::Str),
                Some(OptionKind::Ints) => opts.get_ints(key).map(Attr::Ints),
                None => None,
            };
            if let Some(value) = value {
                self.set(attr, value);
            }
        }
    }

    pub fn attr(&self, key: &str) -> Option<&Attr> {
        self.attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn int(&self, key: &str) -> Option<i32> {
        match self.attr(key)? {
            Attr::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn float(&self, key: &str) -> Option<f64> {
        match self.attr(key)? {
            Attr::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        match self.attr(key)? {
            Attr::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn ints(&self, key: &str) -> Option<&[i32]> {
        match self.attr(key)? {
            Attr::Ints(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn strs(&self, key: &str) -> Option<&[String]> {
        match self.attr(key)? {
            Attr::Strs(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Owned copy of a string attribute.
    pub fn string(&self, key: &str) -> Option<String> {
        self.str(key).map(str::to_string)
    }

    pub fn array(&self, name: &str) -> Option<&Payload> {
        self.arrays.iter().find(|(n, _)| n == name).map(|(_, p)| p)
    }
}

/// Objects of one file in insertion order.
#[derive(Clone, Debug, Default)]
pub struct Store {
    objects: Vec<SdbObject>,
    by_name: HashMap<String, usize>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Insert an object. Returns it back if the name is taken.
    pub fn insert(&mut self, obj: SdbObject) -> std::result::Result<(), SdbObject> {
        if self.contains(&obj.name) {
            return Err(obj);
        }
        self.by_name.insert(obj.name.clone(), self.objects.len());
        self.objects.push(obj);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&SdbObject> {
        self.by_name.get(name).map(|&i| &self.objects[i])
    }

    /// Object `name` if it has kind `kind`.
    pub fn get_kind(&self, name: &str, kind: ObjectType) -> Option<&SdbObject> {
        self.get(name).filter(|o| o.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SdbObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
