//! SDB container reader.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use super::format::*;
use super::store::{Attr, Payload, SdbObject, Store};
use crate::native::{NativeBuffer, ObjectType};
use crate::util::{DataType, Error, Result};

/// Whole-file input, memory-mapped when the `mmap` feature is on.
enum Source {
    #[cfg(feature = "mmap")]
    Mmap(memmap2::Mmap),
    Buffer(Vec<u8>),
}

impl Source {
    fn open(path: &Path) -> Result<Self> {
        let mut file = File::open(path)?;
        let size = file.metadata()?.len();

        #[cfg(feature = "mmap")]
        if size > 0 {
            // SAFETY: the file is opened read-only and the map is dropped
            // before this handle writes the file again.
            let mmap = unsafe { memmap2::Mmap::map(&file) }?;
            return Ok(Self::Mmap(mmap));
        }

        let mut buf = Vec::with_capacity(size as usize);
        file.read_to_end(&mut buf)?;
        Ok(Self::Buffer(buf))
    }

    fn bytes(&self) -> &[u8] {
        match self {
            #[cfg(feature = "mmap")]
            Self::Mmap(m) => &m[..],
            Self::Buffer(b) => b.as_slice(),
        }
    }
}

/// Check that `data` starts with a finalized SDB header; returns the index
/// position.
pub fn parse_header(data: &[u8]) -> Result<u64> {
    if data.len() < HEADER_SIZE {
        return Err(Error::other(format!("file too short for header ({} bytes)", data.len())));
    }
    if &data[..SDB_MAGIC.len()] != SDB_MAGIC {
        return Err(Error::other("not an SDB file"));
    }
    if data[FROZEN_OFFSET] != FROZEN_FLAG {
        return Err(Error::other("SDB file was not finalized"));
    }
    let mut cur = &data[VERSION_OFFSET..];
    let version = cur.read_u16::<LittleEndian>()?;
    if version > CURRENT_VERSION {
        return Err(Error::other(format!("unsupported SDB version {version}")));
    }
    Ok(cur.read_u64::<LittleEndian>()?)
}

/// Load every object of the file at `path` into memory.
pub fn read_store(path: &Path) -> Result<Store> {
    let source = Source::open(path)?;
    let data = source.bytes();
    let index_pos = parse_header(data)?;

    let mut cur = tail(data, index_pos)?;
    let count = cur.read_u32::<LittleEndian>()? as usize;
    let mut store = Store::new();
    for _ in 0..count {
        let pos = cur.read_u64::<LittleEndian>()?;
        let obj = read_object(&mut tail(data, pos)?)?;
        store
            .insert(obj)
            .map_err(|dup| Error::other(format!("duplicate object '{}'", dup.name)))?;
    }

    tracing::debug!(path = %path.display(), objects = store.len(), "sdb loaded");
    Ok(store)
}

fn tail(data: &[u8], pos: u64) -> Result<&[u8]> {
    data.get(pos as usize..)
        .ok_or_else(|| Error::other(format!("offset {pos} beyond end of file")))
}

fn read_str(cur: &mut &[u8]) -> Result<String> {
    let len = cur.read_u32::<LittleEndian>()? as usize;
    let bytes = take(cur, len)?;
    String::from_utf8(bytes.to_vec()).map_err(|e| Error::other(format!("invalid name: {e}")))
}

fn take<'a>(cur: &mut &'a [u8], len: usize) -> Result<&'a [u8]> {
    if cur.len() < len {
        return Err(Error::other(format!("truncated record: need {len} bytes, {} left", cur.len())));
    }
    let (head, rest) = cur.split_at(len);
    *cur = rest;
    Ok(head)
}

fn read_object(cur: &mut &[u8]) -> Result<SdbObject> {
    let raw_kind = cur.read_i32::<LittleEndian>()?;
    let kind = ObjectType::from_raw(raw_kind)
        .ok_or_else(|| Error::other(format!("unknown object type {raw_kind}")))?;
    let name = read_str(cur)?;
    let mut obj = SdbObject::new(&name, kind);

    let nattrs = cur.read_u32::<LittleEndian>()?;
    for _ in 0..nattrs {
        let key = read_str(cur)?;
        let value = read_attr(cur)?;
        obj.set(&key, value);
    }

    let narrays = cur.read_u32::<LittleEndian>()?;
    for _ in 0..narrays {
        let name = read_str(cur)?;
        let payload = read_payload(cur)?;
        obj.push_array(name, payload);
    }
    Ok(obj)
}

fn read_attr(cur: &mut &[u8]) -> Result<Attr> {
    let tag = cur.read_u8()?;
    let value = match tag {
        ATTR_INT => Attr::Int(cur.read_i32::<LittleEndian>()?),
        ATTR_FLOAT => Attr::Float(cur.read_f64::<LittleEndian>()?),
        ATTR_STR => Attr::Str(read_str(cur)?),
        ATTR_INTS => {
            let n = cur.read_u32::<LittleEndian>()? as usize;
            let mut vs = Vec::with_capacity(n.min(cur.len() / 4));
            for _ in 0..n {
                vs.push(cur.read_i32::<LittleEndian>()?);
            }
            Attr::Ints(vs)
        }
        ATTR_STRS => {
            let n = cur.read_u32::<LittleEndian>()? as usize;
            let mut ss = Vec::with_capacity(n.min(cur.len() / 4));
            for _ in 0..n {
                ss.push(read_str(cur)?);
            }
            Attr::Strs(ss)
        }
        other => return Err(Error::other(format!("unknown attribute tag {other}"))),
    };
    Ok(value)
}

fn read_payload(cur: &mut &[u8]) -> Result<Payload> {
    let dtype = DataType::from_tag(cur.read_i32::<LittleEndian>()?)?;
    let count = cur.read_u64::<LittleEndian>()? as usize;
    let len = cur.read_u64::<LittleEndian>()? as usize;
    if count.checked_mul(dtype.num_bytes()) != Some(len) {
        return Err(Error::other(format!("payload of {count} {dtype} elements has {len} bytes")));
    }
    let bytes = take(cur, len)?;
    Ok(Payload {
        dtype,
        count,
        data: NativeBuffer::from_bytes(bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::sdb::writer::write_store;
    use crate::native::NativeArray;

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("objects.sdb");

        let mut store = Store::new();
        let mut curve = SdbObject::new("c", ObjectType::Curve);
        curve.set("npts", Attr::Int(3));
        curve.set("xlabel", Attr::Str("t".into()));
        curve.set("dims", Attr::Ints(vec![2, 3]));
        curve.set("names", Attr::Strs(vec!["a".into(), "b".into()]));
        curve.set("dtime", Attr::Float(0.5));
        curve.push_array("x", Payload::from_native(&NativeArray::from_slice(&[1.0f64, 2.0, 3.0])));
        store.insert(curve.clone()).unwrap();
        store.insert(SdbObject::new("empty", ObjectType::Dir)).unwrap();

        write_store(&path, &store).unwrap();
        let loaded = read_store(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("c"), Some(&curve));
        assert_eq!(loaded.get("empty").map(|o| o.kind), Some(ObjectType::Dir));
    }

    #[test]
    fn test_rejects_foreign_and_unfinished_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.sdb");
        std::fs::write(&path, b"definitely not sdb").unwrap();
        assert!(read_store(&path).is_err());

        let mut header = [0u8; HEADER_SIZE];
        header[..4].copy_from_slice(SDB_MAGIC);
        header[FROZEN_OFFSET] = NOT_FROZEN_FLAG;
        assert!(parse_header(&header).is_err());
        header[FROZEN_OFFSET] = FROZEN_FLAG;
        header[VERSION_OFFSET] = CURRENT_VERSION as u8;
        assert_eq!(parse_header(&header).unwrap(), 0);
    }
}
