//! SDB container writer.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use super::format::*;
use super::store::{Attr, Payload, SdbObject, Store};
use crate::util::Result;

/// Output stream for writing SDB data.
pub struct OStream {
    writer: BufWriter<File>,
    pos: u64,
}

impl OStream {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: BufWriter::with_capacity(256 * 1024, file),
            pos: 0,
        })
    }

    /// Get the current write position.
    #[inline]
    pub fn pos(&self) -> u64 {
        self.pos
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.pos += data.len() as u64;
        Ok(())
    }

    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.writer.write_u64::<LittleEndian>(value)?;
        self.pos += 8;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.writer.write_u32::<LittleEndian>(value)?;
        self.pos += 4;
        Ok(())
    }

    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.writer.write_u16::<LittleEndian>(value)?;
        self.pos += 2;
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.writer.write_u8(value)?;
        self.pos += 1;
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.writer.write_i32::<LittleEndian>(value)?;
        self.pos += 4;
        Ok(())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.writer.write_f64::<LittleEndian>(value)?;
        self.pos += 8;
        Ok(())
    }

    /// Length-prefixed UTF-8 string.
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_u32(s.len() as u32)?;
        self.write_bytes(s.as_bytes())
    }

    /// Seek to a position and return it.
    pub fn seek(&mut self, pos: u64) -> Result<u64> {
        self.writer.flush()?;
        let new_pos = self.writer.seek(SeekFrom::Start(pos))?;
        self.pos = new_pos;
        Ok(new_pos)
    }

    /// Flush the buffer and sync file contents to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_data()?;
        Ok(())
    }
}

/// Write a whole store to `path`.
///
/// The header is written unfrozen first and patched with the index position
/// and the frozen flag once every object is on disk, so a torn write is
/// detectable on open.
pub fn write_store(path: &Path, store: &Store) -> Result<()> {
    let mut out = OStream::create(path)?;

    out.write_bytes(SDB_MAGIC)?;
    out.write_u8(NOT_FROZEN_FLAG)?;
    out.write_u8(0)?;
    out.write_u16(CURRENT_VERSION)?;
    out.write_u64(0)?;

    let mut positions = Vec::with_capacity(store.len());
    for obj in store.iter() {
        positions.push(out.pos());
        write_object(&mut out, obj)?;
    }

    let index_pos = out.pos();
    out.write_u32(positions.len() as u32)?;
    for pos in positions {
        out.write_u64(pos)?;
    }

    out.seek(FROZEN_OFFSET as u64)?;
    out.write_u8(FROZEN_FLAG)?;
    out.seek(INDEX_POS_OFFSET as u64)?;
    out.write_u64(index_pos)?;
    out.flush()?;

    tracing::debug!(path = %path.display(), objects = store.len(), bytes = index_pos, "sdb written");
    Ok(())
}

fn write_object(out: &mut OStream, obj: &SdbObject) -> Result<()> {
    out.write_i32(obj.kind.as_raw())?;
    out.write_str(&obj.name)?;

    out.write_u32(obj.attrs.len() as u32)?;
    for (key, value) in &obj.attrs {
        out.write_str(key)?;
        write_attr(out, value)?;
    }

    out.write_u32(obj.arrays.len() as u32)?;
    for (name, payload) in &obj.arrays {
        out.write_str(name)?;
        write_payload(out, payload)?;
    }
    Ok(())
}

fn write_attr(out: &mut OStream, value: &Attr) -> Result<()> {
    match value {
        Attr::Int(v) => {
            out.write_u8(ATTR_INT)?;
            out.write_i32(*v)
        }
        Attr::Float(v) => {
            out.write_u8(ATTR_FLOAT)?;
            out.write_f64(*v)
        }
        Attr::Str(s) => {
            out.write_u8(ATTR_STR)?;
            out.write_str(s)
        }
        Attr::Ints(vs) => {
            out.write_u8(ATTR_INTS)?;
            out.write_u32(vs.len() as u32)?;
            for &v in vs {
                out.write_i32(v)?;
            }
            Ok(())
        }
        Attr::Strs(ss) => {
            out.write_u8(ATTR_STRS)?;
            out.write_u32(ss.len() as u32)?;
            for s in ss {
                out.write_str(s)?;
            }
            Ok(())
        }
    }
}

// Payload bytes are stored in host order; the element type tag says how to
// read them back.
fn write_payload(out: &mut OStream, payload: &Payload) -> Result<()> {
    out.write_i32(payload.dtype.tag())?;
    out.write_u64(payload.count as u64)?;
    out.write_u64(payload.data.len() as u64)?;
    out.write_bytes(payload.data.as_bytes())
}
