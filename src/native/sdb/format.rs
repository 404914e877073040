//! SDB container constants.

/// Magic bytes at the start of an SDB file.
pub const SDB_MAGIC: &[u8; 4] = b"SDB\0";

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 16;

/// Offset of the frozen flag in the header.
pub const FROZEN_OFFSET: usize = 4;

/// Offset of the version in the header.
pub const VERSION_OFFSET: usize = 6;

/// Offset of the index position in the header.
pub const INDEX_POS_OFFSET: usize = 8;

/// Current container version.
pub const CURRENT_VERSION: u16 = 1;

/// Frozen flag once the index has been written.
pub const FROZEN_FLAG: u8 = 0xFF;

/// Frozen flag while the file is still being written.
pub const NOT_FROZEN_FLAG: u8 = 0x00;

/// Attribute value tags.
pub const ATTR_INT: u8 = 0;
pub const ATTR_FLOAT: u8 = 1;
pub const ATTR_STR: u8 = 2;
pub const ATTR_INTS: u8 = 3;
pub const ATTR_STRS: u8 = 4;

/// Name of the variable holding the creation info string.
pub const FILEINFO_NAME: &str = "_fileinfo";
