//! Element types - the bridge between host numeric types and format type tags.

use bytemuck::Pod;
use std::fmt;

use super::{Error, Result};

/// Element type of an array as the database format knows it.
///
/// Each variant carries the format's numeric type tag (see [`DataType::tag`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataType {
    /// 16-bit signed integer
    Short,
    /// 32-bit signed integer
    Int,
    /// Native `long` (64-bit on LP64 targets)
    Long,
    /// `long long`, only understood by newer native libraries
    LongLong,
    /// 32-bit IEEE float
    Float,
    /// 64-bit IEEE float
    Double,
    /// Single byte
    Char,
    /// No type / unknown
    #[default]
    NoType,
}

/// Format type tags.
pub const DB_INT: i32 = 16;
pub const DB_SHORT: i32 = 17;
pub const DB_LONG: i32 = 18;
pub const DB_FLOAT: i32 = 19;
pub const DB_DOUBLE: i32 = 20;
pub const DB_CHAR: i32 = 21;
pub const DB_LONG_LONG: i32 = 22;
pub const DB_NOTYPE: i32 = 25;

impl DataType {
    /// Returns the size in bytes of a single element of this type.
    #[inline]
    pub const fn num_bytes(self) -> usize {
        match self {
            Self::Short => 2,
            Self::Int => 4,
            Self::Long => 8,
            Self::LongLong => 8,
            Self::Float => 4,
            Self::Double => 8,
            Self::Char => 1,
            Self::NoType => 0,
        }
    }

    /// Returns the name of this type as a string.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::LongLong => "long_long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Char => "char",
            Self::NoType => "notype",
        }
    }

    /// Format type tag for this element type.
    #[inline]
    pub const fn tag(self) -> i32 {
        match self {
            Self::Short => DB_SHORT,
            Self::Int => DB_INT,
            Self::Long => DB_LONG,
            Self::LongLong => DB_LONG_LONG,
            Self::Float => DB_FLOAT,
            Self::Double => DB_DOUBLE,
            Self::Char => DB_CHAR,
            Self::NoType => DB_NOTYPE,
        }
    }

    /// Element type for a format type tag.
    ///
    /// `DB_NOTYPE` and unknown tags are rejected: a result array cannot be
    /// reconstructed without a concrete element type.
    pub fn from_tag(tag: i32) -> Result<Self> {
        match tag {
            DB_SHORT => Ok(Self::Short),
            DB_INT => Ok(Self::Int),
            DB_LONG => Ok(Self::Long),
            DB_LONG_LONG => Ok(Self::LongLong),
            DB_FLOAT => Ok(Self::Float),
            DB_DOUBLE => Ok(Self::Double),
            DB_CHAR => Ok(Self::Char),
            _ => Err(Error::UnsupportedType(format!("invalid type code {tag}"))),
        }
    }

    /// Returns true if this is a floating point type.
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    /// Returns true if this is an integer type.
    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Short | Self::Int | Self::Long | Self::LongLong | Self::Char)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Closed set of element types accepted by the float/double dispatch of
/// mesh and variable writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatKind {
    F32,
    F64,
}

impl FloatKind {
    /// Select the dispatch arm for an element type.
    pub fn of(dtype: DataType) -> Result<Self> {
        match dtype {
            DataType::Float => Ok(Self::F32),
            DataType::Double => Ok(Self::F64),
            other => Err(Error::UnsupportedType(other.name().to_string())),
        }
    }

    /// Element type of this arm.
    pub const fn data_type(self) -> DataType {
        match self {
            Self::F32 => DataType::Float,
            Self::F64 => DataType::Double,
        }
    }
}

// === Element trait for type-safe conversions ===

/// Trait for host types that can be stored as array elements.
pub trait Element: Pod + Copy + Default {
    /// The corresponding element type.
    const DATA_TYPE: DataType;

    /// Size of this type in bytes.
    const SIZE: usize = std::mem::size_of::<Self>();
}

impl Element for i16 {
    const DATA_TYPE: DataType = DataType::Short;
}

impl Element for i32 {
    const DATA_TYPE: DataType = DataType::Int;
}

impl Element for i64 {
    const DATA_TYPE: DataType = DataType::Long;
}

impl Element for f32 {
    const DATA_TYPE: DataType = DataType::Float;
}

impl Element for f64 {
    const DATA_TYPE: DataType = DataType::Double;
}

impl Element for u8 {
    const DATA_TYPE: DataType = DataType::Char;
}

impl Element for i8 {
    const DATA_TYPE: DataType = DataType::Char;
}

/// Element types routed through the float/double write path.
pub trait FloatElement: Element {
    const KIND: FloatKind;
}

impl FloatElement for f32 {
    const KIND: FloatKind = FloatKind::F32;
}

impl FloatElement for f64 {
    const KIND: FloatKind = FloatKind::F64;
}

/// Check that `T` is a valid host type for arrays tagged `dtype`.
///
/// `LongLong` and `Long` share the same 64-bit host representation.
pub fn host_matches<T: Element>(dtype: DataType) -> bool {
    T::DATA_TYPE == dtype
        || (T::DATA_TYPE == DataType::Long && dtype == DataType::LongLong)
}
