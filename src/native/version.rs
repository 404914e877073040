//! Native library version and the entry points it enables.

use std::fmt;

use crate::util::{DataType, Error, Result};

/// Version reported by a native library.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// True if this version is at least `major.minor.patch`.
    #[inline]
    pub fn at_least(&self, major: u32, minor: u32, patch: u32) -> bool {
        *self >= Self::new(major, minor, patch)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Entry points and conventions available in the linked native library.
///
/// Computed once per session from [`Version`]; operations with more than one
/// native variant consult it instead of probing at call time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    pub version: Version,
    /// `DBPutZonelist2` with shape types and ghost-zone offsets
    pub zonelist_ghosts: bool,
    /// Extended HDF5 driver selections (sec2, stdio, core, mpio)
    pub hdf5_drivers: bool,
    /// `DB_LONG_LONG` element type
    pub long_long: bool,
    /// Deprecation-warning toggle
    pub deprecate_toggle: bool,
    /// Table-of-contents counts named `narray`/`nmrgtree`/... rather than
    /// `narrays`/`nmrgtrees`/...
    pub toc_singular_counts: bool,
}

impl Capabilities {
    pub fn from_version(version: Version) -> Self {
        Self {
            version,
            zonelist_ghosts: version.at_least(4, 6, 1),
            hdf5_drivers: version.at_least(4, 6, 1),
            long_long: version.at_least(4, 7, 2),
            deprecate_toggle: version.at_least(4, 6, 1),
            toc_singular_counts: version.at_least(4, 9, 0),
        }
    }

    /// Reject element types the linked library cannot store.
    pub fn check_type(&self, dtype: DataType) -> Result<()> {
        match dtype {
            DataType::NoType => Err(Error::UnsupportedType(dtype.name().to_string())),
            DataType::LongLong if !self.long_long => Err(Error::UnsupportedType(format!(
                "{} requires native library 4.7.2, linked {}",
                dtype, self.version
            ))),
            _ => Ok(()),
        }
    }

    /// Build an [`Error::Unavailable`] for `entry`.
    pub fn unavailable(&self, entry: &'static str) -> Error {
        Error::Unavailable {
            entry,
            version: self.version.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_ordering() {
        let v = Version::new(4, 6, 1);
        assert!(v.at_least(4, 6, 1));
        assert!(v.at_least(4, 5, 9));
        assert!(!v.at_least(4, 6, 2));
        assert!(!v.at_least(5, 0, 0));
        assert_eq!(v.to_string(), "4.6.1");
    }

    #[test]
    fn test_capabilities_by_era() {
        let old = Capabilities::from_version(Version::new(4, 5, 1));
        assert!(!old.zonelist_ghosts);
        assert!(!old.long_long);
        assert!(!old.toc_singular_counts);
        assert!(old.check_type(DataType::LongLong).is_err());
        assert!(old.check_type(DataType::Double).is_ok());

        let mid = Capabilities::from_version(Version::new(4, 8, 0));
        assert!(mid.zonelist_ghosts);
        assert!(mid.long_long);
        assert!(!mid.toc_singular_counts);

        let new = Capabilities::from_version(Version::new(4, 10, 2));
        assert!(new.toc_singular_counts);
        assert!(new.check_type(DataType::LongLong).is_ok());
    }
}
