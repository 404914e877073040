//! Process-wide default native library.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::native::sdb::SdbLibrary;
use crate::native::{Capabilities, NativeLibrary, Version};

static DEFAULT_LIBRARY: RwLock<Option<Arc<dyn NativeLibrary>>> = parking_lot::const_rwlock(None);

/// Initialise the default library and return it.
///
/// The first call installs [`SdbLibrary`] unless [`install_library`] ran
/// before; later calls return the same instance.
pub fn initialize() -> Arc<dyn NativeLibrary> {
    if let Some(library) = DEFAULT_LIBRARY.read().as_ref() {
        return library.clone();
    }
    let mut slot = DEFAULT_LIBRARY.write();
    slot.get_or_insert_with(|| {
        let library: Arc<dyn NativeLibrary> = Arc::new(SdbLibrary::new());
        tracing::debug!(version = %library.version(), "default native library initialised");
        library
    })
    .clone()
}

/// Make `library` the default used by [`DbFile::create`](super::DbFile::create)
/// and [`DbFile::open`](super::DbFile::open).
///
/// Returns `false` and leaves the default unchanged if one is already
/// initialised.
pub fn install_library(library: Arc<dyn NativeLibrary>) -> bool {
    let mut slot = DEFAULT_LIBRARY.write();
    if slot.is_some() {
        return false;
    }
    tracing::debug!(version = %library.version(), "native library installed");
    *slot = Some(library);
    true
}

/// Version of the default library.
pub fn library_version() -> Version {
    initialize().version()
}

/// Set the deprecation-warning level of the default library and return the
/// previous one. Libraries without the toggle report 0.
pub fn set_deprecate_warnings(level: i32) -> i32 {
    let library = initialize();
    if Capabilities::from_version(library.version()).deprecate_toggle {
        library.set_deprecate_warnings(level)
    } else {
        0
    }
}
