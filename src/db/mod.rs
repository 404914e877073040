//! Database sessions.
//!
//! - [`DbFile`] - one open database and its put/get operations
//! - [`ParallelDbFile`] - per-rank files plus a master file
//! - [`CreateOptions`] / [`OpenOptions`] - how files are created and opened
//! - [`initialize`] - process-wide default library

mod config;
mod file;
mod library;
mod parallel;

pub use config::{CreateOptions, OpenOptions, DEFAULT_FILE_INFO};
pub use file::{DbFile, DefVar};
pub use library::{initialize, install_library, library_version, set_deprecate_warnings};
pub use parallel::{master_path, rank_path, ParallelDbFile};
