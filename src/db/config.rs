//! Settings for creating and opening databases.

use crate::native::{CreateMode, FileType, OpenMode, Target};

/// Info string stored in newly created files.
pub const DEFAULT_FILE_INFO: &str = "Created using visfile";

/// Settings for [`DbFile::create`](super::DbFile::create).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateOptions {
    /// Behaviour when the file already exists
    pub mode: CreateMode,
    pub target: Target,
    pub filetype: FileType,
    /// Free-form description stored with the file; empty stores nothing
    pub info: String,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            mode: CreateMode::NoClobber,
            target: Target::Local,
            filetype: FileType::Pdb,
            info: DEFAULT_FILE_INFO.to_string(),
        }
    }
}

impl CreateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace an existing file instead of failing.
    pub fn clobber(self) -> Self {
        self.with_mode(CreateMode::Clobber)
    }

    pub fn with_mode(mut self, mode: CreateMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_filetype(mut self, filetype: FileType) -> Self {
        self.filetype = filetype;
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = info.into();
        self
    }
}

/// Settings for [`DbFile::open`](super::DbFile::open).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpenOptions {
    pub mode: OpenMode,
    /// Driver to use; `Unknown` lets the library detect it
    pub filetype: FileType,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            mode: OpenMode::Append,
            filetype: FileType::Unknown,
        }
    }
}

impl OpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open without write access.
    pub fn read_only() -> Self {
        Self::default().with_mode(OpenMode::Read)
    }

    pub fn with_mode(mut self, mode: OpenMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_filetype(mut self, filetype: FileType) -> Self {
        self.filetype = filetype;
        self
    }
}
