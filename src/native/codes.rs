//! Native error codes.

pub const E_NOERROR: i32 = 0;
pub const E_BADFTYPE: i32 = 1;
pub const E_NOTIMP: i32 = 2;
pub const E_NOFILE: i32 = 3;
pub const E_INTERNAL: i32 = 5;
pub const E_NOMEM: i32 = 6;
pub const E_BADARGS: i32 = 7;
pub const E_CALLFAIL: i32 = 8;
pub const E_NOTFOUND: i32 = 9;
pub const E_NOTDIR: i32 = 13;
pub const E_FEXIST: i32 = 17;
pub const E_FILEISDIR: i32 = 18;
pub const E_FILENOREAD: i32 = 19;
pub const E_SYSTEMERR: i32 = 20;
pub const E_FILENOWRITE: i32 = 21;
pub const E_INVALIDNAME: i32 = 22;
pub const E_NOOVERWRITE: i32 = 23;
pub const E_CHECKSUM: i32 = 24;

/// Short description of a native error code.
pub fn describe(code: i32) -> &'static str {
    match code {
        E_NOERROR => "no error",
        E_BADFTYPE => "bad file type",
        E_NOTIMP => "not implemented",
        E_NOFILE => "no such file",
        E_INTERNAL => "internal error",
        E_NOMEM => "not enough memory",
        E_BADARGS => "invalid argument",
        E_CALLFAIL => "low-level call failed",
        E_NOTFOUND => "object not found",
        E_NOTDIR => "not a directory",
        E_FEXIST => "file already exists",
        E_FILEISDIR => "file is a directory",
        E_FILENOREAD => "file lacks read permission",
        E_SYSTEMERR => "system error",
        E_FILENOWRITE => "file lacks write permission",
        E_INVALIDNAME => "invalid object name",
        E_NOOVERWRITE => "overwrite not allowed",
        E_CHECKSUM => "checksum failed",
        _ => "unknown error",
    }
}
