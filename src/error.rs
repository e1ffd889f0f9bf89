//! Layered error types.
//!
//! [`SchemaError`] and [`CodecError`] are leaf error sets, each with its own
//! `Display`, composed into the top-level [`Error`] via `From` — the same
//! shape as this crate's `bits::Error` → `read::Error` composition.

use std::{error, fmt};

/// Errors raised while compiling a schema (`Context::compile`).
#[derive(Debug, Clone)]
pub enum SchemaError {
    InvalidPath,
    CannotOpenFile(String),
    ParseFail(String),
    UnknownUnit(String),
    InvalidParameter(String),
    InvalidPid { mode: u8, pid: u32 },
    Oom,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPath => write!(f, "invalid schema path"),
            Self::CannotOpenFile(path) => write!(f, "cannot open schema file `{path}`"),
            Self::ParseFail(msg) => write!(f, "schema parse failure: {msg}"),
            Self::UnknownUnit(name) => write!(f, "unknown unit `{name}`"),
            Self::InvalidParameter(msg) => write!(f, "invalid schema parameter: {msg}"),
            Self::InvalidPid { mode, pid } => {
                write!(f, "invalid pid 0x{pid:x} for mode 0x{mode:x}")
            }
            Self::Oom => write!(f, "out of memory"),
        }
    }
}

impl error::Error for SchemaError {}

/// Errors raised by the runtime encode/decode/evaluate paths.
#[derive(Debug, Clone)]
pub enum CodecError {
    UnknownId(u32),
    InvalidDlc(u8),
    InvalidMode(u8),
    InvalidPid(u32),
    UnknownModePid { mode: u8, pid: u32 },
    InvalidDataBytes { expected: u8, found: u8 },
    InvalidParameter(String),
    PidDoesNotExist,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownId(id) => write!(f, "unknown CAN identifier 0x{id:x}"),
            Self::InvalidDlc(dlc) => write!(f, "invalid dlc {dlc}, expected 8"),
            Self::InvalidMode(mode) => write!(f, "invalid mode 0x{mode:x}"),
            Self::InvalidPid(pid) => write!(f, "invalid pid 0x{pid:x}"),
            Self::UnknownModePid { mode, pid } => {
                write!(f, "unknown (mode, pid) (0x{mode:x}, 0x{pid:x})")
            }
            Self::InvalidDataBytes { expected, found } => write!(
                f,
                "invalid data bytes: expected pci length {expected}, found {found}"
            ),
            Self::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            Self::PidDoesNotExist => write!(f, "pid does not exist in this context"),
        }
    }
}

impl error::Error for CodecError {}

/// Top-level error type returned by every public API in this crate.
#[derive(Debug, Clone)]
pub enum Error {
    Schema(SchemaError),
    Codec(CodecError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema(err) => err.fmt(f),
            Self::Codec(err) => err.fmt(f),
        }
    }
}

impl error::Error for Error {}

impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err)
    }
}

impl From<CodecError> for Error {
    fn from(err: CodecError) -> Self {
        Self::Codec(err)
    }
}

/// C-style tagged error code, mirroring the distilled error table 1:1 for
/// callers that want a stable numeric discriminant rather than matching on
/// [`Error`] directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Ok = 0,
    Oom = -1,
    PidDoesNotExist = -2,
    InvalidParameter = -3,
    InvalidPath = -4,
    CannotOpenFile = -5,
    UnknownId = -6,
    InvalidDlc = -7,
    InvalidMode = -8,
    InvalidPid = -9,
    UnknownModePid = -10,
    UnknownUnit = -11,
    InvalidDataBytes = -12,
    ParseFail = -13,
}

impl ErrorCode {
    /// Fixed English phrase for this code, independent of any dynamic data
    /// a particular occurrence carried (the `strerror`-style helper §6
    /// calls for, mirroring the original's `yobd_strerror`).
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Ok => "success",
            Self::Oom => "out of memory",
            Self::PidDoesNotExist => "pid does not exist in this context",
            Self::InvalidParameter => "invalid parameter",
            Self::InvalidPath => "invalid schema path",
            Self::CannotOpenFile => "cannot open schema file",
            Self::UnknownId => "unknown CAN identifier",
            Self::InvalidDlc => "invalid dlc",
            Self::InvalidMode => "invalid mode",
            Self::InvalidPid => "invalid pid",
            Self::UnknownModePid => "unknown (mode, pid)",
            Self::UnknownUnit => "unknown unit",
            Self::InvalidDataBytes => "invalid data bytes",
            Self::ParseFail => "schema parse failure",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Error {
    /// Maps this error onto its stable tagged code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Schema(schema_err) => match schema_err {
                SchemaError::InvalidPath => ErrorCode::InvalidPath,
                SchemaError::CannotOpenFile(_) => ErrorCode::CannotOpenFile,
                SchemaError::ParseFail(_) => ErrorCode::ParseFail,
                SchemaError::UnknownUnit(_) => ErrorCode::UnknownUnit,
                SchemaError::InvalidParameter(_) => ErrorCode::InvalidParameter,
                SchemaError::InvalidPid { .. } => ErrorCode::InvalidPid,
                SchemaError::Oom => ErrorCode::Oom,
            },
            Self::Codec(codec_err) => match codec_err {
                CodecError::UnknownId(_) => ErrorCode::UnknownId,
                CodecError::InvalidDlc(_) => ErrorCode::InvalidDlc,
                CodecError::InvalidMode(_) => ErrorCode::InvalidMode,
                CodecError::InvalidPid(_) => ErrorCode::InvalidPid,
                CodecError::UnknownModePid { .. } => ErrorCode::UnknownModePid,
                CodecError::InvalidDataBytes { .. } => ErrorCode::InvalidDataBytes,
                CodecError::InvalidParameter(_) => ErrorCode::InvalidParameter,
                CodecError::PidDoesNotExist => ErrorCode::PidDoesNotExist,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_message_is_fixed_regardless_of_payload() {
        let a = Error::Codec(CodecError::UnknownId(0x123));
        let b = Error::Codec(CodecError::UnknownId(0x456));
        assert_eq!(a.code(), ErrorCode::UnknownId);
        assert_eq!(a.code().message(), b.code().message());
        assert_eq!(ErrorCode::UnknownId.message(), "unknown CAN identifier");
    }

    #[test]
    fn every_code_has_a_non_empty_message() {
        for code in [
            ErrorCode::Ok,
            ErrorCode::Oom,
            ErrorCode::PidDoesNotExist,
            ErrorCode::InvalidParameter,
            ErrorCode::InvalidPath,
            ErrorCode::CannotOpenFile,
            ErrorCode::UnknownId,
            ErrorCode::InvalidDlc,
            ErrorCode::InvalidMode,
            ErrorCode::InvalidPid,
            ErrorCode::UnknownModePid,
            ErrorCode::UnknownUnit,
            ErrorCode::InvalidDataBytes,
            ErrorCode::ParseFail,
        ] {
            assert!(!code.message().is_empty());
            assert_eq!(code.to_string(), code.message());
        }
    }
}
