//! Error types shared by every container crate

use miette::Diagnostic;
use thiserror::Error;

/// Boxed error from a format crate crossing the resolver boundary
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// A structure did not start with the bytes its format requires
    #[error("not a valid {format} structure: expected magic {expected:02X?}, found {found:02X?}")]
    InvalidMagic {
        /// Name of the structure being parsed
        format: &'static str,
        /// Magic required by the format
        expected: Box<[u8]>,
        /// Bytes found in its place
        found: Box<[u8]>,
    },

    /// A declared offset or size points past the end of the backing data
    #[error("{size} bytes at offset {offset:#x} exceed the {len} byte buffer")]
    OutOfBounds {
        /// Requested start
        offset: u64,
        /// Requested length
        size: u64,
        /// Length of the backing data
        len: u64,
    },

    /// unable to find requested file
    #[error("unable to find requested file")]
    FileNotFound(#[from] FileNotFoundError),

    /// {0}
    #[error("{0}")]
    Format(#[source] BoxError),

    /// {0}
    #[error("{0}")]
    CustomError(String),
}

impl Error {
    /// Build an [`Error::InvalidMagic`] from the expected and found byte strings
    pub fn invalid_magic(format: &'static str, expected: &[u8], found: &[u8]) -> Self {
        Error::InvalidMagic {
            format,
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Error type to provide further information when a file has not been found
#[derive(Error, Diagnostic, Debug)]
#[error("unable to find requested file")]
pub enum FileNotFoundError {
    /// at index {0}
    #[error("at index {0}")]
    Index(usize),

    /// by name {0}
    #[error("by name {0}")]
    Name(String),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
