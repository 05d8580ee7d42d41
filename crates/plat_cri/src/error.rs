//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

pub use plat_core::error::FileNotFoundError;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// Transparent wrapper for the shared archive errors
    #[error(transparent)]
    #[diagnostic(transparent)]
    Core(#[from] plat_core::error::Error),

    /// the bit stream ended before decoding finished
    #[error("the bit stream ended before decoding finished")]
    BitstreamExhausted,

    /// compressed data is corrupt: {0}
    #[error("compressed data is corrupt: {0}")]
    CorruptStream(String),

    /// file is an invalid cpk archive: {0}
    #[error("file is an invalid cpk archive: {0}")]
    InvalidArchive(String),

    /// unable to find requested file
    #[error("unable to find requested file")]
    FileNotFound(#[from] FileNotFoundError),

    /// {0}
    #[error("{0}")]
    CustomError(String),
}

impl From<Error> for plat_core::error::Error {
    fn from(error: Error) -> Self {
        match error {
            Error::IOError(error) => plat_core::error::Error::IOError(error),
            Error::Core(error) => error,
            Error::FileNotFound(error) => plat_core::error::Error::FileNotFound(error),
            other => plat_core::error::Error::Format(Box::new(other)),
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
