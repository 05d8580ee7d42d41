//! Error types that can be emitted from this library

use miette::Diagnostic;
use plat_core::entry::CompressionScheme;
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

    /// file is an invalid pkz archive: {0}
    #[error("file is an invalid pkz archive: {0}")]
    InvalidArchive(String),

    /// no codec is available for {0}
    #[error("no codec is available for {0}")]
    #[diagnostic(help("pass a codec for this scheme in the PkzCodecs used to open the archive"))]
    MissingCodec(CompressionScheme),

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
