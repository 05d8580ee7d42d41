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

    /// file is an invalid dat archive: {0}
    #[error("file is an invalid dat archive: {0}")]
    InvalidArchive(String),

    /// an archive needs at least one file
    #[error("an archive needs at least one file")]
    #[diagnostic(help("pass the files to pack before finishing the archive"))]
    EmptyArchive,

    /// {name:?} cannot be stored in a dat archive: {reason}
    #[error("{name:?} cannot be stored in a dat archive: {reason}")]
    InvalidName {
        /// Name of the offending file
        name: String,
        /// What is wrong with it
        reason: &'static str,
    },

    /// {name:?} does not fit in a dat archive
    #[error("{name:?} does not fit in a dat archive ({size} bytes)")]
    FileTooLarge {
        /// Name of the offending file
        name: String,
        /// Size of its data
        size: u64,
    },

    /// {count} files exceed the {max} a hash table can index
    #[error("{count} files exceed the {max} a hash table can index")]
    TooManyFiles {
        /// Number of files to pack
        count: usize,
        /// Largest supported number of files
        max: usize,
    },

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
