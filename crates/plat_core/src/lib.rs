//! Shared building blocks for reading the containers used by Platinum Games titles.
//!
//! Every container reader (`plat_dat`, `plat_pkz`, `plat_cri`) exposes its members as
//! [`FileEntry`] records behind the [`Archive`] trait. Members are dispatched to format parsers
//! through a [`TypeResolver`], which lets archives nest inside each other (a PKZ holding DATs,
//! a CPK holding PKZs, ...) without any reader depending on another.
//!
//! Entry content is materialized lazily and at most once:
//!
//! ```
//! use plat_core::FileEntry;
//!
//! let entry = FileEntry::builder()
//!     .name("core/ui.dat")
//!     .size(3)
//!     .compressed_size(3)
//!     .build();
//!
//! assert!(entry.is_partial());
//! let content = entry.get_or_try_load(|_| Ok::<_, ()>(vec![1, 2, 3])).unwrap();
//! assert_eq!(&*content, &[1, 2, 3]);
//! assert!(!entry.is_partial());
//! ```

pub mod archive;
pub mod entry;
pub mod error;
pub mod io;
pub mod kind;
pub mod resolve;

pub use archive::{Archive, StructuredFile};
pub use entry::{CompressionScheme, FileEntry};
pub use kind::FileKind;
pub use resolve::{FileParser, Nested, Passthrough, Registry, TypeResolver};
