//! This library handles reading **CPK** archives, **UTF** tables and **CRILAYLA** compressed data
//! as produced by CRI middleware and shipped in Platinum Games titles such as *NieR:Automata*.
//!
//! # CPK Archive Format Documentation
//!
//! A CPK archive is a sequence of tag-prefixed UTF tables followed by the file data. Every
//! table is preceded by a 16 byte prefix:
//!
//! | Offset (bytes) | Field   | Description                                             |
//! |----------------|---------|---------------------------------------------------------|
//! | 0x0000         | Tag     | 4 bytes: `CPK `, `HTOC`, `TOC ` or `ETOC`               |
//! | 0x0004         | Unknown | 4 bytes: Usually `0xFF`                                 |
//! | 0x0008         | Size    | 8 bytes: Size of the table that follows (little endian) |
//!
//! The archive starts with the `CPK ` table, which has exactly one row. Its `HtocOffset`,
//! `TocOffset` and `EtocOffset` columns (with the matching `*Size` columns) point to the other
//! tables. Each row of the `TOC ` table describes one file:
//!
//! - **DirName**: Optional directory of the file
//! - **FileName**: Name of the file
//! - **FileOffset**: Start of the file data, relative to `TocOffset`
//! - **FileSize**: Size of the stored data
//! - **ExtractSize**: Size of the data once decompressed
//! - **ID**: Numeric identifier
//!
//! Stored data starting with `CRILAYLA` is compressed, see [`crilayla`]. Tables that do not
//! start with `@UTF` are obfuscated, see [`utf::decrypt`].
//!
//! ## Additional Information
//!
//! - **File Extension**: `.cpk`
//! - **Endianness**: Tag prefixes and CRILAYLA headers are little endian, UTF tables big endian

pub mod bits;
pub mod cpk;
pub mod crilayla;
pub mod error;
pub mod types;
pub mod utf;

pub use cpk::{CpkArchive, CpkOptions, CpkParser};
pub use utf::UtfTable;
