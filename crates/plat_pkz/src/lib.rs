//! This library handles reading **PKZ** archives, the compressed containers of Platinum Games
//! titles such as *Astral Chain* and *Bayonetta 3*.
//!
//! # PKZ File Format Documentation
//!
//! ## Header Structure
//!
//! | Offset (bytes) | Field              | Description                                        |
//! |----------------|--------------------|----------------------------------------------------|
//! | 0x0000         | Magic              | 4 bytes: Usually `pkzl`                            |
//! | 0x0004         | Version            | 4 bytes: Format version                            |
//! | 0x0008         | Size               | 8 bytes: Size of the whole archive                 |
//! | 0x0010         | File Count         | 4 bytes: Number of files stored                    |
//! | 0x0014         | Descriptors Offset | 4 bytes: Absolute offset of the file descriptors   |
//! | 0x0018         | Name Table Length  | 4 bytes: Length of the string pool                 |
//! | 0x001C         | Reserved           | 4 bytes                                            |
//!
//! ## File Descriptor
//!
//! | Offset (bytes) | Field              | Description                                        |
//! |----------------|--------------------|----------------------------------------------------|
//! | 0x0000         | Name Offset        | 4 bytes: Offset of the name in the string pool     |
//! | 0x0004         | Compression Offset | 4 bytes: Offset of the scheme name in the pool     |
//! | 0x0008         | Size               | 8 bytes: Size of the decoded file                  |
//! | 0x0010         | Offset             | 8 bytes: Absolute offset of the stored data        |
//! | 0x0018         | Compressed Size    | 8 bytes: Size of the stored data                   |
//!
//! The string pool directly follows the descriptors and holds null-terminated names and scheme
//! names: `ZStandard`, `OodleKraken` or `None`. See [`codec`] for how each is decoded.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.pkz`
//! - **Endianness**: Little endian

pub mod codec;
pub mod error;
pub mod read;
pub mod types;

pub use codec::{Codec, PkzCodecs, ZstdCodec};
pub use read::{PkzArchive, PkzParser};
