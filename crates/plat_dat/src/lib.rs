//! This library handles reading and repacking **DAT** archives used by Platinum Games titles
//! such as *NieR:Automata*, *Bayonetta* and *Astral Chain*. The same layout is used by `.dtt`,
//! `.evn` and `.eff` files.
//!
//! # DAT File Format Documentation
//!
//! ## Header Structure
//!
//! | Offset (bytes) | Field          | Description                                   |
//! |----------------|----------------|-----------------------------------------------|
//! | 0x0000         | Magic          | 4 bytes: Always `DAT\0`                       |
//! | 0x0004         | File Count     | 4 bytes: Number of files stored               |
//! | 0x0008         | Offsets Table  | 4 bytes: Absolute offset of the file offsets  |
//! | 0x000C         | Extensions     | 4 bytes: Absolute offset of the extensions    |
//! | 0x0010         | Names Table    | 4 bytes: Absolute offset of the names         |
//! | 0x0014         | Sizes Table    | 4 bytes: Absolute offset of the file sizes    |
//! | 0x0018         | Hash Map       | 4 bytes: Absolute offset of the name hashes   |
//! | 0x001C         | Reserved       | 4 bytes: Always zero                          |
//!
//! ## Tables
//!
//! - **Offsets and Sizes**: One u32 per file. Empty files have offset 0.
//! - **Extensions**: One null padded 4 byte slot per file.
//! - **Names**: A u32 slot width, then one null padded slot per file.
//! - **Hash Map**: Lookup table over the names, see [`hash`].
//!
//! ## Additional Information
//!
//! - **Endianness**: Archives for the Wii U and PS3 store every field and table big endian. They
//!   are recognised by a little endian file count above 100000.
//! - **Alignment**: File data is usually aligned to 16 bytes.

pub mod error;
pub mod hash;
pub mod read;
pub mod types;
pub mod write;

pub use read::{DatArchive, DatParser};
pub use write::{repack, DatWriter, PackedFile};
