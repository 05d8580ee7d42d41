//! Base types for structure of PKZ file.

use binrw::{BinRead, BinWrite};

/// PKZ file header. All data is stored in little endian format.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct PkzHeader {
    /// Identifier of the format, not checked
    pub magic: [u8; 4],

    /// Format version, not checked
    pub version: u32,

    /// Size of the whole archive
    pub size: u64,

    /// The number of files stored in the archive
    pub file_count: u32,

    /// Absolute offset of the file descriptors
    pub descriptors_offset: u32,

    /// Length of the string pool following the descriptors
    #[brw(pad_after = 4)]
    pub name_table_length: u32,
}

impl PkzHeader {
    /// Size of the header in bytes
    pub const SIZE: u64 = 32;

    /// Absolute offset of the string pool
    pub fn pool_offset(&self) -> u64 {
        self.descriptors_offset as u64 + self.file_count as u64 * PkzDescriptor::SIZE
    }
}

/// Describes a single file of a PKZ archive
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct PkzDescriptor {
    /// Name of the file, as an offset into the string pool
    pub name_offset: u32,

    /// Compression scheme name, as an offset into the string pool
    pub compression_offset: u32,

    /// Size of the file once decoded
    pub size: u64,

    /// Absolute offset of the stored bytes
    pub offset: u64,

    /// Size of the stored bytes
    pub compressed_size: u64,
}

impl PkzDescriptor {
    /// Size of a descriptor in bytes
    pub const SIZE: u64 = 32;
}
