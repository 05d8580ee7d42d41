//! Fixed-layout headers of the CRI formats.

use binrw::{BinRead, BinWrite};

/// Header of a CRILAYLA compressed buffer
///
/// The compressed bit stream follows, then a 0x100 byte uncompressed preamble at
/// `0x10 + header_offset`.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(magic = b"CRILAYLA", little)]
pub struct CrilaylaHeader {
    /// Size of the decoded data, excluding the preamble
    pub uncompressed_size: u32,

    /// Offset of the preamble, relative to the end of this header
    pub header_offset: u32,
}

/// The 16 byte prefix in front of each table of a CPK archive
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct TagHeader {
    /// `CPK `, `HTOC`, `TOC ` or `ETOC`
    pub tag: [u8; 4],

    /// Flags with an unknown purpose, usually `0xFF`
    pub unknown: u32,

    /// Size of the table following the prefix
    pub size: u64,
}

impl TagHeader {
    /// Size of the prefix in bytes
    pub const SIZE: u64 = 0x10;
}

/// Header of a UTF table. All offsets are relative to the start of the table.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(magic = b"@UTF", big)]
pub struct UtfHeader {
    /// Size of the table, excluding the magic and this field
    pub data_size: u32,

    /// Usually the format version
    pub unknown: u16,

    /// Start of the row values, minus 8
    pub value_offset: u16,

    /// Start of the string pool, minus 8
    pub string_offset: u32,

    /// Start of the data pool, minus 8
    pub data_offset: u32,

    /// Table name, as an offset into the string pool
    pub name_offset: u32,

    /// Number of columns
    pub element_count: u16,

    /// Size of a single row
    pub value_size: u16,

    /// Number of rows
    pub page_count: u32,
}

impl UtfHeader {
    /// Size of the header; column descriptors start here
    pub const SIZE: u64 = 32;

    /// Offsets in the header are stored relative to this position
    const BASE: u64 = 8;

    /// Absolute position of the first row value
    pub fn values_start(&self) -> u64 {
        self.value_offset as u64 + Self::BASE
    }

    /// Absolute position of the string pool
    pub fn strings_start(&self) -> u64 {
        self.string_offset as u64 + Self::BASE
    }

    /// Absolute position of the data pool
    pub fn data_start(&self) -> u64 {
        self.data_offset as u64 + Self::BASE
    }
}
