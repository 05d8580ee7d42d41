//! Base types for structure of DAT file.

use binrw::{BinRead, BinWrite, Endian};

/// DAT file header
///
/// Every DAT starts with `DAT\0`. The remaining fields use the byte order of the platform the
/// archive was built for, see [`DatHeader::sniff_endian`].
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(magic = b"DAT\0")]
pub struct DatHeader {
    /// The number of files stored in the archive
    pub file_count: u32,

    /// Absolute offset of the u32 table of file offsets
    pub offsets_offset: u32,

    /// Absolute offset of the 4 byte extension slots
    pub extensions_offset: u32,

    /// Absolute offset of the name table
    pub names_offset: u32,

    /// Absolute offset of the u32 table of file sizes
    pub sizes_offset: u32,

    /// Absolute offset of the name hash table
    #[brw(pad_after = 4)]
    pub hash_map_offset: u32,
}

impl DatHeader {
    /// Size of the header in bytes
    pub const SIZE: u64 = 32;

    /// Little endian file counts above this mean the archive is big endian
    pub const MAX_FILE_COUNT: u32 = 100_000;

    /// Guess the byte order of an archive from its first 8 bytes.
    ///
    /// No archive holds more than [`DatHeader::MAX_FILE_COUNT`] files, so a larger little endian
    /// count can only be a big endian one.
    pub fn sniff_endian(prefix: &[u8]) -> Endian {
        match prefix.get(4..8) {
            Some(&[a, b, c, d]) if u32::from_le_bytes([a, b, c, d]) > Self::MAX_FILE_COUNT => {
                Endian::Big
            }
            _ => Endian::Little,
        }
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::{BinRead, BinWrite, Endian};
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::types::DatHeader;

    fn header() -> DatHeader {
        DatHeader {
            file_count: 2,
            offsets_offset: 0x20,
            extensions_offset: 0x28,
            names_offset: 0x30,
            sizes_offset: 0x48,
            hash_map_offset: 0x50,
        }
    }

    #[test]
    fn read_little_endian_header() -> Result<()> {
        #[rustfmt::skip]
        let input = vec![
            0x44, 0x41, 0x54, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0x20, 0x00, 0x00, 0x00,
            0x28, 0x00, 0x00, 0x00,
            0x30, 0x00, 0x00, 0x00,
            0x48, 0x00, 0x00, 0x00,
            0x50, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];

        let endian = DatHeader::sniff_endian(&input);
        assert_eq!(endian, Endian::Little);
        assert_eq!(
            DatHeader::read_options(&mut Cursor::new(input), endian, ())?,
            header()
        );

        Ok(())
    }

    #[test]
    fn read_big_endian_header() -> Result<()> {
        #[rustfmt::skip]
        let input = vec![
            0x44, 0x41, 0x54, 0x00,
            0x00, 0x00, 0x00, 0x02,
            0x00, 0x00, 0x00, 0x20,
            0x00, 0x00, 0x00, 0x28,
            0x00, 0x00, 0x00, 0x30,
            0x00, 0x00, 0x00, 0x48,
            0x00, 0x00, 0x00, 0x50,
            0x00, 0x00, 0x00, 0x00,
        ];

        let endian = DatHeader::sniff_endian(&input);
        assert_eq!(endian, Endian::Big);
        assert_eq!(
            DatHeader::read_options(&mut Cursor::new(input), endian, ())?,
            header()
        );

        Ok(())
    }

    #[test]
    fn sniff_threshold() {
        let prefix = |count: u32| {
            let mut prefix = b"DAT\0".to_vec();
            prefix.extend(count.to_le_bytes());
            prefix
        };

        assert_eq!(DatHeader::sniff_endian(&prefix(100_000)), Endian::Little);
        assert_eq!(DatHeader::sniff_endian(&prefix(100_001)), Endian::Big);
        assert_eq!(DatHeader::sniff_endian(&prefix(0)), Endian::Little);
        assert_eq!(DatHeader::sniff_endian(b"DAT"), Endian::Little);
    }

    #[test]
    fn write_header() -> Result<()> {
        let mut actual = Vec::new();
        header().write_le(&mut Cursor::new(&mut actual))?;

        assert_eq!(actual.len() as u64, DatHeader::SIZE);
        assert_eq!(&actual[..8], b"DAT\0\x02\0\0\0");
        assert_eq!(&actual[24..], &[0x50, 0, 0, 0, 0, 0, 0, 0]);

        Ok(())
    }

    #[test]
    fn reject_wrong_magic() {
        let mut input = vec![0u8; 32];
        input[..4].copy_from_slice(b"DTT\0");
        assert!(DatHeader::read_le(&mut Cursor::new(input)).is_err());
    }
}
