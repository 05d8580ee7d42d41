//! Name hash tables written at the end of a DAT's metadata.
//!
//! The games look files up through this table, so a repacked archive needs one. Its layout is
//! owned by the [`HashGenerator`] passed to the writer; [`Crc32HashGenerator`] produces the
//! layout used by *NieR:Automata* and *Astral Chain*:
//!
//! | Offset (bytes) | Field          | Description                                      |
//! |----------------|----------------|--------------------------------------------------|
//! | 0x0000         | Shift          | 4 bytes: Hashes are bucketed by `hash >> shift`  |
//! | 0x0004         | Buckets Offset | 4 bytes: Always `0x10`                           |
//! | 0x0008         | Hashes Offset  | 4 bytes: Start of the sorted hashes              |
//! | 0x000C         | Indices Offset | 4 bytes: Start of the file indices               |
//! | 0x0010         | Buckets        | i16 per bucket: first sorted slot, or -1         |
//! |                | Hashes         | u32 per file: CRC-32 of the lower case name      |
//! |                | Indices        | u16 per file: file index of each sorted hash     |

use byteorder::{LittleEndian, WriteBytesExt};
use crc::{Crc, CRC_32_ISO_HDLC};
use std::fmt::Debug;

use crate::{
    error::{Error, Result},
    write::PackedFile,
};

/// Builds the name hash table of a DAT archive
pub trait HashGenerator: Debug + Send + Sync {
    /// Produce the table for `files`, in archive order
    fn generate(&self, files: &[PackedFile<'_>]) -> Result<Vec<u8>>;
}

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// The bucketed CRC-32 table the games expect
#[derive(Debug, Default, Clone, Copy)]
pub struct Crc32HashGenerator;

impl Crc32HashGenerator {
    /// Largest number of files the i16 bucket table can address
    pub const MAX_FILES: usize = i16::MAX as usize;

    /// Right shift turning a 31 bit hash into a bucket index
    pub fn shift(file_count: usize) -> u32 {
        let bits = usize::BITS - file_count.leading_zeros();
        32u32.saturating_sub(bits).min(31)
    }

    /// CRC-32 of the lower case name, limited to 31 bits
    pub fn hash(name: &str) -> u32 {
        CRC32.checksum(name.to_lowercase().as_bytes()) & 0x7FFF_FFFF
    }
}

impl HashGenerator for Crc32HashGenerator {
    fn generate(&self, files: &[PackedFile<'_>]) -> Result<Vec<u8>> {
        if files.len() > Self::MAX_FILES {
            return Err(Error::TooManyFiles {
                count: files.len(),
                max: Self::MAX_FILES,
            });
        }

        let shift = Self::shift(files.len());
        let mut hashes = files
            .iter()
            .enumerate()
            .map(|(index, file)| (Self::hash(file.name), index as u16))
            .collect::<Vec<_>>();
        hashes.sort_by_key(|(hash, _)| hash >> shift);

        let mut buckets = vec![-1i16; 1 << (31 - shift)];
        for (slot, (hash, _)) in hashes.iter().enumerate() {
            let bucket = &mut buckets[(hash >> shift) as usize];
            if *bucket == -1 {
                *bucket = slot as i16;
            }
        }

        let buckets_offset = 0x10u32;
        let hashes_offset = buckets_offset + buckets.len() as u32 * 2;
        let indices_offset = hashes_offset + hashes.len() as u32 * 4;

        let mut out = Vec::with_capacity(indices_offset as usize + hashes.len() * 2);
        out.write_u32::<LittleEndian>(shift)?;
        out.write_u32::<LittleEndian>(buckets_offset)?;
        out.write_u32::<LittleEndian>(hashes_offset)?;
        out.write_u32::<LittleEndian>(indices_offset)?;
        for bucket in &buckets {
            out.write_i16::<LittleEndian>(*bucket)?;
        }
        for (hash, _) in &hashes {
            out.write_u32::<LittleEndian>(*hash)?;
        }
        for (_, index) in &hashes {
            out.write_u16::<LittleEndian>(*index)?;
        }

        Ok(out)
    }
}
