//! Decoder for CRILAYLA, CRI's backward LZ compression.
//!
//! A compressed buffer looks like this:
//!
//! | Offset                 | Size   | Field                                         |
//! |------------------------|--------|-----------------------------------------------|
//! | 0x00                   | 8      | Magic `CRILAYLA`                              |
//! | 0x08                   | 4      | Uncompressed size `U` (little endian)         |
//! | 0x0C                   | 4      | Header offset (little endian)                 |
//! | 0x10                   | ...    | Bit stream, consumed from its last byte       |
//! | 0x10 + header offset   | 0x100  | Uncompressed preamble                         |
//!
//! Decoding produces `U + 0x100` bytes: the preamble followed by the decoded stream. The
//! stream is written back to front. Each step is either a literal (`0` + 8 bits) or a
//! back-reference (`1` + 13 bit distance + length), where the length starts at 3 and grows
//! by fields of 2, 3, 5 and 8 bits, each read only when the previous one was saturated,
//! followed by as many further 8 bit fields as needed while they stay saturated.

use binrw::BinRead;
use std::io::Cursor;
use tracing::instrument;

use crate::{
    bits::BitReader,
    error::{Error, Result},
    types::CrilaylaHeader,
};

/// Magic at the start of every CRILAYLA buffer
pub const MAGIC: &[u8; 8] = b"CRILAYLA";

/// Size of the uncompressed block stored after the bit stream
pub const PREAMBLE_SIZE: usize = 0x100;

const HEADER_SIZE: usize = 0x10;
const LENGTH_FIELDS: [u32; 4] = [2, 3, 5, 8];
/// Most bytes a single bit of the stream can expand to
const MAX_EXPANSION: u64 = 32;

/// Whether `data` starts with the CRILAYLA magic
pub fn is_compressed(data: &[u8]) -> bool {
    data.starts_with(MAGIC)
}

/// Decompress a CRILAYLA buffer, returning the preamble followed by the decoded data.
#[instrument(skip(data), fields(len = data.len()), err)]
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if !is_compressed(data) {
        let found = &data[..data.len().min(MAGIC.len())];
        return Err(plat_core::error::Error::invalid_magic("CRILAYLA", MAGIC, found).into());
    }

    let header = CrilaylaHeader::read(&mut Cursor::new(data))?;
    let size = header.uncompressed_size as usize;

    let preamble = plat_core::io::slice(
        data,
        HEADER_SIZE as u64 + header.header_offset as u64,
        PREAMBLE_SIZE as u64,
    )?;

    let mut reader = BitReader::new(&data[..data.len() - PREAMBLE_SIZE]);
    if size as u64 > reader.bits_left() as u64 * MAX_EXPANSION {
        return Err(Error::CorruptStream(format!(
            "{size} bytes cannot be decoded from {} bits",
            reader.bits_left()
        )));
    }

    let mut result = vec![0u8; size + PREAMBLE_SIZE];
    result[..PREAMBLE_SIZE].copy_from_slice(preamble);
    let end = PREAMBLE_SIZE + size - 1;
    let mut produced = 0usize;

    while produced < size {
        if reader.get_bits(1)? == 0 {
            result[end - produced] = reader.get_bits(8)? as u8;
            produced += 1;
            continue;
        }

        let distance = reader.get_bits(13)? as usize;
        let mut source = end - produced + distance + 3;
        let length = read_length(&mut reader)?;

        if length > size - produced {
            return Err(Error::CorruptStream(format!(
                "back-reference of {length} bytes overruns the {} bytes left",
                size - produced
            )));
        }
        if source >= result.len() {
            return Err(Error::CorruptStream(format!(
                "back-reference source {source:#x} lies outside the {:#x} byte output",
                result.len()
            )));
        }

        for _ in 0..length {
            result[end - produced] = result[source];
            source -= 1;
            produced += 1;
        }
    }

    Ok(result)
}

fn read_length(reader: &mut BitReader) -> Result<usize> {
    let mut length = 3usize;

    for width in LENGTH_FIELDS {
        let value = reader.get_bits(width)?;
        length += value as usize;
        if value != (1 << width) - 1 {
            return Ok(length);
        }
    }

    loop {
        let value = reader.get_bits(8)?;
        length += value as usize;
        if value != 0xFF {
            return Ok(length);
        }
    }
}
