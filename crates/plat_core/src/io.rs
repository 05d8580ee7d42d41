//! Bounds-checked access to archive bytes.

use std::io::{self, Read, Seek, SeekFrom};

use crate::error::{Error, Result};

/// Borrow `size` bytes starting at `offset`, failing instead of panicking when the range
/// does not fit inside `data`.
pub fn slice(data: &[u8], offset: u64, size: u64) -> Result<&[u8]> {
    let out_of_bounds = || Error::OutOfBounds {
        offset,
        size,
        len: data.len() as u64,
    };

    let end = offset.checked_add(size).ok_or_else(out_of_bounds)?;
    if end > data.len() as u64 {
        return Err(out_of_bounds());
    }

    Ok(&data[offset as usize..end as usize])
}

/// Read a null-terminated byte string starting at `offset`. The terminator is not included.
pub fn null_terminated(data: &[u8], offset: u64) -> Result<&[u8]> {
    let tail = slice(data, offset, (data.len() as u64).saturating_sub(offset))?;
    match tail.iter().position(|b| *b == 0) {
        Some(end) => Ok(&tail[..end]),
        None => Err(Error::OutOfBounds {
            offset,
            size: tail.len() as u64 + 1,
            len: data.len() as u64,
        }),
    }
}

/// Total length of a seekable stream. The stream position is left at the end.
pub fn stream_len<R: Seek>(reader: &mut R) -> io::Result<u64> {
    reader.seek(SeekFrom::End(0))
}

/// Read `size` bytes at absolute `offset` from a seekable stream.
#[tracing::instrument(skip(reader), err)]
pub fn read_at<R: Read + Seek>(reader: &mut R, offset: u64, size: u64) -> Result<Vec<u8>> {
    let len = stream_len(reader)?;
    match offset.checked_add(size) {
        Some(end) if end <= len => {}
        _ => return Err(Error::OutOfBounds { offset, size, len }),
    }

    reader.seek(SeekFrom::Start(offset))?;

    let mut buffer = Vec::with_capacity(size as usize);
    reader.by_ref().take(size).read_to_end(&mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn slice_rejects_overflowing_ranges() {
        let data = [0u8; 8];
        assert!(slice(&data, 4, 4).is_ok());
        assert!(matches!(
            slice(&data, 4, 5),
            Err(Error::OutOfBounds {
                offset: 4,
                size: 5,
                len: 8
            })
        ));
        assert!(slice(&data, u64::MAX, 2).is_err());
    }

    #[test]
    fn null_terminated_stops_at_zero() -> Result<()> {
        let data = b"first\0second\0";
        assert_eq!(null_terminated(data, 0)?, b"first");
        assert_eq!(null_terminated(data, 6)?, b"second");
        assert_eq!(null_terminated(data, 5)?, b"");
        Ok(())
    }

    #[test]
    fn null_terminated_without_terminator_fails() {
        assert!(null_terminated(b"abc", 0).is_err());
        assert!(null_terminated(b"abc\0", 10).is_err());
    }

    #[test]
    fn read_at_checks_stream_length() -> Result<()> {
        let mut reader = Cursor::new((0u8..16).collect::<Vec<_>>());
        assert_eq!(read_at(&mut reader, 4, 3)?, vec![4, 5, 6]);
        assert!(read_at(&mut reader, 14, 3).is_err());
        Ok(())
    }
}
