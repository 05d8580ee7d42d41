//! Types for writing DAT archives
//!

use binrw::BinWrite;
use bon::Builder;
use byteorder::{LittleEndian, WriteBytesExt};
use std::{
    fmt::{self, Debug},
    io::{self, Cursor, Write},
};
use tracing::{instrument, Level};

use crate::{
    error::{Error, Result},
    hash::{Crc32HashGenerator, HashGenerator},
    types::DatHeader,
};

/// Options for how the DAT file should be written
#[derive(Debug, Clone, Copy, Builder)]
pub struct DatWriterOptions {
    /// File data starts on a multiple of this many bytes
    #[builder(default = 16)]
    pub alignment: u32,
}

impl Default for DatWriterOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A file handed to [`repack`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedFile<'a> {
    /// Name stored in the name table
    pub name: &'a str,
    /// Content of the file
    pub data: &'a [u8],
}

impl<'a> PackedFile<'a> {
    /// Pair a name with its content
    pub fn new(name: &'a str, data: &'a [u8]) -> Self {
        Self { name, data }
    }

    /// The text after the last `.` of the name, empty if there is none
    pub fn extension(&self) -> &'a str {
        self.name
            .rsplit_once('.')
            .map(|(_, extension)| extension)
            .unwrap_or_default()
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason| Error::InvalidName {
            name: self.name.to_owned(),
            reason,
        };

        if self.name.is_empty() {
            return Err(invalid("the name is empty"));
        }
        if self.name.contains('\0') {
            return Err(invalid("the name contains a null byte"));
        }
        if self.extension().len() > 4 {
            return Err(invalid("the extension is longer than 4 bytes"));
        }
        if u32::try_from(self.data.len()).is_err() {
            return Err(Error::FileTooLarge {
                name: self.name.to_owned(),
                size: self.data.len() as u64,
            });
        }

        Ok(())
    }
}

/// Where everything of a repacked archive goes
#[derive(Debug)]
struct Layout {
    header: DatHeader,
    name_width: u32,
    offsets: Vec<u32>,
    size: u64,
}

impl Layout {
    fn new(files: &[PackedFile<'_>], hash_len: usize, alignment: u32) -> Result<Self> {
        let count = files.len() as u64;
        let name_width = files
            .iter()
            .map(|file| file.name.len() as u64 + 1)
            .max()
            .unwrap_or(1);

        let offsets_offset = DatHeader::SIZE;
        let extensions_offset = offsets_offset + count * 4;
        let names_offset = extensions_offset + count * 4;
        let sizes_offset = names_offset + 4 + name_width * count;
        let hash_map_offset = sizes_offset + count * 4;
        let tables_end = hash_map_offset + hash_len as u64;

        let mut offsets = Vec::with_capacity(files.len());
        let mut position = tables_end;
        let mut size = tables_end;
        for file in files {
            position = position.next_multiple_of(alignment.max(1) as u64);
            let len = file.data.len() as u64;
            if len == 0 {
                offsets.push(0);
                continue;
            }

            let offset = u32::try_from(position).map_err(|_| Error::FileTooLarge {
                name: file.name.to_owned(),
                size: len,
            })?;
            offsets.push(offset);
            position += len;
            size = size.max(position);
        }

        let table_offset = |offset: u64| {
            u32::try_from(offset)
                .map_err(|_| Error::CustomError("archive tables exceed 4 GiB".into()))
        };

        Ok(Layout {
            header: DatHeader {
                file_count: count as u32,
                offsets_offset: table_offset(offsets_offset)?,
                extensions_offset: table_offset(extensions_offset)?,
                names_offset: table_offset(names_offset)?,
                sizes_offset: table_offset(sizes_offset)?,
                hash_map_offset: table_offset(hash_map_offset)?,
            },
            name_width: table_offset(name_width)?,
            offsets,
            size,
        })
    }
}

/// Build a little endian DAT archive holding `files`, in order.
///
/// Zero length files are recorded with offset 0 and take no space. The result is sized to
/// end with the last stored byte, or with the tables if no file has data.
#[instrument(skip_all, fields(files = files.len()), err)]
pub fn repack(
    files: &[PackedFile<'_>],
    options: &DatWriterOptions,
    hash_generator: &dyn HashGenerator,
) -> Result<Vec<u8>> {
    if files.is_empty() {
        return Err(Error::EmptyArchive);
    }
    for file in files {
        file.validate()?;
    }

    let hash_map = hash_generator.generate(files)?;
    let layout = Layout::new(files, hash_map.len(), options.alignment)?;
    let header = &layout.header;

    let mut out = Cursor::new(vec![0u8; layout.size as usize]);
    header.write_le(&mut out)?;

    for offset in &layout.offsets {
        out.write_u32::<LittleEndian>(*offset)?;
    }

    for file in files {
        let mut slot = [0u8; 4];
        let extension = file.extension().as_bytes();
        slot[..extension.len()].copy_from_slice(extension);
        out.write_all(&slot)?;
    }

    out.write_u32::<LittleEndian>(layout.name_width)?;
    for (i, file) in files.iter().enumerate() {
        out.set_position(
            header.names_offset as u64 + 4 + i as u64 * layout.name_width as u64,
        );
        out.write_all(file.name.as_bytes())?;
    }

    out.set_position(header.sizes_offset as u64);
    for file in files {
        out.write_u32::<LittleEndian>(file.data.len() as u32)?;
    }
    out.write_all(&hash_map)?;

    for (file, offset) in files.iter().zip(&layout.offsets) {
        if !file.data.is_empty() {
            out.set_position(*offset as u64);
            out.write_all(file.data)?;
        }
    }

    Ok(out.into_inner())
}

/// DAT archive generator
///
/// ```
/// # fn doit() -> plat_dat::error::Result<()>
/// # {
/// use std::io::Write;
/// use plat_dat::{DatWriter, write::DatWriterOptions};
///
/// let mut dat = DatWriter::new(Vec::new(), DatWriterOptions::default());
///
/// dat.start_file("hello_world.txt")?;
/// dat.write_all(b"Hello, World!")?;
///
/// // Lay out the tables and write the archive.
/// let archive = dat.finish()?;
/// assert_eq!(&archive[..4], b"DAT\0");
///
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct DatWriter<W: Write> {
    inner: W,
    options: DatWriterOptions,
    hash_generator: Box<dyn HashGenerator>,
    files: Vec<(String, Vec<u8>)>,
    writing_to_file: bool,
}

impl<W: Write> Debug for DatWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatWriter")
            .field("options", &self.options)
            .field("hash_generator", &self.hash_generator)
            .field("files", &self.files.len())
            .finish_non_exhaustive()
    }
}

impl<W: Write> DatWriter<W> {
    /// Initializes the archive, hashing names with [`Crc32HashGenerator`].
    ///
    /// Files are kept in memory until [`DatWriter::finish`] lays out the archive.
    pub fn new(inner: W, options: DatWriterOptions) -> DatWriter<W> {
        DatWriter {
            inner,
            options,
            hash_generator: Box::new(Crc32HashGenerator),
            files: Vec::new(),
            writing_to_file: false,
        }
    }

    /// Replace the generator building the name hash table
    pub fn with_hash_generator(mut self, hash_generator: impl HashGenerator + 'static) -> Self {
        self.hash_generator = Box::new(hash_generator);
        self
    }

    /// Returns true if a file is currently open for writing.
    pub const fn is_writing_file(&self) -> bool {
        self.writing_to_file
    }

    /// Start a new file; following writes go to it.
    #[instrument(skip(self, name), err)]
    pub fn start_file(&mut self, name: impl ToString) -> Result<()> {
        let name = name.to_string();
        PackedFile::new(&name, &[]).validate()?;

        self.files.push((name, Vec::new()));
        self.writing_to_file = true;
        Ok(())
    }

    /// Add a complete file
    pub fn add_file(&mut self, name: impl ToString, data: &[u8]) -> Result<()> {
        self.start_file(name)?;
        self.write_all(data)?;
        self.writing_to_file = false;
        Ok(())
    }

    /// Write all tables and file data to the inner writer and return it.
    #[instrument(skip(self), err)]
    pub fn finish(mut self) -> Result<W> {
        let files = self
            .files
            .iter()
            .map(|(name, data)| PackedFile::new(name, data))
            .collect::<Vec<_>>();

        let archive = repack(&files, &self.options, self.hash_generator.as_ref())?;
        self.inner.write_all(&archive)?;
        self.inner.flush()?;

        Ok(self.inner)
    }
}

impl<W: Write> Write for DatWriter<W> {
    #[instrument(skip_all, err, ret(level = Level::TRACE), fields(size = buf.len()))]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.files.last_mut() {
            Some((_, data)) if self.writing_to_file => data.write(buf),
            _ => Err(io::Error::new(
                io::ErrorKind::Other,
                "No file has been started",
            )),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tracing_test::traced_test;

    use super::{repack, DatWriter, DatWriterOptions, PackedFile};
    use crate::{
        error::{Error, Result},
        hash::HashGenerator,
    };

    #[derive(Debug)]
    struct NoHash;

    impl HashGenerator for NoHash {
        fn generate(&self, _files: &[PackedFile<'_>]) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    #[traced_test]
    #[test]
    fn repack_single_file() -> Result<()> {
        #[rustfmt::skip]
        let expected = vec![
            // Header
            0x44, 0x41, 0x54, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x20, 0x00, 0x00, 0x00,
            0x24, 0x00, 0x00, 0x00,
            0x28, 0x00, 0x00, 0x00,
            0x32, 0x00, 0x00, 0x00,
            0x36, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            // Offsets
            0x40, 0x00, 0x00, 0x00,
            // Extensions
            0x62, 0x69, 0x6E, 0x00,
            // Names
            0x06, 0x00, 0x00, 0x00,
            0x61, 0x2E, 0x62, 0x69, 0x6E, 0x00,
            // Sizes
            0x03, 0x00, 0x00, 0x00,
            // Padding
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            // Data
            0x78, 0x79, 0x7A,
        ];

        let files = [PackedFile::new("a.bin", b"xyz")];
        let actual = repack(&files, &DatWriterOptions::default(), &NoHash)?;

        assert_eq!(format!("{:02X?}", actual), format!("{:02X?}", expected));
        Ok(())
    }

    #[test]
    fn zero_length_files_take_no_space() -> Result<()> {
        let files = [
            PackedFile::new("first.bin", b"12345"),
            PackedFile::new("empty.txt", b""),
            PackedFile::new("last.bin", b"6"),
        ];
        let options = DatWriterOptions::builder().alignment(8).build();
        let actual = repack(&files, &options, &NoHash)?;

        let offsets = actual[0x20..0x2C]
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect::<Vec<_>>();

        assert_eq!(offsets[1], 0);
        assert_eq!(offsets[0] % 8, 0);
        assert_eq!(offsets[2], (offsets[0] + 5).next_multiple_of(8));
        assert_eq!(actual.len() as u32, offsets[2] + 1);
        Ok(())
    }

    #[test]
    fn trailing_empty_file_keeps_last_data() -> Result<()> {
        let files = [PackedFile::new("a.bin", b"abc"), PackedFile::new("b.bin", b"")];
        let actual = repack(&files, &DatWriterOptions::default(), &NoHash)?;
        assert_eq!(&actual[actual.len() - 3..], b"abc");
        Ok(())
    }

    #[test]
    fn reject_invalid_input() {
        let options = DatWriterOptions::default();
        assert!(matches!(
            repack(&[], &options, &NoHash),
            Err(Error::EmptyArchive)
        ));
        assert!(matches!(
            repack(&[PackedFile::new("model.wmb3d", b"")], &options, &NoHash),
            Err(Error::InvalidName { .. })
        ));
        assert!(matches!(
            repack(&[PackedFile::new("", b"")], &options, &NoHash),
            Err(Error::InvalidName { .. })
        ));
    }

    #[test]
    fn writer_matches_repack() -> Result<()> {
        let mut writer = DatWriter::new(Vec::new(), DatWriterOptions::default())
            .with_hash_generator(NoHash);
        writer.start_file("a.bin")?;
        writer.write_all(b"x")?;
        writer.write_all(b"yz")?;
        let actual = writer.finish()?;

        let expected = repack(
            &[PackedFile::new("a.bin", b"xyz")],
            &DatWriterOptions::default(),
            &NoHash,
        )?;
        assert_eq!(actual, expected);
        Ok(())
    }

    #[test]
    fn write_without_file_fails() {
        let mut writer = DatWriter::new(Vec::new(), DatWriterOptions::default());
        assert!(writer.write_all(b"orphan").is_err());

        assert!(writer.add_file("a.txt", b"data").is_ok());
        assert!(!writer.is_writing_file());
        assert!(writer.write_all(b"more").is_err());
    }
}
