//! Types for reading DAT archives
//!

use binrw::{BinRead, Endian, VecArgs};
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use plat_core::{
    entry::FileEntry,
    io::slice,
    kind::FileKind,
    resolve::{try_extract, FileParser, Registry, TypeResolver},
    Archive, StructuredFile,
};
use std::{
    fmt::{self, Debug},
    io::{Cursor, Read},
    sync::Arc,
};
use tracing::{error, instrument, warn};

use crate::{
    error::{Error, Result},
    types::DatHeader,
};

/// DAT archive reader
///
/// DAT archives are not compressed, so every member is sliced out and handed to the
/// [`TypeResolver`] while the archive is opened. Members the resolver understands are available
/// through [`Archive::nested`]; the rest stay opaque.
///
/// ```no_run
/// use plat_core::Archive;
///
/// fn list_dat_contents(data: Vec<u8>) -> plat_dat::error::Result<()> {
///     let dat = plat_dat::DatArchive::new(data)?;
///
///     for (i, entry) in dat.entries().iter().enumerate() {
///         let data = dat.read(i)?;
///         println!("{}: {} bytes", entry.name(), data.len());
///     }
///
///     Ok(())
/// }
/// ```
pub struct DatArchive {
    name: Box<str>,
    header: DatHeader,
    endian: Endian,
    size: u64,
    entries: Vec<FileEntry>,
    nested: Vec<Option<Box<dyn StructuredFile>>>,
}

impl Debug for DatArchive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatArchive")
            .field("name", &self.name)
            .field("endian", &self.endian)
            .field("size", &self.size)
            .field("entries", &self.entries)
            .field("nested", &self.nested)
            .finish()
    }
}

impl DatArchive {
    /// Read a DAT archive without resolving nested files
    pub fn new(data: impl Into<Arc<[u8]>>) -> Result<DatArchive> {
        Self::extract(data.into(), "", &Registry::new())
    }

    /// Read a whole DAT archive from `reader`
    pub fn from_reader<R: Read>(mut reader: R, resolver: &dyn TypeResolver) -> Result<DatArchive> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::extract(data.into(), "", resolver)
    }

    /// Read a DAT archive called `name`, resolving every member through `resolver`.
    ///
    /// Members that lie outside the data are logged and skipped.
    #[instrument(skip(data, resolver), fields(size = data.len()), err)]
    pub fn extract(data: Arc<[u8]>, name: &str, resolver: &dyn TypeResolver) -> Result<DatArchive> {
        let prefix = slice(&data, 0, DatHeader::SIZE)?;
        if &prefix[..4] != b"DAT\0" {
            return Err(
                plat_core::error::Error::invalid_magic("DAT", b"DAT\0", &prefix[..4]).into(),
            );
        }

        let endian = DatHeader::sniff_endian(prefix);
        let header = DatHeader::read_options(&mut Cursor::new(prefix), endian, ())?;
        if header.file_count > DatHeader::MAX_FILE_COUNT {
            return Err(Error::InvalidArchive(format!(
                "{} files is more than any archive holds",
                header.file_count
            )));
        }

        let count = header.file_count as usize;
        let offsets = read_u32_table(&data, header.offsets_offset, count, endian)?;
        let sizes = read_u32_table(&data, header.sizes_offset, count, endian)?;
        let extensions = read_slots(&data, header.extensions_offset as u64, 4, count)?;
        let names = read_names(&data, header.names_offset, count, endian)?;

        let (entries, nested): (Vec<_>, Vec<_>) = names
            .into_iter()
            .zip(extensions)
            .zip(offsets.into_iter().zip(sizes))
            .filter_map(|((name, extension), (offset, size))| {
                let content = match slice(&data, offset as u64, size as u64) {
                    Ok(content) => content,
                    Err(error) => {
                        error!(%name, %error, "file lies outside the archive, skipping it");
                        return None;
                    }
                };

                // resolving a member that is the whole archive would never terminate
                let resolver = if content.len() == data.len() {
                    warn!(%name, "file spans the whole archive, keeping raw data");
                    None
                } else {
                    Some(resolver)
                };

                Some(Self::member(name, extension, offset, content, endian, resolver))
            })
            .unzip();

        Ok(DatArchive {
            name: name.into(),
            header,
            endian,
            size: data.len() as u64,
            entries,
            nested,
        })
    }

    fn member(
        name: String,
        extension: String,
        offset: u32,
        content: &[u8],
        endian: Endian,
        resolver: Option<&dyn TypeResolver>,
    ) -> (FileEntry, Option<Box<dyn StructuredFile>>) {
        let content: Arc<[u8]> = content.into();
        let nested = resolver.and_then(|resolver| try_extract(resolver, &name, content.clone()));

        let content = match (&nested, endian) {
            (None, Endian::Big) => {
                let mut swapped = content.to_vec();
                swap_words(&mut swapped);
                swapped.into()
            }
            _ => content,
        };

        let entry = FileEntry::builder()
            .name(name)
            .extension(extension)
            .offset(offset as u64)
            .size(content.len() as u64)
            .compressed_size(content.len() as u64)
            .build()
            .with_content(content);

        (entry, nested)
    }

    /// Set the name the archive is known by
    pub fn with_name(mut self, name: impl Into<Box<str>>) -> Self {
        self.name = name.into();
        self
    }

    /// The archive header
    pub fn header(&self) -> &DatHeader {
        &self.header
    }

    /// Byte order of the archive's tables
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Whether the archive was built for a big endian platform
    pub fn is_big_endian(&self) -> bool {
        self.endian == Endian::Big
    }

    /// Size of the whole archive in bytes
    pub fn size(&self) -> u64 {
        self.size
    }
}

fn read_u32_table(data: &[u8], offset: u32, count: usize, endian: Endian) -> Result<Vec<u32>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let table = slice(data, offset as u64, count as u64 * 4)?;
    let values = Vec::<u32>::read_options(
        &mut Cursor::new(table),
        endian,
        VecArgs { count, inner: () },
    )?;
    Ok(values)
}

fn read_names(data: &[u8], offset: u32, count: usize, endian: Endian) -> Result<Vec<String>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let mut width = Cursor::new(slice(data, offset as u64, 4)?);
    let width = match endian {
        Endian::Big => width.read_u32::<BigEndian>()?,
        Endian::Little => width.read_u32::<LittleEndian>()?,
    };
    if width == 0 {
        return Err(Error::InvalidArchive("name slots have no width".into()));
    }

    read_slots(data, offset as u64 + 4, width as usize, count)
}

/// Read `count` null padded slots of `width` bytes
fn read_slots(data: &[u8], offset: u64, width: usize, count: usize) -> Result<Vec<String>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let table = slice(data, offset, width as u64 * count as u64)?;
    Ok(table.chunks_exact(width).map(padded_str).collect())
}

/// The text of a null padded slot
fn padded_str(slot: &[u8]) -> String {
    let end = slot.iter().position(|b| *b == 0).unwrap_or(slot.len());
    String::from_utf8_lossy(&slot[..end]).into_owned()
}

/// Reverse the bytes of every whole 4 byte word; a trailing partial word is left alone.
pub fn swap_words(data: &mut [u8]) {
    for word in data.chunks_exact_mut(4) {
        word.reverse();
    }
}

impl StructuredFile for DatArchive {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> FileKind {
        FileKind::Dat
    }

    fn as_archive(&self) -> Option<&dyn Archive> {
        Some(self)
    }
}

impl Archive for DatArchive {
    fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    fn read(&self, index: usize) -> plat_core::error::Result<Arc<[u8]>> {
        let entry = self.entry(index)?;
        entry.content().ok_or_else(|| {
            plat_core::error::Error::CustomError(format!("{} has no content", entry.name()))
        })
    }

    fn nested(&self, index: usize) -> Option<&dyn StructuredFile> {
        self.nested.get(index)?.as_deref()
    }
}

/// Opens nested DAT archives for a [`TypeResolver`]
#[derive(Debug, Default, Clone, Copy)]
pub struct DatParser;

impl FileParser for DatParser {
    fn extract(
        &self,
        data: Arc<[u8]>,
        name: &str,
        resolver: &dyn TypeResolver,
    ) -> plat_core::error::Result<Option<Box<dyn StructuredFile>>> {
        let archive = DatArchive::extract(data, name, resolver)?;
        Ok(Some(Box::new(archive)))
    }
}
