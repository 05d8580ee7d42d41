//! Types for reading PKZ archives
//!

use binrw::{BinRead, VecArgs};
use parking_lot::Mutex;
use plat_core::{
    entry::{CompressionScheme, FileEntry},
    io::{null_terminated, read_at, stream_len},
    kind::FileKind,
    resolve::{FileParser, TypeResolver},
    Archive, StructuredFile,
};
use std::{
    fmt::{self, Debug},
    io::{Cursor, Read, Seek},
    sync::Arc,
};
use tracing::{error, instrument, warn};

use crate::{
    codec::PkzCodecs,
    error::Result,
    types::{PkzDescriptor, PkzHeader},
};

/// PKZ archive reader
///
/// Only the header, descriptors and string pool are read when the archive is opened. File
/// data is read and decoded on first access and cached on its entry.
///
/// ```no_run
/// use plat_core::Archive;
///
/// fn list_pkz_contents(reader: std::fs::File) -> plat_pkz::error::Result<()> {
///     let pkz = plat_pkz::PkzArchive::new(reader)?;
///
///     for (i, entry) in pkz.entries().iter().enumerate() {
///         let data = pkz.read(i)?;
///         println!("{} ({}): {} bytes", entry.name(), entry.compression(), data.len());
///     }
///
///     Ok(())
/// }
/// ```
pub struct PkzArchive<R> {
    name: Box<str>,
    reader: Mutex<R>,
    header: PkzHeader,
    codecs: PkzCodecs,
    entries: Vec<FileEntry>,
}

impl<R> Debug for PkzArchive<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PkzArchive")
            .field("name", &self.name)
            .field("header", &self.header)
            .field("codecs", &self.codecs)
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl<R> PkzArchive<R> {
    /// Set the name the archive is known by
    pub fn with_name(mut self, name: impl Into<Box<str>>) -> Self {
        self.name = name.into();
        self
    }

    /// The archive header
    pub fn header(&self) -> &PkzHeader {
        &self.header
    }

    /// Unwrap and return the inner reader object
    ///
    /// The position of the reader is undefined.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}

impl<R: Read + Seek> PkzArchive<R> {
    /// Read a PKZ archive that may use Zstandard
    pub fn new(reader: R) -> Result<PkzArchive<R>> {
        Self::with_codecs(reader, PkzCodecs::default())
    }

    /// Read a PKZ archive, decoding its files with `codecs`.
    ///
    /// Files whose name cannot be read or whose data lies outside the archive are logged and
    /// skipped.
    #[instrument(skip(reader, codecs), err)]
    pub fn with_codecs(mut reader: R, codecs: PkzCodecs) -> Result<PkzArchive<R>> {
        let header = PkzHeader::read(&mut Cursor::new(read_at(
            &mut reader,
            0,
            PkzHeader::SIZE,
        )?))?;

        let count = header.file_count as usize;
        let table = read_at(
            &mut reader,
            header.descriptors_offset as u64,
            count as u64 * PkzDescriptor::SIZE,
        )?;
        let descriptors = Vec::<PkzDescriptor>::read_le_args(
            &mut Cursor::new(table),
            VecArgs { count, inner: () },
        )?;

        let len = stream_len(&mut reader)?;
        let pool_offset = header.pool_offset();
        let pool_len = match header.name_table_length {
            0 => descriptors
                .iter()
                .map(|descriptor| descriptor.offset)
                .filter(|offset| *offset >= pool_offset)
                .min()
                .unwrap_or(len)
                .min(len)
                .saturating_sub(pool_offset),
            length => length as u64,
        };
        let pool = read_at(&mut reader, pool_offset, pool_len)?;

        let entries = descriptors
            .iter()
            .enumerate()
            .filter_map(|(index, descriptor)| {
                let entry = Self::entry_for(&pool, descriptor, len);
                if let Err(error) = &entry {
                    error!(index, %error, "unable to read file descriptor, skipping it");
                }
                entry.ok()
            })
            .collect();

        Ok(PkzArchive {
            name: "".into(),
            reader: Mutex::new(reader),
            header,
            codecs,
            entries,
        })
    }

    fn entry_for(pool: &[u8], descriptor: &PkzDescriptor, len: u64) -> Result<FileEntry> {
        let name = null_terminated(pool, descriptor.name_offset as u64)?;
        let name = String::from_utf8_lossy(name);
        let scheme = null_terminated(pool, descriptor.compression_offset as u64)?;
        let compression = String::from_utf8_lossy(scheme)
            .parse::<CompressionScheme>()
            .unwrap_or_default();

        match descriptor.offset.checked_add(descriptor.compressed_size) {
            Some(end) if end <= len => {}
            _ => {
                return Err(plat_core::error::Error::OutOfBounds {
                    offset: descriptor.offset,
                    size: descriptor.compressed_size,
                    len,
                }
                .into())
            }
        }

        Ok(FileEntry::builder()
            .name(name)
            .offset(descriptor.offset)
            .size(descriptor.size)
            .compressed_size(descriptor.compressed_size)
            .compression(compression)
            .build())
    }
}

impl<R: Read + Seek + Send> PkzArchive<R> {
    fn load(&self, entry: &FileEntry) -> Result<Vec<u8>> {
        let data = read_at(
            &mut *self.reader.lock(),
            entry.offset(),
            entry.compressed_size(),
        )?;

        if matches!(
            entry.compression(),
            CompressionScheme::Crilayla | CompressionScheme::Unknown(_)
        ) {
            warn!(
                name = entry.name(),
                scheme = %entry.compression(),
                "unknown compression scheme, returning the stored bytes"
            );
        }

        let decoded = self
            .codecs
            .decode(entry.compression(), &data, entry.size())?;
        Ok(decoded.unwrap_or(data))
    }
}

impl<R: Read + Seek + Send> StructuredFile for PkzArchive<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> FileKind {
        FileKind::Pkz
    }

    fn as_archive(&self) -> Option<&dyn Archive> {
        Some(self)
    }
}

impl<R: Read + Seek + Send> Archive for PkzArchive<R> {
    fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    #[instrument(skip(self), fields(archive = %self.name), err)]
    fn read(&self, index: usize) -> plat_core::error::Result<Arc<[u8]>> {
        let entry = self.entry(index)?;
        entry
            .get_or_try_load(|entry| self.load(entry))
            .map_err(Into::into)
    }
}

/// Opens nested PKZ archives for a [`TypeResolver`]
#[derive(Debug, Default, Clone)]
pub struct PkzParser {
    codecs: PkzCodecs,
}

impl PkzParser {
    /// Create a parser opening archives with `codecs`
    pub fn new(codecs: PkzCodecs) -> Self {
        Self { codecs }
    }
}

impl FileParser for PkzParser {
    fn extract(
        &self,
        data: Arc<[u8]>,
        name: &str,
        _resolver: &dyn TypeResolver,
    ) -> plat_core::error::Result<Option<Box<dyn StructuredFile>>> {
        let archive =
            PkzArchive::with_codecs(Cursor::new(data), self.codecs.clone())?.with_name(name);
        Ok(Some(Box::new(archive)))
    }
}
