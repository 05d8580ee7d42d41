//! Types for reading CPK archives
//!

use binrw::BinRead;
use bon::Builder;
use parking_lot::Mutex;
use plat_core::{
    entry::{CompressionScheme, FileEntry},
    io::{read_at, stream_len},
    kind::FileKind,
    resolve::{FileParser, TypeResolver},
    Archive, StructuredFile,
};
use std::{
    borrow::Cow,
    fmt::{self, Debug},
    io::{Cursor, Read, Seek},
    sync::Arc,
};
use tracing::{error, instrument, warn};

use crate::{
    crilayla,
    error::{Error, Result},
    types::TagHeader,
    utf::{self, Row, UtfTable},
};

/// `CPK ` read as a little endian integer
pub const MAGIC: u32 = 541806659;

/// Options used when opening a CPK archive
#[derive(Builder, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpkOptions {
    /// Decrypt tables that do not start with `@UTF`
    #[builder(default = true)]
    decrypt_tables: bool,
}

impl Default for CpkOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Extra columns of a `TOC ` row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpkFileInfo {
    /// Identifier of the file, if the table has an `ID` column
    pub id: Option<u64>,
    /// Decoded size, if the table has an `ExtractSize` column
    pub extract_size: Option<u64>,
    /// Free-form string attached to the file
    pub user_string: Option<String>,
}

/// CPK archive reader
///
/// ```no_run
/// use plat_core::Archive;
///
/// fn list_cpk_contents(reader: std::fs::File) -> plat_cri::error::Result<()> {
///     let cpk = plat_cri::CpkArchive::new(reader)?;
///
///     for (i, entry) in cpk.entries().iter().enumerate() {
///         let data = cpk.read(i)?;
///         println!("{}: {} bytes", entry.name(), data.len());
///     }
///
///     Ok(())
/// }
/// ```
pub struct CpkArchive<R> {
    name: Box<str>,
    reader: Mutex<R>,
    info: UtfTable,
    htoc: Option<UtfTable>,
    toc: Option<UtfTable>,
    etoc: Option<UtfTable>,
    entries: Vec<FileEntry>,
    file_info: Vec<CpkFileInfo>,
}

impl<R> Debug for CpkArchive<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CpkArchive")
            .field("name", &self.name)
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl<R> CpkArchive<R> {
    /// Set the name the archive is known by
    pub fn with_name(mut self, name: impl Into<Box<str>>) -> Self {
        self.name = name.into();
        self
    }

    /// The single row of the `CPK ` header table
    pub fn info(&self) -> &Row {
        &self.info.rows[0]
    }

    /// The `CPK ` header table
    pub fn info_table(&self) -> &UtfTable {
        &self.info
    }

    /// The `HTOC` table, if the archive has one
    pub fn htoc(&self) -> Option<&UtfTable> {
        self.htoc.as_ref()
    }

    /// The `TOC ` table, if the archive has one
    pub fn toc(&self) -> Option<&UtfTable> {
        self.toc.as_ref()
    }

    /// The `ETOC` table, if the archive has one
    pub fn etoc(&self) -> Option<&UtfTable> {
        self.etoc.as_ref()
    }

    /// Extra table columns for the entry at `index`
    pub fn file_info(&self, index: usize) -> Option<&CpkFileInfo> {
        self.file_info.get(index)
    }

    /// Unwrap and return the inner reader object
    ///
    /// The position of the reader is undefined.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}

impl<R: Read + Seek> CpkArchive<R> {
    /// Read a CPK archive with the default options
    pub fn new(reader: R) -> Result<CpkArchive<R>> {
        Self::with_options(reader, CpkOptions::default())
    }

    /// Read a CPK archive, collecting the files listed in its `TOC ` table.
    #[instrument(skip(reader), err)]
    pub fn with_options(mut reader: R, options: CpkOptions) -> Result<CpkArchive<R>> {
        let prefix = read_at(&mut reader, 0, TagHeader::SIZE)?;
        let magic = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);
        if magic != MAGIC {
            return Err(plat_core::error::Error::invalid_magic(
                "CPK",
                &MAGIC.to_le_bytes(),
                &prefix[..4],
            )
            .into());
        }

        let info = read_tag(&mut reader, 0, b"CPK ", options)?
            .ok_or_else(|| Error::InvalidArchive("header table is empty".into()))?;
        if info.len() != 1 {
            return Err(Error::InvalidArchive(format!(
                "header table has {} rows instead of one",
                info.len()
            )));
        }

        let row = &info.rows[0];
        let mut table = |offset: &str, size: &str, tag: &[u8; 4]| -> Result<Option<UtfTable>> {
            match (row.u64(offset), row.u64(size)) {
                (Some(offset), Some(size)) if offset != 0 && size != 0 => {
                    read_tag(&mut reader, offset, tag, options)
                }
                _ => Ok(None),
            }
        };

        let htoc = table("HtocOffset", "HtocSize", b"HTOC")?;
        let toc = table("TocOffset", "TocSize", b"TOC ")?;
        let etoc = table("EtocOffset", "EtocSize", b"ETOC")?;

        let (entries, file_info) = match &toc {
            Some(toc) => {
                let toc_offset = row.u64("TocOffset").unwrap_or_default();
                let len = stream_len(&mut reader)?;
                collect_entries(toc, toc_offset, len)
            }
            None => {
                warn!("archive has no TOC table, it lists no files");
                Default::default()
            }
        };

        Ok(CpkArchive {
            name: "".into(),
            reader: Mutex::new(reader),
            info,
            htoc,
            toc,
            etoc,
            entries,
            file_info,
        })
    }
}

/// Read the table behind the 16 byte `tag` prefix at `offset`.
///
/// Returns `None` when the prefix declares an empty table.
fn read_tag<R: Read + Seek>(
    reader: &mut R,
    offset: u64,
    tag: &[u8; 4],
    options: CpkOptions,
) -> Result<Option<UtfTable>> {
    let prefix = read_at(reader, offset, TagHeader::SIZE)?;
    let header = TagHeader::read_le(&mut Cursor::new(&prefix))?;
    if &header.tag != tag {
        return Err(Error::InvalidArchive(format!(
            "expected a {} table at {offset:#x}, found {:02X?}",
            String::from_utf8_lossy(tag),
            header.tag
        )));
    }
    if header.size == 0 {
        return Ok(None);
    }

    let data = read_at(reader, offset + TagHeader::SIZE, header.size)?;
    let data = if !utf::is_utf(&data) && options.decrypt_tables {
        Cow::Owned(utf::decrypt(&data))
    } else {
        Cow::Borrowed(&data[..])
    };

    utf::parse(&data).map(Some)
}

fn collect_entries(
    toc: &UtfTable,
    toc_offset: u64,
    len: u64,
) -> (Vec<FileEntry>, Vec<CpkFileInfo>) {
    let mut entries = Vec::with_capacity(toc.len());
    let mut file_info = Vec::with_capacity(toc.len());

    for (index, row) in toc.rows.iter().enumerate() {
        let (Some(file_name), Some(file_offset), Some(file_size)) = (
            row.str("FileName"),
            row.u64("FileOffset"),
            row.u64("FileSize"),
        ) else {
            error!(index, "TOC row is missing FileName, FileOffset or FileSize, skipping it");
            continue;
        };

        let name = match row.str("DirName") {
            Some(dir) if !dir.is_empty() => format!("{dir}/{file_name}"),
            _ => file_name.to_owned(),
        };

        let offset = toc_offset.saturating_add(file_offset);
        if offset.checked_add(file_size).map_or(true, |end| end > len) {
            error!(%name, offset, file_size, len, "file lies outside the archive, skipping it");
            continue;
        }

        let extract_size = row.u64("ExtractSize");
        let compression = match extract_size {
            Some(extract_size) if extract_size > file_size => CompressionScheme::Crilayla,
            _ => CompressionScheme::None,
        };
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, extension)| extension)
            .unwrap_or_default();

        entries.push(
            FileEntry::builder()
                .name(name)
                .extension(extension)
                .offset(offset)
                .size(extract_size.unwrap_or(file_size))
                .compressed_size(file_size)
                .compression(compression)
                .build(),
        );
        file_info.push(CpkFileInfo {
            id: row.u64("ID"),
            extract_size,
            user_string: row.str("UserString").map(str::to_owned),
        });
    }

    (entries, file_info)
}

impl<R: Read + Seek + Send> CpkArchive<R> {
    fn load(&self, entry: &FileEntry) -> Result<Vec<u8>> {
        let data = read_at(
            &mut *self.reader.lock(),
            entry.offset(),
            entry.compressed_size(),
        )?;

        if crilayla::is_compressed(&data) {
            crilayla::decompress(&data)
        } else {
            Ok(data)
        }
    }
}

impl<R: Read + Seek + Send> StructuredFile for CpkArchive<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> FileKind {
        FileKind::Cpk
    }

    fn as_archive(&self) -> Option<&dyn Archive> {
        Some(self)
    }
}

impl<R: Read + Seek + Send> Archive for CpkArchive<R> {
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

/// Opens nested CPK archives for a [`TypeResolver`]
#[derive(Debug, Default, Clone)]
pub struct CpkParser {
    options: CpkOptions,
}

impl CpkParser {
    /// Create a parser opening archives with `options`
    pub fn new(options: CpkOptions) -> Self {
        Self { options }
    }
}

impl FileParser for CpkParser {
    fn extract(
        &self,
        data: Arc<[u8]>,
        name: &str,
        _resolver: &dyn TypeResolver,
    ) -> plat_core::error::Result<Option<Box<dyn StructuredFile>>> {
        let archive = CpkArchive::with_options(Cursor::new(data), self.options)?.with_name(name);
        Ok(Some(Box::new(archive)))
    }
}
