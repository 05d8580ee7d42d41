//! The file entry shared by every container reader.

use bon::Builder;
use parking_lot::Mutex;
use std::{
    convert::Infallible,
    fmt::{self, Debug},
    str::FromStr,
    sync::{Arc, OnceLock},
};

/// How an entry's bytes are stored inside its archive
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CompressionScheme {
    /// Stored as is
    #[default]
    None,

    /// CRI's backward LZ scheme, see `plat_cri::crilayla`
    Crilayla,

    /// Zstandard, the dictionary codec used by PKZ archives
    Zstandard,

    /// Oodle Kraken, the proprietary codec used by PKZ archives
    OodleKraken,

    /// A scheme name this library does not understand
    Unknown(Box<str>),
}

impl FromStr for CompressionScheme {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "None" => CompressionScheme::None,
            "CRILAYLA" => CompressionScheme::Crilayla,
            "ZStandard" => CompressionScheme::Zstandard,
            "OodleKraken" => CompressionScheme::OodleKraken,
            other => CompressionScheme::Unknown(other.into()),
        })
    }
}

impl fmt::Display for CompressionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionScheme::None => f.write_str("None"),
            CompressionScheme::Crilayla => f.write_str("CRILAYLA"),
            CompressionScheme::Zstandard => f.write_str("ZStandard"),
            CompressionScheme::OodleKraken => f.write_str("OodleKraken"),
            CompressionScheme::Unknown(name) => f.write_str(name),
        }
    }
}

/// A single file stored in an archive.
///
/// The metadata is fixed once the archive has been opened. The content starts out
/// unresolved ("partial") and is materialized at most once; afterwards the same bytes are
/// handed out for as long as the archive lives.
///
/// ```
/// use plat_core::entry::{CompressionScheme, FileEntry};
///
/// let entry = FileEntry::builder()
///     .name("ui/title.bxm")
///     .offset(0x40)
///     .size(12)
///     .compressed_size(12)
///     .compression(CompressionScheme::None)
///     .build();
///
/// assert_eq!(entry.extension(), "bxm");
/// assert!(entry.is_partial());
/// ```
#[derive(Builder)]
pub struct FileEntry {
    /// Name of the file, including any directory prefix
    #[builder(into)]
    name: Box<str>,

    /// Extension as recorded by the archive. Derived from the name when not given.
    #[builder(into)]
    extension: Option<Box<str>>,

    /// Absolute offset of the stored bytes in the backing data
    #[builder(default)]
    offset: u64,

    /// Size of the file once decoded
    size: u64,

    /// Size of the stored bytes
    compressed_size: u64,

    /// How the stored bytes are encoded
    #[builder(default)]
    compression: CompressionScheme,

    #[builder(skip)]
    content: OnceLock<Arc<[u8]>>,

    #[builder(skip)]
    in_flight: Mutex<()>,
}

impl Debug for FileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileEntry")
            .field("name", &self.name)
            .field("extension", &self.extension())
            .field("offset", &self.offset)
            .field("size", &self.size)
            .field("compressed_size", &self.compressed_size)
            .field("compression", &self.compression)
            .field("partial", &self.is_partial())
            .finish()
    }
}

impl FileEntry {
    /// Get the name of the file
    ///
    /// # Warnings
    ///
    /// It is dangerous to use this name directly when extracting an archive.
    /// It may contain an absolute path (`/etc/shadow`), or break out of the
    /// current directory (`../runtime`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the extension of the file, without the leading dot
    pub fn extension(&self) -> &str {
        match &self.extension {
            Some(extension) => extension,
            None => self
                .name
                .rsplit_once('.')
                .map(|(_, extension)| extension)
                .unwrap_or_default(),
        }
    }

    /// Get the starting offset of the stored bytes
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Get the size of the file, in bytes, when decoded
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Get the size of the file, in bytes, in the archive
    pub fn compressed_size(&self) -> u64 {
        self.compressed_size
    }

    /// Get the compression scheme recorded for this file
    pub fn compression(&self) -> &CompressionScheme {
        &self.compression
    }

    /// Whether the content has not been materialized yet
    pub fn is_partial(&self) -> bool {
        self.content.get().is_none()
    }

    /// The materialized content, if any
    pub fn content(&self) -> Option<Arc<[u8]>> {
        self.content.get().cloned()
    }

    /// Mark the entry as resolved with the given bytes
    pub fn with_content(self, content: impl Into<Arc<[u8]>>) -> Self {
        let _ = self.content.set(content.into());
        self
    }

    /// Return the cached content, producing it with `load` the first time.
    ///
    /// Concurrent callers for the same entry wait for the first one and share its result;
    /// `load` runs at most once per successful materialization. A failed load leaves the
    /// entry partial so it can be retried.
    pub fn get_or_try_load<E, F>(&self, load: F) -> Result<Arc<[u8]>, E>
    where
        F: FnOnce(&FileEntry) -> Result<Vec<u8>, E>,
    {
        if let Some(content) = self.content.get() {
            return Ok(content.clone());
        }

        let _guard = self.in_flight.lock();
        if let Some(content) = self.content.get() {
            return Ok(content.clone());
        }

        let content: Arc<[u8]> = load(self)?.into();
        let _ = self.content.set(content.clone());
        Ok(content)
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::{CompressionScheme, FileEntry};

    fn entry() -> FileEntry {
        FileEntry::builder()
            .name("dir/file.wtp")
            .size(4)
            .compressed_size(4)
            .build()
    }

    #[test]
    fn scheme_names_round_trip() {
        for name in ["None", "CRILAYLA", "ZStandard", "OodleKraken", "Lz4"] {
            let scheme: CompressionScheme = name.parse().unwrap();
            assert_eq!(scheme.to_string(), name);
        }
        assert_eq!(
            "Lz4".parse::<CompressionScheme>().unwrap(),
            CompressionScheme::Unknown("Lz4".into())
        );
    }

    #[test]
    fn extension_prefers_recorded_value() {
        assert_eq!(entry().extension(), "wtp");

        let recorded = FileEntry::builder()
            .name("noext")
            .extension("wmb")
            .size(0)
            .compressed_size(0)
            .build();
        assert_eq!(recorded.extension(), "wmb");
    }

    #[test]
    fn content_is_loaded_once() -> Result<(), ()> {
        let entry = entry();
        let calls = AtomicUsize::new(0);

        assert!(entry.is_partial());
        for _ in 0..3 {
            let content = entry.get_or_try_load(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ()>(vec![1, 2, 3, 4])
            })?;
            assert_eq!(&*content, &[1, 2, 3, 4]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!entry.is_partial());
        Ok(())
    }

    #[test]
    fn failed_load_stays_partial() {
        let entry = entry();
        assert!(entry.get_or_try_load(|_| Err::<Vec<u8>, _>("broken")).is_err());
        assert!(entry.is_partial());
    }

    #[test]
    fn concurrent_loads_share_one_decode() {
        let entry = Arc::new(entry());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles = (0..8)
            .map(|_| {
                let entry = entry.clone();
                let calls = calls.clone();
                std::thread::spawn(move || {
                    entry
                        .get_or_try_load(|_| {
                            calls.fetch_add(1, Ordering::SeqCst);
                            std::thread::sleep(std::time::Duration::from_millis(10));
                            Ok::<_, ()>(vec![7; 4])
                        })
                        .map(|c| c.to_vec())
                })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(vec![7; 4]));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
