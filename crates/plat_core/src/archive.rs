//! Uniform view over every container format.

use std::{fmt::Debug, sync::Arc};

use crate::{
    entry::FileEntry,
    error::{Error, FileNotFoundError, Result},
    kind::FileKind,
    resolve::{Nested, TypeResolver},
};

/// Anything a [`crate::resolve::FileParser`] can turn a blob of bytes into.
pub trait StructuredFile: Debug + Send + Sync {
    /// Name the file was opened under
    fn name(&self) -> &str;

    /// Kind of the parsed content
    fn kind(&self) -> FileKind;

    /// View this file as an archive, if it contains further files
    fn as_archive(&self) -> Option<&dyn Archive> {
        None
    }
}

/// An ordered collection of [`FileEntry`] records with lazily materialized content.
///
/// Lookups by name return the first match; archives may contain duplicate names.
pub trait Archive: StructuredFile {
    /// The entries, in archive order
    fn entries(&self) -> &[FileEntry];

    /// Decode the content of the entry at `index`, caching it on the entry
    fn read(&self, index: usize) -> Result<Arc<[u8]>>;

    /// A nested file resolved while the archive was opened
    fn nested(&self, _index: usize) -> Option<&dyn StructuredFile> {
        None
    }

    /// Number of entries contained in this archive
    fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether this archive contains no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get an entry by index
    fn entry(&self, index: usize) -> Result<&FileEntry> {
        self.entries()
            .get(index)
            .ok_or(Error::FileNotFound(FileNotFoundError::Index(index)))
    }

    /// Get the index of the first entry with the given name, if it's present
    fn index_for_name(&self, name: &str) -> Option<usize> {
        self.entries().iter().position(|entry| entry.name() == name)
    }

    /// Read an entry by name
    fn read_by_name(&self, name: &str) -> Result<Arc<[u8]>> {
        let index = self
            .index_for_name(name)
            .ok_or_else(|| Error::FileNotFound(FileNotFoundError::Name(name.to_owned())))?;
        self.read(index)
    }

    /// Materialize the entry at `index` and hand it to the parser `resolver` picks for its name.
    ///
    /// Returns `Ok(None)` when the entry is plain data or lies deeper than the resolver's
    /// [`TypeResolver::max_depth`].
    fn open_nested(
        &self,
        index: usize,
        resolver: &dyn TypeResolver,
    ) -> Result<Option<Box<dyn StructuredFile>>> {
        let name = self.entry(index)?.name().to_owned();
        if resolver.depth() >= resolver.max_depth() {
            return Ok(None);
        }
        let data = self.read(index)?;
        resolver
            .resolve(&name)
            .extract(data, &name, &Nested::new(resolver))
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::{Archive, StructuredFile};
    use crate::{
        entry::FileEntry,
        error::{Error, FileNotFoundError, Result},
        kind::FileKind,
        resolve::{FileParser, Registry, TypeResolver},
    };

    #[derive(Debug)]
    struct Memory(Vec<FileEntry>);

    impl StructuredFile for Memory {
        fn name(&self) -> &str {
            "memory"
        }

        fn kind(&self) -> FileKind {
            FileKind::Unknown
        }

        fn as_archive(&self) -> Option<&dyn Archive> {
            Some(self)
        }
    }

    impl Archive for Memory {
        fn entries(&self) -> &[FileEntry] {
            &self.0
        }

        fn read(&self, index: usize) -> Result<Arc<[u8]>> {
            self.entry(index)?
                .content()
                .ok_or(Error::CustomError("not loaded".into()))
        }
    }

    fn memory() -> Memory {
        let file = |name: &str, data: &[u8]| {
            FileEntry::builder()
                .name(name)
                .size(data.len() as u64)
                .compressed_size(data.len() as u64)
                .build()
                .with_content(data.to_vec())
        };
        Memory(vec![
            file("a.txt", b"first"),
            file("b.txt", b"second"),
            file("a.txt", b"duplicate"),
        ])
    }

    #[test]
    fn lookup_returns_first_match() -> Result<()> {
        let archive = memory();
        assert_eq!(archive.len(), 3);
        assert_eq!(archive.index_for_name("a.txt"), Some(0));
        assert_eq!(&*archive.read_by_name("a.txt")?, b"first");
        assert_eq!(&*archive.read_by_name("b.txt")?, b"second");
        Ok(())
    }

    #[test]
    fn missing_entries_are_reported() {
        let archive = memory();
        assert!(matches!(
            archive.entry(7),
            Err(Error::FileNotFound(FileNotFoundError::Index(7)))
        ));
        assert!(matches!(
            archive.read_by_name("c.txt"),
            Err(Error::FileNotFound(FileNotFoundError::Name(name))) if name == "c.txt"
        ));
    }

    #[test]
    fn plain_entries_do_not_nest() -> Result<()> {
        let archive = memory();
        assert!(archive.open_nested(1, &Registry::new())?.is_none());
        Ok(())
    }

    /// Reports the depth it was resolved at as the file name
    #[derive(Debug)]
    struct Depth;

    #[derive(Debug)]
    struct Resolved(String);

    impl StructuredFile for Resolved {
        fn name(&self) -> &str {
            &self.0
        }

        fn kind(&self) -> FileKind {
            FileKind::Csv
        }
    }

    impl FileParser for Depth {
        fn extract(
            &self,
            _data: Arc<[u8]>,
            _name: &str,
            resolver: &dyn TypeResolver,
        ) -> Result<Option<Box<dyn StructuredFile>>> {
            Ok(Some(Box::new(Resolved(resolver.depth().to_string()))))
        }
    }

    #[test]
    fn nested_entries_are_one_level_deeper() -> Result<()> {
        let archive = Memory(vec![FileEntry::builder()
            .name("table.csv")
            .size(3)
            .compressed_size(3)
            .build()
            .with_content(b"a,b".to_vec())]);

        let registry = Registry::new().with(FileKind::Csv, Arc::new(Depth));
        let opened = archive.open_nested(0, &registry)?;
        assert_eq!(opened.map(|f| f.name().to_owned()), Some("1".into()));

        let registry = registry.with_max_depth(0);
        assert!(archive.open_nested(0, &registry)?.is_none());
        Ok(())
    }
}
