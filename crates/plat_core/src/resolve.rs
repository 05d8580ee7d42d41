//! Dispatch of archive members to format parsers.
//!
//! Containers never know which formats exist. They ask a [`TypeResolver`] for the parser of a
//! member's name and hand it the member's bytes; anything the resolver does not know is
//! handled by [`Passthrough`] and stays an opaque blob.

use std::{collections::HashMap, fmt::Debug, sync::Arc};

use tracing::warn;

use crate::{archive::StructuredFile, error::Result, kind::FileKind};

/// Turns the bytes of a file into a [`StructuredFile`].
pub trait FileParser: Debug + Send + Sync {
    /// Parse `data`, recursing through `resolver` for any nested members.
    ///
    /// Returns `Ok(None)` when the data is not structured content this parser handles.
    fn extract(
        &self,
        data: Arc<[u8]>,
        name: &str,
        resolver: &dyn TypeResolver,
    ) -> Result<Option<Box<dyn StructuredFile>>>;
}

/// How many archives may enclose a file before it is no longer parsed
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Picks the parser for a file name.
pub trait TypeResolver: Send + Sync {
    /// The parser responsible for files called `name`
    fn resolve(&self, name: &str) -> Arc<dyn FileParser>;

    /// Number of archives enclosing the files this resolver is asked about
    fn depth(&self) -> usize {
        0
    }

    /// Files enclosed by this many archives are kept as raw data
    fn max_depth(&self) -> usize {
        DEFAULT_MAX_DEPTH
    }
}

/// The resolver handed to a parser for the files inside the one it is parsing.
///
/// Resolves exactly like `parent`, one level deeper.
#[derive(Clone, Copy)]
pub struct Nested<'a> {
    parent: &'a dyn TypeResolver,
}

impl<'a> Nested<'a> {
    pub fn new(parent: &'a dyn TypeResolver) -> Self {
        Self { parent }
    }
}

impl TypeResolver for Nested<'_> {
    fn resolve(&self, name: &str) -> Arc<dyn FileParser> {
        self.parent.resolve(name)
    }

    fn depth(&self) -> usize {
        self.parent.depth() + 1
    }

    fn max_depth(&self) -> usize {
        self.parent.max_depth()
    }
}

/// Parser for content that is kept as raw bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl FileParser for Passthrough {
    fn extract(
        &self,
        _data: Arc<[u8]>,
        _name: &str,
        _resolver: &dyn TypeResolver,
    ) -> Result<Option<Box<dyn StructuredFile>>> {
        Ok(None)
    }
}

/// A [`TypeResolver`] mapping each [`FileKind`] to a parser.
///
/// ```
/// use std::sync::Arc;
/// use plat_core::{kind::FileKind, resolve::{Passthrough, Registry, TypeResolver}};
///
/// let registry = Registry::new().with(FileKind::Csv, Arc::new(Passthrough));
/// assert!(registry.is_registered(FileKind::Csv));
/// assert!(!registry.is_registered(FileKind::Dat));
/// ```
#[derive(Debug, Clone)]
pub struct Registry {
    parsers: HashMap<FileKind, Arc<dyn FileParser>>,
    fallback: Arc<dyn FileParser>,
    max_depth: usize,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// An empty registry; every file passes through untouched
    pub fn new() -> Self {
        Self {
            parsers: HashMap::new(),
            fallback: Arc::new(Passthrough),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Keep files enclosed by `max_depth` archives as raw data
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Register `parser` for `kind`, returning the registry
    pub fn with(mut self, kind: FileKind, parser: Arc<dyn FileParser>) -> Self {
        self.register(kind, parser);
        self
    }

    /// Register `parser` for `kind`, replacing any earlier registration
    pub fn register(&mut self, kind: FileKind, parser: Arc<dyn FileParser>) {
        self.parsers.insert(kind, parser);
    }

    /// Whether a parser other than the fallback handles `kind`
    pub fn is_registered(&self, kind: FileKind) -> bool {
        self.parsers.contains_key(&kind)
    }
}

impl TypeResolver for Registry {
    fn resolve(&self, name: &str) -> Arc<dyn FileParser> {
        self.parsers
            .get(&FileKind::from_name(name))
            .unwrap_or(&self.fallback)
            .clone()
    }

    fn max_depth(&self) -> usize {
        self.max_depth
    }
}

/// Run the parser for `name` over `data`, keeping the member opaque if parsing fails or the
/// member is nested deeper than the resolver allows.
pub fn try_extract(
    resolver: &dyn TypeResolver,
    name: &str,
    data: Arc<[u8]>,
) -> Option<Box<dyn StructuredFile>> {
    if resolver.depth() >= resolver.max_depth() {
        warn!(name, depth = resolver.depth(), "file is nested too deeply, keeping raw data");
        return None;
    }

    match resolver
        .resolve(name)
        .extract(data, name, &Nested::new(resolver))
    {
        Ok(file) => file,
        Err(error) => {
            warn!(name, %error, "unable to parse nested file, keeping raw data");
            None
        }
    }
}
