//! Recursive view over an archive and every archive nested in it.

use std::sync::Arc;

use plat_core::{Archive, FileKind, Nested, StructuredFile, TypeResolver};
use tracing::warn;

/// One file of an archive, with the files of any archive it holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub kind: FileKind,
    pub size: u64,
    pub children: Vec<Node>,
}

impl Node {
    /// Number of files below this one, at any depth
    pub fn descendants(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendants())
            .sum()
    }
}

/// Open `data` with the parser `resolver` picks for `name`.
pub fn open(
    data: Arc<[u8]>,
    name: &str,
    resolver: &dyn TypeResolver,
) -> plat_core::error::Result<Option<Box<dyn StructuredFile>>> {
    resolver.resolve(name).extract(data, name, resolver)
}

/// Describe every entry of `archive`, descending into nested archives.
///
/// Members resolved when the archive was opened are used as they are; lazy containers are
/// opened through `resolver`. Members that fail to open are logged and listed as plain files.
pub fn build(archive: &dyn Archive, resolver: &dyn TypeResolver) -> Vec<Node> {
    archive
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let kind = FileKind::from_name(entry.name());
            let children = match archive.nested(index) {
                Some(nested) => children_of(nested, resolver),
                None if kind.is_folder() => match archive.open_nested(index, resolver) {
                    Ok(Some(nested)) => children_of(nested.as_ref(), resolver),
                    Ok(None) => Vec::new(),
                    Err(error) => {
                        warn!(name = entry.name(), %error, "unable to open nested archive");
                        Vec::new()
                    }
                },
                None => Vec::new(),
            };

            Node {
                name: entry.name().to_owned(),
                kind,
                size: entry.size(),
                children,
            }
        })
        .collect()
}

fn children_of(file: &dyn StructuredFile, resolver: &dyn TypeResolver) -> Vec<Node> {
    file.as_archive()
        .map(|archive| build(archive, &Nested::new(resolver)))
        .unwrap_or_default()
}

/// Every node paired with its depth, parents before their children
pub fn flatten(nodes: &[Node]) -> Vec<(usize, &Node)> {
    fn visit<'a>(nodes: &'a [Node], depth: usize, out: &mut Vec<(usize, &'a Node)>) {
        for node in nodes {
            out.push((depth, node));
            visit(&node.children, depth + 1, out);
        }
    }

    let mut out = Vec::new();
    visit(nodes, 0, &mut out);
    out
}
