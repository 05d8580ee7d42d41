use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use std::{io::Read, path::PathBuf};

use crate::{
    commands::shared,
    registry::default_registry,
    tree::{self, Node},
};

#[derive(Args)]
pub struct TreeArgs {
    /// An input DAT, PKZ or CPK file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Deepest level of nesting to print
    #[arg(long, value_name = "DEPTH")]
    max_depth: Option<usize>,
}

impl TreeArgs {
    pub fn handle(&self) -> Result<()> {
        let name = self
            .file
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or(miette!("unable to convert {} to a string", self.file.display()))?;

        let mut data = Vec::new();
        shared::open(&self.file)?
            .read_to_end(&mut data)
            .into_diagnostic()
            .context(format!("reading {}", self.file.display()))?;

        let registry = default_registry();
        let file = tree::open(data.into(), name, &registry)?
            .ok_or(miette!("{name} is not an archive"))?;
        let archive = file
            .as_archive()
            .ok_or(miette!("{name} is not an archive"))?;

        let nodes = tree::build(archive, &registry);
        let total: usize = nodes.iter().map(|node| 1 + node.descendants()).sum();

        println!("{} ({})", name.bold(), file.kind().label().dimmed());
        for (depth, node) in tree::flatten(&nodes) {
            if self.max_depth.is_some_and(|max| depth > max) {
                continue;
            }
            print_node(depth, node);
        }
        println!("{total} files");
        Ok(())
    }
}

fn print_node(depth: usize, node: &Node) {
    let indent = "  ".repeat(depth + 1);
    if node.children.is_empty() {
        println!(
            "{indent}{} {} {}",
            node.name,
            node.size,
            node.kind.label().dimmed()
        );
    } else {
        println!(
            "{indent}{} {} files {}",
            node.name.blue().bold(),
            node.children.len(),
            node.kind.label().dimmed()
        );
    }
}
