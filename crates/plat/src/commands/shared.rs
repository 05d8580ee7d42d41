//! Helpers used by the commands of every archive format

use std::{
    fs::File,
    io::Write,
    path::{Component, Path, PathBuf},
};

use itertools::Itertools;
use miette::{Context, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use plat_core::Archive;
use tracing::{error, info};

/// Open an input file, naming it in the error
pub fn open(path: &Path) -> Result<File> {
    File::open(path)
        .into_diagnostic()
        .context(format!("path: {}", path.display()))
}

/// Create an output file, refusing to replace an existing one unless `overwrite` is set
pub fn create(path: &Path, overwrite: bool) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .into_diagnostic()
            .context(format!("creating {}", parent.display()))?;
    }

    if !overwrite {
        File::create_new(path)
            .into_diagnostic()
            .context(format!("creating {}", path.display()))
    } else {
        File::create(path)
            .into_diagnostic()
            .context(format!("creating {}", path.display()))
    }
}

/// Where an entry called `name` is written below `directory`.
///
/// Names that are absolute or climb out of `directory` have no target.
pub fn entry_path(directory: &Path, name: &str) -> Option<PathBuf> {
    let relative = Path::new(name);
    let escapes = relative
        .components()
        .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));
    if escapes || name.is_empty() {
        return None;
    }
    Some(directory.join(relative))
}

/// Write every entry of `archive` below `directory`, returning the number written.
///
/// Entries that cannot be decoded are logged and skipped.
pub fn extract_all(archive: &dyn Archive, directory: &Path, overwrite: bool) -> Result<usize> {
    let mut written = 0;
    for (index, entry) in archive.entries().iter().enumerate() {
        let Some(path) = entry_path(directory, entry.name()) else {
            error!(name = entry.name(), "entry name leaves the target directory, skipping it");
            continue;
        };

        let data = match archive.read(index) {
            Ok(data) => data,
            Err(error) => {
                error!(name = entry.name(), %error, "unable to read file, skipping it");
                continue;
            }
        };

        info!("writing {}", path.display());
        create(&path, overwrite)?
            .write_all(&data)
            .into_diagnostic()
            .context(format!("writing {}", path.display()))?;
        written += 1;
    }
    Ok(written)
}

/// Print one line per entry of `archive`
pub fn print_entries(archive: &dyn Archive) {
    for (index, entry) in archive.entries().iter().enumerate() {
        let sizes = if entry.size() == entry.compressed_size() {
            format!("{}", entry.size())
        } else {
            [entry.compressed_size(), entry.size()].iter().join(" -> ")
        };
        println!(
            "{:>5} {} {} {}",
            index.dimmed(),
            entry.name().bold(),
            sizes,
            entry.compression().to_string().cyan()
        );
    }
}
