use clap::Args;
use miette::Result;
use plat_core::Archive;
use plat_pkz::PkzArchive;
use std::path::PathBuf;

use crate::commands::shared;

#[derive(Args)]
pub struct ListArgs {
    /// An input PKZ file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

impl ListArgs {
    pub fn handle(&self) -> Result<()> {
        let pkz = PkzArchive::new(shared::open(&self.file)?)?;
        let header = pkz.header();

        println!(
            "{} files, version {}, {} bytes",
            pkz.len(),
            header.version,
            header.size
        );
        shared::print_entries(&pkz);
        Ok(())
    }
}
