use clap::Args;
use miette::Result;
use plat_core::Archive;
use plat_dat::DatArchive;
use std::path::PathBuf;

use crate::commands::shared;

#[derive(Args)]
pub struct ListArgs {
    /// An input DAT file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

impl ListArgs {
    pub fn handle(&self) -> Result<()> {
        let dat = DatArchive::from_reader(shared::open(&self.file)?, &plat_core::Registry::new())?;

        println!(
            "{} files, {} bytes, {}",
            dat.len(),
            dat.size(),
            if dat.is_big_endian() { "big endian" } else { "little endian" }
        );
        shared::print_entries(&dat);
        Ok(())
    }
}
