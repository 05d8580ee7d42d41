use clap::Args;
use miette::Result;
use plat_core::Archive;
use plat_dat::DatArchive;
use std::path::PathBuf;
use tracing::info;

use crate::commands::shared;

#[derive(Args)]
pub struct ExtractArgs {
    /// An input DAT file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        let dat = DatArchive::from_reader(shared::open(&self.file)?, &plat_core::Registry::new())?;
        if dat.is_big_endian() {
            info!("big endian archive, file contents are byte swapped");
        }

        let written = shared::extract_all(&dat, &self.directory, self.overwrite)?;
        info!("extracted {written} of {} files", dat.len());
        Ok(())
    }
}
