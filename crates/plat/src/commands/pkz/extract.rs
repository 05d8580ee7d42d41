use clap::Args;
use miette::Result;
use plat_core::Archive;
use plat_pkz::PkzArchive;
use std::path::PathBuf;
use tracing::info;

use crate::commands::shared;

#[derive(Args)]
pub struct ExtractArgs {
    /// An input PKZ file
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
        let pkz = PkzArchive::new(shared::open(&self.file)?)?;

        let written = shared::extract_all(&pkz, &self.directory, self.overwrite)?;
        info!("extracted {written} of {} files", pkz.len());
        Ok(())
    }
}
