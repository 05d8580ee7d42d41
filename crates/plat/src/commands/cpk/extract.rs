use clap::Args;
use miette::Result;
use plat_core::Archive;
use plat_cri::{CpkArchive, CpkOptions};
use std::path::PathBuf;
use tracing::info;

use crate::commands::shared;

#[derive(Args)]
pub struct ExtractArgs {
    /// An input CPK file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Read obfuscated tables as they are stored
    #[arg(long, default_value_t = false)]
    no_decrypt: bool,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        let options = CpkOptions::builder()
            .decrypt_tables(!self.no_decrypt)
            .build();
        let cpk = CpkArchive::with_options(shared::open(&self.file)?, options)?;

        let written = shared::extract_all(&cpk, &self.directory, self.overwrite)?;
        info!("extracted {written} of {} files", cpk.len());
        Ok(())
    }
}
