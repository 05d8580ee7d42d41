use clap::Args;
use itertools::Itertools;
use miette::{miette, Context, IntoDiagnostic, Result};
use plat_dat::{write::DatWriterOptions, DatWriter};
use std::path::PathBuf;
use tracing::info;
use walkdir::WalkDir;

use crate::commands::shared;

#[derive(Args)]
pub struct RepackArgs {
    /// An input directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// A target DAT file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Alignment of the file data in bytes
    #[arg(short, long, default_value_t = 16)]
    alignment: u32,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl RepackArgs {
    pub fn handle(&self) -> Result<()> {
        info!("creating {}", &self.file.display());

        let files = WalkDir::new(&self.directory)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| !e.file_type().is_dir())
            .sorted_by(|a, b| a.file_name().cmp(b.file_name()))
            .collect::<Vec<_>>();

        if files.is_empty() {
            return Err(miette!("directory is empty"));
        }

        let out = shared::create(&self.file, self.overwrite)?;
        let mut dat = DatWriter::new(
            out,
            DatWriterOptions::builder()
                .alignment(self.alignment)
                .build(),
        );

        for file in files {
            let name = file.file_name().to_str().ok_or(miette!(
                "unable to convert {} to a string",
                file.path().display()
            ))?;
            info!("packing {name}");

            dat.start_file(name)
                .context(format!("starting entry for {name}"))?;

            let mut f = shared::open(file.path())?;
            std::io::copy(&mut f, &mut dat)
                .into_diagnostic()
                .context(format!("copying {}", file.path().display()))?;
        }

        dat.finish().context("finalizing dat file")?;

        Ok(())
    }
}
