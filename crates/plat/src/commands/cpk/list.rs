use clap::Args;
use itertools::Itertools;
use miette::Result;
use owo_colors::OwoColorize;
use plat_core::Archive;
use plat_cri::CpkArchive;
use std::path::PathBuf;

use crate::commands::shared;

#[derive(Args)]
pub struct ListArgs {
    /// An input CPK file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Also print the ID of every file
    #[arg(long, default_value_t = false)]
    ids: bool,
}

impl ListArgs {
    pub fn handle(&self) -> Result<()> {
        let cpk = CpkArchive::new(shared::open(&self.file)?)?;

        let tables = [
            ("HTOC", cpk.htoc().is_some()),
            ("TOC", cpk.toc().is_some()),
            ("ETOC", cpk.etoc().is_some()),
        ]
        .into_iter()
        .filter_map(|(tag, present)| present.then_some(tag))
        .join(" ");
        println!("{} files, tables: {}", cpk.len(), format!("CPK {tables}").dimmed());

        shared::print_entries(&cpk);

        if self.ids {
            for (index, entry) in cpk.entries().iter().enumerate() {
                if let Some(id) = cpk.file_info(index).and_then(|info| info.id) {
                    println!("{id:>8} {}", entry.name());
                }
            }
        }
        Ok(())
    }
}
