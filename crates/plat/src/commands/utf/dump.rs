use clap::{Args, ValueEnum};
use miette::{miette, Context, IntoDiagnostic, Result};
use plat_cri::{utf, CpkArchive, UtfTable};
use std::{
    io::{Read, Write},
    path::PathBuf,
};
use tracing::info;

use crate::commands::shared;

/// Tables of a CPK archive
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Table {
    #[default]
    Cpk,
    Htoc,
    Toc,
    Etoc,
}

#[derive(Args)]
pub struct DumpArgs {
    /// A CPK archive or a file holding a single UTF table
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// The table to print when the input is a CPK archive
    #[arg(short, long, value_enum, default_value_t)]
    table: Table,

    /// Write the JSON to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Allow overwriting the output
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl DumpArgs {
    pub fn handle(&self) -> Result<()> {
        let mut f = shared::open(&self.file)?;
        let mut data = Vec::new();
        f.read_to_end(&mut data)
            .into_diagnostic()
            .context(format!("reading {}", self.file.display()))?;

        let table = if data.starts_with(b"CPK ") {
            self.cpk_table(data)?
        } else {
            parse_table(&data)?
        };

        let json = serde_json::to_string_pretty(&table).into_diagnostic()?;
        match &self.output {
            Some(path) => {
                info!("writing {}", path.display());
                shared::create(path, self.overwrite)?
                    .write_all(json.as_bytes())
                    .into_diagnostic()
                    .context(format!("writing {}", path.display()))?;
            }
            None => println!("{json}"),
        }
        Ok(())
    }

    fn cpk_table(&self, data: Vec<u8>) -> Result<UtfTable> {
        let cpk = CpkArchive::new(std::io::Cursor::new(data))?;
        let table = match self.table {
            Table::Cpk => Some(cpk.info_table()),
            Table::Htoc => cpk.htoc(),
            Table::Toc => cpk.toc(),
            Table::Etoc => cpk.etoc(),
        };
        table
            .cloned()
            .ok_or(miette!("the archive has no {:?} table", self.table))
    }
}

/// Parse a bare UTF table, decrypting it first if it is obfuscated
fn parse_table(data: &[u8]) -> Result<UtfTable> {
    let table = if utf::is_utf(data) {
        utf::parse(data)?
    } else {
        utf::parse(&utf::decrypt(data))?
    };
    Ok(table)
}
