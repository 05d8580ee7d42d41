pub mod extract;
pub mod list;
pub mod repack;

#[derive(clap::Subcommand)]
pub enum DatCommands {
    /// Extract a DAT archive into a directory
    Extract(extract::ExtractArgs),
    /// List the files of a DAT archive
    List(list::ListArgs),
    /// Pack a directory into a DAT archive
    Repack(repack::RepackArgs),
}

impl DatCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            DatCommands::Extract(extract) => extract.handle(),
            DatCommands::List(list) => list.handle(),
            DatCommands::Repack(repack) => repack.handle(),
        }
    }
}
