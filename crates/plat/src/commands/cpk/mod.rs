pub mod extract;
pub mod list;

#[derive(clap::Subcommand)]
pub enum CpkCommands {
    /// Extract a CPK archive into a directory
    Extract(extract::ExtractArgs),
    /// List the files of a CPK archive
    List(list::ListArgs),
}

impl CpkCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            CpkCommands::Extract(extract) => extract.handle(),
            CpkCommands::List(list) => list.handle(),
        }
    }
}
