pub mod extract;
pub mod list;

#[derive(clap::Subcommand)]
pub enum PkzCommands {
    /// Extract a PKZ archive into a directory
    Extract(extract::ExtractArgs),
    /// List the files of a PKZ archive
    List(list::ListArgs),
}

impl PkzCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            PkzCommands::Extract(extract) => extract.handle(),
            PkzCommands::List(list) => list.handle(),
        }
    }
}
