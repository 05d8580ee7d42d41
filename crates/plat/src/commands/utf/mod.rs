pub mod dump;

#[derive(clap::Subcommand)]
pub enum UtfCommands {
    /// Print a UTF table as JSON
    Dump(dump::DumpArgs),
}

impl UtfCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            UtfCommands::Dump(dump) => dump.handle(),
        }
    }
}
