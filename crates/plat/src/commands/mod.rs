pub mod cpk;
pub mod dat;
pub mod pkz;
pub mod shared;
pub mod tree;
pub mod utf;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle DAT archives
    Dat {
        #[command(subcommand)]
        command: dat::DatCommands,
    },
    /// Handle PKZ archives
    Pkz {
        #[command(subcommand)]
        command: pkz::PkzCommands,
    },
    /// Handle CPK archives
    Cpk {
        #[command(subcommand)]
        command: cpk::CpkCommands,
    },
    /// Handle UTF tables
    Utf {
        #[command(subcommand)]
        command: utf::UtfCommands,
    },
    /// List an archive and every archive nested in it
    Tree(tree::TreeArgs),
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Dat { command } => command.handle(),
            Commands::Pkz { command } => command.handle(),
            Commands::Cpk { command } => command.handle(),
            Commands::Utf { command } => command.handle(),
            Commands::Tree(tree) => tree.handle(),
        }
    }
}
