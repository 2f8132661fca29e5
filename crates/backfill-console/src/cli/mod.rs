mod check;
mod init;
mod run;

pub use check::CheckCommand;
pub use init::InitCommand;
pub use run::RunCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Backfill Console - create, clone and inspect backfill runs
#[derive(Parser)]
#[command(name = "backfill-console")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the console server.
    Run(RunCommand),

    /// Write a starter configuration file.
    Init(InitCommand),

    /// Validate a configuration file.
    Check(CheckCommand),
}

impl Cli {
    /// Execute the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run(cmd) => cmd.execute().await,
            Commands::Init(cmd) => cmd.execute(),
            Commands::Check(cmd) => cmd.execute(),
        }
    }
}
