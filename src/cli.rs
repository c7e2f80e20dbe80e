use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(about = "Alumni employment-record service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Apply migrations and start the HTTP server (default)
    Serve,
    /// Apply pending migrations and exit
    Migrate,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }
}
