use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "period-tui")]
#[command(about = "Terminal calendar for period tracking")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run against the period tracking server
    Run,
    /// Run in dev mode with local in-memory data
    Dev,
    /// Log in with email and password
    Login,
    /// Log out and remove the local session
    Logout,
    /// Print config path and create default file if missing
    ConfigPath,
    /// Print the date panel for one day, e.g. `show 2024-01-01`
    Show {
        date: String,
        /// Use the in-memory dev backend instead of the server
        #[arg(long)]
        dev: bool,
    },
}
