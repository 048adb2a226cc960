//! Command-line interface for the `MindFlow` server.

use clap::{Parser, Subcommand};

/// `MindFlow` - back-end for the mental-health support site
#[derive(Parser)]
#[command(name = "mindflow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Commands {
    /// Run the HTTP server (default)
    #[default]
    Serve,

    /// Apply database migrations and exit
    Migrate,

    /// Print the effective configuration with secrets masked
    #[command(name = "check-config")]
    CheckConfig,
}

impl Cli {
    #[must_use]
    pub fn command(&self) -> Commands {
        self.command.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_serve() {
        let cli = Cli::parse_from(["mindflow"]);
        assert_eq!(cli.command(), Commands::Serve);
    }

    #[test]
    fn test_parses_subcommands() {
        let cli = Cli::parse_from(["mindflow", "migrate"]);
        assert_eq!(cli.command(), Commands::Migrate);

        let cli = Cli::parse_from(["mindflow", "check-config"]);
        assert_eq!(cli.command(), Commands::CheckConfig);
    }
}
