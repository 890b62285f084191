//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging (overridden by `RUST_LOG`)

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// mockscm - inspect an in-memory SCM fixture
#[derive(Parser, Debug)]
#[command(name = "mockscm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Fixture file describing the repositories to load
    #[arg(long, short = 'f', value_name = "FILE")]
    pub fixture: PathBuf,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List repositories
    Repos,

    /// List branches of a repository
    Branches {
        /// Repository name
        repo: String,
    },

    /// List tags of a repository
    Tags {
        /// Repository name
        repo: String,
    },

    /// List open change requests with their target branches
    #[command(name = "change-requests")]
    ChangeRequests {
        /// Repository name
        repo: String,
    },

    /// Print the revision hash an identifier resolves to
    Resolve {
        /// Repository name
        repo: String,
        /// Revision hash, branch, tag, or change-request/<n>
        identifier: String,
    },

    /// Show history from a revision back to its root
    Log {
        /// Repository name
        repo: String,
        /// Revision hash, branch, tag, or change-request/<n>
        identifier: String,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Report whether a path is a file, directory, or absent
    Stat {
        /// Repository name
        repo: String,
        /// Revision hash, branch, tag, or change-request/<n>
        identifier: String,
        /// Path within the snapshot
        path: String,
    },

    /// Write a file's content to stdout
    Cat {
        /// Repository name
        repo: String,
        /// Revision hash, branch, tag, or change-request/<n>
        identifier: String,
        /// Path within the snapshot
        path: String,
    },

    /// Materialize a revision into a directory
    Checkout {
        /// Repository name
        repo: String,
        /// Revision hash, branch, tag, or change-request/<n>
        identifier: String,
        /// Destination directory (created if missing)
        dest: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_log_with_json() {
        let cli = Cli::try_parse_from([
            "mockscm", "--fixture", "f.toml", "log", "foo", "master", "--json",
        ])
        .unwrap();
        match cli.command {
            Command::Log {
                repo,
                identifier,
                json,
            } => {
                assert_eq!(repo, "foo");
                assert_eq!(identifier, "master");
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn fixture_is_required() {
        assert!(Cli::try_parse_from(["mockscm", "repos"]).is_err());
    }
}
