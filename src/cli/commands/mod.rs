//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Calls the controller
//! 2. Formats and displays output on stdout
//!
//! Errors propagate to `main`, which prints them to stderr.

mod checkout;
mod inspect;
mod refs;

pub use checkout::checkout;
pub use inspect::{cat, log, resolve, stat};
pub use refs::{branches, change_requests, repos, tags};

use crate::cli::args::Command;
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Repos => repos(ctx),
        Command::Branches { repo } => branches(ctx, &repo),
        Command::Tags { repo } => tags(ctx, &repo),
        Command::ChangeRequests { repo } => change_requests(ctx, &repo),
        Command::Resolve { repo, identifier } => resolve(ctx, &repo, &identifier),
        Command::Log {
            repo,
            identifier,
            json,
        } => log(ctx, &repo, &identifier, json),
        Command::Stat {
            repo,
            identifier,
            path,
        } => stat(ctx, &repo, &identifier, &path),
        Command::Cat {
            repo,
            identifier,
            path,
        } => cat(ctx, &repo, &identifier, &path),
        Command::Checkout {
            repo,
            identifier,
            dest,
        } => checkout(ctx, &repo, &identifier, &dest),
    }
}
