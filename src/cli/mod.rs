//! cli
//!
//! Command-line interface for inspecting fixtures.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the log subscriber
//! - Load the fixture into a scoped controller and dispatch
//!
//! Every invocation builds its store from scratch, so the binary only
//! offers read-side commands plus checkout.

pub mod args;
pub mod commands;

pub use args::Cli;

use anyhow::{Context as _, Result};
use tracing_subscriber::EnvFilter;

use crate::controller::registry::Registry;
use crate::controller::Controller;
use crate::fixture::Fixture;

/// What command handlers operate on.
#[derive(Debug)]
pub struct Context {
    pub controller: Controller,
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    let fixture = Fixture::load(&cli.fixture)
        .with_context(|| format!("Failed to load fixture {}", cli.fixture.display()))?;

    let registry = Registry::global();
    let scm = registry.scoped_with_clock(fixture.clock());
    fixture.apply(&scm).context("Failed to apply fixture")?;

    let ctx = Context {
        controller: scm.controller(),
    };
    commands::dispatch(cli.command, &ctx)
}

/// Install a stderr subscriber. `RUST_LOG` wins over `--debug`.
fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be installed when embedded.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
