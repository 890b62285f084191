//! checkout command - Materialize a revision into a directory

use std::path::Path;

use crate::cli::Context;
use crate::controller::checkout::FsDestination;
use anyhow::{Context as _, Result};

/// Write every file of the resolved revision under `dest` and print the hash.
pub fn checkout(ctx: &Context, repo: &str, identifier: &str, dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create {}", dest.display()))?;

    let mut destination = FsDestination::new(dest);
    let hash = ctx
        .controller
        .checkout(&mut destination, repo, identifier)
        .with_context(|| format!("Failed to check out {} from {}", identifier, repo))?;

    println!("{}", hash);
    Ok(())
}
