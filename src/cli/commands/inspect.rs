//! Read-side commands - resolve, log, stat, cat

use std::io::Write;

use crate::cli::Context;
use anyhow::{anyhow, Context as _, Result};

/// Print the full hash `identifier` resolves to.
pub fn resolve(ctx: &Context, repo: &str, identifier: &str) -> Result<()> {
    let hash = ctx.controller.resolve(repo, identifier)?;
    println!("{}", hash);
    Ok(())
}

/// Print history, newest first.
///
/// Text output is `<hash> <timestamp> <message>`; the root has no message.
pub fn log(ctx: &Context, repo: &str, identifier: &str, json: bool) -> Result<()> {
    let entries = ctx.controller.log(repo, identifier)?;

    if json {
        let out = serde_json::to_string_pretty(&entries).context("Failed to encode log")?;
        println!("{}", out);
        return Ok(());
    }

    for entry in &entries {
        match &entry.message {
            Some(message) => println!("{} {} {}", entry.hash, entry.timestamp, message),
            None => println!("{} {}", entry.hash, entry.timestamp),
        }
    }
    Ok(())
}

/// Print `file`, `directory`, or `absent`.
pub fn stat(ctx: &Context, repo: &str, identifier: &str, path: &str) -> Result<()> {
    let kind = ctx.controller.stat(repo, identifier, path)?;
    println!("{}", kind);
    Ok(())
}

/// Write the raw content of `path` to stdout.
pub fn cat(ctx: &Context, repo: &str, identifier: &str, path: &str) -> Result<()> {
    let content = ctx
        .controller
        .read_file(repo, identifier, path)?
        .ok_or_else(|| anyhow!("No such file: {} at {}", path, identifier))?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&content)?;
    stdout.flush()?;
    Ok(())
}
