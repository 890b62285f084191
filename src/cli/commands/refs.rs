//! Listing commands - repositories, branches, tags, change requests

use crate::cli::Context;
use anyhow::Result;

/// Print repository names, one per line.
pub fn repos(ctx: &Context) -> Result<()> {
    for name in ctx.controller.list_repositories() {
        println!("{}", name);
    }
    Ok(())
}

/// Print branch names with their head hashes.
///
/// The primary branch, if the repository still has one, is marked with `*`.
pub fn branches(ctx: &Context, repo: &str) -> Result<()> {
    let scm = &ctx.controller;
    let primary = scm.primary_branch(repo)?;
    for branch in scm.list_branches(repo)? {
        let head = scm.get_revision(repo, &branch)?;
        let marker = if primary.as_deref() == Some(branch.as_str()) {
            "* "
        } else {
            "  "
        };
        println!("{}{} {}", marker, head.short(12), branch);
    }
    Ok(())
}

/// Print tag names with the hashes they point at.
pub fn tags(ctx: &Context, repo: &str) -> Result<()> {
    let scm = &ctx.controller;
    for tag in scm.list_tags(repo)? {
        let hash = scm.resolve(repo, &tag)?;
        println!("{} {}", hash.short(12), tag);
    }
    Ok(())
}

/// Print open change requests: number, target branch, title.
pub fn change_requests(ctx: &Context, repo: &str) -> Result<()> {
    let scm = &ctx.controller;
    for number in scm.list_change_requests(repo)? {
        let target = scm.get_target(repo, number)?.unwrap_or_default();
        let title = scm.title(repo, number)?.unwrap_or_default();
        println!("#{} -> {}: {}", number, target, title);
    }
    Ok(())
}
