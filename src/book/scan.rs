//! Chapter discovery.

use crate::file_ordering::sort_paths;
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Find the markdown files under `folder`, naturally sorted.
///
/// Returned paths are relative to `vault`. Hidden entries, anything inside
/// `skip_dir` and files matching an `exclude` glob are left out. Globs match
/// against the path relative to `folder`.
pub fn discover(
    vault: &Path,
    folder: &Path,
    skip_dir: &Path,
    exclude: &[String],
) -> Result<Vec<PathBuf>> {
    let root = vault.join(folder);
    let excluded = build_globs(exclude)?;

    let mut files = Vec::new();
    for entry in WalkBuilder::new(&root)
        .hidden(true)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false)
        .build()
    {
        let entry = entry.with_context(|| format!("Failed to scan {}", root.display()))?;
        let path = entry.path();
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        if !is_markdown(path) || path.starts_with(skip_dir) {
            continue;
        }
        let in_folder = path.strip_prefix(&root).unwrap_or(path);
        if excluded.is_match(in_folder) {
            log::debug!("excluding {}", in_folder.display());
            continue;
        }
        let relative = path
            .strip_prefix(vault)
            .with_context(|| format!("{} is outside the vault", path.display()))?;
        files.push(relative.to_path_buf());
    }

    sort_paths(&mut files);
    Ok(files)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

fn build_globs(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).with_context(|| format!("Invalid exclude glob '{pattern}'"))?);
    }
    builder.build().with_context(|| "Failed to build exclude globs")
}
