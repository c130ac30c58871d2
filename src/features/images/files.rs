//! Image directory lookup under the configured image root

use anyhow::{anyhow, bail, Context as _, Result};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Resolve a block's directory name below `root`.
///
/// Names must stay inside the root: absolute paths and `..` are refused.
pub fn resolve_block_dir(root: &Path, dir: &str) -> Result<PathBuf> {
    let relative = Path::new(dir);
    if dir.trim().is_empty()
        || relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        bail!("{dir} is outside the image root");
    }
    Ok(root.join(relative))
}

/// Every regular file below the block's directory, recursively, in path order
pub fn list_block_files(root: &Path, dir: &str) -> Result<Vec<PathBuf>> {
    let path = resolve_block_dir(root, dir)?;
    if !path.is_dir() {
        return Err(anyhow!("{} is not a directory", path.display()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&path).follow_links(true).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to list {}", path.display()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
