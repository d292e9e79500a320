//! Command implementations.

pub mod config;
pub mod run;

use std::path::{Path, PathBuf};

/// Expand a leading `~` in a user-supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}
