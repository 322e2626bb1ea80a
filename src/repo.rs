use std::path::PathBuf;
use std::process::Command;

use thiserror::Error;
use which::which;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("git not installed")]
    GitMissing,
    #[error(".git directory not found")]
    NotARepository,
    #[error("running git rev-parse: {0}")]
    Io(#[from] std::io::Error),
}

/// Locate the top-level directory of the enclosing git working tree.
///
/// Equivalent to `git rev-parse --show-toplevel` run from the current
/// directory, with the trailing newline trimmed.
pub fn project_root() -> Result<PathBuf, RepoError> {
    if which("git").is_err() {
        return Err(RepoError::GitMissing);
    }

    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .output()?;

    if !output.status.success() {
        return Err(RepoError::NotARepository);
    }

    let path = String::from_utf8_lossy(&output.stdout)
        .trim_end_matches('\n')
        .to_string();
    Ok(PathBuf::from(path))
}
