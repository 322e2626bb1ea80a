use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use thiserror::Error;
use which::which;

/// A tokenized subprocess invocation: program name plus argument list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words = vec![self.program.clone()];
        words.extend(self.args.iter().cloned());
        write!(f, "{}", shell_words::join(&words))
    }
}

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("parsing `{command}`: {source}")]
    Tokenize {
        command: String,
        source: shell_words::ParseError,
    },
    #[error("unexpected command found")]
    EmptyCommand,
    #[error("`{0}` is not installed")]
    NotInstalled(String),
    #[error("changing directory to {path}: {source}")]
    ChangeDir {
        path: String,
        source: std::io::Error,
    },
    #[error("launching `{command}`: {source}")]
    Launch {
        command: String,
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
    },
}

/// Tokenize a command string with shell-word semantics, appending the tokens
/// of `opts` (if any) after the base command's tokens.
pub fn resolve(command: &str, opts: Option<&str>) -> Result<Invocation, ExecError> {
    let mut tokens = split_words(command)?;
    if let Some(opts) = opts {
        tokens.extend(split_words(opts)?);
    }

    let mut tokens = tokens.into_iter();
    let program = tokens.next().ok_or(ExecError::EmptyCommand)?;
    Ok(Invocation {
        program,
        args: tokens.collect(),
    })
}

fn split_words(raw: &str) -> Result<Vec<String>, ExecError> {
    shell_words::split(raw).map_err(|source| ExecError::Tokenize {
        command: raw.to_string(),
        source,
    })
}

/// Restores the working directory it was constructed in when dropped, so the
/// original directory comes back on every exit path.
struct DirGuard {
    original: PathBuf,
}

impl DirGuard {
    fn change_to(path: &Path) -> std::io::Result<Self> {
        let original = env::current_dir()?;
        env::set_current_dir(path)?;
        Ok(Self { original })
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.original);
    }
}

/// Run the invocation with the project root as working directory and
/// inherited stdout/stderr, then restore the original working directory.
pub fn execute(invocation: &Invocation, root: &Path) -> Result<(), ExecError> {
    if which(&invocation.program).is_err() {
        return Err(ExecError::NotInstalled(invocation.program.clone()));
    }

    let _guard = DirGuard::change_to(root).map_err(|source| ExecError::ChangeDir {
        path: root.display().to_string(),
        source,
    })?;

    let status = Command::new(&invocation.program)
        .args(&invocation.args)
        .status()
        .map_err(|source| ExecError::Launch {
            command: invocation.to_string(),
            source,
        })?;

    if !status.success() {
        return Err(ExecError::CommandFailed {
            command: invocation.to_string(),
            status,
        });
    }

    Ok(())
}
