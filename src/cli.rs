use std::path::Path;

use anyhow::{Context, anyhow, bail};
use clap::{CommandFactory, Parser};
use serde::Serialize;

use crate::detect::{Action, Toolchain, detect_toolchain};
use crate::executor::{Invocation, execute, resolve};
use crate::repo::project_root;

#[derive(Debug, Parser)]
#[command(
    name = "exer",
    version,
    about = "Detect the project's build ecosystem and run its conventional build/run command"
)]
pub struct Cli {
    /// Execute the run command of the detected ecosystem
    #[arg(long)]
    run: bool,
    /// Execute the build command of the detected ecosystem
    #[arg(long)]
    build: bool,
    /// Extra arguments appended after the base command's tokens
    #[arg(long, value_name = "STRING", allow_hyphen_values = true)]
    opts: Option<String>,
    /// Print the resolved invocation as JSON instead of executing it
    #[arg(long)]
    show: bool,
}

/// What `--show` prints: the detected ecosystem and the exact invocation
/// that would run, in the project root.
#[derive(Debug, Serialize)]
struct ResolvedCommand<'a> {
    toolchain: &'a Toolchain,
    action: Action,
    root: &'a Path,
    #[serde(flatten)]
    invocation: &'a Invocation,
}

/// Parse flags, run the pipeline, and turn any failure into an
/// `exer:`-prefixed stderr message. Returns the process exit code.
pub fn run() -> i32 {
    let cli = Cli::parse();
    match dispatch(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("exer: {err:#}");
            1
        }
    }
}

fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let action = match (cli.run, cli.build) {
        (true, true) => bail!("select either `run` or `build`"),
        (true, false) => Action::Run,
        (false, true) => Action::Build,
        (false, false) => {
            Cli::command().print_help()?;
            return Ok(2);
        }
    };

    let root = project_root()?;
    dispatch_in(&cli, action, &root)
}

fn dispatch_in(cli: &Cli, action: Action, root: &Path) -> anyhow::Result<i32> {
    let toolchain = detect_toolchain(root)?;
    let command = action
        .command_for(toolchain)
        .ok_or_else(|| anyhow!("{action} command not found"))?;
    let invocation =
        resolve(command, cli.opts.as_deref()).with_context(|| format!("resolving `{command}`"))?;

    if cli.show {
        let resolved = ResolvedCommand {
            toolchain,
            action,
            root,
            invocation: &invocation,
        };
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(0);
    }

    execute(&invocation, root)?;
    Ok(0)
}
