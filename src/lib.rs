pub mod cli;
pub mod detect;
pub mod executor;
pub mod repo;

/// Run the command line interface and return an exit code.
pub fn run_cli() -> i32 {
    cli::run()
}
