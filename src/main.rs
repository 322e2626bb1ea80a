mod cli;
mod detect;
mod executor;
mod repo;

fn main() {
    let code = cli::run();
    if code != 0 {
        std::process::exit(code);
    }
}
