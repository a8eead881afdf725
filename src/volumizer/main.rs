//! Binary entry point. All CLI behavior lives in `cli/`; this file only maps errors to
//! the process exit code.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
