//! Diagnose CLI entry point
//!
//! Parses arguments and hands everything else to the `cli` module. Errors are
//! printed to stderr and the process exits non-zero.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
