//! Command-line entry point for `actor-lines`.

use std::process::ExitCode;

fn main() -> ExitCode {
    actor_lines::run()
}
